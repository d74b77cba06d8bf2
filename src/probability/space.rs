//! Weighted probability spaces
//!
//! A [`ProbabilitySpace`] is an ordered set of [`Dimension`]s with unique keys.
//! Weights lie in [0, 1] but need not sum to 1.
//!
//! Spaces are usually built from typed input:
//!
//! ```
//! use probsim::probability::ProbabilitySpace;
//!
//! let space = ProbabilitySpace::from_weights([("a", 0.2), ("b", 0.8)]).unwrap();
//! assert_eq!(space.len(), 2);
//! assert!((space.dimension("b").unwrap().amplitude - 0.8_f64.sqrt()).abs() < 1e-12);
//! ```
//!
//! or converted from loosely shaped JSON supplied by callers, trying in order:
//!
//! 1. a list (or keyed map) of dimension records carrying `probability` or
//!    `amplitude`, optionally `phase` and `coherence`
//! 2. a flat `key -> probability` map
//! 3. a single `{"default": 0.5}` dimension when neither shape matches
//!
//! ```
//! use probsim::probability::ProbabilitySpace;
//! use serde_json::json;
//!
//! let flat = ProbabilitySpace::from_value(&json!({"x": 0.3, "y": 0.7})).unwrap();
//! assert_eq!(flat.keys().collect::<Vec<_>>(), vec!["x", "y"]);
//!
//! let fallback = ProbabilitySpace::from_value(&json!("not a space")).unwrap();
//! assert_eq!(fallback.dimension("default").unwrap().weight, 0.5);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Result, SimError};

/// Key used when the caller's input matches no recognised shape.
pub const DEFAULT_KEY: &str = "default";

/// Weight of the fallback dimension.
pub const DEFAULT_WEIGHT: f64 = 0.5;

/// One named axis of a probability space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub key: String,
    /// Probability mass in [0, 1]
    pub weight: f64,
    /// √weight
    pub amplitude: f64,
    /// Carried through for callers; never used in aggregation
    pub phase: f64,
    /// Quality scalar, 1.0 unless the caller says otherwise
    pub coherence: f64,
}

impl Dimension {
    pub fn new(key: impl Into<String>, weight: f64) -> Self {
        Self {
            key: key.into(),
            weight,
            amplitude: weight.max(0.0).sqrt(),
            phase: 0.0,
            coherence: 1.0,
        }
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_coherence(mut self, coherence: f64) -> Self {
        self.coherence = coherence;
        self
    }
}

/// Ordered, immutable set of dimensions with unique keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilitySpace {
    dimensions: Vec<Dimension>,
    #[serde(skip)]
    keys: Arc<[String]>,
}

impl ProbabilitySpace {
    /// Build a space, rejecting empty input, duplicate keys and weights
    /// outside [0, 1].
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self> {
        if dimensions.is_empty() {
            return Err(SimError::InvalidSpace("no dimensions".into()));
        }

        let mut seen = HashSet::with_capacity(dimensions.len());
        for d in &dimensions {
            if !seen.insert(d.key.as_str()) {
                return Err(SimError::InvalidSpace(format!("duplicate key '{}'", d.key)));
            }
            if !d.weight.is_finite() || !(0.0..=1.0).contains(&d.weight) {
                return Err(SimError::InvalidSpace(format!(
                    "weight of '{}' is {} (must lie in [0, 1])",
                    d.key, d.weight
                )));
            }
            if !d.phase.is_finite() || !d.coherence.is_finite() {
                return Err(SimError::InvalidSpace(format!(
                    "phase/coherence of '{}' must be finite",
                    d.key
                )));
            }
        }

        let keys: Arc<[String]> = dimensions.iter().map(|d| d.key.clone()).collect();
        Ok(Self { dimensions, keys })
    }

    /// Space from `(key, weight)` pairs; amplitude derived, phase 0, coherence 1.
    pub fn from_weights<K, I>(pairs: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        Self::new(pairs.into_iter().map(|(k, w)| Dimension::new(k, w)).collect())
    }

    /// Single `default` dimension with weight 0.5.
    pub fn fallback() -> Self {
        let dims = vec![Dimension::new(DEFAULT_KEY, DEFAULT_WEIGHT)];
        let keys: Arc<[String]> = Arc::from(vec![DEFAULT_KEY.to_string()]);
        Self { dimensions: dims, keys }
    }

    /// Convert caller-supplied JSON, trying record lists, then flat maps,
    /// then falling back to [`ProbabilitySpace::fallback`].
    ///
    /// Input that matches a shape but carries invalid values (duplicate keys,
    /// weights outside [0, 1]) is an error, not a fallback.
    pub fn from_value(value: &Value) -> Result<Self> {
        if let Some(dims) = records_shape(value) {
            return Self::new(dims);
        }
        if let Some(dims) = flat_shape(value) {
            return Self::new(dims);
        }

        warn!("probability space input matched no known shape, using default dimension");
        Ok(Self::fallback())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    #[inline]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension(&self, key: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.key.as_str())
    }

    /// Shared key list handed to every sample drawn from this space.
    #[inline]
    pub(crate) fn shared_keys(&self) -> Arc<[String]> {
        Arc::clone(&self.keys)
    }

    pub fn total_weight(&self) -> f64 {
        self.dimensions.iter().map(|d| d.weight).sum()
    }

    /// Weights scaled to sum to 1; uniform when the total mass is zero.
    pub fn normalized_weights(&self) -> Vec<f64> {
        let total = self.total_weight();
        let n = self.dimensions.len() as f64;
        if total > 0.0 {
            self.dimensions.iter().map(|d| d.weight / total).collect()
        } else {
            vec![1.0 / n; self.dimensions.len()]
        }
    }
}

impl<'de> Deserialize<'de> for ProbabilitySpace {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        // accept our own serialized form as well as the caller shapes
        let value = match value {
            Value::Object(mut map) if map.len() == 1 && map.contains_key("dimensions") => {
                map.remove("dimensions").unwrap_or(Value::Null)
            }
            other => other,
        };
        ProbabilitySpace::from_value(&value).map_err(serde::de::Error::custom)
    }
}

fn number(map: &Map<String, Value>, field: &str) -> Option<f64> {
    map.get(field).and_then(Value::as_f64)
}

fn record_to_dimension(key: String, record: &Map<String, Value>) -> Option<Dimension> {
    let weight = match number(record, "probability").or_else(|| number(record, "weight")) {
        Some(p) => p,
        None => number(record, "amplitude")?.powi(2),
    };

    let mut dim = Dimension::new(key, weight);
    if let Some(a) = number(record, "amplitude") {
        dim.amplitude = a;
    }
    if let Some(p) = number(record, "phase") {
        dim.phase = p;
    }
    if let Some(c) = number(record, "coherence") {
        dim.coherence = c;
    }
    Some(dim)
}

/// Shape 1: `[{"key": .., "probability": ..}, ..]` or `{"k": {"probability": ..}, ..}`.
fn records_shape(value: &Value) -> Option<Vec<Dimension>> {
    match value {
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(|item| {
                let record = item.as_object()?;
                let key = record
                    .get("key")
                    .or_else(|| record.get("id"))
                    .or_else(|| record.get("state"))?
                    .as_str()?
                    .to_string();
                record_to_dimension(key, record)
            })
            .collect(),
        Value::Object(map) if !map.is_empty() => map
            .iter()
            .map(|(key, v)| record_to_dimension(key.clone(), v.as_object()?))
            .collect(),
        _ => None,
    }
}

/// Shape 2: `{"k": 0.3, ..}`.
fn flat_shape(value: &Value) -> Option<Vec<Dimension>> {
    match value {
        Value::Object(map) if !map.is_empty() => map
            .iter()
            .map(|(key, v)| Some(Dimension::new(key.clone(), v.as_f64()?)))
            .collect(),
        _ => None,
    }
}
