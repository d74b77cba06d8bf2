use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde::ser::SerializeMap;

/// One draw across every dimension of a space.
///
/// Values are stored in dimension order next to a key list shared by every
/// sample of the same space, so cloning a sample never copies key strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    keys: Arc<[String]>,
    values: Vec<f64>,
    /// Importance weight, 1.0 unless the sampling strategy reweights
    pub weight: f64,
}

impl Sample {
    pub(crate) fn new(keys: Arc<[String]>, values: Vec<f64>) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        Self { keys, values, weight: 1.0 }
    }

    pub(crate) fn weighted(keys: Arc<[String]>, values: Vec<f64>, weight: f64) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        Self { keys, values, weight }
    }

    /// Value drawn for `key`.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|i| self.values[i])
    }

    /// Values in dimension order.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.keys.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Same sample with dimension `index` replaced.
    pub(crate) fn with_value(&self, index: usize, value: f64) -> Self {
        let mut values = self.values.clone();
        values[index] = value;
        Self { keys: Arc::clone(&self.keys), values, weight: self.weight }
    }
}

impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, &v)?;
        }
        map.serialize_entry("_weight", &self.weight)?;
        map.end()
    }
}

/// A sample paired with its payoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedSample {
    pub sample: Sample,
    pub payoff: f64,
}
