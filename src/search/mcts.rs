//! UCB1 Monte Carlo Tree Search over a caller-defined decision space
//!
//! The engine never inspects states or actions. It asks an [`Expander`] for
//! the children of a state and a [`RolloutPolicy`] for a scalar reward, and
//! keeps visit and value counts in an arena [`Tree`].
//!
//! Per simulation:
//!
//! 1. **Select**: descend by UCB1 until a leaf (unvisited children first).
//! 2. **Expand**: a non-terminal leaf above the depth limit that is the root
//!    or has been visited before is expanded; an empty expansion marks it
//!    terminal, otherwise a random new child becomes the leaf.
//! 3. **Rollout**: average `mcts_simulations_per_node` rewards for the leaf.
//! 4. **Backpropagate**: add one visit and the reward up to the root.
//!
//! # Example
//!
//! ```
//! use probsim::config::EngineConfig;
//! use probsim::random::RandomEngine;
//! use probsim::search::{mcts, Expansion};
//!
//! // pick digits; reward is the mean digit chosen so far
//! let expand = |path: &Vec<u8>| -> Result<Vec<Expansion<Vec<u8>, u8>>, std::convert::Infallible> {
//!     Ok((0..3u8)
//!         .map(|d| {
//!             let mut next = path.clone();
//!             next.push(d);
//!             Expansion::new(next, d, 1.0 / 3.0)
//!         })
//!         .collect())
//! };
//! let rollout = |path: &Vec<u8>| -> Result<f64, std::convert::Infallible> {
//!     Ok(path.iter().map(|&d| d as f64 / 2.0).sum::<f64>() / path.len().max(1) as f64)
//! };
//!
//! let config = EngineConfig::default().with_mcts_simulations(300).with_mcts_max_depth(2);
//! let mut rng = RandomEngine::new(Some(1));
//! let summary = mcts(Vec::new(), expand, rollout, &config, &mut rng, None).unwrap();
//! assert_eq!(summary.best_action, Some(2));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::tree::{NodeId, Tree};
use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::error::{CallbackError, Result, SimError};
use crate::random::RandomEngine;

/// One child produced by an [`Expander`].
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion<S, A> {
    pub state: S,
    pub action: A,
    pub prior: f64,
}

impl<S, A> Expansion<S, A> {
    pub fn new(state: S, action: A, prior: f64) -> Self {
        Self { state, action, prior }
    }
}

/// Produces the children of a state. An empty list marks the state terminal.
pub trait Expander<S, A> {
    fn expand(&mut self, state: &S) -> std::result::Result<Vec<Expansion<S, A>>, CallbackError>;
}

impl<S, A, F, E> Expander<S, A> for F
where
    F: FnMut(&S) -> std::result::Result<Vec<Expansion<S, A>>, E>,
    E: Into<CallbackError>,
{
    #[inline]
    fn expand(&mut self, state: &S) -> std::result::Result<Vec<Expansion<S, A>>, CallbackError> {
        self(state).map_err(Into::into)
    }
}

/// Scores a state. Rewards are conventionally in [0, 1]; bounds are not enforced.
pub trait RolloutPolicy<S> {
    fn rollout(&mut self, state: &S) -> std::result::Result<f64, CallbackError>;
}

impl<S, F, E> RolloutPolicy<S> for F
where
    F: FnMut(&S) -> std::result::Result<f64, E>,
    E: Into<CallbackError>,
{
    #[inline]
    fn rollout(&mut self, state: &S) -> std::result::Result<f64, CallbackError> {
        self(state).map_err(Into::into)
    }
}

/// Statistics for one child of the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildStats<A> {
    pub action: A,
    pub prior: f64,
    pub visits: u64,
    pub value: f64,
    pub mean_value: f64,
    /// `None` for a child that was never visited
    pub ucb1: Option<f64>,
}

/// Outcome of one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MctsSummary<A> {
    /// First action of `best_sequence`; `None` if the root never expanded
    pub best_action: Option<A>,
    /// Robust-child path: most visited child at every level
    pub best_sequence: Vec<A>,
    /// Root children in expansion order
    pub children: Vec<ChildStats<A>>,
    pub simulations: usize,
    pub tree_size: usize,
    pub max_depth_reached: usize,
}

/// Run `config.mcts_simulations` iterations from `root_state`.
pub fn mcts<S, A, X, R>(
    root_state: S,
    mut expander: X,
    mut rollout: R,
    config: &EngineConfig,
    rng: &mut RandomEngine,
    cancel: Option<&CancellationToken>,
) -> Result<MctsSummary<A>>
where
    A: Clone,
    X: Expander<S, A>,
    R: RolloutPolicy<S>,
{
    config.validate_search()?;

    let c = config.mcts_exploration_constant;
    let total = config.mcts_simulations;
    let checkpoint = (total / 10).max(1);
    let mut tree: Tree<S, A> = Tree::new(root_state);

    for sim in 0..total {
        if cancel.map_or(false, CancellationToken::is_cancelled) {
            return Err(SimError::Cancelled { completed: sim });
        }

        let mut leaf = NodeId::ROOT;
        while let Some(child) = tree.select_child(leaf, c) {
            leaf = child;
        }

        if should_expand(&tree, leaf, config.mcts_max_depth) {
            let expansions = expander.expand(&tree[leaf].state).map_err(SimError::Expansion)?;
            if expansions.is_empty() {
                tree[leaf].terminal = true;
            } else {
                for e in expansions {
                    if !e.prior.is_finite() {
                        return Err(SimError::Expansion(
                            format!("non-finite prior {}", e.prior).into(),
                        ));
                    }
                    tree.add_child(leaf, e.state, e.action, e.prior);
                }
                let children = &tree[leaf].children;
                leaf = children[rng.next_index(children.len())];
            }
        }

        let reward = evaluate(&mut rollout, &tree[leaf].state, config.mcts_simulations_per_node)?;
        tree.backpropagate(leaf, reward);

        if (sim + 1) % checkpoint == 0 {
            debug!(
                simulation = sim + 1,
                total,
                tree_size = tree.len(),
                root_mean = tree.root().mean_value(),
                "mcts progress"
            );
        }
    }

    let summary = summarize(&tree, c, total);
    info!(
        simulations = summary.simulations,
        tree_size = summary.tree_size,
        max_depth = summary.max_depth_reached,
        sequence_len = summary.best_sequence.len(),
        "mcts finished"
    );
    Ok(summary)
}

fn should_expand<S, A>(tree: &Tree<S, A>, id: NodeId, max_depth: usize) -> bool {
    let node = &tree[id];
    node.is_leaf()
        && !node.terminal
        && node.depth < max_depth
        && (id == NodeId::ROOT || node.visits > 0)
}

/// Mean of `k` rollouts; rejects callback failures and non-finite rewards.
fn evaluate<S, R: RolloutPolicy<S> + ?Sized>(policy: &mut R, state: &S, k: usize) -> Result<f64> {
    let mut sum = 0.0;
    for _ in 0..k {
        let r = policy.rollout(state).map_err(SimError::Rollout)?;
        if !r.is_finite() {
            return Err(SimError::NonFiniteReward(r));
        }
        sum += r;
    }
    Ok(sum / k as f64)
}

fn summarize<S, A: Clone>(tree: &Tree<S, A>, c: f64, simulations: usize) -> MctsSummary<A> {
    let root = tree.root();

    let children = root
        .children
        .iter()
        .filter_map(|&id| {
            let n = &tree[id];
            n.action.clone().map(|action| ChildStats {
                action,
                prior: n.prior,
                visits: n.visits,
                value: n.value,
                mean_value: n.mean_value(),
                ucb1: n.ucb1(root.visits, c),
            })
        })
        .collect();

    let mut best_sequence = Vec::new();
    let mut cursor = NodeId::ROOT;
    while let Some(next) = tree.most_visited_child(cursor) {
        if tree[next].visits == 0 {
            break;
        }
        if let Some(action) = &tree[next].action {
            best_sequence.push(action.clone());
        }
        cursor = next;
    }

    MctsSummary {
        best_action: best_sequence.first().cloned(),
        best_sequence,
        children,
        simulations,
        tree_size: tree.len(),
        max_depth_reached: tree.max_depth(),
    }
}
