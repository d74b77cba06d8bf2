//! Monte Carlo Tree Search
//!
//! - [`tree`]: arena of nodes addressed by [`NodeId`]
//! - [`mcts`](mcts::mcts): the select/expand/rollout/backpropagate loop

pub mod mcts;
pub mod tree;

pub use mcts::{mcts, ChildStats, Expander, Expansion, MctsSummary, RolloutPolicy};
pub use tree::{Node, NodeId, Tree};
