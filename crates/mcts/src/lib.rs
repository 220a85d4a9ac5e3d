//! Monte Carlo Tree Search with UCT selection.
//!
//! This crate provides a generic MCTS implementation that can be used with
//! any game implementing the `uct_core::Game` trait.
//!
//! # Features
//!
//! - **Generic**: Works with any `Game` implementation
//! - **UCT Selection**: Unvisited children first, then mean reward plus a
//!   constant-weighted exploration term
//! - **Random Rollouts**: Uniform random playouts to a terminal state
//! - **Arena Tree**: Nodes addressed by index, parents by back-reference
//!
//! # Example
//!
//! ```
//! use uct_mcts::{games::TicTacToe, Mcts, MctsConfig};
//! use uct_core::Game;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let game = TicTacToe::default();
//! let state = game.initial_state();
//!
//! let config = MctsConfig::with_iterations(200);
//! let mut mcts = Mcts::new(config, ChaCha8Rng::seed_from_u64(42));
//!
//! let result = mcts.search(&game, &state).expect("empty board has moves");
//! println!("Best action: {:?}", result.best_action);
//! println!("Root visits: {}", result.root_visits);
//! ```

pub mod config;
pub mod games;
mod node;
pub mod rollout;
pub mod search;
mod tree;

pub use config::MctsConfig;
pub use node::{Node, NodeId, NodeStats};
pub use rollout::random_rollout;
pub use search::{run, ChildStats, Mcts, SearchResult};
pub use tree::{Tree, UctScore};
