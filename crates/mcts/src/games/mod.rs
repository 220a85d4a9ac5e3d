//! Small games bundled with the search.
//!
//! They double as fixtures for the tests and as opponents for the `uct-play`
//! binary. Both report terminal results from a fixed perspective player:
//! +1 for a win, -1 for a loss, 0 for a draw.

pub mod connect_four;
pub mod tictactoe;

pub use connect_four::{ConnectFour, ConnectFourAction, ConnectFourState};
pub use tictactoe::{TicTacToe, TicTacToeAction, TicTacToeState};

use std::fmt;
use thiserror::Error;

/// Two-player side.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opposing player.
    pub fn opposite(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Reward of a finished game for this player.
    pub(crate) fn reward(self, winner: Option<Player>) -> f64 {
        match winner {
            Some(w) if w == self => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// Rule violations reported by the bundled games.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("position {0} is off the board")]
    OffBoard(u8),

    #[error("cell {0} is already taken")]
    CellTaken(u8),

    #[error("column {0} is full")]
    ColumnFull(u8),

    #[error("the game is already over")]
    GameOver,

    #[error("the game is still in progress")]
    InProgress,
}
