//! Tic-tac-toe implementation for MCTS validation.
//!
//! Tic-tac-toe is small enough that a search with a few thousand iterations
//! finds immediate wins and blocks reliably, which makes it a good check of
//! the selection and backpropagation plumbing.

use super::{Player, RulesError};
use std::fmt;
use uct_core::Game;

/// Tic-tac-toe board state.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct TicTacToeState {
    /// Board: 9 cells, indexed 0-8 (row-major).
    /// ```text
    /// 0 | 1 | 2
    /// ---------
    /// 3 | 4 | 5
    /// ---------
    /// 6 | 7 | 8
    /// ```
    board: [Option<Player>; 9],

    /// Current player to move.
    current: Player,

    /// Cached winner (if any).
    winner: Option<Player>,
}

impl TicTacToeState {
    /// Create a new empty board with X to move.
    pub fn new() -> Self {
        Self {
            board: [None; 9],
            current: Player::X,
            winner: None,
        }
    }

    /// Get the current player to move.
    pub fn current_player(&self) -> Player {
        self.current
    }

    /// Get the winner, if any.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Get the piece at a cell, if any.
    pub fn get(&self, cell: usize) -> Option<Player> {
        self.board.get(cell).copied().flatten()
    }

    /// Check for a winner on the current board.
    fn check_winner(&self) -> Option<Player> {
        const LINES: [[usize; 3]; 8] = [
            [0, 1, 2], // top row
            [3, 4, 5], // middle row
            [6, 7, 8], // bottom row
            [0, 3, 6], // left column
            [1, 4, 7], // center column
            [2, 5, 8], // right column
            [0, 4, 8], // main diagonal
            [2, 4, 6], // anti-diagonal
        ];

        LINES.iter().find_map(|line| {
            let player = self.board[line[0]]?;
            (self.board[line[1]] == Some(player) && self.board[line[2]] == Some(player))
                .then_some(player)
        })
    }

    /// Check if the board is full (draw if no winner).
    fn is_full(&self) -> bool {
        self.board.iter().all(|c| c.is_some())
    }

    fn is_over(&self) -> bool {
        self.winner.is_some() || self.is_full()
    }
}

impl Default for TicTacToeState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicTacToeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "-----------")?;
            }
            for col in 0..3 {
                if col > 0 {
                    write!(f, "|")?;
                }
                let cell = row * 3 + col;
                match self.board[cell] {
                    Some(player) => write!(f, " {} ", player)?,
                    None => write!(f, " {} ", cell)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Tic-tac-toe action (cell index 0-8).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TicTacToeAction(pub u8);

impl TicTacToeAction {
    /// Get the row (0-2).
    pub fn row(self) -> u8 {
        self.0 / 3
    }

    /// Get the column (0-2).
    pub fn col(self) -> u8 {
        self.0 % 3
    }
}

impl fmt::Display for TicTacToeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

/// Tic-tac-toe game, scored from the point of view of `perspective`.
#[derive(Clone, Debug)]
pub struct TicTacToe {
    perspective: Player,
}

impl TicTacToe {
    pub fn new(perspective: Player) -> Self {
        Self { perspective }
    }

    pub fn perspective(&self) -> Player {
        self.perspective
    }
}

impl Default for TicTacToe {
    /// Scored for X, the player who moves first.
    fn default() -> Self {
        Self::new(Player::X)
    }
}

impl Game for TicTacToe {
    type State = TicTacToeState;
    type Action = TicTacToeAction;
    type Error = RulesError;

    fn initial_state(&self) -> Self::State {
        TicTacToeState::new()
    }

    fn legal_actions(&self, state: &Self::State) -> Result<Vec<Self::Action>, Self::Error> {
        if state.is_over() {
            return Ok(Vec::new());
        }
        Ok(state
            .board
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| TicTacToeAction(i as u8))
            .collect())
    }

    fn apply(&self, state: &Self::State, action: Self::Action) -> Result<Self::State, Self::Error> {
        if state.is_over() {
            return Err(RulesError::GameOver);
        }
        match state.board.get(action.0 as usize) {
            None => return Err(RulesError::OffBoard(action.0)),
            Some(Some(_)) => return Err(RulesError::CellTaken(action.0)),
            Some(None) => {}
        }

        let mut new_state = state.clone();
        new_state.board[action.0 as usize] = Some(state.current);
        new_state.current = state.current.opposite();
        new_state.winner = new_state.check_winner();
        Ok(new_state)
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        state.is_over()
    }

    fn result(&self, state: &Self::State) -> Result<f64, Self::Error> {
        if !state.is_over() {
            return Err(RulesError::InProgress);
        }
        Ok(self.perspective.reward(state.winner))
    }
}
