//! Connect Four on the standard 6x7 board.
//!
//! Pieces drop to the lowest free row of a column; four in a row
//! horizontally, vertically or diagonally wins, and a full board is a draw.

use super::{Player, RulesError};
use std::fmt;
use uct_core::Game;

pub const ROWS: usize = 6;
pub const COLUMNS: usize = 7;

/// Connect Four board state.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct ConnectFourState {
    /// `board[row][col]`, row 0 is the bottom.
    board: [[Option<Player>; COLUMNS]; ROWS],

    /// Pieces in each column.
    heights: [u8; COLUMNS],

    current: Player,

    winner: Option<Player>,
}

impl ConnectFourState {
    /// Create an empty board with X to move.
    pub fn new() -> Self {
        Self {
            board: [[None; COLUMNS]; ROWS],
            heights: [0; COLUMNS],
            current: Player::X,
            winner: None,
        }
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Piece at `row` (0 = bottom) and `col`, if any.
    pub fn get(&self, row: usize, col: usize) -> Option<Player> {
        self.board.get(row)?.get(col).copied().flatten()
    }

    fn is_full(&self) -> bool {
        self.heights.iter().all(|&h| h as usize == ROWS)
    }

    fn is_over(&self) -> bool {
        self.winner.is_some() || self.is_full()
    }

    /// Whether the piece at (`row`, `col`) completes four in a row.
    fn connects_four(&self, row: usize, col: usize) -> bool {
        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

        let Some(player) = self.get(row, col) else {
            return false;
        };

        DIRECTIONS.iter().any(|&(dr, dc)| {
            let run = |sign: isize| {
                (1..4)
                    .take_while(|&step| {
                        let r = row as isize + sign * step * dr;
                        let c = col as isize + sign * step * dc;
                        r >= 0 && c >= 0 && self.get(r as usize, c as usize) == Some(player)
                    })
                    .count()
            };
            1 + run(1) + run(-1) >= 4
        })
    }
}

impl Default for ConnectFourState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectFourState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLUMNS {
                match self.board[row][col] {
                    Some(player) => write!(f, " {}", player)?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        for col in 0..COLUMNS {
            write!(f, " {}", col)?;
        }
        writeln!(f)
    }
}

/// Connect Four action: the column to drop a piece into (0-6).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ConnectFourAction(pub u8);

impl fmt::Display for ConnectFourAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column {}", self.0)
    }
}

/// Connect Four game, scored from the point of view of `perspective`.
#[derive(Clone, Debug)]
pub struct ConnectFour {
    perspective: Player,
}

impl ConnectFour {
    pub fn new(perspective: Player) -> Self {
        Self { perspective }
    }

    pub fn perspective(&self) -> Player {
        self.perspective
    }
}

impl Default for ConnectFour {
    fn default() -> Self {
        Self::new(Player::X)
    }
}

impl Game for ConnectFour {
    type State = ConnectFourState;
    type Action = ConnectFourAction;
    type Error = RulesError;

    fn initial_state(&self) -> Self::State {
        ConnectFourState::new()
    }

    fn legal_actions(&self, state: &Self::State) -> Result<Vec<Self::Action>, Self::Error> {
        if state.is_over() {
            return Ok(Vec::new());
        }
        Ok((0..COLUMNS)
            .filter(|&col| (state.heights[col] as usize) < ROWS)
            .map(|col| ConnectFourAction(col as u8))
            .collect())
    }

    fn apply(&self, state: &Self::State, action: Self::Action) -> Result<Self::State, Self::Error> {
        if state.is_over() {
            return Err(RulesError::GameOver);
        }
        let col = action.0 as usize;
        let row = match state.heights.get(col) {
            None => return Err(RulesError::OffBoard(action.0)),
            Some(&h) if h as usize == ROWS => return Err(RulesError::ColumnFull(action.0)),
            Some(&h) => h as usize,
        };

        let mut new_state = state.clone();
        new_state.board[row][col] = Some(state.current);
        new_state.heights[col] += 1;
        new_state.current = state.current.opposite();
        if new_state.connects_four(row, col) {
            new_state.winner = Some(state.current);
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &ConnectFour, columns: &[u8]) -> ConnectFourState {
        columns.iter().fold(game.initial_state(), |state, &col| {
            game.apply(&state, ConnectFourAction(col)).unwrap()
        })
    }

    #[test]
    fn test_pieces_stack() {
        let game = ConnectFour::default();
        let state = play(&game, &[3, 3]);

        assert_eq!(state.get(0, 3), Some(Player::X));
        assert_eq!(state.get(1, 3), Some(Player::O));
        assert_eq!(state.get(2, 3), None);
        assert_eq!(state.current_player(), Player::X);
    }

    #[test]
    fn test_full_column_is_not_legal() {
        let game = ConnectFour::default();
        let state = play(&game, &[0, 0, 0, 0, 0, 0]);

        let actions = game.legal_actions(&state).unwrap();
        assert_eq!(actions.len(), 6);
        assert!(!actions.contains(&ConnectFourAction(0)));
        assert_eq!(game.apply(&state, ConnectFourAction(0)), Err(RulesError::ColumnFull(0)));
        assert_eq!(game.apply(&state, ConnectFourAction(7)), Err(RulesError::OffBoard(7)));
    }

    #[test]
    fn test_horizontal_win() {
        let game = ConnectFour::default();
        // X: 0 1 2 3 along the bottom, O stacks on top
        let state = play(&game, &[0, 0, 1, 1, 2, 2, 3]);

        assert_eq!(state.winner(), Some(Player::X));
        assert!(game.is_terminal(&state));
        assert_eq!(game.result(&state), Ok(1.0));
        assert!(game.legal_actions(&state).unwrap().is_empty());
    }

    #[test]
    fn test_vertical_win() {
        let game = ConnectFour::new(Player::X);
        // O stacks column 6 while X wanders
        let state = play(&game, &[0, 6, 1, 6, 0, 6, 1, 6]);

        assert_eq!(state.winner(), Some(Player::O));
        assert_eq!(game.result(&state), Ok(-1.0));
    }

    #[test]
    fn test_diagonal_wins() {
        let game = ConnectFour::default();

        // X climbs the rising diagonal (0,0) (1,1) (2,2) (3,3)
        let rising = play(&game, &[0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3]);
        assert_eq!(rising.winner(), Some(Player::X));

        // X on the falling diagonal (3,0) (2,1) (1,2) (0,3)
        let falling = play(&game, &[3, 2, 2, 1, 1, 0, 1, 0, 0, 6, 0]);
        assert_eq!(falling.winner(), Some(Player::X));
    }

    #[test]
    fn test_no_early_win() {
        let game = ConnectFour::default();
        let state = play(&game, &[0, 1, 2, 4, 5, 6]);

        assert!(state.winner().is_none());
        assert!(!game.is_terminal(&state));
        assert_eq!(game.result(&state), Err(RulesError::InProgress));
    }

    #[test]
    fn test_draw_on_full_board() {
        let game = ConnectFour::default();
        let columns = [
            4, 3, 6, 0, 1, 4, 5, 5, 1, 1, 5, 0, 1, 6, 0, 1, 5, 5, 1, 0, 4, 6, 3, 2, 6, 6, 0, 4, 6,
            5, 2, 0, 4, 2, 4, 2, 2, 2, 3, 3, 3, 3,
        ];
        let state = play(&game, &columns);

        assert!(state.winner().is_none(), "unexpected winner:\n{}", state);
        assert!(game.is_terminal(&state));
        assert_eq!(game.result(&state), Ok(0.0));
    }

    #[test]
    fn test_display() {
        let game = ConnectFour::default();
        let state = play(&game, &[3, 4]);

        let display = state.to_string();
        let lines: Vec<&str> = display.lines().collect();
        assert_eq!(lines.len(), ROWS + 1);
        assert_eq!(lines[ROWS - 1], " . . . X O . .");
    }
}
