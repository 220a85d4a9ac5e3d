//! What the front end needs from a game beyond the search capability.

use uct_core::Game;
use uct_mcts::games::{ConnectFour, ConnectFourAction, Player, TicTacToe, TicTacToeAction};

/// A two-player board game the terminal front end can drive.
pub trait Board: Game + Sized {
    /// Human readable name.
    const NAME: &'static str;

    /// The game scored for `perspective`.
    fn for_player(perspective: Player) -> Self;

    fn to_move(&self, state: &Self::State) -> Player;

    fn winner(&self, state: &Self::State) -> Option<Player>;

    /// Parse a move typed by a human, without checking legality.
    fn parse_action(&self, input: &str) -> Option<Self::Action>;

    fn render(&self, state: &Self::State) -> String;
}

impl Board for TicTacToe {
    const NAME: &'static str = "Tic-tac-toe";

    fn for_player(perspective: Player) -> Self {
        TicTacToe::new(perspective)
    }

    fn to_move(&self, state: &Self::State) -> Player {
        state.current_player()
    }

    fn winner(&self, state: &Self::State) -> Option<Player> {
        state.winner()
    }

    fn parse_action(&self, input: &str) -> Option<Self::Action> {
        input.trim().parse().ok().map(TicTacToeAction)
    }

    fn render(&self, state: &Self::State) -> String {
        state.to_string()
    }
}

impl Board for ConnectFour {
    const NAME: &'static str = "Connect Four";

    fn for_player(perspective: Player) -> Self {
        ConnectFour::new(perspective)
    }

    fn to_move(&self, state: &Self::State) -> Player {
        state.current_player()
    }

    fn winner(&self, state: &Self::State) -> Option<Player> {
        state.winner()
    }

    fn parse_action(&self, input: &str) -> Option<Self::Action> {
        input.trim().parse().ok().map(ConnectFourAction)
    }

    fn render(&self, state: &Self::State) -> String {
        state.to_string()
    }
}
