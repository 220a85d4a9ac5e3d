//! Random playouts used to estimate the value of a state.

use rand::Rng;
use uct_core::{Game, MctsError, Result};

/// Play uniformly random legal actions from `state` until the game ends and
/// return the terminal result.
///
/// The playout works on copies of the state and never touches the search
/// tree.
///
/// # Errors
/// Returns `MctsError::DeadEnd` if a non-terminal state offers no actions,
/// and `MctsError::Game` if the game fails along the way.
pub fn random_rollout<G, R>(game: &G, state: &G::State, rng: &mut R) -> Result<f64, G::Error>
where
    G: Game,
    R: Rng + ?Sized,
{
    let mut state = state.clone();

    while !game.is_terminal(&state) {
        let mut actions = game.legal_actions(&state).map_err(MctsError::Game)?;
        if actions.is_empty() {
            return Err(MctsError::DeadEnd);
        }

        let idx = rng.gen_range(0..actions.len());
        let action = actions.swap_remove(idx);
        state = game.apply(&state, action).map_err(MctsError::Game)?;
    }

    game.result(&state).map_err(MctsError::Game)
}
