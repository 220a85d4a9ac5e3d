use thiserror::Error;

/// Errors that can occur while searching a game tree.
///
/// `E` is the error type of the searched [`Game`](crate::Game). Failures
/// reported by the game are carried through unchanged in [`MctsError::Game`].
#[derive(Error, Debug)]
pub enum MctsError<E> {
    /// The state handed to the search has no legal actions, so there is no
    /// action to return.
    #[error("initial state has no legal actions")]
    NoLegalActions,

    /// A rollout reached a state that is not terminal but offers no actions.
    #[error("non-terminal state has no legal actions")]
    DeadEnd,

    /// The search tree was driven in an order its operations do not allow.
    #[error("invalid search state: {0}")]
    InvalidState(&'static str),

    /// The search configuration holds a value the search cannot use.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The game itself failed.
    #[error(transparent)]
    Game(E),
}

/// Convenience Result type for search operations over a game with error `E`.
pub type Result<T, E> = std::result::Result<T, MctsError<E>>;
