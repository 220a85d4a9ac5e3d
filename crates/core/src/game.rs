use std::fmt::Debug;

/// A game abstraction for tree search.
///
/// This trait defines the interface that any sequential decision process must
/// implement to be searched. States are treated as immutable values: `apply`
/// returns a new state and never changes the one it was given.
///
/// The search credits the value returned by [`Game::result`] to every node on
/// the path back to the root without changing its sign, so a two-player game
/// should report results from one fixed player's point of view.
pub trait Game {
    /// The game state (e.g., a board position)
    type State: Clone;

    /// A game action (e.g., a column to drop a piece into)
    type Action: Clone + Eq + Debug;

    /// Error reported by the game's rules. Use
    /// [`Infallible`](std::convert::Infallible) when the rules cannot fail.
    type Error: std::error::Error + 'static;

    /// Returns the initial game state
    fn initial_state(&self) -> Self::State;

    /// Returns all legal actions from the given state, in a stable order.
    ///
    /// May be empty only for a terminal state.
    fn legal_actions(&self, state: &Self::State) -> Result<Vec<Self::Action>, Self::Error>;

    /// Applies a legal action, returning the successor state.
    fn apply(&self, state: &Self::State, action: Self::Action) -> Result<Self::State, Self::Error>;

    /// Returns true if the game has ended.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Returns the reward of a terminal state.
    ///
    /// Only defined when [`Game::is_terminal`] holds; implementations should
    /// report an error for a state that is still in play.
    fn result(&self, state: &Self::State) -> Result<f64, Self::Error>;
}
