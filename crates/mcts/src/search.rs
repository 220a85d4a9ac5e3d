//! Monte Carlo Tree Search implementation.
//!
//! Implements MCTS with UCT selection: a pre-expansion pass that samples
//! every root action once, followed by a fixed number of iterations of
//! selection, expansion, simulation and backpropagation.

use crate::{
    config::MctsConfig,
    node::{NodeId, NodeStats},
    rollout::random_rollout,
    tree::Tree,
};
use log::{debug, trace, warn};
use rand::Rng;
use uct_core::{Game, MctsError, Result};

/// Statistics of one root child after a search.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildStats<A> {
    pub action: A,
    pub stats: NodeStats,
}

/// Result of an MCTS search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<A> {
    /// Most visited root action.
    pub best_action: A,

    /// One entry per root action, in the game's enumeration order.
    pub children: Vec<ChildStats<A>>,

    /// Visits of the root: one per root action plus one per iteration.
    pub root_visits: u64,

    /// Iterations run after the pre-expansion pass.
    pub iterations: usize,
}

impl<A: Clone> SearchResult<A> {
    /// Summarise a finished tree.
    ///
    /// # Errors
    /// Returns `MctsError::InvalidState` if the root has no children.
    pub fn from_tree<G>(tree: &Tree<G>, iterations: usize) -> Result<Self, G::Error>
    where
        G: Game<Action = A>,
    {
        let best_action = tree
            .most_visited_child(NodeId::ROOT)
            .map(|(action, _)| action.clone())
            .ok_or(MctsError::InvalidState("search finished with an unexpanded root"))?;

        let children = tree
            .root()
            .children()
            .iter()
            .map(|(action, id)| ChildStats {
                action: action.clone(),
                stats: tree.get(*id).stats().clone(),
            })
            .collect();

        Ok(Self {
            best_action,
            children,
            root_visits: tree.root().visit_count(),
            iterations,
        })
    }

    /// Get the best action.
    pub fn best(&self) -> &A {
        &self.best_action
    }

    /// Visit count for each root action.
    pub fn visit_counts(&self) -> impl Iterator<Item = (&A, u64)> {
        self.children.iter().map(|c| (&c.action, c.stats.visit_count))
    }
}

/// Monte Carlo Tree Search with UCT selection.
///
/// Generic over:
/// - `G`: The game being played
/// - `R`: The random number generator driving rollouts
///
/// Each search builds a fresh tree and drops it before returning.
pub struct Mcts<G: Game, R: Rng> {
    config: MctsConfig,
    rng: R,
    _game: std::marker::PhantomData<fn(&G)>,
}

impl<G, R> Mcts<G, R>
where
    G: Game,
    R: Rng,
{
    /// Create a new MCTS instance.
    pub fn new(config: MctsConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            _game: std::marker::PhantomData,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Run MCTS from the given state, returning root statistics and the most
    /// visited action.
    ///
    /// # Errors
    /// - `MctsError::NoLegalActions` if `state` has no legal actions.
    /// - `MctsError::InvalidConfig` if the configuration is rejected.
    /// - `MctsError::DeadEnd` or `MctsError::Game` if the game misbehaves
    ///   during the search; the partial tree is discarded.
    pub fn search(&mut self, game: &G, state: &G::State) -> Result<SearchResult<G::Action>, G::Error> {
        let tree = self.build_tree(game, state)?;
        let result = SearchResult::from_tree(&tree, self.config.iterations)?;

        debug!(
            "search finished: {} iterations, {} nodes, root visits {}, best {:?}",
            result.iterations,
            tree.len(),
            result.root_visits,
            result.best_action
        );

        Ok(result)
    }

    /// Run MCTS from the given state and hand back the whole tree.
    ///
    /// Fails in the same cases as [`Mcts::search`].
    pub fn build_tree(&mut self, game: &G, state: &G::State) -> Result<Tree<G>, G::Error> {
        self.config.validate()?;

        let mut tree = Tree::new(game, state.clone())?;
        if tree.root().is_fully_expanded() {
            return Err(MctsError::NoLegalActions);
        }
        if self.config.iterations == 0 {
            warn!("searching with zero iterations, only root actions will be sampled");
        }

        self.pre_expand_root(game, &mut tree)?;

        for iteration in 0..self.config.iterations {
            let leaf = self.iterate(game, &mut tree)?;
            trace!("iteration {} backpropagated from node {}", iteration, leaf.index());
        }

        Ok(tree)
    }

    /// Give every root action one simulated sample before selection starts.
    fn pre_expand_root(&mut self, game: &G, tree: &mut Tree<G>) -> Result<(), G::Error> {
        while !tree.root().is_fully_expanded() {
            let child = tree.expand(game, NodeId::ROOT)?;
            let reward = random_rollout(game, tree.get(child).state(), &mut self.rng)?;
            tree.backpropagate(child, reward);
        }

        trace!("pre-expanded {} root actions", tree.root().children().len());
        Ok(())
    }

    /// Run a single iteration: select -> expand -> simulate -> backpropagate.
    ///
    /// Returns the node the reward was propagated from.
    fn iterate(&mut self, game: &G, tree: &mut Tree<G>) -> Result<NodeId, G::Error> {
        let mut current = NodeId::ROOT;

        // SELECT: descend through fully expanded, non-terminal nodes
        loop {
            let node = tree.get(current);
            if !node.is_fully_expanded() || game.is_terminal(node.state()) {
                break;
            }
            if node.children().is_empty() {
                // Not terminal, yet nothing to play.
                return Err(MctsError::DeadEnd);
            }
            current = tree.select_best_child(current, self.config.exploration)?;
        }

        // EXPAND: terminal nodes are simulated as they are
        if !game.is_terminal(tree.get(current).state()) {
            current = tree.expand(game, current)?;
        }

        // SIMULATE
        let reward = random_rollout(game, tree.get(current).state(), &mut self.rng)?;

        // BACKPROPAGATE
        tree.backpropagate(current, reward);

        Ok(current)
    }
}

/// Search `initial_state` and return the most visited root action.
///
/// Convenience wrapper around [`Mcts::search`] for callers that only need the
/// action.
pub fn run<G, R>(
    game: &G,
    initial_state: &G::State,
    iterations: usize,
    exploration: f64,
    rng: R,
) -> Result<G::Action, G::Error>
where
    G: Game,
    R: Rng,
{
    let config = MctsConfig {
        iterations,
        exploration,
    };
    Mcts::new(config, rng)
        .search(game, initial_state)
        .map(|result| result.best_action)
}
