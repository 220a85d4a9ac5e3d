//! MCTS node types for tree storage.
//!
//! Uses arena allocation with indices: a node owns its children through the
//! arena and refers back to its parent by index only.

use uct_core::Game;

/// Index into the node arena.
///
/// This is a lightweight handle that references a node in the tree.
/// Using indices instead of pointers avoids Rc/RefCell overhead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena, in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Statistics for a single MCTS node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeStats {
    /// Number of backpropagation passes that went through this node.
    pub visit_count: u64,

    /// Sum of the rewards credited by those passes.
    pub total_reward: f64,
}

impl NodeStats {
    /// Mean reward of this node.
    ///
    /// Returns `None` if the node has never been visited.
    pub fn mean_reward(&self) -> Option<f64> {
        if self.visit_count == 0 {
            None
        } else {
            Some(self.total_reward / self.visit_count as f64)
        }
    }

    /// Credit one backpropagation pass.
    pub fn update(&mut self, reward: f64) {
        self.visit_count += 1;
        self.total_reward += reward;
    }
}

/// A node in the MCTS tree.
///
/// Each node wraps a game state and stores statistics about the search
/// results from that state.
pub struct Node<G: Game> {
    state: G::State,

    /// Node that expanded into this one (None for root).
    parent: Option<NodeId>,

    /// Children in the order they were expanded.
    children: Vec<(G::Action, NodeId)>,

    /// Actions not yet expanded, stored back to front so that popping yields
    /// them in the game's enumeration order.
    untried: Vec<G::Action>,

    stats: NodeStats,
}

impl<G: Game> Node<G> {
    /// Create an unvisited node whose untried actions are `legal_actions`.
    pub(crate) fn new(state: G::State, parent: Option<NodeId>, mut legal_actions: Vec<G::Action>) -> Self {
        legal_actions.reverse();
        Self {
            state,
            parent,
            children: Vec::new(),
            untried: legal_actions,
            stats: NodeStats::default(),
        }
    }

    pub fn state(&self) -> &G::State {
        &self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Expanded children as `(action, child)` pairs, in expansion order.
    pub fn children(&self) -> &[(G::Action, NodeId)] {
        &self.children
    }

    /// Child reached by `action`, if it has been expanded.
    pub fn child(&self, action: &G::Action) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, id)| *id)
    }

    /// Actions not expanded yet, in the order they will be expanded.
    pub fn untried_actions(&self) -> impl Iterator<Item = &G::Action> {
        self.untried.iter().rev()
    }

    /// A node is fully expanded once every legal action has a child.
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    pub fn visit_count(&self) -> u64 {
        self.stats.visit_count
    }

    pub fn total_reward(&self) -> f64 {
        self.stats.total_reward
    }

    pub(crate) fn update(&mut self, reward: f64) {
        self.stats.update(reward);
    }

    pub(crate) fn next_untried(&self) -> Option<&G::Action> {
        self.untried.last()
    }

    /// Move the next untried action into `children`.
    pub(crate) fn attach_child(&mut self, child: NodeId) -> Option<&G::Action> {
        let action = self.untried.pop()?;
        self.children.push((action, child));
        self.children.last().map(|(a, _)| a)
    }
}
