//! Arena-allocated MCTS tree.
//!
//! Using a Vec<Node> with indices provides better cache locality
//! and simpler ownership compared to Rc<RefCell<Node>>. Parents are
//! referenced by index, so the tree never contains a reference cycle.

use crate::node::{Node, NodeId, NodeStats};
use uct_core::{Game, MctsError, Result};

/// Selection priority of a child under UCT.
///
/// An unvisited child outranks every scored child. Keeping it as its own
/// case avoids relying on infinity arithmetic in the comparison.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UctScore {
    Unvisited,
    Scored(f64),
}

impl UctScore {
    /// Score a child with the given statistics under a parent visited
    /// `parent_visits` times.
    ///
    /// UCT(c) = Q(c) + C * sqrt(ln(N_parent) / N_c)
    pub fn new(parent_visits: u64, child: &NodeStats, exploration: f64) -> Self {
        match child.mean_reward() {
            None => UctScore::Unvisited,
            Some(mean) => {
                let parent_visits = parent_visits.max(1) as f64;
                let child_visits = child.visit_count as f64;
                let explore = (parent_visits.ln() / child_visits).sqrt();
                UctScore::Scored(mean + exploration * explore)
            }
        }
    }

    /// Strict ordering: ties never beat the incumbent.
    pub fn beats(self, other: UctScore) -> bool {
        match (self, other) {
            (UctScore::Unvisited, UctScore::Scored(_)) => true,
            (UctScore::Scored(a), UctScore::Scored(b)) => a > b,
            _ => false,
        }
    }
}

/// Arena-allocated MCTS tree.
///
/// Nodes are stored in a contiguous vector and referenced by index.
/// The root is always at [`NodeId::ROOT`].
pub struct Tree<G: Game> {
    nodes: Vec<Node<G>>,
}

impl<G: Game> Tree<G> {
    /// Create a tree holding only a root for `state`.
    ///
    /// Queries the legal actions of `state` once to seed the root's untried
    /// actions.
    pub fn new(game: &G, state: G::State) -> Result<Self, G::Error> {
        let root = Self::make_node(game, state, None)?;
        Ok(Self { nodes: vec![root] })
    }

    fn make_node(game: &G, state: G::State, parent: Option<NodeId>) -> Result<Node<G>, G::Error> {
        let legal_actions = game.legal_actions(&state).map_err(MctsError::Game)?;
        Ok(Node::new(state, parent, legal_actions))
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    pub fn get(&self, id: NodeId) -> &Node<G> {
        &self.nodes[id.0]
    }

    fn get_mut(&mut self, id: NodeId) -> &mut Node<G> {
        &mut self.nodes[id.0]
    }

    pub fn root(&self) -> &Node<G> {
        self.get(NodeId::ROOT)
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction on.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every node with its ID, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<G>)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// Pick the child of `id` with the highest UCT score.
    ///
    /// Unvisited children win over visited ones. Among equal scores the
    /// child expanded first is kept.
    ///
    /// # Errors
    /// Returns `MctsError::InvalidState` if the node has no children.
    pub fn select_best_child(&self, id: NodeId, exploration: f64) -> Result<NodeId, G::Error> {
        let node = self.get(id);
        let parent_visits = node.visit_count();

        let mut best: Option<(NodeId, UctScore)> = None;
        for (_, child_id) in node.children() {
            let score = UctScore::new(parent_visits, self.get(*child_id).stats(), exploration);
            match best {
                Some((_, best_score)) if !score.beats(best_score) => {}
                _ => best = Some((*child_id, score)),
            }
        }

        best.map(|(child_id, _)| child_id)
            .ok_or(MctsError::InvalidState("select_best_child called on a node without children"))
    }

    /// Expand the next untried action of `id` into a new child and return it.
    ///
    /// # Errors
    /// Returns `MctsError::InvalidState` if the node is fully expanded, and
    /// `MctsError::Game` if the game fails to apply the action or to list
    /// the successor's actions.
    pub fn expand(&mut self, game: &G, id: NodeId) -> Result<NodeId, G::Error> {
        let node = self.get(id);
        let action = node
            .next_untried()
            .cloned()
            .ok_or(MctsError::InvalidState("expand called on a fully expanded node"))?;
        let state = game.apply(node.state(), action).map_err(MctsError::Game)?;

        let child_id = NodeId(self.nodes.len());
        let child = Self::make_node(game, state, Some(id))?;
        self.nodes.push(child);
        self.get_mut(id).attach_child(child_id);

        Ok(child_id)
    }

    /// Credit `reward` to `id` and every ancestor up to and including the
    /// root.
    pub fn backpropagate(&mut self, id: NodeId, reward: f64) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.update(reward);
            current = node.parent();
        }
    }

    /// The child of `id` with the most visits.
    ///
    /// Ties go to the higher mean reward, then to the child expanded first.
    /// Returns `None` if the node has no children.
    pub fn most_visited_child(&self, id: NodeId) -> Option<(&G::Action, NodeId)> {
        let mut best: Option<(&G::Action, NodeId)> = None;
        for (action, child_id) in self.get(id).children() {
            let stats = self.get(*child_id).stats();
            let better = match best {
                None => true,
                Some((_, best_id)) => {
                    let best_stats = self.get(best_id).stats();
                    stats.visit_count > best_stats.visit_count
                        || (stats.visit_count == best_stats.visit_count
                            && stats.mean_reward() > best_stats.mean_reward())
                }
            };
            if better {
                best = Some((action, *child_id));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{TicTacToe, TicTacToeAction};

    fn tree() -> Tree<TicTacToe> {
        let game = TicTacToe::default();
        Tree::new(&game, game.initial_state()).unwrap()
    }

    #[test]
    fn test_tree_creation() {
        let tree = tree();
        assert_eq!(tree.len(), 1); // Root node
        assert!(!tree.is_empty());
        assert!(tree.root().is_root());
        assert_eq!(tree.root().untried_actions().count(), 9);
    }

    #[test]
    fn test_expand_follows_enumeration_order() {
        let game = TicTacToe::default();
        let mut tree = tree();

        let first = tree.expand(&game, NodeId::ROOT).unwrap();
        let second = tree.expand(&game, NodeId::ROOT).unwrap();

        assert_eq!(tree.root().children()[0], (TicTacToeAction(0), first));
        assert_eq!(tree.root().children()[1], (TicTacToeAction(1), second));
        assert_eq!(tree.get(first).parent(), Some(NodeId::ROOT));
        // The child's own actions exclude the occupied cell.
        assert_eq!(tree.get(first).untried_actions().count(), 8);
    }

    #[test]
    fn test_expand_fully_expanded_node_fails() {
        let game = TicTacToe::default();
        let mut tree = tree();
        for _ in 0..9 {
            tree.expand(&game, NodeId::ROOT).unwrap();
        }
        assert!(tree.root().is_fully_expanded());

        let err = tree.expand(&game, NodeId::ROOT).unwrap_err();
        assert!(matches!(err, MctsError::InvalidState(_)));
    }

    #[test]
    fn test_select_without_children_fails() {
        let tree = tree();
        let err = tree.select_best_child(NodeId::ROOT, 1.4).unwrap_err();
        assert!(matches!(err, MctsError::InvalidState(_)));
    }

    #[test]
    fn test_backpropagate_reaches_root() {
        let game = TicTacToe::default();
        let mut tree = tree();
        let child = tree.expand(&game, NodeId::ROOT).unwrap();
        let grandchild = tree.expand(&game, child).unwrap();

        tree.backpropagate(grandchild, 1.0);
        tree.backpropagate(child, -0.5);

        assert_eq!(tree.get(grandchild).visit_count(), 1);
        assert_eq!(tree.get(child).visit_count(), 2);
        assert_eq!(tree.root().visit_count(), 2);
        assert!((tree.root().total_reward() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_unvisited_child_selected_first() {
        let game = TicTacToe::default();
        let mut tree = tree();
        let a = tree.expand(&game, NodeId::ROOT).unwrap();
        let b = tree.expand(&game, NodeId::ROOT).unwrap();
        let c = tree.expand(&game, NodeId::ROOT).unwrap();

        for _ in 0..50 {
            tree.backpropagate(a, 1.0);
        }
        tree.backpropagate(c, 1.0);

        // b has never been visited, so it wins regardless of a's record.
        assert_eq!(tree.select_best_child(NodeId::ROOT, 1.4).unwrap(), b);
    }

    #[test]
    fn test_zero_exploration_is_greedy() {
        let game = TicTacToe::default();
        let mut tree = tree();
        let a = tree.expand(&game, NodeId::ROOT).unwrap();
        let b = tree.expand(&game, NodeId::ROOT).unwrap();

        // a: many visits, mean 0.5. b: one visit, mean 0.4.
        // Any positive exploration would favour the rarely visited b.
        for _ in 0..100 {
            tree.backpropagate(a, 0.5);
        }
        tree.backpropagate(b, 0.4);

        assert_eq!(tree.select_best_child(NodeId::ROOT, 0.0).unwrap(), a);
        assert_eq!(tree.select_best_child(NodeId::ROOT, 1.4).unwrap(), b);
    }

    #[test]
    fn test_select_ties_keep_first_child() {
        let game = TicTacToe::default();
        let mut tree = tree();
        let a = tree.expand(&game, NodeId::ROOT).unwrap();
        let b = tree.expand(&game, NodeId::ROOT).unwrap();

        // Both unvisited.
        assert_eq!(tree.select_best_child(NodeId::ROOT, 1.4).unwrap(), a);

        tree.backpropagate(a, 0.0);
        tree.backpropagate(b, 0.0);
        assert_eq!(tree.select_best_child(NodeId::ROOT, 1.4).unwrap(), a);
    }

    #[test]
    fn test_most_visited_child_tie_breaks() {
        let game = TicTacToe::default();
        let mut tree = tree();
        assert!(tree.most_visited_child(NodeId::ROOT).is_none());

        let a = tree.expand(&game, NodeId::ROOT).unwrap();
        let b = tree.expand(&game, NodeId::ROOT).unwrap();
        let c = tree.expand(&game, NodeId::ROOT).unwrap();

        tree.backpropagate(a, -1.0);
        tree.backpropagate(b, 1.0);
        tree.backpropagate(c, 1.0);

        // Equal visits: b and c share the best mean, b came first.
        assert_eq!(tree.most_visited_child(NodeId::ROOT).map(|(_, id)| id), Some(b));

        tree.backpropagate(a, -1.0);
        assert_eq!(tree.most_visited_child(NodeId::ROOT).map(|(_, id)| id), Some(a));
    }

    #[test]
    fn test_uct_score_value() {
        // 1.0 + 1.0 * sqrt(ln 10 / 9)
        let stats = NodeStats {
            visit_count: 9,
            total_reward: 9.0,
        };
        match UctScore::new(10, &stats, 1.0) {
            UctScore::Scored(score) => assert!((score - 1.505_809_043).abs() < 1e-6),
            UctScore::Unvisited => panic!("visited child scored as unvisited"),
        }

        // 0.25 + 2.0 * sqrt(ln 10 / 4)
        let stats = NodeStats {
            visit_count: 4,
            total_reward: 1.0,
        };
        match UctScore::new(10, &stats, 2.0) {
            UctScore::Scored(score) => assert!((score - 1.767_427_129).abs() < 1e-6),
            UctScore::Unvisited => panic!("visited child scored as unvisited"),
        }
    }

    #[test]
    fn test_uct_score_ordering() {
        let visited = NodeStats {
            visit_count: 1,
            total_reward: 100.0,
        };
        let score = UctScore::new(10, &visited, 1.0);

        assert!(UctScore::Unvisited.beats(score));
        assert!(!score.beats(UctScore::Unvisited));
        assert!(!UctScore::Unvisited.beats(UctScore::Unvisited));
        assert!(!score.beats(score));
    }
}
