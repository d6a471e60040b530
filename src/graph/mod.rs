//! Graph engine for dependency ordering and cycle detection.
//!
//! A [`Graph`] is built fresh for a single sort or validation pass. Edges point
//! from a dependent node to the prerequisite it declares, so a valid execution
//! order lists every prerequisite before the nodes that depend on it.

pub mod cycle;
mod node;
pub mod topology;

pub use cycle::{detect_cycles, Cycle};

use crate::error::{GraphError, GraphResult};
use crate::key::Key;
use node::Node;
use std::collections::HashMap;
use tracing::trace;

/// Directed graph over caller-supplied keys.
///
/// Nodes live in a single key-indexed map and are iterated in first-insertion
/// order, which keeps sort output and cycle reports deterministic.
#[derive(Debug, Clone)]
pub struct Graph<T> {
    nodes: HashMap<T, Node<T>>,
    insertion_order: Vec<T>,
}

impl<T: Key> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Key> Graph<T> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            insertion_order: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node keys in first-insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.insertion_order.iter()
    }

    pub fn contains(&self, key: &T) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn in_degree(&self, key: &T) -> Option<usize> {
        self.nodes.get(key).map(Node::in_degree)
    }

    /// Add `key` if it is not tracked yet and return the stored key.
    pub fn get_or_add_node(&mut self, key: T) -> &T {
        if !self.nodes.contains_key(&key) {
            trace!(node = %key, "adding graph node");
            self.insertion_order.push(key.clone());
            self.nodes.insert(key.clone(), Node::new(key.clone()));
        }

        self.nodes[&key].value()
    }

    /// Record that `source` depends on `destination`.
    ///
    /// Both endpoints are created if absent. Re-adding an existing edge is a
    /// no-op; a new edge increments the destination's in-degree once.
    pub fn add_edge(&mut self, source: T, destination: T) -> GraphResult<(), T> {
        if source == destination {
            return Err(GraphError::SelfDependency(source));
        }

        self.get_or_add_node(source.clone());
        self.get_or_add_node(destination.clone());

        let added = self
            .nodes
            .get_mut(&source)
            .ok_or_else(|| GraphError::NodeNotFound(source.clone()))?
            .add_adjacent(destination.clone())?;

        if added {
            trace!(source = %source, destination = %destination, "adding graph edge");
            if let Some(node) = self.nodes.get_mut(&destination) {
                node.increment_in_degree();
            }
        }

        Ok(())
    }

    /// Prerequisites declared by `source`, in the order they were added
    pub fn adjacent_nodes(&self, source: &T) -> GraphResult<&[T], T> {
        self.nodes
            .get(source)
            .map(Node::adjacent)
            .ok_or_else(|| GraphError::NodeNotFound(source.clone()))
    }

    /// Check whether the graph contains at least one cycle.
    ///
    /// A non-empty graph where every node has a positive in-degree must contain
    /// a cycle, so that case answers without running the detector. An empty
    /// graph has no cycle.
    pub fn has_cycle(&self) -> bool {
        if self.is_empty() {
            return false;
        }

        if self.nodes.values().all(|node| node.in_degree() > 0) {
            return true;
        }

        !self.cycles().is_empty()
    }

    /// Every strongly connected component with more than one node
    pub fn cycles(&self) -> Vec<Cycle<T>> {
        detect_cycles(self)
    }

    /// Build the error reported when sorting a graph that has cycles
    fn circular_dependencies(&self) -> GraphError<T> {
        let chains = self
            .cycles()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        GraphError::CircularDependencies(chains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_edges(edges: &[(&'static str, &'static str)]) -> Graph<&'static str> {
        let mut graph = Graph::new();
        for &(source, destination) in edges {
            graph.add_edge(source, destination).unwrap();
        }
        graph
    }

    #[test]
    fn test_get_or_add_node_adds_new_value() {
        let mut graph = Graph::new();
        assert_eq!(*graph.get_or_add_node("a"), "a");
        assert_eq!(graph.len(), 1);
        assert!(graph.contains(&"a"));
    }

    #[test]
    fn test_get_or_add_node_is_idempotent() {
        let mut graph = Graph::new();
        graph.add_edge("a", "b").unwrap();
        graph.get_or_add_node("a");
        graph.get_or_add_node("b");

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.adjacent_nodes(&"a").unwrap(), &["b"]);
        assert_eq!(graph.in_degree(&"b"), Some(1));
    }

    #[test]
    fn test_adjacent_nodes() {
        let graph = graph_with_edges(&[("a", "b"), ("a", "c"), ("a", "d")]);
        assert_eq!(graph.adjacent_nodes(&"a").unwrap(), &["b", "c", "d"]);
        assert!(graph.adjacent_nodes(&"b").unwrap().is_empty());
    }

    #[test]
    fn test_adjacent_nodes_missing_source() {
        let graph: Graph<&str> = Graph::new();
        assert_eq!(
            graph.adjacent_nodes(&"a"),
            Err(GraphError::NodeNotFound("a"))
        );
    }

    #[test]
    fn test_add_edge_creates_missing_endpoints() {
        let mut graph = Graph::new();
        graph.get_or_add_node("a");
        graph.add_edge("a", "b").unwrap();
        graph.add_edge("c", "a").unwrap();

        assert_eq!(graph.nodes().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(graph.in_degree(&"a"), Some(1));
        assert_eq!(graph.in_degree(&"b"), Some(1));
        assert_eq!(graph.in_degree(&"c"), Some(0));
    }

    #[test]
    fn test_add_edge_twice_counts_in_degree_once() {
        let graph = graph_with_edges(&[("a", "b"), ("a", "b")]);
        assert_eq!(graph.in_degree(&"b"), Some(1));
        assert_eq!(graph.adjacent_nodes(&"a").unwrap(), &["b"]);
    }

    #[test]
    fn test_add_self_edge_fails() {
        let mut graph = Graph::new();
        assert_eq!(graph.add_edge("x", "x"), Err(GraphError::SelfDependency("x")));

        graph.add_edge("x", "y").unwrap();
        assert_eq!(graph.add_edge("x", "x"), Err(GraphError::SelfDependency("x")));
        assert_eq!(graph.in_degree(&"x"), Some(0));
    }

    #[test]
    fn test_has_cycle_when_every_node_has_dependents() {
        let graph = graph_with_edges(&[("1", "2"), ("2", "3"), ("3", "1")]);
        assert!(graph.has_cycle());
    }

    #[test]
    fn test_has_cycle_below_source_node() {
        // "0" has in-degree 0 but "1" <-> "2" still forms a cycle
        let graph = graph_with_edges(&[("0", "1"), ("1", "2"), ("2", "1")]);
        assert!(graph.has_cycle());
    }

    #[test]
    fn test_has_no_cycle() {
        let graph = graph_with_edges(&[("1", "2"), ("2", "3"), ("1", "3")]);
        assert!(!graph.has_cycle());
    }

    #[test]
    fn test_empty_graph_has_no_cycle() {
        let graph: Graph<i64> = Graph::new();
        assert!(!graph.has_cycle());
        assert!(graph.cycles().is_empty());
    }

    #[test]
    fn test_cycles_from_graph() {
        let graph = graph_with_edges(&[("1", "2"), ("2", "1"), ("3", "4"), ("4", "3")]);
        let cycles = graph.cycles();
        assert_eq!(cycles.len(), 2);
        assert!(cycles.iter().all(|cycle| cycle.len() == 2));
    }
}
