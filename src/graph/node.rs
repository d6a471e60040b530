use crate::error::{GraphError, GraphResult};
use crate::key::Key;
use std::collections::HashSet;

/// A node in the dependency graph.
///
/// Adjacency is stored as keys rather than node references; neighbours are
/// looked up through the owning [`Graph`](super::Graph). An edge points from a
/// dependent to its prerequisite.
#[derive(Debug, Clone)]
pub struct Node<T> {
    value: T,
    /// Prerequisite keys in insertion order
    adjacent: Vec<T>,
    /// Same keys as `adjacent`, for constant-time duplicate checks
    adjacent_set: HashSet<T>,
    in_degree: usize,
}

impl<T: Key> Node<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            adjacent: Vec::new(),
            adjacent_set: HashSet::new(),
            in_degree: 0,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn adjacent(&self) -> &[T] {
        &self.adjacent
    }

    /// Number of other nodes that declare this node as a prerequisite
    pub fn in_degree(&self) -> usize {
        self.in_degree
    }

    /// Record `key` as adjacent to this node.
    ///
    /// Returns `true` when the edge is new and `false` when it already existed.
    /// The caller owns the destination node and bumps its in-degree on `true`.
    pub fn add_adjacent(&mut self, key: T) -> GraphResult<bool, T> {
        if key == self.value {
            return Err(GraphError::SelfDependency(key));
        }

        if !self.adjacent_set.insert(key.clone()) {
            return Ok(false);
        }

        self.adjacent.push(key);
        Ok(true)
    }

    pub(crate) fn increment_in_degree(&mut self) {
        self.in_degree += 1;
    }
}
