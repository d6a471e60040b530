//! Topological sorting using Kahn's algorithm.

use super::Graph;
use crate::error::GraphResult;
use crate::key::Key;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

impl<T: Key> Graph<T> {
    /// Order every node so that each prerequisite comes before its dependents.
    ///
    /// Kahn's algorithm walks edges from dependents toward prerequisites, so the
    /// consumed sequence is reversed before returning. Fails with
    /// [`GraphError::CircularDependencies`](crate::GraphError::CircularDependencies)
    /// listing every cycle when the graph is not acyclic.
    pub fn topological_sort(&self) -> GraphResult<Vec<T>, T> {
        if self.is_empty() {
            return Ok(Vec::new());
        }

        if self.nodes.values().all(|node| node.in_degree() > 0) {
            return Err(self.circular_dependencies());
        }

        let mut in_degrees: HashMap<&T, usize> = self
            .nodes
            .iter()
            .map(|(key, node)| (key, node.in_degree()))
            .collect();

        let mut queue: VecDeque<&T> = self
            .nodes()
            .filter(|key| in_degrees.get(key).copied() == Some(0))
            .collect();

        let mut sorted: Vec<T> = Vec::with_capacity(self.len());
        while let Some(key) = queue.pop_front() {
            sorted.push(key.clone());

            for adjacent in self.adjacent_nodes(key)? {
                if let Some(degree) = in_degrees.get_mut(adjacent) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(adjacent);
                    }
                }
            }
        }

        // Nodes left unconsumed sit on or behind a cycle
        if sorted.len() < self.len() {
            return Err(self.circular_dependencies());
        }

        sorted.reverse();
        debug!(nodes = sorted.len(), "topological sort complete");
        Ok(sorted)
    }
}
