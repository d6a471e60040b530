//! Cycle detection using Tarjan's strongly connected components algorithm.

use super::Graph;
use crate::key::Key;
use std::collections::HashMap;
use std::fmt;

/// A strongly connected group of two or more nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle<T> {
    nodes: Vec<T>,
}

impl<T> Cycle<T> {
    pub fn new(nodes: Vec<T>) -> Self {
        Self { nodes }
    }

    /// Members in discovery order
    pub fn nodes(&self) -> &[T] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.nodes.contains(value)
    }
}

impl<T: fmt::Display> fmt::Display for Cycle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain = self
            .nodes
            .iter()
            .map(|node| format!("'{node}'"))
            .collect::<Vec<_>>()
            .join(" -> ");
        f.write_str(&chain)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Tracker {
    index: Option<usize>,
    low_link: usize,
    on_stack: bool,
}

/// Find every cycle in the graph.
///
/// Runs Tarjan's algorithm with an explicit frame stack instead of recursion,
/// so deep graphs cannot overflow the call stack. Components with a single
/// node are never reported: self-edges are rejected when they are added.
pub fn detect_cycles<T: Key>(graph: &Graph<T>) -> Vec<Cycle<T>> {
    let keys: Vec<&T> = graph.nodes().collect();
    let positions: HashMap<&T, usize> = keys
        .iter()
        .enumerate()
        .map(|(position, key)| (*key, position))
        .collect();
    let adjacency: Vec<Vec<usize>> = keys
        .iter()
        .map(|key| {
            graph
                .adjacent_nodes(key)
                .map(|adjacent| {
                    adjacent
                        .iter()
                        .filter_map(|neighbour| positions.get(neighbour).copied())
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect();

    let mut trackers = vec![Tracker::default(); keys.len()];
    let mut component_stack: Vec<usize> = Vec::new();
    // (node, position of the next neighbour to visit)
    let mut frames: Vec<(usize, usize)> = Vec::new();
    let mut next_index = 0;
    let mut cycles = Vec::new();

    let mut discover = |node: usize, trackers: &mut [Tracker], stack: &mut Vec<usize>| {
        trackers[node] = Tracker {
            index: Some(next_index),
            low_link: next_index,
            on_stack: true,
        };
        next_index += 1;
        stack.push(node);
    };

    for root in 0..keys.len() {
        if trackers[root].index.is_some() {
            continue;
        }

        discover(root, &mut trackers, &mut component_stack);
        frames.push((root, 0));

        while let Some(frame) = frames.last_mut() {
            let (node, next) = *frame;

            if let Some(&neighbour) = adjacency[node].get(next) {
                frame.1 += 1;
                let visited = trackers[neighbour].index;
                match visited {
                    None => {
                        discover(neighbour, &mut trackers, &mut component_stack);
                        frames.push((neighbour, 0));
                    }
                    Some(index) if trackers[neighbour].on_stack => {
                        trackers[node].low_link = trackers[node].low_link.min(index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                trackers[parent].low_link = trackers[parent].low_link.min(trackers[node].low_link);
            }

            if Some(trackers[node].low_link) != trackers[node].index {
                continue;
            }

            let mut members = Vec::new();
            while let Some(member) = component_stack.pop() {
                trackers[member].on_stack = false;
                members.push(member);
                if member == node {
                    break;
                }
            }

            if members.len() > 1 {
                members.reverse();
                cycles.push(Cycle::new(
                    members.into_iter().map(|member| keys[member].clone()).collect(),
                ));
            }
        }
    }

    cycles
}
