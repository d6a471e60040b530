//! Ordering of executions by their declared prerequisites.

use crate::error::{GraphError, GraphResult};
use crate::execution::DependencyExecutionIdentifier;
use crate::graph::Graph;
use crate::key::Key;
use std::collections::HashMap;
use tracing::debug;

/// Sort executions so that every prerequisite key precedes the keys that
/// depend on it.
///
/// Fails with [`GraphError::DuplicateKeys`] before building anything when two
/// executions share a key. Prerequisite keys with no matching execution still
/// become graph nodes and appear in the returned order.
pub fn sort<K, I>(executions: &[I]) -> GraphResult<Vec<K>, K>
where
    K: Key,
    I: DependencyExecutionIdentifier<K>,
{
    let graph = build_graph(executions)?;
    let order = graph.topological_sort()?;
    debug!(executions = executions.len(), nodes = order.len(), "sorted executions");
    Ok(order)
}

/// Build the graph for `executions` without sorting it.
///
/// Every execution key and every prerequisite key becomes a node, with an
/// edge from each execution to each of its prerequisites.
pub fn build_graph<K, I>(executions: &[I]) -> GraphResult<Graph<K>, K>
where
    K: Key,
    I: DependencyExecutionIdentifier<K>,
{
    verify_unique_keys(executions)?;

    let mut graph = Graph::new();
    for execution in executions {
        graph.get_or_add_node(execution.key().clone());
        for dependent_key in execution.dependent_keys() {
            graph.add_edge(execution.key().clone(), dependent_key.clone())?;
        }
    }
    Ok(graph)
}

/// Every key that appears on more than one execution, in first-seen order
fn verify_unique_keys<K, I>(executions: &[I]) -> GraphResult<(), K>
where
    K: Key,
    I: DependencyExecutionIdentifier<K>,
{
    let mut counts: HashMap<&K, usize> = HashMap::new();
    let mut first_seen: Vec<&K> = Vec::new();
    for execution in executions {
        let count = counts.entry(execution.key()).or_insert(0);
        if *count == 0 {
            first_seen.push(execution.key());
        }
        *count += 1;
    }

    let duplicates: Vec<K> = first_seen
        .into_iter()
        .filter(|key| counts.get(key).copied().unwrap_or(0) > 1)
        .cloned()
        .collect();

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(GraphError::DuplicateKeys(duplicates))
    }
}
