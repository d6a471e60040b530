use crate::key::Key;
use serde::Serialize;
use std::collections::HashMap;

/// Result produced by one completed execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult<K, R> {
    key: K,
    result: R,
}

impl<K, R> ExecutionResult<K, R> {
    pub(crate) fn new(key: K, result: R) -> Self {
        Self { key, result }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn result(&self) -> &R {
        &self.result
    }

    pub fn into_parts(self) -> (K, R) {
        (self.key, self.result)
    }
}

/// Append-only collection of execution results.
///
/// Results are kept in completion order and can be looked up by key. A
/// collection is owned by a single engine run and only handed to the caller
/// when every execution succeeded.
#[derive(Debug, Clone)]
pub struct ExecutionResultCollection<K, R> {
    results: Vec<ExecutionResult<K, R>>,
    positions: HashMap<K, usize>,
}

impl<K: Key, R> Default for ExecutionResultCollection<K, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, R> ExecutionResultCollection<K, R> {
    pub(crate) fn new() -> Self {
        Self {
            results: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Result for `key`, or `None` if that execution has not completed
    pub fn get(&self, key: &K) -> Option<&ExecutionResult<K, R>> {
        self.positions.get(key).map(|&position| &self.results[position])
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    /// All results in completion order
    pub fn values(&self) -> &[ExecutionResult<K, R>] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExecutionResult<K, R>> {
        self.results.iter()
    }

    /// Keys are unique per run, so a key is only ever added once.
    pub(crate) fn add(&mut self, result: ExecutionResult<K, R>) {
        debug_assert!(!self.positions.contains_key(result.key()));
        self.positions.insert(result.key().clone(), self.results.len());
        self.results.push(result);
    }
}

impl<K, R> IntoIterator for ExecutionResultCollection<K, R> {
    type Item = ExecutionResult<K, R>;
    type IntoIter = std::vec::IntoIter<ExecutionResult<K, R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a, K, R> IntoIterator for &'a ExecutionResultCollection<K, R> {
    type Item = &'a ExecutionResult<K, R>;
    type IntoIter = std::slice::Iter<'a, ExecutionResult<K, R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl<K: Serialize, R: Serialize> Serialize for ExecutionResultCollection<K, R> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.results.serialize(serializer)
    }
}
