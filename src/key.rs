use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Bound shared by every key type used for graph nodes and executions.
///
/// Keys are compared and hashed for identity, cloned into the graph and
/// result collections, and displayed in cycle chains and error messages.
pub trait Key: Eq + Hash + Clone + Debug + Display + Send + Sync + 'static {}

impl<T> Key for T where T: Eq + Hash + Clone + Debug + Display + Send + Sync + 'static {}
