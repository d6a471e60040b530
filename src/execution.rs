//! Execution contracts consumed by the sorter and the engine.
//!
//! Every execution is identified by a unique key and may name other keys as
//! prerequisites. The three execution traits differ only in what `execute`
//! receives and returns:
//!
//! - [`DependencyExecution`]: side effects only
//! - [`ResultDependencyExecution`]: produces a result
//! - [`ContextDependencyExecution`]: receives a shared context and every result
//!   produced so far, and produces a result
//!
//! The cancellation token is cooperative: the engine forwards it to every call
//! and never inspects it. An execution that observes cancellation should return
//! its own error, which aborts the run.

use crate::key::Key;
use crate::result::ExecutionResultCollection;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Key and prerequisite keys of an execution
pub trait DependencyExecutionIdentifier<K> {
    fn key(&self) -> &K;

    /// Keys that must run before this execution
    fn dependent_keys(&self) -> &[K];
}

/// Plain identifier, useful when only the order is needed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionIdentifier<K> {
    pub key: K,
    #[serde(default = "Vec::new")]
    pub dependent_keys: Vec<K>,
}

impl<K> ExecutionIdentifier<K> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            dependent_keys: Vec::new(),
        }
    }

    pub fn depends_on(mut self, key: K) -> Self {
        self.dependent_keys.push(key);
        self
    }
}

impl<K> DependencyExecutionIdentifier<K> for ExecutionIdentifier<K> {
    fn key(&self) -> &K {
        &self.key
    }

    fn dependent_keys(&self) -> &[K] {
        &self.dependent_keys
    }
}

/// Execution that only performs side effects
#[async_trait]
pub trait DependencyExecution<K: Key>: DependencyExecutionIdentifier<K> + Send + Sync {
    type Error: fmt::Debug + fmt::Display + Send;

    async fn execute(&self, cancellation: &CancellationToken) -> Result<(), Self::Error>;
}

/// Execution that produces a result
#[async_trait]
pub trait ResultDependencyExecution<K: Key, R>: DependencyExecutionIdentifier<K> + Send + Sync {
    type Error: fmt::Debug + fmt::Display + Send;

    async fn execute(&self, cancellation: &CancellationToken) -> Result<R, Self::Error>;
}

/// Execution that reads a shared context and the results of every execution
/// that ran before it
#[async_trait]
pub trait ContextDependencyExecution<K, C, R>: DependencyExecutionIdentifier<K> + Send + Sync
where
    K: Key,
    C: Sync,
    R: Send + Sync,
{
    type Error: fmt::Debug + fmt::Display + Send;

    async fn execute(
        &self,
        context: &C,
        prior_results: &ExecutionResultCollection<K, R>,
        cancellation: &CancellationToken,
    ) -> Result<R, Self::Error>;
}

macro_rules! forward_through_pointer {
    ($($pointer:ident),*) => {$(
        impl<K, T> DependencyExecutionIdentifier<K> for $pointer<T>
        where
            T: DependencyExecutionIdentifier<K> + ?Sized,
        {
            fn key(&self) -> &K {
                (**self).key()
            }

            fn dependent_keys(&self) -> &[K] {
                (**self).dependent_keys()
            }
        }

        #[async_trait]
        impl<K, T> DependencyExecution<K> for $pointer<T>
        where
            K: Key,
            T: DependencyExecution<K> + ?Sized,
        {
            type Error = T::Error;

            async fn execute(&self, cancellation: &CancellationToken) -> Result<(), Self::Error> {
                (**self).execute(cancellation).await
            }
        }

        #[async_trait]
        impl<K, R, T> ResultDependencyExecution<K, R> for $pointer<T>
        where
            K: Key,
            R: Send + 'static,
            T: ResultDependencyExecution<K, R> + ?Sized,
        {
            type Error = T::Error;

            async fn execute(&self, cancellation: &CancellationToken) -> Result<R, Self::Error> {
                (**self).execute(cancellation).await
            }
        }

        #[async_trait]
        impl<K, C, R, T> ContextDependencyExecution<K, C, R> for $pointer<T>
        where
            K: Key,
            C: Sync + 'static,
            R: Send + Sync + 'static,
            T: ContextDependencyExecution<K, C, R> + ?Sized,
        {
            type Error = T::Error;

            async fn execute(
                &self,
                context: &C,
                prior_results: &ExecutionResultCollection<K, R>,
                cancellation: &CancellationToken,
            ) -> Result<R, Self::Error> {
                (**self).execute(context, prior_results, cancellation).await
            }
        }
    )*};
}

forward_through_pointer!(Box, Arc);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_builder() {
        let identifier = ExecutionIdentifier::new("build")
            .depends_on("fetch")
            .depends_on("configure");

        assert_eq!(*identifier.key(), "build");
        assert_eq!(identifier.dependent_keys(), &["fetch", "configure"]);
    }

    #[test]
    fn test_identifier_through_box() {
        let boxed: Box<dyn DependencyExecutionIdentifier<&str>> =
            Box::new(ExecutionIdentifier::new("a").depends_on("b"));
        assert_eq!(*boxed.key(), "a");
        assert_eq!(boxed.dependent_keys(), &["b"]);
    }

    #[test]
    fn test_identifier_deserialize_defaults_dependencies() {
        let identifier: ExecutionIdentifier<String> =
            serde_json::from_str(r#"{ "key": "lint" }"#).unwrap();
        assert_eq!(identifier.key, "lint");
        assert!(identifier.dependent_keys.is_empty());
    }
}
