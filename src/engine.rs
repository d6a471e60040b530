//! Sequential execution of dependency-ordered executions.
//!
//! All three entry points share the same planning step: sort the executions,
//! then resolve every sorted key to exactly one execution. Nothing runs until
//! the whole plan resolves. The plan then goes through a single run loop built
//! around [`ContextDependencyExecution`]; side-effect and result executions are
//! wrapped so they fit it. Executions run one at a time, each awaited before
//! the next starts. The first failure aborts the run and any results collected
//! so far are dropped.

use crate::error::ExecutionError;
use crate::execution::{
    ContextDependencyExecution, DependencyExecution, DependencyExecutionIdentifier,
    ResultDependencyExecution,
};
use crate::key::Key;
use crate::result::{ExecutionResult, ExecutionResultCollection};
use crate::sorter;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs executions in dependency order
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyExecutionEngine;

impl DependencyExecutionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run every execution for its side effects
    pub async fn execute_all<K, X>(
        &self,
        executions: &[X],
        cancellation: &CancellationToken,
    ) -> Result<(), ExecutionError<K, X::Error>>
    where
        K: Key,
        X: DependencyExecution<K>,
    {
        let steps: Vec<SideEffect<'_, X>> = plan::<K, X, X::Error>(executions)?
            .into_iter()
            .map(SideEffect)
            .collect();
        run_in_order::<K, (), (), _>(&(), steps.iter().collect(), cancellation).await?;
        Ok(())
    }

    /// Run every execution and collect its result
    pub async fn execute_all_with_results<K, R, X>(
        &self,
        executions: &[X],
        cancellation: &CancellationToken,
    ) -> Result<ExecutionResultCollection<K, R>, ExecutionError<K, X::Error>>
    where
        K: Key,
        R: Send + Sync + 'static,
        X: ResultDependencyExecution<K, R>,
    {
        let steps: Vec<Producing<'_, X>> = plan::<K, X, X::Error>(executions)?
            .into_iter()
            .map(Producing)
            .collect();
        run_in_order::<K, (), R, _>(&(), steps.iter().collect(), cancellation).await
    }

    /// Run every execution with a shared context and the results of every
    /// execution that ran before it
    pub async fn execute_all_with_context<K, C, R, X>(
        &self,
        context: &C,
        executions: &[X],
        cancellation: &CancellationToken,
    ) -> Result<ExecutionResultCollection<K, R>, ExecutionError<K, X::Error>>
    where
        K: Key,
        C: Sync,
        R: Send + Sync,
        X: ContextDependencyExecution<K, C, R>,
    {
        let steps = plan::<K, X, X::Error>(executions)?;
        run_in_order::<K, C, R, X>(context, steps, cancellation).await
    }
}

/// Run planned steps one at a time, handing each the results so far.
///
/// Stops at the first error; results collected up to that point are dropped.
async fn run_in_order<K, C, R, S>(
    context: &C,
    steps: Vec<&S>,
    cancellation: &CancellationToken,
) -> Result<ExecutionResultCollection<K, R>, ExecutionError<K, S::Error>>
where
    K: Key,
    C: Sync,
    R: Send + Sync,
    S: ContextDependencyExecution<K, C, R>,
{
    info!(executions = steps.len(), "running executions");

    let mut results = ExecutionResultCollection::with_capacity(steps.len());
    for step in steps {
        let key = step.key();
        debug!(key = %key, prior = results.len(), "running execution");
        let result = step
            .execute(context, &results, cancellation)
            .await
            .map_err(|error| failed(key, error))?;
        results.add(ExecutionResult::new(key.clone(), result));
    }

    info!(results = results.len(), "all executions completed");
    Ok(results)
}

/// Side-effect execution seen as a step with no context and a unit result
struct SideEffect<'x, X>(&'x X);

impl<'x, K, X> DependencyExecutionIdentifier<K> for SideEffect<'x, X>
where
    X: DependencyExecutionIdentifier<K>,
{
    fn key(&self) -> &K {
        self.0.key()
    }

    fn dependent_keys(&self) -> &[K] {
        self.0.dependent_keys()
    }
}

#[async_trait]
impl<'x, K, X> ContextDependencyExecution<K, (), ()> for SideEffect<'x, X>
where
    K: Key,
    X: DependencyExecution<K>,
{
    type Error = X::Error;

    async fn execute(
        &self,
        _context: &(),
        _prior_results: &ExecutionResultCollection<K, ()>,
        cancellation: &CancellationToken,
    ) -> Result<(), Self::Error> {
        self.0.execute(cancellation).await
    }
}

/// Result-producing execution seen as a step that ignores earlier results
struct Producing<'x, X>(&'x X);

impl<'x, K, X> DependencyExecutionIdentifier<K> for Producing<'x, X>
where
    X: DependencyExecutionIdentifier<K>,
{
    fn key(&self) -> &K {
        self.0.key()
    }

    fn dependent_keys(&self) -> &[K] {
        self.0.dependent_keys()
    }
}

#[async_trait]
impl<'x, K, R, X> ContextDependencyExecution<K, (), R> for Producing<'x, X>
where
    K: Key,
    R: Send + Sync + 'static,
    X: ResultDependencyExecution<K, R>,
{
    type Error = X::Error;

    async fn execute(
        &self,
        _context: &(),
        _prior_results: &ExecutionResultCollection<K, R>,
        cancellation: &CancellationToken,
    ) -> Result<R, Self::Error> {
        self.0.execute(cancellation).await
    }
}

/// Sort `executions` and resolve each sorted key to its execution.
///
/// A prerequisite key that no execution provides fails here, before any
/// execution runs.
fn plan<K, X, E>(executions: &[X]) -> Result<Vec<&X>, ExecutionError<K, E>>
where
    K: Key,
    X: DependencyExecutionIdentifier<K>,
    E: fmt::Debug + fmt::Display,
{
    let order = sorter::sort::<K, X>(executions)?;

    let by_key: HashMap<&K, &X> = executions
        .iter()
        .map(|execution| (execution.key(), execution))
        .collect();

    order
        .into_iter()
        .map(|key| match by_key.get(&key) {
            Some(execution) => Ok(*execution),
            None => Err(unresolved(executions, key)),
        })
        .collect()
}

fn unresolved<K, X, E>(executions: &[X], key: K) -> ExecutionError<K, E>
where
    K: Key,
    X: DependencyExecutionIdentifier<K>,
    E: fmt::Debug + fmt::Display,
{
    let required_by = executions
        .iter()
        .find(|execution| execution.dependent_keys().contains(&key))
        .map(|execution| execution.key().clone())
        .unwrap_or_else(|| key.clone());
    warn!(key = %key, required_by = %required_by, "prerequisite has no execution");
    ExecutionError::UnresolvedPrerequisite { key, required_by }
}

fn failed<K, E>(key: &K, error: E) -> ExecutionError<K, E>
where
    K: Key,
    E: fmt::Debug + fmt::Display,
{
    warn!(key = %key, error = %error, "execution failed, aborting remaining executions");
    ExecutionError::Failed {
        key: key.clone(),
        error,
    }
}
