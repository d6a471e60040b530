use crate::key::Key;
use std::{fmt, io};
use thiserror::Error;

/// Errors raised while building, validating or sorting a dependency graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError<K: Key> {
    #[error("One or more duplicate execution keys were provided: {keys}", keys = format_keys(.0))]
    DuplicateKeys(Vec<K>),

    #[error("One or more circular dependencies were found: {chains}", chains = .0.join("; "))]
    CircularDependencies(Vec<String>),

    #[error("'{0}' cannot depend on itself")]
    SelfDependency(K),

    #[error("'{0}' is not present in the graph")]
    NodeNotFound(K),
}

/// Errors raised by the execution engine.
///
/// `E` is the error type of the executions themselves. It is carried
/// unchanged in [`ExecutionError::Failed`].
#[derive(Error, Debug)]
pub enum ExecutionError<K: Key, E: fmt::Debug + fmt::Display> {
    #[error(transparent)]
    Graph(#[from] GraphError<K>),

    #[error("No execution was provided for '{key}', required by '{required_by}'")]
    UnresolvedPrerequisite { key: K, required_by: K },

    #[error("Execution '{key}' failed: {error}")]
    Failed { key: K, error: E },
}

impl<K: Key, E: fmt::Debug + fmt::Display> ExecutionError<K, E> {
    /// The error raised by the failing execution, if that is what stopped the run
    pub fn execution_error(&self) -> Option<&E> {
        match self {
            ExecutionError::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Errors raised while loading an execution manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Cannot read manifest {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("Invalid manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a shell command execution
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Failed to run command: {0}")]
    Io(#[from] io::Error),

    #[error("Command exited with {status}", status = format_status(*.code))]
    ExitStatus { code: Option<i32>, stderr: String },

    #[error("Command was cancelled")]
    Cancelled,
}

fn format_status(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Graph result alias
pub type GraphResult<T, K> = std::result::Result<T, GraphError<K>>;

/// Format keys as a comma-separated list of quoted values
pub fn format_keys<K: fmt::Display>(keys: &[K]) -> String {
    keys.iter()
        .map(|key| format!("'{key}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_keys() {
        assert_eq!(format_keys(&["a", "b", "c"]), "'a', 'b', 'c'");
        assert_eq!(format_keys(&[42]), "'42'");
        assert_eq!(format_keys::<i64>(&[]), "");
    }

    #[test]
    fn test_exit_status_message() {
        let err = ShellError::ExitStatus {
            code: Some(3),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "Command exited with status 3");

        let err = ShellError::ExitStatus {
            code: None,
            stderr: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "Command exited with no status (terminated by signal)"
        );
    }

    #[test]
    fn test_duplicate_keys_message() {
        let err = GraphError::DuplicateKeys(vec!["1".to_string(), "2".to_string()]);
        assert_eq!(
            err.to_string(),
            "One or more duplicate execution keys were provided: '1', '2'"
        );
    }

    #[test]
    fn test_circular_dependencies_message() {
        let err: GraphError<String> = GraphError::CircularDependencies(vec![
            "'1' -> '2'".to_string(),
            "'3' -> '4'".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "One or more circular dependencies were found: '1' -> '2'; '3' -> '4'"
        );
    }

    #[test]
    fn test_execution_error_wraps_graph_error() {
        let err: ExecutionError<i64, String> = GraphError::SelfDependency(7).into();
        assert_eq!(err.to_string(), "'7' cannot depend on itself");
        assert!(err.execution_error().is_none());
    }

    #[test]
    fn test_failed_carries_execution_error() {
        let err: ExecutionError<&str, String> = ExecutionError::Failed {
            key: "build",
            error: "exit status 2".to_string(),
        };
        assert_eq!(err.to_string(), "Execution 'build' failed: exit status 2");
        assert_eq!(err.execution_error().map(String::as_str), Some("exit status 2"));
    }
}
