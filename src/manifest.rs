//! JSON manifest of executions read by the `depgraph` binary.
//!
//! ```json
//! {
//!   "executions": [
//!     { "key": "fetch", "command": "git fetch" },
//!     { "key": "build", "depends_on": ["fetch"], "command": "make" }
//!   ]
//! }
//! ```

use crate::error::ManifestError;
use crate::execution::DependencyExecutionIdentifier;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One execution declared in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub key: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Shell command run by `depgraph run`; entries without one are no-ops
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl DependencyExecutionIdentifier<String> for ManifestEntry {
    fn key(&self) -> &String {
        &self.key
    }

    fn dependent_keys(&self) -> &[String] {
        &self.depends_on
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub executions: Vec<ManifestEntry>,
}

impl Manifest {
    /// Read and parse a manifest file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(contents)?)
    }
}
