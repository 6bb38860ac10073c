//! Domain-specific errors.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PickerError {
    #[error("failed to list tracked files at {root}: {detail}")]
    GitListing { root: PathBuf, detail: String },
    #[error("listing tracked files at {root} timed out after {timeout:?}")]
    GitTimeout { root: PathBuf, timeout: Duration },
    #[error("failed to spawn `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no binding configured for command '{0}'")]
    UnboundCommand(String),
    #[error("no item matches '{0}'")]
    NoMatch(String),
}
