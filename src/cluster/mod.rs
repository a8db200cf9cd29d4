//! Access to the live state of the cluster

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub mod fake;
pub mod kubectl;

pub use fake::FakeClusterClient;
pub use kubectl::KubectlClient;

/// Errors raised while querying the cluster
#[derive(thiserror::Error, Debug)]
pub enum ClusterError {
    #[error("Failed to read credentials from {path:?}: {source}")]
    Credentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Cluster output is not valid UTF-8")]
    InvalidOutput,
}

pub type ClusterResult<T> = Result<T, ClusterError>;

/// Source of live resource state
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Client name, for logs
    fn name(&self) -> &str;

    /// Fetch the live state of every resource declared in `manifest`, as
    /// YAML. Resources that do not exist are left out; an empty string means
    /// none of them exist.
    async fn fetch_live(&self, manifest: &Path) -> ClusterResult<String>;
}
