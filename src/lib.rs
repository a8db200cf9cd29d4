//! Resource Version Patcher
//!
//! Pins Kubernetes manifests on disk to the `metadata.resourceVersion` the
//! cluster currently reports for them, so that a later apply fails with a
//! conflict if any of those resources changed in between.

pub mod cli;
pub mod cluster;
pub mod config;
pub mod patcher;
pub mod utils;

pub use cluster::{ClusterClient, ClusterError, FakeClusterClient, KubectlClient};
pub use config::{ClusterConfig, PatcherConfig};
pub use patcher::{
    FileOutcome, FileResult, PatchOptions, PatchStatistics, PatchSummary,
    ResourceVersionPatcher, SkipReason,
};
pub use rvpatch_manifest::{Document, GvkNameKey, LiveState, ManifestError, ResourceVersionIndex};

/// Application error types
#[derive(thiserror::Error, Debug)]
pub enum PatcherError {
    #[error("Cluster query failed: {0}")]
    Cluster(#[from] ClusterError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Failed to list manifest directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Expected a single local document, found {0}")]
    DocumentCount(usize),
}

/// Result type for the main application
pub type PatcherResult<T> = Result<T, PatcherError>;
