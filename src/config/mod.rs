//! Configuration management for the patcher

pub mod cluster;
pub mod config;


// Re-export main types for convenience
pub use cluster::ClusterConfig;
pub use config::{PatcherConfig, MANIFEST_DIR_ENV};
