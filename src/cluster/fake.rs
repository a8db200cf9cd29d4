//! In-memory cluster with canned lookup output

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{ClusterClient, ClusterError, ClusterResult};

#[derive(Debug, Clone)]
enum FakeResponse {
    Output(String),
    Failure(String),
}

/// Answers lookups from canned output, keyed by manifest file name.
///
/// Files without a canned answer behave like resources that do not exist
/// yet: the output is empty.
#[derive(Debug, Default)]
pub struct FakeClusterClient {
    responses: HashMap<String, FakeResponse>,
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeClusterClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer lookups for `file_name` with `output`
    pub fn with_output(mut self, file_name: &str, output: impl Into<String>) -> Self {
        self.responses
            .insert(file_name.to_string(), FakeResponse::Output(output.into()));
        self
    }

    /// Fail lookups for `file_name` as a failing kubectl would
    pub fn with_failure(mut self, file_name: &str, stderr: impl Into<String>) -> Self {
        self.responses
            .insert(file_name.to_string(), FakeResponse::Failure(stderr.into()));
        self
    }

    /// Manifests looked up so far, in call order
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ClusterClient for FakeClusterClient {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch_live(&self, manifest: &Path) -> ClusterResult<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(manifest.to_path_buf());
        }

        let file_name = manifest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match self.responses.get(&file_name) {
            Some(FakeResponse::Output(output)) => Ok(output.clone()),
            Some(FakeResponse::Failure(stderr)) => Err(ClusterError::CommandFailed {
                program: "fake".to_string(),
                status: "exit status: 1".to_string(),
                stderr: stderr.clone(),
            }),
            None => Ok(String::new()),
        }
    }
}
