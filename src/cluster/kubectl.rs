//! Cluster lookups through the kubectl binary

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{ClusterClient, ClusterError, ClusterResult};
use crate::config::ClusterConfig;

/// Runs `kubectl get --ignore-not-found -f <file> -o yaml` against a fixed
/// API server with a bearer token and CA bundle.
pub struct KubectlClient {
    kubectl: String,
    server: String,
    token: String,
    ca_path: PathBuf,
}

impl KubectlClient {
    pub fn new(kubectl: String, server: String, token: String, ca_path: PathBuf) -> Self {
        Self {
            kubectl,
            server,
            token,
            ca_path,
        }
    }

    /// Build a client, reading the bearer token once up front
    pub fn from_config(config: &ClusterConfig) -> ClusterResult<Self> {
        let token = std::fs::read_to_string(&config.token_path).map_err(|source| {
            ClusterError::Credentials {
                path: config.token_path.clone(),
                source,
            }
        })?;

        Ok(Self::new(
            config.kubectl.clone(),
            config.server.clone(),
            token.trim().to_string(),
            config.ca_path.clone(),
        ))
    }

    /// Command line passed to kubectl for one manifest
    pub fn args(&self, manifest: &Path) -> Vec<OsString> {
        vec![
            "-s".into(),
            self.server.clone().into(),
            "--token".into(),
            self.token.clone().into(),
            "--certificate-authority".into(),
            self.ca_path.clone().into(),
            "get".into(),
            "--ignore-not-found".into(),
            "-f".into(),
            manifest.into(),
            "-o".into(),
            "yaml".into(),
        ]
    }
}

#[async_trait]
impl ClusterClient for KubectlClient {
    fn name(&self) -> &str {
        &self.kubectl
    }

    async fn fetch_live(&self, manifest: &Path) -> ClusterResult<String> {
        debug!("Running {} get for {}", self.kubectl, manifest.display());

        let output = Command::new(&self.kubectl)
            .args(self.args(manifest))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ClusterError::Spawn {
                program: self.kubectl.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

            // kubectl still prints the resources it did find, e.g. when one
            // kind in the file has no CRD installed yet.
            if output.stdout.iter().all(u8::is_ascii_whitespace) {
                return Err(ClusterError::CommandFailed {
                    program: self.kubectl.clone(),
                    status: output.status.to_string(),
                    stderr,
                });
            }

            warn!(
                "{} exited with {} for {}, using its partial output: {}",
                self.kubectl,
                output.status,
                manifest.display(),
                stderr
            );
        }

        String::from_utf8(output.stdout).map_err(|_| ClusterError::InvalidOutput)
    }
}
