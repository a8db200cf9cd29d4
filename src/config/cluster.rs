//! Cluster access settings

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// In-cluster API endpoint
pub const DEFAULT_SERVER: &str = "https://kubernetes.default.svc:443";

/// Service-account token mounted into every pod
pub const DEFAULT_TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Service-account CA bundle mounted into every pod
pub const DEFAULT_CA_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";

/// How to reach the API server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// kubectl executable, looked up on `PATH` when not absolute
    pub kubectl: String,

    /// API server URL
    pub server: String,

    /// Bearer token file
    pub token_path: PathBuf,

    /// CA certificate bundle
    pub ca_path: PathBuf,
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.kubectl.trim().is_empty() {
            return Err(anyhow!("kubectl executable cannot be empty"));
        }

        if !(self.server.starts_with("https://") || self.server.starts_with("http://")) {
            return Err(anyhow!(
                "API server must be an http(s) URL, got {:?}",
                self.server
            ));
        }

        if self.token_path.as_os_str().is_empty() {
            return Err(anyhow!("Token path cannot be empty"));
        }

        if self.ca_path.as_os_str().is_empty() {
            return Err(anyhow!("CA certificate path cannot be empty"));
        }

        Ok(())
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            kubectl: "kubectl".to_string(),
            server: DEFAULT_SERVER.to_string(),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            ca_path: PathBuf::from(DEFAULT_CA_PATH),
        }
    }
}
