//! Main configuration structure and implementation

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::ClusterConfig;

/// Environment variable naming the manifest directory
pub const MANIFEST_DIR_ENV: &str = "MANIFEST_DIR";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatcherConfig {
    /// Directory whose manifests get patched (not recursive)
    pub manifest_dir: PathBuf,

    /// Cluster access
    pub cluster: ClusterConfig,

    /// Compute outcomes without rewriting any file
    pub dry_run: bool,
}

impl PatcherConfig {
    /// Load configuration from a YAML file.
    ///
    /// The result is not validated; the manifest directory usually arrives
    /// later from the environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;
        let config: PatcherConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override settings from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Override settings from an arbitrary variable lookup
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(MANIFEST_DIR_ENV).filter(|d| !d.is_empty()) {
            self.manifest_dir = PathBuf::from(dir);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.manifest_dir.as_os_str().is_empty() {
            return Err(anyhow!(
                "No manifest directory configured. Set {} or pass --manifest-dir",
                MANIFEST_DIR_ENV
            ));
        }

        self.cluster.validate()?;

        Ok(())
    }

    /// Manifest directory with `~` and environment variables expanded
    pub fn resolved_manifest_dir(&self) -> Result<PathBuf> {
        let raw = self.manifest_dir.to_string_lossy();
        let expanded = shellexpand::full(&raw)
            .map_err(|e| anyhow!("Failed to expand manifest directory {:?}: {}", raw, e))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }
}

impl Default for PatcherConfig {
    fn default() -> Self {
        Self {
            manifest_dir: PathBuf::new(),
            cluster: ClusterConfig::default(),
            dry_run: false,
        }
    }
}
