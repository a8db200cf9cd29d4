//! Utility functions for the patcher

use anyhow::{anyhow, Result};
use rvpatch_manifest::ManifestFormat;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Get the XDG config directory for the patcher
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?
        .join("append-resource-version");

    Ok(config_dir)
}

/// Find the manifest files directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into. Symlinked files count, since
/// mounted volumes are usually made of them.
pub fn find_manifest_files(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut manifests = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if ManifestFormat::from_path(path).is_some() {
            manifests.push(path.to_path_buf());
        }
    }

    Ok(manifests)
}

/// Format duration as human readable string
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs > 0 {
        format!("{secs}.{millis:03}s")
    } else {
        format!("{millis}ms")
    }
}
