//! Live cluster state for a manifest file and the index built from it

use serde_yaml::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::{Document, GvkNameKey, ManifestError, ManifestResult};

/// What the cluster reported for the resources declared in one file
#[derive(Debug, Clone, PartialEq)]
pub enum LiveState {
    /// The file declared a single resource
    Single(Document),

    /// The file declared several resources; `kind: List` with its `items`
    List(Vec<Document>),
}

impl LiveState {
    /// Parse the YAML output of a cluster lookup.
    ///
    /// Empty or null output means none of the resources exist yet.
    pub fn parse(output: &str) -> ManifestResult<Option<Self>> {
        if output.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = serde_yaml::from_str(output)?;
        if value.is_null() {
            return Ok(None);
        }
        if !value.is_mapping() {
            return Err(ManifestError::NotAMapping);
        }

        let document = Document::new(value);
        if document.is_list() {
            Ok(Some(Self::List(document.items()?)))
        } else {
            Ok(Some(Self::Single(document)))
        }
    }
}

/// Mapping from resource identity to its current `resourceVersion`
#[derive(Debug, Default, Clone)]
pub struct ResourceVersionIndex {
    versions: HashMap<GvkNameKey, String>,
    skipped: usize,
}

impl ResourceVersionIndex {
    /// Index live List items. Items without a `resourceVersion` or without a
    /// complete identity are skipped with a warning.
    pub fn from_items(items: &[Document]) -> Self {
        let mut index = Self::default();

        for item in items {
            let (Some(key), Some(version)) = (item.key(), item.resource_version()) else {
                warn!(
                    "No resource version to patch for live item {}",
                    item.key()
                        .map(|k| k.to_string())
                        .unwrap_or_else(|| "<unnamed>".to_string())
                );
                index.skipped += 1;
                continue;
            };

            debug!("Indexed {} at resourceVersion {}", key, version);
            index.versions.insert(key, version.to_string());
        }

        index
    }

    pub fn get(&self, key: &GvkNameKey) -> Option<&str> {
        self.versions.get(key).map(String::as_str)
    }

    /// Number of live items left out of the index
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
