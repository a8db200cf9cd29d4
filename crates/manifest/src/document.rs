//! Single manifest document and its identity key

use serde_yaml::Value;
use std::fmt;

use crate::{ManifestError, ManifestResult};

const LIST_KIND: &str = "List";
const RESOURCE_VERSION: &str = "resourceVersion";

/// Identity of a resource: `apiVersion`, `kind` and `metadata.name` joined
/// without a separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GvkNameKey(String);

impl GvkNameKey {
    /// Build the key for a raw document, if all three fields are strings
    pub fn of(value: &Value) -> Option<Self> {
        let api_version = value.get("apiVersion")?.as_str()?;
        let kind = value.get("kind")?.as_str()?;
        let name = value.get("metadata")?.get("name")?.as_str()?;
        Some(Self(format!("{api_version}{kind}{name}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GvkNameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One parsed manifest document
#[derive(Debug, Clone, PartialEq)]
pub struct Document(Value);

impl Document {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn kind(&self) -> Option<&str> {
        self.0.get("kind").and_then(Value::as_str)
    }

    /// Whether this is a `kind: List` wrapper around `items`
    pub fn is_list(&self) -> bool {
        self.kind() == Some(LIST_KIND)
    }

    pub fn key(&self) -> Option<GvkNameKey> {
        GvkNameKey::of(&self.0)
    }

    /// `metadata.resourceVersion`, when present as a string
    pub fn resource_version(&self) -> Option<&str> {
        self.0
            .get("metadata")?
            .get(RESOURCE_VERSION)?
            .as_str()
    }

    /// Insert or overwrite `metadata.resourceVersion`.
    ///
    /// Requires an existing `metadata` mapping; no other field is touched.
    pub fn set_resource_version(&mut self, version: &str) -> ManifestResult<()> {
        let root = self.0.as_mapping_mut().ok_or(ManifestError::NotAMapping)?;
        let metadata = root
            .get_mut("metadata")
            .and_then(Value::as_mapping_mut)
            .ok_or(ManifestError::MissingMetadata)?;
        metadata.insert(Value::from(RESOURCE_VERSION), Value::from(version));
        Ok(())
    }

    /// Take the `items` of a List document. A missing `items` field is an
    /// empty list.
    pub fn items(&self) -> ManifestResult<Vec<Document>> {
        match self.0.get("items") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Sequence(items)) => Ok(items.iter().cloned().map(Document).collect()),
            Some(_) => Err(ManifestError::InvalidItems),
        }
    }

    /// Visit every entry of `items` in place. Returns false when the
    /// document has no `items` sequence.
    pub fn for_each_item(&mut self, mut visit: impl FnMut(&mut Document)) -> bool {
        let Some(Value::Sequence(items)) = self.0.get_mut("items") else {
            return false;
        };

        for item in items.iter_mut() {
            let mut document = Document(std::mem::replace(item, Value::Null));
            visit(&mut document);
            *item = document.0;
        }
        true
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
