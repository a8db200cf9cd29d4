//! Reading and writing manifest files as document streams

use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;

use crate::{Document, ManifestResult};

const DOCUMENT_START: &str = "---\n";

/// On-disk encoding of a manifest file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
}

impl ManifestFormat {
    /// Detect the format from `.yml`, `.yaml` or `.json`; anything else is
    /// not a manifest.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse every document in a (possibly multi-document) manifest.
///
/// JSON is read through the same YAML parser. Empty documents, such as the
/// one following a trailing `---`, are dropped.
pub fn parse_documents(content: &str) -> ManifestResult<Vec<Document>> {
    let mut documents = Vec::new();

    for de in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(de)?;
        if !value.is_null() {
            documents.push(Document::new(value));
        }
    }

    Ok(documents)
}

/// Render a stream with an explicit start marker before every document
pub fn render_stream(documents: &[Document]) -> ManifestResult<String> {
    let mut out = String::new();
    for document in documents {
        out.push_str(DOCUMENT_START);
        out.push_str(&serde_yaml::to_string(document.value())?);
    }
    Ok(out)
}

/// Render one document in the file's own format
pub fn render_document(document: &Document, format: ManifestFormat) -> ManifestResult<String> {
    match format {
        ManifestFormat::Yaml => Ok(serde_yaml::to_string(document.value())?),
        ManifestFormat::Json => {
            let mut out = serde_json::to_string_pretty(document.value())?;
            out.push('\n');
            Ok(out)
        }
    }
}
