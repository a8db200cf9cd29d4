//! Kubernetes manifest documents as read from disk and as reported by a cluster

pub mod document;
pub mod live;
pub mod stream;


pub use document::{Document, GvkNameKey};
pub use live::{LiveState, ResourceVersionIndex};
pub use stream::{parse_documents, render_document, render_stream, ManifestFormat};

/// Errors raised while reading, patching or rendering manifest documents
#[derive(thiserror::Error, Debug)]
pub enum ManifestError {
    #[error("YAML parsing failed: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("JSON rendering failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document is not a mapping")]
    NotAMapping,

    #[error("document has no metadata mapping")]
    MissingMetadata,

    #[error("List document has a non-sequence `items` field")]
    InvalidItems,
}

pub type ManifestResult<T> = Result<T, ManifestError>;
