//! Injects live `resourceVersion`s into manifest files on disk
//!
//! Files are handled one at a time. Every failure is contained to the file
//! it happened in and reported as a [`FileOutcome`]; a run always attempts
//! every manifest in the directory.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use rvpatch_manifest::{
    parse_documents, render_document, render_stream, Document, LiveState, ManifestFormat,
    ResourceVersionIndex,
};

use crate::cluster::ClusterClient;
use crate::utils;
use crate::{PatcherError, PatcherResult};

pub mod result;


pub use result::{FileOutcome, FileResult, PatchStatistics, PatchSummary, SkipReason};

/// Knobs for a patch run
#[derive(Debug, Clone, Default)]
pub struct PatchOptions {
    /// Compute outcomes but leave every file untouched
    pub dry_run: bool,
}

/// Patches manifests with the versions a [`ClusterClient`] reports
pub struct ResourceVersionPatcher {
    client: Arc<dyn ClusterClient>,
    options: PatchOptions,
}

#[derive(Default)]
struct Tally {
    patched: usize,
    unmatched: usize,
}

impl ResourceVersionPatcher {
    pub fn new(client: Arc<dyn ClusterClient>) -> Self {
        Self {
            client,
            options: PatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Patch every `.yml`, `.yaml` and `.json` file directly inside `dir`.
    ///
    /// Only an unreadable directory is an error; per-file problems end up in
    /// the summary.
    pub async fn patch_directory(&self, dir: &Path) -> PatcherResult<PatchSummary> {
        info!(
            "Patching manifests in {} using {} client",
            dir.display(),
            self.client.name()
        );

        let start_time = Instant::now();
        let files = utils::find_manifest_files(dir)?;
        let mut results = Vec::with_capacity(files.len());

        for path in files {
            let outcome = self.patch_file(&path).await;
            info!("{}: {}", path.display(), outcome);
            results.push(FileResult { path, outcome });
        }

        let summary = PatchSummary::new(
            dir.to_path_buf(),
            self.options.dry_run,
            results,
            start_time.elapsed().as_millis() as u64,
        );

        info!(
            "Patched {} of {} manifest files ({} skipped, {} failed)",
            summary.statistics.files_patched,
            summary.statistics.files_seen,
            summary.statistics.files_skipped,
            summary.statistics.files_failed
        );

        Ok(summary)
    }

    /// Patch a single manifest file. Never fails; errors become
    /// [`FileOutcome::Failed`].
    pub async fn patch_file(&self, path: &Path) -> FileOutcome {
        match self.try_patch_file(path).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to patch {}: {}", path.display(), e);
                FileOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn try_patch_file(&self, path: &Path) -> PatcherResult<FileOutcome> {
        let output = self.client.fetch_live(path).await?;

        let Some(live) = LiveState::parse(&output)? else {
            info!("No live output for file {}", path.display());
            return Ok(FileOutcome::Skipped(SkipReason::NoOutput));
        };

        let format = ManifestFormat::from_path(path).unwrap_or(ManifestFormat::Yaml);

        match live {
            LiveState::List(items) => {
                debug!("Live state for {} is a List", path.display());
                self.patch_from_list(path, format, &items)
            }
            LiveState::Single(document) => {
                debug!(
                    "Live state for {} is a {}",
                    path.display(),
                    document.kind().unwrap_or("document without kind")
                );
                self.patch_from_single(path, format, &document)
            }
        }
    }

    /// Several resources: match local documents to live items by
    /// GVK-name key.
    ///
    /// A file where no document matches is not rewritten at all, rather
    /// than re-serialized unchanged.
    fn patch_from_list(
        &self,
        path: &Path,
        format: ManifestFormat,
        items: &[Document],
    ) -> PatcherResult<FileOutcome> {
        if items.is_empty() {
            warn!("Zero items in live List for {}", path.display());
            return Ok(FileOutcome::Skipped(SkipReason::EmptyList));
        }

        let index = ResourceVersionIndex::from_items(items);
        if index.skipped() > 0 {
            warn!(
                "{} live item(s) for {} carry no resource version",
                index.skipped(),
                path.display()
            );
        }

        let content = std::fs::read_to_string(path)?;
        let mut documents = parse_documents(&content)?;
        let mut tally = Tally::default();

        for document in &mut documents {
            if document.is_list() {
                document.for_each_item(|item| patch_one(item, &index, &mut tally));
            } else {
                patch_one(document, &index, &mut tally);
            }
        }

        if tally.patched == 0 {
            warn!("No resource version to patch for file {}", path.display());
            return Ok(FileOutcome::Skipped(SkipReason::NoMatchingDocuments));
        }

        let rendered = match (format, documents.as_slice()) {
            (ManifestFormat::Json, [single]) => render_document(single, format)?,
            _ => render_stream(&documents)?,
        };
        self.write(path, &rendered)?;

        Ok(FileOutcome::Patched {
            documents_patched: tally.patched,
            documents_unmatched: tally.unmatched,
        })
    }

    /// One resource: copy the live version into the file's only document
    fn patch_from_single(
        &self,
        path: &Path,
        format: ManifestFormat,
        live: &Document,
    ) -> PatcherResult<FileOutcome> {
        let Some(version) = live.resource_version() else {
            warn!("No resource version to patch for file {}", path.display());
            return Ok(FileOutcome::Skipped(SkipReason::NoResourceVersion));
        };

        let content = std::fs::read_to_string(path)?;
        let mut documents = parse_documents(&content)?;
        if documents.len() != 1 {
            return Err(PatcherError::DocumentCount(documents.len()));
        }
        let mut document = documents.remove(0);

        if let Err(e) = document.set_resource_version(version) {
            warn!("Cannot patch {}: {}", path.display(), e);
            return Ok(FileOutcome::Skipped(SkipReason::MissingMetadata));
        }

        info!(
            "Patching resource version {} into {}",
            version,
            path.display()
        );
        self.write(path, &render_document(&document, format)?)?;

        Ok(FileOutcome::Patched {
            documents_patched: 1,
            documents_unmatched: 0,
        })
    }

    fn write(&self, path: &Path, content: &str) -> PatcherResult<()> {
        if self.options.dry_run {
            info!("Dry run: would rewrite {}", path.display());
            return Ok(());
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

fn patch_one(document: &mut Document, index: &ResourceVersionIndex, tally: &mut Tally) {
    let Some(key) = document.key() else {
        warn!("Local document has no apiVersion, kind or metadata.name; leaving it unchanged");
        tally.unmatched += 1;
        return;
    };

    let Some(version) = index.get(&key) else {
        warn!("No resource version to patch for {}", key);
        tally.unmatched += 1;
        return;
    };

    match document.set_resource_version(version) {
        Ok(()) => {
            info!("Patching resource version {} for {}", version, key);
            tally.patched += 1;
        }
        Err(e) => {
            warn!("Cannot patch {}: {}", key, e);
            tally.unmatched += 1;
        }
    }
}
