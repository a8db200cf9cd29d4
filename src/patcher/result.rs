//! Per-file outcomes and the run summary

use std::fmt;
use std::path::PathBuf;

/// Why a file was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The cluster knows none of the file's resources
    NoOutput,

    /// The cluster answered with a List without items
    EmptyList,

    /// The live resource carries no `metadata.resourceVersion`
    NoResourceVersion,

    /// No local document matched a live resource
    NoMatchingDocuments,

    /// The local document has no `metadata` mapping to patch
    MissingMetadata,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NoOutput => "no live output for file",
            SkipReason::EmptyList => "zero items in live List",
            SkipReason::NoResourceVersion => "no resource version to patch",
            SkipReason::NoMatchingDocuments => "no local document matched a live resource",
            SkipReason::MissingMetadata => "local document has no metadata",
        };
        f.write_str(text)
    }
}

/// Result of processing one manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file was rewritten (or would be, in a dry run)
    Patched {
        documents_patched: usize,
        documents_unmatched: usize,
    },

    Skipped(SkipReason),

    Failed { error: String },
}

impl FileOutcome {
    pub fn is_patched(&self) -> bool {
        matches!(self, FileOutcome::Patched { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Patched {
                documents_patched,
                documents_unmatched: 0,
            } => write!(f, "patched {documents_patched} document(s)"),
            FileOutcome::Patched {
                documents_patched,
                documents_unmatched,
            } => write!(
                f,
                "patched {documents_patched} document(s), {documents_unmatched} without a live match"
            ),
            FileOutcome::Skipped(reason) => write!(f, "skipped: {reason}"),
            FileOutcome::Failed { error } => write!(f, "failed: {error}"),
        }
    }
}

/// Outcome for one file
#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Counters over a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchStatistics {
    /// Total processing time in milliseconds
    pub total_processing_time_ms: u64,

    /// Manifest files found in the directory
    pub files_seen: usize,

    pub files_patched: usize,

    pub files_skipped: usize,

    pub files_failed: usize,

    /// Documents whose resourceVersion was set
    pub documents_patched: usize,

    /// Documents in patched files that had no live counterpart
    pub documents_unmatched: usize,
}

/// Everything a directory run did
#[derive(Debug, Clone)]
pub struct PatchSummary {
    pub manifest_dir: PathBuf,
    pub dry_run: bool,
    pub results: Vec<FileResult>,
    pub statistics: PatchStatistics,
}

impl PatchSummary {
    pub fn new(
        manifest_dir: PathBuf,
        dry_run: bool,
        results: Vec<FileResult>,
        total_processing_time_ms: u64,
    ) -> Self {
        let mut statistics = PatchStatistics {
            total_processing_time_ms,
            files_seen: results.len(),
            ..PatchStatistics::default()
        };

        for result in &results {
            match &result.outcome {
                FileOutcome::Patched {
                    documents_patched,
                    documents_unmatched,
                } => {
                    statistics.files_patched += 1;
                    statistics.documents_patched += documents_patched;
                    statistics.documents_unmatched += documents_unmatched;
                }
                FileOutcome::Skipped(_) => statistics.files_skipped += 1,
                FileOutcome::Failed { .. } => statistics.files_failed += 1,
            }
        }

        Self {
            manifest_dir,
            dry_run,
            results,
            statistics,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.statistics.files_failed > 0
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileResult> {
        self.results.iter().filter(|r| r.outcome.is_failed())
    }

    /// Outcome for a file, by file name
    pub fn outcome_for(&self, file_name: &str) -> Option<&FileOutcome> {
        self.results
            .iter()
            .find(|r| r.path.file_name().is_some_and(|n| n == file_name))
            .map(|r| &r.outcome)
    }
}
