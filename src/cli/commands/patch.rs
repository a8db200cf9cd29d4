//! Patch command implementation

use crate::cli::utils;
use crate::{
    KubectlClient, PatchOptions, PatchSummary, PatcherConfig, ResourceVersionPatcher,
};
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub fn command() -> Command {
    utils::common_args(
        Command::new("patch").about("Copy live resourceVersions into the manifests on disk"),
    )
    .arg(
        clap::Arg::new("kubectl")
            .long("kubectl")
            .help("kubectl executable")
            .value_name("BIN"),
    )
    .arg(
        clap::Arg::new("server")
            .short('s')
            .long("server")
            .help("API server URL")
            .value_name("URL"),
    )
    .arg(
        clap::Arg::new("token-file")
            .long("token-file")
            .help("Bearer token file")
            .value_name("FILE"),
    )
    .arg(
        clap::Arg::new("ca-file")
            .long("ca-file")
            .help("CA certificate bundle")
            .value_name("FILE"),
    )
    .arg(
        clap::Arg::new("dry-run")
            .long("dry-run")
            .help("Report what would be patched without writing files")
            .action(clap::ArgAction::SetTrue),
    )
    .arg(
        clap::Arg::new("fail-on-error")
            .long("fail-on-error")
            .help("Exit non-zero if any manifest failed to patch")
            .action(clap::ArgAction::SetTrue),
    )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let mut config = utils::load_config(matches)?;

    if let Some(kubectl) = matches.get_one::<String>("kubectl") {
        config.cluster.kubectl = kubectl.clone();
    }
    if let Some(server) = matches.get_one::<String>("server") {
        config.cluster.server = server.clone();
    }
    if let Some(token_file) = matches.get_one::<String>("token-file") {
        config.cluster.token_path = PathBuf::from(token_file);
    }
    if let Some(ca_file) = matches.get_one::<String>("ca-file") {
        config.cluster.ca_path = PathBuf::from(ca_file);
    }
    if matches.get_flag("dry-run") {
        config.dry_run = true;
    }

    execute(config, matches.get_flag("fail-on-error")).await
}

/// Run with configuration from the config file and `MANIFEST_DIR` only
pub async fn run_from_env() -> Result<()> {
    let config = utils::base_config(None)?;
    execute(config, false).await
}

async fn execute(config: PatcherConfig, fail_on_error: bool) -> Result<()> {
    config.validate()?;
    let manifest_dir = config.resolved_manifest_dir()?;

    let client = KubectlClient::from_config(&config.cluster)?;
    let patcher = ResourceVersionPatcher::new(Arc::new(client)).with_options(PatchOptions {
        dry_run: config.dry_run,
    });

    if config.dry_run {
        info!("Dry run mode - no files will be written");
        println!("Dry run mode - no files will be written");
    }

    let summary = patcher.patch_directory(&manifest_dir).await?;
    print_summary(&summary);

    if fail_on_error && summary.has_failures() {
        return Err(anyhow!(
            "{} manifest file(s) failed to patch",
            summary.statistics.files_failed
        ));
    }

    Ok(())
}

fn print_summary(summary: &PatchSummary) {
    let stats = &summary.statistics;

    println!("Manifest directory: {:?}", summary.manifest_dir);
    for result in &summary.results {
        let name = result
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| result.path.display().to_string());

        if result.outcome.is_failed() {
            eprintln!("  {name}: {}", result.outcome);
        } else {
            println!("  {name}: {}", result.outcome);
        }
    }

    println!(
        "Files: {} seen, {} patched, {} skipped, {} failed",
        stats.files_seen, stats.files_patched, stats.files_skipped, stats.files_failed
    );
    println!(
        "Documents patched: {} ({} without a live match)",
        stats.documents_patched, stats.documents_unmatched
    );
    println!(
        "Processing time: {}",
        crate::utils::format_duration(Duration::from_millis(stats.total_processing_time_ms))
    );
}
