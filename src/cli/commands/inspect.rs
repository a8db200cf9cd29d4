//! Inspect command implementation

use crate::cli::utils;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use rvpatch_manifest::{parse_documents, Document};
use tracing::info;

pub fn command() -> Command {
    utils::common_args(
        Command::new("inspect")
            .about("List manifest documents with their identity keys, without contacting the cluster"),
    )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let config = utils::load_config(matches)?;
    if config.manifest_dir.as_os_str().is_empty() {
        return Err(anyhow!(
            "No manifest directory configured. Set {} or pass --manifest-dir",
            crate::config::MANIFEST_DIR_ENV
        ));
    }
    let manifest_dir = config.resolved_manifest_dir()?;

    info!("Inspecting manifests in {}", manifest_dir.display());

    let files = crate::utils::find_manifest_files(&manifest_dir)?;
    println!("Manifest directory: {:?}", manifest_dir);
    println!("Manifest files: {}", files.len());

    for path in files {
        println!("{}", path.display());

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("  Error: {e}");
                continue;
            }
        };

        match parse_documents(&content) {
            Ok(documents) => {
                for document in &documents {
                    print_document(document, "  ");
                    if document.is_list() {
                        for item in document.items().unwrap_or_default() {
                            print_document(&item, "    ");
                        }
                    }
                }
            }
            Err(e) => eprintln!("  Error: {e}"),
        }
    }

    Ok(())
}

fn print_document(document: &Document, indent: &str) {
    let key = document
        .key()
        .map(|k| k.to_string())
        .unwrap_or_else(|| "<no identity>".to_string());

    match document.resource_version() {
        Some(version) => println!("{indent}- {key} (resourceVersion {version})"),
        None => println!("{indent}- {key}"),
    }
}
