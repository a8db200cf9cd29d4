use resource_version_patcher::{
    FakeClusterClient, FileOutcome, ResourceVersionPatcher, SkipReason,
};
use rvpatch_manifest::parse_documents;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const DEPLOYMENT: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  labels:
    app: web
spec:
  replicas: 3
"#;

const SERVICE: &str = r#"apiVersion: v1
kind: Service
metadata:
  name: web
spec:
  ports:
  - port: 80
"#;

const INGRESS: &str = r#"apiVersion: networking.k8s.io/v1
kind: Ingress
metadata:
  name: web
"#;

const LIVE_DEPLOYMENT: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  resourceVersion: "123"
spec:
  replicas: 1
status:
  readyReplicas: 1
"#;

const LIVE_LIST: &str = r#"apiVersion: v1
kind: List
metadata:
  resourceVersion: ""
items:
- apiVersion: apps/v1
  kind: Deployment
  metadata:
    name: web
    resourceVersion: "501"
- apiVersion: v1
  kind: Service
  metadata:
    name: web
    resourceVersion: "502"
"#;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

#[tokio::test]
async fn test_single_document_file_is_patched() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write(dir, "deployment.yaml", DEPLOYMENT);

    let client = FakeClusterClient::new().with_output("deployment.yaml", LIVE_DEPLOYMENT);
    let summary = ResourceVersionPatcher::new(Arc::new(client))
        .patch_directory(dir)
        .await
        .unwrap();

    assert_eq!(summary.statistics.files_patched, 1);

    let documents = parse_documents(&read(dir, "deployment.yaml")).unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].resource_version(), Some("123"));

    let mut expected = parse_documents(DEPLOYMENT).unwrap();
    expected[0].set_resource_version("123").unwrap();
    assert_eq!(documents, expected);
}

#[tokio::test]
async fn test_list_patches_only_matching_documents() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write(
        dir,
        "app.yaml",
        &format!("{DEPLOYMENT}---\n{SERVICE}---\n{INGRESS}"),
    );

    let client = FakeClusterClient::new().with_output("app.yaml", LIVE_LIST);
    let summary = ResourceVersionPatcher::new(Arc::new(client))
        .patch_directory(dir)
        .await
        .unwrap();

    assert_eq!(
        summary.outcome_for("app.yaml"),
        Some(&FileOutcome::Patched {
            documents_patched: 2,
            documents_unmatched: 1
        })
    );

    let content = read(dir, "app.yaml");
    assert!(content.starts_with("---\n"));

    let documents = parse_documents(&content).unwrap();
    assert_eq!(documents.len(), 3);
    assert_eq!(documents[0].resource_version(), Some("501"));
    assert_eq!(documents[1].resource_version(), Some("502"));
    assert_eq!(documents[2], parse_documents(INGRESS).unwrap()[0]);
}

#[tokio::test]
async fn test_list_matches_by_identity_not_position() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write(dir, "app.yaml", &format!("{SERVICE}---\n{DEPLOYMENT}"));

    let client = FakeClusterClient::new().with_output("app.yaml", LIVE_LIST);
    ResourceVersionPatcher::new(Arc::new(client))
        .patch_directory(dir)
        .await
        .unwrap();

    let documents = parse_documents(&read(dir, "app.yaml")).unwrap();
    assert_eq!(documents[0].kind(), Some("Service"));
    assert_eq!(documents[0].resource_version(), Some("502"));
    assert_eq!(documents[1].resource_version(), Some("501"));
}

#[tokio::test]
async fn test_list_without_matches_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let original = format!("{INGRESS}---\n{INGRESS}");
    write(dir, "ingress.yaml", &original);

    let client = FakeClusterClient::new().with_output("ingress.yaml", LIVE_LIST);
    let summary = ResourceVersionPatcher::new(Arc::new(client))
        .patch_directory(dir)
        .await
        .unwrap();

    assert_eq!(
        summary.outcome_for("ingress.yaml"),
        Some(&FileOutcome::Skipped(SkipReason::NoMatchingDocuments))
    );
    assert_eq!(read(dir, "ingress.yaml"), original);
}

#[tokio::test]
async fn test_no_output_leaves_file_byte_for_byte() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let original = "# generated\napiVersion: v1\nkind: Service\nmetadata: {name: web}\n";
    write(dir, "svc.yml", original);

    let summary = ResourceVersionPatcher::new(Arc::new(FakeClusterClient::new()))
        .patch_directory(dir)
        .await
        .unwrap();

    assert_eq!(
        summary.outcome_for("svc.yml"),
        Some(&FileOutcome::Skipped(SkipReason::NoOutput))
    );
    assert_eq!(read(dir, "svc.yml"), original);
}

#[tokio::test]
async fn test_live_document_without_version_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write(dir, "deployment.yaml", DEPLOYMENT);

    let client = FakeClusterClient::new().with_output("deployment.yaml", DEPLOYMENT);
    let summary = ResourceVersionPatcher::new(Arc::new(client))
        .patch_directory(dir)
        .await
        .unwrap();

    assert_eq!(summary.statistics.files_skipped, 1);
    assert_eq!(read(dir, "deployment.yaml"), DEPLOYMENT);
}

#[tokio::test]
async fn test_patching_twice_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write(dir, "deployment.yaml", DEPLOYMENT);
    write(dir, "app.yaml", &format!("{DEPLOYMENT}---\n{SERVICE}"));

    let client = Arc::new(
        FakeClusterClient::new()
            .with_output("deployment.yaml", LIVE_DEPLOYMENT)
            .with_output("app.yaml", LIVE_LIST),
    );
    let patcher = ResourceVersionPatcher::new(client);

    patcher.patch_directory(dir).await.unwrap();
    let once = (read(dir, "deployment.yaml"), read(dir, "app.yaml"));

    patcher.patch_directory(dir).await.unwrap();
    let twice = (read(dir, "deployment.yaml"), read(dir, "app.yaml"));

    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_malformed_output_does_not_stop_other_files() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write(dir, "a-broken.yaml", SERVICE);
    write(dir, "b-deployment.yaml", DEPLOYMENT);

    let client = FakeClusterClient::new()
        .with_output("a-broken.yaml", "items: [\n  - {unterminated")
        .with_output("b-deployment.yaml", LIVE_DEPLOYMENT);
    let summary = ResourceVersionPatcher::new(Arc::new(client))
        .patch_directory(dir)
        .await
        .unwrap();

    assert!(summary.has_failures());
    assert!(summary.outcome_for("a-broken.yaml").unwrap().is_failed());
    assert!(summary.outcome_for("b-deployment.yaml").unwrap().is_patched());
    assert_eq!(read(dir, "a-broken.yaml"), SERVICE);

    let documents = parse_documents(&read(dir, "b-deployment.yaml")).unwrap();
    assert_eq!(documents[0].resource_version(), Some("123"));
}

#[tokio::test]
async fn test_only_manifest_files_are_queried() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write(dir, "b.yaml", SERVICE);
    write(dir, "a.json", "{}");
    write(dir, "README.md", "# docs");
    fs::create_dir(dir.join("nested")).unwrap();
    write(&dir.join("nested"), "c.yaml", SERVICE);

    let client = Arc::new(FakeClusterClient::new());
    let summary = ResourceVersionPatcher::new(client.clone())
        .patch_directory(dir)
        .await
        .unwrap();

    let queried: Vec<String> = client
        .calls()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(queried, vec!["a.json", "b.yaml"]);
    assert_eq!(summary.statistics.files_seen, 2);
}

#[tokio::test]
async fn test_missing_directory_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = ResourceVersionPatcher::new(Arc::new(FakeClusterClient::new()))
        .patch_directory(&temp_dir.path().join("missing"))
        .await;

    assert!(result.is_err());
}
