//! Catalog synchronization integration tests
//!
//! Runs against real local git repositories over file:// URLs; each test
//! skips when git is not installed.

mod common;

use brokkr_core::types::{RepositorySource, SyncState};
use brokkr_sources::{catalog, CommandRunner};
use common::*;
use tempfile::TempDir;

fn test_source(url: &str, target: &TempDir) -> RepositorySource {
    RepositorySource::new("demo", url, target.path().join("modules"))
}

#[tokio::test]
async fn test_validate_builds_ordered_catalog() {
    if !git_available() {
        return;
    }

    let fixture = GitFixture::new(&["1.0", "2.0"], &[]);
    let target = TempDir::new().unwrap();
    let mut source = test_source(&fixture.url, &target);
    let runner = CommandRunner::new();

    let summary = catalog::validate(&mut source, &runner).await.unwrap();

    assert_eq!(summary.tags, 2);
    assert_eq!(summary.branches, 1);
    assert!(summary.warnings.is_empty());

    let rendered: Vec<String> = source
        .catalog
        .iter()
        .map(|r| r.full_reference())
        .collect();
    assert_eq!(rendered, vec!["tag:2.0", "tag:1.0", "branch:main"]);

    assert_eq!(source.sync_state, SyncState::Validated);
    assert!(source.last_synced_at.is_some());
    assert!(source.last_error.is_none());
}

#[tokio::test]
async fn test_annotated_tag_dereferences_never_reach_the_catalog() {
    if !git_available() {
        return;
    }

    // Fixture tags are annotated, so ls-remote reports `<tag>^{}` lines
    let fixture = GitFixture::new(&["v1.0"], &[]);
    let target = TempDir::new().unwrap();
    let mut source = test_source(&fixture.url, &target);
    let runner = CommandRunner::new();

    catalog::validate(&mut source, &runner).await.unwrap();

    assert!(source.catalog.iter().any(|r| r.name == "v1.0"));
    assert!(source.catalog.iter().all(|r| !r.name.ends_with("^{}")));
}

#[tokio::test]
async fn test_revalidation_is_idempotent() {
    if !git_available() {
        return;
    }

    let fixture = GitFixture::new(&["1.0", "2.0"], &["18.0"]);
    let target = TempDir::new().unwrap();
    let mut source = test_source(&fixture.url, &target);
    let runner = CommandRunner::new();

    catalog::validate(&mut source, &runner).await.unwrap();
    let first_catalog = source.catalog.clone();
    let first_sync = source.last_synced_at.unwrap();

    catalog::validate(&mut source, &runner).await.unwrap();

    // Replaced wholesale, never merged or duplicated
    assert_eq!(source.catalog, first_catalog);
    assert!(source.last_synced_at.unwrap() >= first_sync);
}

#[tokio::test]
async fn test_failure_then_recovery_through_the_state_machine() {
    if !git_available() {
        return;
    }

    let fixture = GitFixture::new(&["1.0"], &[]);
    let target = TempDir::new().unwrap();
    let mut source = test_source("file:///nonexistent/brokkr/repo", &target);
    let runner = CommandRunner::new();

    let err = catalog::validate(&mut source, &runner).await.unwrap_err();
    assert_eq!(source.sync_state, SyncState::Error);
    assert!(source.catalog.is_empty());
    // The stored message matches the raised error
    assert_eq!(source.last_error.as_deref(), Some(err.to_string().as_str()));

    // Error is only left through a successful validate
    source.url = fixture.url.clone();
    catalog::validate(&mut source, &runner).await.unwrap();
    assert_eq!(source.sync_state, SyncState::Validated);
    assert!(source.last_error.is_none());
    assert!(!source.catalog.is_empty());
}
