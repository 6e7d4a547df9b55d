//! Catalog synchronization
//!
//! `validate` is the single sync operation: it re-lists refs and overwrites
//! the cached catalog wholesale. "Refresh" is exactly re-invoking it; there
//! is no incremental path.

use crate::command::CommandRunner;
use crate::refs::list_refs;
use brokkr_core::error::ListError;
use brokkr_core::types::{RefKind, RepositorySource, SyncState, ValidateSummary};
use chrono::Utc;
use tracing::info;

/// Synchronize a repository source's catalog against the remote.
///
/// Callable from any prior state. On success the catalog is replaced, the
/// sync time stamped and any previous error cleared. On failure the source
/// moves to the error state with the failure message stored and no partial
/// catalog kept.
///
/// The state transition is applied to `source` before this returns, on both
/// paths, so the caller can persist the record durably and still see the
/// error.
pub async fn validate(
    source: &mut RepositorySource,
    runner: &CommandRunner,
) -> Result<ValidateSummary, ListError> {
    // Confirm git itself is available before touching the network
    if let Err(e) = runner.run("git", &["--version"], None).await {
        record_failure(source, &e.to_string());
        return Err(ListError::QueriesFailed {
            url: source.url.clone(),
            message: e.to_string(),
        });
    }

    match list_refs(runner, &source.url).await {
        Ok(listing) => {
            let summary = ValidateSummary {
                tags: listing.count_of(RefKind::Tag),
                branches: listing.count_of(RefKind::Branch),
                warnings: listing.warnings,
            };

            source.sync_state = SyncState::Validated;
            source.catalog = listing.refs;
            source.last_synced_at = Some(Utc::now());
            source.last_error = None;

            info!(
                "validated {}: {} tag(s), {} branch(es)",
                source.name, summary.tags, summary.branches
            );
            Ok(summary)
        }
        Err(e) => {
            record_failure(source, &e.to_string());
            Err(e)
        }
    }
}

fn record_failure(source: &mut RepositorySource, message: &str) {
    source.sync_state = SyncState::Error;
    source.catalog.clear();
    source.last_error = Some(message.to_string());
    // last_synced_at keeps the time of the last successful listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn local_git_missing() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .map(|o| !o.status.success())
            .unwrap_or(true)
    }

    #[tokio::test]
    async fn test_failed_validate_records_error_state() {
        if local_git_missing() {
            return;
        }

        let runner = CommandRunner::with_timeout(Duration::from_secs(30));
        let mut source = RepositorySource::new(
            "broken",
            "file:///nonexistent/brokkr/fixture/repo",
            "/tmp/brokkr-target",
        );

        let result = validate(&mut source, &runner).await;

        assert!(result.is_err());
        assert_eq!(source.sync_state, SyncState::Error);
        assert!(source.catalog.is_empty());
        assert!(source.last_error.is_some());
        assert!(source.last_synced_at.is_none());
    }
}
