//! Installed checkouts and operation outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A successfully published checkout, as recorded in the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledCheckout {
    /// Name of the owning repository source
    pub source_name: String,

    /// Module name the checkout was published under
    pub module_name: String,

    /// The ref name that was checked out (without its kind prefix)
    pub ref_name: String,

    /// Absolute path the checkout was published to; unique among live
    /// records
    pub installed_path: PathBuf,

    pub installed_at: DateTime<Utc>,
}

/// Degraded-but-successful outcome of a best-effort step.
///
/// Operations return these alongside their values instead of swallowing the
/// failure into a log line, so callers and tests can assert on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The tag query failed; the listing continued with branches only
    TagQueryFailed { url: String, message: String },

    /// The branch query failed; the listing continued with tags only
    BranchQueryFailed { url: String, message: String },

    /// Ownership fix-up after publishing did not complete
    OwnershipUnchanged { path: PathBuf, message: String },

    /// The host's module list could not be reloaded after the checkout
    ReloadFailed { message: String },

    /// The host process could not be signalled to restart
    RestartFailed { message: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::TagQueryFailed { url, message } => {
                write!(f, "tag listing failed for {url}: {message}")
            }
            Warning::BranchQueryFailed { url, message } => {
                write!(f, "branch listing failed for {url}: {message}")
            }
            Warning::OwnershipUnchanged { path, message } => {
                write!(
                    f,
                    "could not adjust ownership of {}: {message}",
                    path.display()
                )
            }
            Warning::ReloadFailed { message } => {
                write!(f, "checkout succeeded but the module list reload failed: {message}")
            }
            Warning::RestartFailed { message } => {
                write!(
                    f,
                    "checkout succeeded but the restart signal failed, restart manually: {message}"
                )
            }
        }
    }
}

/// Result of a successful catalog sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateSummary {
    pub tags: usize,
    pub branches: usize,
    pub warnings: Vec<Warning>,
}

impl ValidateSummary {
    /// Operator-facing summary line
    pub fn message(&self) -> String {
        format!(
            "repository validated, found {} tag(s) and {} branch(es)",
            self.tags, self.branches
        )
    }
}

/// Result of a successful checkout
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub installed_path: PathBuf,
    pub record: InstalledCheckout,
    pub warnings: Vec<Warning>,
}

/// Result of removing an installed checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Directory tree deleted and record removed
    Deleted { path: PathBuf },

    /// Directory was already gone; only the record was removed
    RecordOnly { path: PathBuf },
}

impl RemoveOutcome {
    /// Operator-facing outcome line
    pub fn message(&self) -> String {
        match self {
            RemoveOutcome::Deleted { path } => {
                format!("removed {}", path.display())
            }
            RemoveOutcome::RecordOnly { path } => {
                format!(
                    "{} not found on disk, record removed",
                    path.display()
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_serialization() {
        let warning = Warning::TagQueryFailed {
            url: "https://example.com/org/repo".to_string(),
            message: "connection refused".to_string(),
        };

        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains(r#""kind":"tag_query_failed"#));

        let deserialized: Warning = serde_json::from_str(&json).unwrap();
        assert_eq!(warning, deserialized);
    }

    #[test]
    fn test_restart_warning_tells_operator_to_restart_manually() {
        let warning = Warning::RestartFailed {
            message: "no such process".to_string(),
        };
        assert!(warning.to_string().contains("restart manually"));
    }

    #[test]
    fn test_validate_summary_message() {
        let summary = ValidateSummary {
            tags: 3,
            branches: 1,
            warnings: Vec::new(),
        };
        assert_eq!(
            summary.message(),
            "repository validated, found 3 tag(s) and 1 branch(es)"
        );
    }

    #[test]
    fn test_remove_outcome_messages() {
        let deleted = RemoveOutcome::Deleted {
            path: PathBuf::from("/srv/modules/repo_2.0"),
        };
        assert_eq!(deleted.message(), "removed /srv/modules/repo_2.0");

        let record_only = RemoveOutcome::RecordOnly {
            path: PathBuf::from("/srv/modules/repo_2.0"),
        };
        assert!(record_only.message().contains("record removed"));
    }
}
