//! Error taxonomy for the Brokkr workspace
//!
//! Five propagation classes with different cleanup contracts:
//! subprocess failures, ref-listing failures, configuration-time validation,
//! checkout failures, and ledger failures. Degraded-but-successful outcomes
//! travel through [`crate::types::Warning`] instead of any of these.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of an external subprocess
#[derive(Error, Debug)]
pub enum CommandError {
    /// The process could not be spawned or waited on
    #[error("failed to run `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran to completion and exited non-zero
    #[error("`{command}` failed with exit code {exit_code}: {stderr}")]
    Failed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// The process was terminated by a signal, so no exit code exists
    #[error("`{command}` was terminated by a signal: {stderr}")]
    Killed { command: String, stderr: String },

    /// The wall-clock timeout expired and the process was killed
    #[error("`{command}` timed out after {timeout_secs}s")]
    TimedOut { command: String, timeout_secs: u64 },
}

impl CommandError {
    /// True for the timeout variant, which callers may want to report
    /// differently from an ordinary non-zero exit.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CommandError::TimedOut { .. })
    }
}

/// Failure to list refs from a remote repository
#[derive(Error, Debug)]
pub enum ListError {
    /// Both the tag query and the branch query failed
    #[error("could not list refs for {url}: {message}")]
    QueriesFailed { url: String, message: String },

    /// Both queries succeeded but reported nothing
    #[error("no refs found at {url}")]
    NoRefs { url: String },
}

/// Configuration-time validation failure
///
/// Raised eagerly when a repository source is registered, never during a
/// checkout.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("invalid repository URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("target root must be an absolute path: {path}")]
    RelativeTargetRoot { path: PathBuf },

    #[error(
        "repository name may only contain letters, digits, '.', '_' and '-': {name}"
    )]
    InvalidSourceName { name: String },
}

impl ValidationError {
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of a versioned checkout
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Ref name failed the allow-list check for untrusted input
    #[error("ref name contains disallowed characters: {name}")]
    InvalidRefName { name: String },

    /// Module name failed the allow-list check, or could not be derived
    /// from the repository URL
    #[error("invalid module name: {name}")]
    InvalidModuleName { name: String },

    /// The target root directory could not be created
    #[error("cannot create target root {path}: {source}")]
    TargetRootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The computed installation path already exists on disk
    #[error("checkout target already exists: {path}")]
    TargetExists { path: PathBuf },

    /// The shallow fetch into the scratch directory failed; the scratch
    /// directory has been removed
    #[error("staging {reference} failed: {message}")]
    StagingFailed { reference: String, message: String },

    /// The staged directory could not be moved to its final location; the
    /// scratch directory has been removed
    #[error("could not publish staged checkout to {path}: {source}")]
    PublishFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The checkout was published but recording it in the ledger failed.
    /// The directory is deliberately left on disk and must be reconciled
    /// manually.
    #[error(
        "checkout published to {path} but recording it failed: {message}; \
         the directory is on disk but untracked, reconcile the ledger manually"
    )]
    RecordFailed { path: PathBuf, message: String },
}

/// Failure of the installation ledger
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ledger error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt ledger entry: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Recursive directory deletion failed during removal; the ledger
    /// record is kept so the partial directory is not lost track of
    #[error("could not delete {path}: {source}")]
    DirectoryDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not resolve ledger location: {message}")]
    Location { message: String },
}
