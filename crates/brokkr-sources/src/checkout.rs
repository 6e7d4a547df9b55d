//! Staged, crash-consistent checkouts
//!
//! A checkout is staged into a scratch directory with a shallow single-ref
//! fetch, then published into the target root with an atomic rename. Except
//! for the publish-then-record window (surfaced as its own error), no
//! filesystem state survives a failed call.

use crate::command::CommandRunner;
use crate::ledger::CheckoutLedger;
use brokkr_core::error::CheckoutError;
use brokkr_core::types::{CheckoutOutcome, InstalledCheckout, RefDescriptor, RepositorySource, Warning};
use brokkr_core::validate::{module_name_from_url, validate_module_name, validate_ref_name};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Performs versioned checkouts and records them in the ledger
pub struct CheckoutEngine {
    runner: CommandRunner,
    ledger: CheckoutLedger,
    scratch_base: PathBuf,
}

impl CheckoutEngine {
    pub fn new(runner: CommandRunner, ledger: CheckoutLedger) -> Self {
        Self {
            runner,
            ledger,
            scratch_base: std::env::temp_dir(),
        }
    }

    /// Override the scratch area (tests)
    pub fn with_scratch_base(mut self, scratch_base: impl Into<PathBuf>) -> Self {
        self.scratch_base = scratch_base.into();
        self
    }

    pub fn ledger(&self) -> &CheckoutLedger {
        &self.ledger
    }

    /// Materialize `full_reference` from the source's remote into its target
    /// root.
    ///
    /// The reference is re-resolved against the remote regardless of the
    /// source's cached catalog; a reference without a kind prefix is treated
    /// as a tag.
    pub async fn checkout(
        &self,
        source: &RepositorySource,
        full_reference: &str,
        module_override: Option<&str>,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let reference = RefDescriptor::parse(full_reference);
        validate_ref_name(&reference.name)?;

        let module_name = match module_override {
            Some(name) => name.to_string(),
            None => module_name_from_url(&source.url).ok_or_else(|| {
                CheckoutError::InvalidModuleName {
                    name: source.url.clone(),
                }
            })?,
        };
        validate_module_name(&module_name)?;

        // Resolve the target before any remote work
        fs::create_dir_all(&source.target_root).map_err(|e| {
            CheckoutError::TargetRootUnavailable {
                path: source.target_root.clone(),
                source: e,
            }
        })?;

        let sanitized = reference.name.replace('/', "_");
        let installed_path = source
            .target_root
            .join(format!("{}_{}", module_name, sanitized));

        if installed_path.exists() {
            return Err(CheckoutError::TargetExists {
                path: installed_path,
            });
        }

        // Stage into a scratch directory keyed by a fresh token, so
        // concurrent checkouts cannot collide on the staging path
        let scratch = self
            .scratch_base
            .join(format!("brokkr-checkout-{}", Uuid::new_v4()));

        info!(
            "staging {} of {} into {}",
            reference.full_reference(),
            source.url,
            scratch.display()
        );

        if let Err(e) = self.stage(&source.url, &reference.name, &scratch).await {
            discard(&scratch);
            return Err(CheckoutError::StagingFailed {
                reference: reference.full_reference(),
                message: e.to_string(),
            });
        }

        // Publish with a single rename; no retry loop on failure
        if let Err(e) = fs::rename(&scratch, &installed_path) {
            discard(&scratch);
            discard(&installed_path);
            return Err(CheckoutError::PublishFailed {
                path: installed_path,
                source: e,
            });
        }

        let mut warnings = Vec::new();
        if let Some(w) = self.fix_ownership(&installed_path).await {
            warn!("{}", w);
            warnings.push(w);
        }

        let record = InstalledCheckout {
            source_name: source.name.clone(),
            module_name,
            ref_name: reference.name.clone(),
            installed_path: installed_path.clone(),
            installed_at: Utc::now(),
        };

        // Publish succeeded; a record failure leaves the directory on disk
        // and is surfaced as the reconciliation variant
        if let Err(e) = self.ledger.append_recorded(&record) {
            return Err(CheckoutError::RecordFailed {
                path: installed_path,
                message: e.to_string(),
            });
        }

        info!("published {} to {}", record.ref_name, installed_path.display());

        Ok(CheckoutOutcome {
            installed_path,
            record,
            warnings,
        })
    }

    /// Shallow single-branch fetch of exactly one ref into the scratch
    /// directory. `--branch` accepts tag names as well.
    async fn stage(
        &self,
        url: &str,
        ref_name: &str,
        scratch: &Path,
    ) -> Result<(), brokkr_core::error::CommandError> {
        let scratch_str = scratch.to_string_lossy();
        self.runner
            .run(
                "git",
                &[
                    "clone",
                    "--depth",
                    "1",
                    "--branch",
                    ref_name,
                    "--single-branch",
                    url,
                    scratch_str.as_ref(),
                ],
                None,
            )
            .await?;
        Ok(())
    }

    /// Best-effort ownership fix-up to the identity this process runs as.
    /// Content correctness does not depend on ownership bits, so failures
    /// degrade to a warning.
    async fn fix_ownership(&self, path: &Path) -> Option<Warning> {
        let user = match self.runner.run("whoami", &[], None).await {
            Ok(user) if !user.is_empty() => user,
            Ok(_) => {
                return Some(Warning::OwnershipUnchanged {
                    path: path.to_path_buf(),
                    message: "could not determine the current user".to_string(),
                })
            }
            Err(e) => {
                return Some(Warning::OwnershipUnchanged {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        let owner = format!("{user}:{user}");
        let path_str = path.to_string_lossy();
        match self
            .runner
            .run("chown", &["-R", &owner, path_str.as_ref()], None)
            .await
        {
            Ok(_) => None,
            Err(e) => Some(Warning::OwnershipUnchanged {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }
}

/// Remove a directory tree, swallowing errors; used on failure paths where
/// the triggering error is the one worth reporting
fn discard(path: &Path) {
    if !path.exists() {
        return;
    }
    debug!("cleaning up {}", path.display());
    if let Err(e) = fs::remove_dir_all(path) {
        warn!("could not clean up {}: {}", path.display(), e);
    }
}
