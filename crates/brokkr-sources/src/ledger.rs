//! Installation ledger
//!
//! Durable record of which refs have been checked out, where, and when.
//! Events are appended to a JSONL file under an exclusive file lock; the
//! set of live checkouts is derived by replaying the log.

use brokkr_core::error::LedgerError;
use brokkr_core::types::{InstalledCheckout, RemoveOutcome};
use brokkr_core::utils::brokkr_home;
use chrono::{DateTime, Utc};
use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Ledger file name under the Brokkr home directory
const LEDGER_FILE: &str = "checkout_ledger.jsonl";

/// Checkout lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A checkout was fully published and is now tracked
    CheckoutRecorded { checkout: InstalledCheckout },

    /// A checkout's record was removed (its directory may or may not have
    /// existed at that point)
    CheckoutRemoved { installed_path: PathBuf },
}

/// Event metadata envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID (UUID v4)
    pub event_id: String,

    /// Event timestamp (UTC)
    pub timestamp: DateTime<Utc>,

    /// The actual event payload
    pub event: LedgerEvent,
}

impl EventEnvelope {
    pub fn new(event: LedgerEvent) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Append-only checkout ledger
pub struct CheckoutLedger {
    ledger_path: PathBuf,
}

impl CheckoutLedger {
    /// Create/load the ledger from its default location
    /// (`~/.brokkr/checkout_ledger.jsonl`, honoring `BROKKR_HOME`)
    pub fn load_default() -> Result<Self, LedgerError> {
        let base = brokkr_home().map_err(|e| LedgerError::Location {
            message: e.to_string(),
        })?;
        fs::create_dir_all(&base).map_err(|e| LedgerError::Io {
            path: base.clone(),
            source: e,
        })?;

        Ok(Self {
            ledger_path: base.join(LEDGER_FILE),
        })
    }

    /// Create a ledger at a custom path
    pub fn new(ledger_path: PathBuf) -> Self {
        Self { ledger_path }
    }

    pub fn path(&self) -> &Path {
        &self.ledger_path
    }

    /// Append an event (atomic, file-locked)
    pub fn append(&self, envelope: EventEnvelope) -> Result<(), LedgerError> {
        if let Some(parent) = self.ledger_path.parent() {
            fs::create_dir_all(parent).map_err(|e| LedgerError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.ledger_path)
            .map_err(|e| self.io_error(e))?;

        // Exclusive lock, released when `file` drops
        file.lock_exclusive().map_err(|e| self.io_error(e))?;

        let json_line = serde_json::to_string(&envelope)?;
        writeln!(file, "{}", json_line).map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))?;

        Ok(())
    }

    /// Record a freshly published checkout
    pub fn append_recorded(&self, checkout: &InstalledCheckout) -> Result<(), LedgerError> {
        self.append(EventEnvelope::new(LedgerEvent::CheckoutRecorded {
            checkout: checkout.clone(),
        }))
    }

    /// Remove an installed checkout.
    ///
    /// Idempotent with respect to a missing directory: if the path is gone
    /// from disk only the record is removed and the outcome says so. A
    /// directory-deletion failure propagates and the record is kept, so a
    /// partially deleted tree stays tracked.
    pub fn remove(&self, checkout: &InstalledCheckout) -> Result<RemoveOutcome, LedgerError> {
        let path = checkout.installed_path.clone();

        if !path.exists() {
            self.append_removed(&path)?;
            return Ok(RemoveOutcome::RecordOnly { path });
        }

        fs::remove_dir_all(&path).map_err(|e| LedgerError::DirectoryDelete {
            path: path.clone(),
            source: e,
        })?;

        self.append_removed(&path)?;
        Ok(RemoveOutcome::Deleted { path })
    }

    /// Drop the records of every checkout belonging to a source.
    ///
    /// Cascade used when a repository source is deleted: records only, the
    /// on-disk directories are never touched here.
    pub fn remove_for_source(&self, source_name: &str) -> Result<usize, LedgerError> {
        let doomed: Vec<InstalledCheckout> = self
            .live_records()?
            .into_iter()
            .filter(|r| r.source_name == source_name)
            .collect();

        for record in &doomed {
            self.append_removed(&record.installed_path)?;
        }

        Ok(doomed.len())
    }

    /// All currently live checkouts, in recording order
    pub fn live_records(&self) -> Result<Vec<InstalledCheckout>, LedgerError> {
        let mut live: Vec<InstalledCheckout> = Vec::new();

        for envelope in self.read_events()? {
            match envelope.event {
                LedgerEvent::CheckoutRecorded { checkout } => {
                    // A later record for the same path supersedes the earlier
                    // one; no two live records may share a path
                    live.retain(|r| r.installed_path != checkout.installed_path);
                    live.push(checkout);
                }
                LedgerEvent::CheckoutRemoved { installed_path } => {
                    live.retain(|r| r.installed_path != installed_path);
                }
            }
        }

        Ok(live)
    }

    /// Find the live record published at a given path
    pub fn find_by_path(&self, path: &Path) -> Result<Option<InstalledCheckout>, LedgerError> {
        Ok(self
            .live_records()?
            .into_iter()
            .find(|r| r.installed_path == path))
    }

    /// Whether any live record occupies the given path
    pub fn is_path_live(&self, path: &Path) -> Result<bool, LedgerError> {
        Ok(self.find_by_path(path)?.is_some())
    }

    fn append_removed(&self, path: &Path) -> Result<(), LedgerError> {
        self.append(EventEnvelope::new(LedgerEvent::CheckoutRemoved {
            installed_path: path.to_path_buf(),
        }))
    }

    fn read_events(&self) -> Result<Vec<EventEnvelope>, LedgerError> {
        if !self.ledger_path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.ledger_path).map_err(|e| self.io_error(e))?;
        let reader = BufReader::new(file);

        let mut events = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim().is_empty() {
                continue;
            }
            let envelope: EventEnvelope = serde_json::from_str(&line)?;
            events.push(envelope);
        }

        Ok(events)
    }

    fn io_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.ledger_path.clone(),
            source,
        }
    }
}
