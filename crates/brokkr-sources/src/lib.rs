//! Repository synchronization and versioned-checkout engine
//!
//! This crate handles:
//! - Subprocess execution with timeouts (git and friends)
//! - Remote ref discovery and catalog normalization
//! - Catalog synchronization onto repository source records
//! - Staged, crash-consistent checkouts with rollback
//! - The durable installation ledger
//! - Host-bridge interfaces for post-checkout reload/restart

pub mod catalog;
pub mod checkout;
pub mod command;
pub mod host;
pub mod ledger;
pub mod refs;

pub use catalog::validate;
pub use checkout::CheckoutEngine;
pub use command::CommandRunner;
pub use host::{run_post_checkout, HostBridge};
pub use ledger::{CheckoutLedger, EventEnvelope, LedgerEvent};
pub use refs::{list_refs, RefListing};
