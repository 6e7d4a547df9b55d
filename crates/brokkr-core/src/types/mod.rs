//! Shared type definitions for Brokkr crates

mod checkout_types;
mod source_types;

pub use checkout_types::{
    CheckoutOutcome, InstalledCheckout, RemoveOutcome, ValidateSummary, Warning,
};
pub use source_types::{
    format_catalog, parse_catalog, sort_catalog, HostKind, RefDescriptor, RefKind,
    RepositorySource, SyncState,
};
