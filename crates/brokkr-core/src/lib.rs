//! # brokkr-core
//!
//! Core library for the Brokkr CLI providing:
//! - Shared types for repository sources, refs, and installed checkouts
//! - The error taxonomy used across the workspace
//! - Eager validation of operator-supplied input (URLs, paths, ref names)

pub mod error;
pub mod types;
pub mod utils;
pub mod validate;

pub use error::{CheckoutError, CommandError, LedgerError, ListError, ValidationError};
pub use utils::{brokkr_home, get_home_dir};
