//! Common utilities shared by every Flexform crate
//!
//! This crate carries the small pieces of infrastructure the rest of the
//! workspace agrees on:
//!
//! - **Severity**: a uniform way for domain errors to report their impact
//! - **Logging**: the [`Pretty`] wrapper for structured values in log lines
//! - **Naming**: slug-style machine names derived from human labels
//! - **Stable JSON**: deterministic, key-sorted JSON used as an identity

pub mod error;
pub mod json;
pub mod logging;
pub mod naming;

pub use error::{ErrorSeverity, Severity};
pub use json::{sort_keys, stable_json};
pub use logging::Pretty;
pub use naming::{is_identifier, machine_name};
