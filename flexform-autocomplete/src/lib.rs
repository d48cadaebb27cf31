//! Autocomplete field types for Flexform
//!
//! Autocomplete fields store the option a user picked from a remote search,
//! not just its key. This crate provides the option model, the URL-backed
//! search source and the field types that use them.
//!
//! # Architecture
//!
//! - **Self-describing ids**: an [`AutocompleteOption`]'s encoded id is
//!   the stable JSON of `{extra, id, text}`, so a stored selection redraws without a network call
//! - **Async sources**: searches go through the [`AutocompleteSource`] trait;
//!   [`UrlSource`] renders a Liquid URL template and fetches with `reqwest`
//! - **Two paging modes**: endpoints whose URL template mentions `page` or
//!   `per_page` page themselves; all others are filtered and paged locally

pub mod error;
pub mod mapping;
pub mod option;
pub mod settings;
pub mod source;
pub mod types;

pub use error::{AutocompleteError, Result};
pub use mapping::ResultMapping;
pub use option::{extract_selection, selected_options, widget_value, AutocompleteOption};
pub use settings::AutocompleteSettings;
pub use source::{AutocompleteSource, SearchPage, SearchQuery, UrlSource};
pub use types::{base_autocomplete_type, register_autocomplete_types, source_for_field};
