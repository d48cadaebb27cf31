//! Sandboxed expression evaluation for Flexform
//!
//! Field modifiers are small expressions evaluated against the values a user
//! has entered so far. This crate evaluates them with the Common Expression
//! Language, restricted to a fixed allow-list of pure functions.
//!
//! # Architecture
//!
//! - **Pure**: an evaluation can only read the names it is given and return a
//!   value; there is no assignment, no loops, no I/O
//! - **Allow-listed calls**: every function a program calls is checked against
//!   the evaluator's allow-list before execution
//! - **JSON at the boundary**: callers pass and receive `serde_json::Value`
//! - **Explicit skip**: [`Evaluator::resolve`] reports an undefined name as
//!   [`Resolution::Unresolved`] instead of an error
//!
//! # Example
//!
//! ```rust
//! use flexform_expr::{Evaluator, Names};
//! use serde_json::json;
//!
//! let evaluator = Evaluator::new();
//! let mut names = Names::new();
//! names.insert("toppings".into(), json!([]));
//!
//! let hidden = evaluator.evaluate("empty(toppings)", &names).unwrap();
//! assert_eq!(hidden, json!(true));
//! ```

pub mod convert;
pub mod error;
pub mod evaluator;
pub mod functions;

pub use convert::{cel_value_to_json, json_to_cel_value};
pub use error::{ExprError, Result};
pub use evaluator::{Evaluator, EvaluatorBuilder, ExpressionLimits, Resolution};
pub use functions::{is_empty, CustomFunction, BUILTIN_FUNCTIONS};

/// Names visible to an expression, keyed by field machine name.
pub type Names = std::collections::BTreeMap<String, serde_json::Value>;
