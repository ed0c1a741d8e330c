//! # Error Types
//!
//! This module defines the error type shared by every stage of the grouping
//! pipeline. All variants describe problems with the *input*: they are raised
//! synchronously, before any randomized search begins. An optimizer that
//! runs out of budget is not an error; it reports `is_optimal = false`
//! instead.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use groupalg::error::{GroupingError, Result};
//!
//! fn check_budget(max_variants: usize) -> Result<()> {
//!     if max_variants == 0 {
//!         return Err(GroupingError::Configuration(
//!             "Budget must be positive".to_string(),
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_budget(10).is_ok());
//! assert!(check_budget(0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use groupalg::error::{GroupingError, OptionExt};
//!
//! fn best_score(scores: &[i64]) -> groupalg::error::Result<i64> {
//!     scores.iter().min().cloned().ok_or_else_grouping(||
//!         GroupingError::EmptyPopulation
//!     )
//! }
//!
//! assert_eq!(best_score(&[3, 1, 2]).unwrap(), 1);
//! assert!(best_score(&[]).is_err());
//! ```

use thiserror::Error;

/// Represents errors that can occur while building groups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupingError {
    /// The caller's input is contradictory or incomplete.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// One or more named columns are absent from the dataset.
    #[error(
        "Missing column(s) {}; available columns: {}",
        quote_list(.missing),
        quote_list(.available)
    )]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    /// A vector or matrix does not have the number of items it should.
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    /// Selection was asked to operate on an empty candidate pool.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,
}

fn quote_list(names: &[String]) -> String {
    if names.is_empty() {
        return "(none)".to_string();
    }
    names
        .iter()
        .map(|name| format!("`{}`", name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A specialized Result type for grouping operations.
pub type Result<T> = std::result::Result<T, GroupingError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GroupingError>` using
    /// a closure to generate the error.
    fn ok_or_else_grouping<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GroupingError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_grouping<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GroupingError,
    {
        self.ok_or_else(err_fn)
    }
}
