//! # Dataset
//!
//! An in-memory table with one row per item. Each row has a display name,
//! used when reporting offending pairs, and each named column maps rows to
//! an optional nominal label (`None` is a missing value).
//!
//! ## Example
//!
//! ```rust
//! use groupalg::dataset::Dataset;
//!
//! let dataset = Dataset::new(vec!["Ada".to_string(), "Alan".to_string()])
//!     .with_column("Projet1", vec![Some("P1".to_string()), None])
//!     .unwrap();
//!
//! assert_eq!(dataset.len(), 2);
//! assert!(dataset.require_columns(&["Projet1"]).is_ok());
//! assert!(dataset.require_columns(&["Projet2"]).is_err());
//! ```

use std::cmp::Ordering;

use crate::error::{GroupingError, Result};

/// One named column of nominal labels.
#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    values: Vec<Option<String>>,
}

/// Table of N items with named nominal columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    row_names: Vec<String>,
    columns: Vec<Column>,
}

impl Dataset {
    /// Creates a dataset with one row per name and no column.
    pub fn new(row_names: Vec<String>) -> Self {
        Self {
            row_names,
            columns: Vec::new(),
        }
    }

    /// Adds a column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column does not have one value per row or if
    /// a column with the same name already exists.
    pub fn with_column<S: Into<String>>(
        mut self,
        name: S,
        values: Vec<Option<String>>,
    ) -> Result<Self> {
        let name = name.into();
        if values.len() != self.len() {
            return Err(GroupingError::DimensionMismatch {
                what: format!("column `{}`", name),
                expected: self.len(),
                found: values.len(),
            });
        }
        if self.columns.iter().any(|column| column.name == name) {
            return Err(GroupingError::Configuration(format!(
                "Column `{}` is already defined",
                name
            )));
        }
        self.columns.push(Column { name, values });
        Ok(self)
    }

    /// Adds a column with no missing value.
    pub fn with_labels<S, L>(self, name: S, labels: &[L]) -> Result<Self>
    where
        S: Into<String>,
        L: AsRef<str>,
    {
        let values = labels
            .iter()
            .map(|label| Some(label.as_ref().to_string()))
            .collect();
        self.with_column(name, values)
    }

    pub fn len(&self) -> usize {
        self.row_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_names.is_empty()
    }

    pub fn row_names(&self) -> &[String] {
        &self.row_names
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    /// Values of the column called `name`.
    pub fn column(&self, name: &str) -> Result<&[Option<String>]> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .map(|column| column.values.as_slice())
            .ok_or_else(|| GroupingError::MissingColumns {
                missing: vec![name.to_string()],
                available: self.column_names(),
            })
    }

    /// Checks that every name refers to an existing column.
    ///
    /// All missing names are reported together.
    pub fn require_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        let mut missing: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if self.columns.iter().all(|column| column.name != name)
                && !missing.iter().any(|m| m == name)
            {
                missing.push(name.to_string());
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(GroupingError::MissingColumns {
                missing,
                available: self.column_names(),
            })
        }
    }

    /// Sub-table made of `rows`, in that order.
    ///
    /// # Panics
    ///
    /// Panics if a row index is out of range.
    pub fn select_rows(&self, rows: &[usize]) -> Dataset {
        Dataset {
            row_names: rows.iter().map(|&row| self.row_names[row].clone()).collect(),
            columns: self
                .columns
                .iter()
                .map(|column| Column {
                    name: column.name.clone(),
                    values: rows.iter().map(|&row| column.values[row].clone()).collect(),
                })
                .collect(),
        }
    }

    /// Row indices sorted by the given columns, in priority order.
    ///
    /// The sort is stable; missing values come after every label.
    pub fn sort_order<S: AsRef<str>>(&self, columns: &[S]) -> Result<Vec<usize>> {
        self.require_columns(columns)?;
        let keys = columns
            .iter()
            .map(|name| self.column(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| {
            keys.iter()
                .map(|values| compare_missing_last(&values[a], &values[b]))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        Ok(order)
    }
}

fn compare_missing_last(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
