//! # Constraints Module
//!
//! This module turns constraint columns of a [`Dataset`] into the matrices the
//! optimizer and the reporter work with.
//!
//! ## Overview
//!
//! Two kinds of pairwise constraints are supported, each defined by a column
//! of nominal labels:
//!
//! - **Repulsion**: items sharing a label (e.g. the same previous project
//!   team) should *not* be grouped together again. Missing labels never match
//!   anything.
//! - **Affinity**: items sharing a label should be grouped together. Missing
//!   labels all match each other.
//!
//! Each column yields a 0/1 co-occurrence matrix. The combined cost matrix is
//! `Σ repulsion − Σ affinity`, shifted so its minimum is zero. Scoring a
//! partition sums the cost entries over every pair in the same group,
//! including each item with itself, so a perfect partition scores exactly
//! [`CostData::minimal_cost`].
//!
//! ## Example
//!
//! ```rust
//! use groupalg::constraints::build_cost_data;
//! use groupalg::dataset::Dataset;
//!
//! let names: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
//! let dataset = Dataset::new(names)
//!     .with_labels("Projet1", &["p1", "p1", "p2", "p2"])
//!     .unwrap();
//!
//! let cost_data = build_cost_data(&dataset, &["Projet1"], &[]).unwrap();
//!
//! assert_eq!(cost_data.minimal_cost(), 4);
//! assert_eq!(cost_data.cost_matrix()[[0, 1]], 1);
//! assert_eq!(cost_data.cost_matrix()[[0, 2]], 0);
//! ```

use ndarray::Array2;

use crate::dataset::Dataset;
use crate::error::{GroupingError, Result};

pub mod cooccurrence;

pub use cooccurrence::{cooccurrence_matrix, MissingPolicy};

/// Whether a constraint column pushes items apart or together.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Repulsion,
    Affinity,
}

impl ConstraintKind {
    /// How missing labels are compared for this kind of constraint.
    pub fn missing_policy(&self) -> MissingPolicy {
        match self {
            ConstraintKind::Repulsion => MissingPolicy::Different,
            ConstraintKind::Affinity => MissingPolicy::Same,
        }
    }
}

/// Co-occurrence matrix of one constraint column.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintMatrix {
    column: String,
    kind: ConstraintKind,
    matrix: Array2<i64>,
}

impl ConstraintMatrix {
    /// Builds the matrix of `column` using the missing-value policy of `kind`.
    pub fn from_column<S: Into<String>>(
        column: S,
        kind: ConstraintKind,
        values: &[Option<String>],
    ) -> Self {
        Self {
            column: column.into(),
            kind,
            matrix: cooccurrence_matrix(values, kind.missing_policy()),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    pub fn matrix(&self) -> &Array2<i64> {
        &self.matrix
    }
}

/// Everything the optimizer and the reporter need about the constraints of
/// one population.
#[derive(Debug, Clone, PartialEq)]
pub struct CostData {
    cost_matrix: Array2<i64>,
    minimal_cost: i64,
    repulsion: Vec<ConstraintMatrix>,
    affinity: Vec<ConstraintMatrix>,
}

impl CostData {
    /// Combines per-column matrices into the shifted cost matrix.
    ///
    /// `size` is the number of items.
    ///
    /// # Errors
    ///
    /// Returns a dimension error naming the first column whose matrix is
    /// not `size × size`.
    pub fn from_matrices(
        size: usize,
        repulsion: Vec<ConstraintMatrix>,
        affinity: Vec<ConstraintMatrix>,
    ) -> Result<Self> {
        if let Some(constraint) = repulsion
            .iter()
            .chain(&affinity)
            .find(|constraint| constraint.matrix().dim() != (size, size))
        {
            let (rows, cols) = constraint.matrix().dim();
            return Err(GroupingError::DimensionMismatch {
                what: format!("constraint matrix of column `{}`", constraint.column()),
                expected: size,
                found: if rows != size { rows } else { cols },
            });
        }

        let mut raw_cost = Array2::<i64>::zeros((size, size));
        for constraint in &repulsion {
            raw_cost += constraint.matrix();
        }
        for constraint in &affinity {
            raw_cost -= constraint.matrix();
        }

        let minimum = raw_cost.iter().copied().min().unwrap_or(0);
        let cost_matrix = raw_cost - minimum;

        let minimal_cost =
            size as i64 * (repulsion.len() as i64 - affinity.len() as i64 - minimum);

        Ok(Self {
            cost_matrix,
            minimal_cost,
            repulsion,
            affinity,
        })
    }

    /// Non-negative cost of placing each pair in the same group.
    pub fn cost_matrix(&self) -> &Array2<i64> {
        &self.cost_matrix
    }

    /// Score of a partition satisfying every constraint.
    pub fn minimal_cost(&self) -> i64 {
        self.minimal_cost
    }

    pub fn repulsion(&self) -> &[ConstraintMatrix] {
        &self.repulsion
    }

    pub fn affinity(&self) -> &[ConstraintMatrix] {
        &self.affinity
    }

    /// Number of items the matrices cover.
    pub fn size(&self) -> usize {
        self.cost_matrix.nrows()
    }

    pub fn has_constraints(&self) -> bool {
        !self.repulsion.is_empty() || !self.affinity.is_empty()
    }
}

/// Builds the cost data of `dataset` for the given constraint columns.
///
/// # Errors
///
/// Returns [`GroupingError::MissingColumns`](crate::error::GroupingError::MissingColumns)
/// naming every absent column before any matrix is computed.
pub fn build_cost_data<S: AsRef<str>>(
    dataset: &Dataset,
    repulsion_columns: &[S],
    affinity_columns: &[S],
) -> Result<CostData> {
    let all_columns: Vec<&str> = repulsion_columns
        .iter()
        .chain(affinity_columns)
        .map(AsRef::as_ref)
        .collect();
    dataset.require_columns(&all_columns)?;

    let matrices = |columns: &[S], kind: ConstraintKind| -> Result<Vec<ConstraintMatrix>> {
        columns
            .iter()
            .map(|name| {
                let values = dataset.column(name.as_ref())?;
                Ok(ConstraintMatrix::from_column(name.as_ref(), kind, values))
            })
            .collect()
    };

    let repulsion = matrices(repulsion_columns, ConstraintKind::Repulsion)?;
    let affinity = matrices(affinity_columns, ConstraintKind::Affinity)?;

    tracing::debug!(
        items = dataset.len(),
        repulsion = repulsion.len(),
        affinity = affinity.len(),
        "Built constraint matrices"
    );

    CostData::from_matrices(dataset.len(), repulsion, affinity)
}
