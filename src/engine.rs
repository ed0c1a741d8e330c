//! # Grouping engine
//!
//! Ties the pieces together: orders the rows of a [`Dataset`], lays a
//! baseline partition over them, optimizes it against the requested
//! constraint columns and explains the result.
//!
//! ## Example
//!
//! ```rust
//! use groupalg::dataset::Dataset;
//! use groupalg::engine::{build_groups, GroupingRequest};
//! use groupalg::partition::Distribution;
//! use groupalg::rng::RandomNumberGenerator;
//!
//! let names: Vec<String> = (0..8).map(|i| format!("student{}", i)).collect();
//! let dataset = Dataset::new(names)
//!     .with_labels("Projet1", &["g1", "g1", "g2", "g2", "g3", "g3", "g4", "g4"])
//!     .unwrap();
//!
//! let request = GroupingRequest::new(Distribution::GroupSize(2)).with_repulsion(["Projet1"]);
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let outcome = build_groups(&dataset, &request, &mut rng).unwrap();
//!
//! assert!(outcome.is_optimal);
//! assert!(outcome.report.is_satisfied());
//! ```

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::{
    constraints::build_cost_data,
    dataset::Dataset,
    error::{GroupingError, Result},
    evolution::{optimize, OptimizerOptions},
    partition::{make_partition, Distribution, Partition},
    report::{explain, Report},
    rng::RandomNumberGenerator,
};

/// Order in which rows receive the contiguous blocks of the baseline
/// partition.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// Random order drawn from the injected generator.
    #[default]
    Shuffled,
    /// Dataset order.
    AsGiven,
    /// Sorted by these columns, in priority order.
    SortedBy(Vec<String>),
}

/// What to build and under which constraints.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingRequest {
    pub distribution: Distribution,
    pub repulsion_columns: Vec<String>,
    pub affinity_columns: Vec<String>,
    pub row_order: RowOrder,
    pub options: OptimizerOptions,
}

impl GroupingRequest {
    /// A request without constraints, shuffled rows and default optimizer
    /// options.
    pub fn new(distribution: Distribution) -> Self {
        Self {
            distribution,
            repulsion_columns: Vec::new(),
            affinity_columns: Vec::new(),
            row_order: RowOrder::default(),
            options: OptimizerOptions::default(),
        }
    }

    pub fn with_repulsion<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repulsion_columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_affinity<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affinity_columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_row_order(mut self, row_order: RowOrder) -> Self {
        self.row_order = row_order;
        self
    }

    pub fn with_options(mut self, options: OptimizerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn has_constraints(&self) -> bool {
        !self.repulsion_columns.is_empty() || !self.affinity_columns.is_empty()
    }

    /// Every column this request reads.
    fn referenced_columns(&self) -> Vec<&str> {
        let sort_keys: &[String] = match &self.row_order {
            RowOrder::SortedBy(columns) => columns,
            _ => &[],
        };
        self.repulsion_columns
            .iter()
            .chain(&self.affinity_columns)
            .chain(sort_keys)
            .map(String::as_str)
            .collect()
    }

    fn validate(&self, dataset: &Dataset) -> Result<()> {
        dataset.require_columns(&self.referenced_columns())?;

        if self.has_constraints() {
            if self.row_order != RowOrder::Shuffled {
                return Err(GroupingError::Configuration(
                    "An ordered grouping cannot be combined with repulsion or affinity constraints"
                        .to_string(),
                ));
            }
            self.options.validate()?;
        }
        Ok(())
    }
}

/// Result of [`build_groups`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingOutcome {
    /// Group of each dataset row, in dataset row order.
    pub partition: Partition,
    pub attempts: usize,
    pub score: i64,
    pub minimal_cost: i64,
    pub is_optimal: bool,
    pub report: Report,
}

/// Partitions the rows of `dataset` as described by `request`.
///
/// # Errors
///
/// Fails before any work on:
/// - a column (constraint or sort key) missing from `dataset`
/// - a non-shuffled row order together with constraints
/// - invalid optimizer options
/// - a distribution that cannot be applied to the dataset (no rows, no group)
///
/// Not reaching the optimum is not an error: the outcome then has
/// `is_optimal == false` and its report lists the remaining violations.
pub fn build_groups(
    dataset: &Dataset,
    request: &GroupingRequest,
    rng: &mut RandomNumberGenerator,
) -> Result<GroupingOutcome> {
    request.validate(dataset)?;

    let order = match &request.row_order {
        RowOrder::Shuffled => rng.permutation(dataset.len()),
        RowOrder::AsGiven => (0..dataset.len()).collect(),
        RowOrder::SortedBy(columns) => dataset.sort_order(columns)?,
    };

    let baseline = make_partition(dataset.len(), &request.distribution)?.scatter(&order);

    if !request.has_constraints() {
        tracing::info!(
            items = dataset.len(),
            groups = baseline.num_groups(),
            "No constraint given, keeping the initial grouping"
        );
        return Ok(GroupingOutcome {
            partition: baseline,
            attempts: 0,
            score: 0,
            minimal_cost: 0,
            is_optimal: true,
            report: Report::default(),
        });
    }

    let cost_data = build_cost_data(
        dataset,
        &request.repulsion_columns,
        &request.affinity_columns,
    )?;
    let result = optimize(baseline, &cost_data, &request.options, rng)?;
    let report = explain(&result.partition, &cost_data, dataset.row_names())?;

    if result.is_optimal {
        tracing::info!(attempts = result.attempts, "Optimal grouping found");
    } else {
        tracing::warn!(
            attempts = result.attempts,
            score = result.score,
            minimal_cost = cost_data.minimal_cost(),
            "No optimal grouping found"
        );
        report.log();
    }

    Ok(GroupingOutcome {
        partition: result.partition,
        attempts: result.attempts,
        score: result.score,
        minimal_cost: cost_data.minimal_cost(),
        is_optimal: result.is_optimal,
        report,
    })
}

/// Outcome of one subgroup of [`build_groups_by`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SubgroupOutcome {
    /// Shared value of the grouping column.
    pub key: String,
    /// Dataset rows of the subgroup; `outcome.partition` is indexed like it.
    pub rows: Vec<usize>,
    pub outcome: GroupingOutcome,
}

/// Splits `dataset` by the value of `grouping_column` and runs
/// [`build_groups`] on each part independently.
///
/// Rows without a grouping value are left out. Subgroups come back sorted by
/// key. Each one draws from its own generator, seeded from `rng` before any
/// subgroup starts, so the result only depends on the seed even though the
/// subgroups are solved in parallel.
///
/// # Errors
///
/// Fails if `grouping_column` or a column of `request` is missing, if the
/// request itself is invalid, if no row has a grouping value, or if any
/// subgroup fails.
pub fn build_groups_by(
    dataset: &Dataset,
    grouping_column: &str,
    request: &GroupingRequest,
    rng: &mut RandomNumberGenerator,
) -> Result<Vec<SubgroupOutcome>> {
    let mut required = request.referenced_columns();
    required.push(grouping_column);
    dataset.require_columns(&required)?;
    request.validate(dataset)?;

    let mut subgroups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (row, value) in dataset.column(grouping_column)?.iter().enumerate() {
        if let Some(value) = value {
            subgroups.entry(value.as_str()).or_default().push(row);
        }
    }

    if subgroups.is_empty() {
        return Err(GroupingError::Configuration(format!(
            "No row has a value in grouping column `{}`",
            grouping_column
        )));
    }

    let kept: usize = subgroups.values().map(Vec::len).sum();
    if kept < dataset.len() {
        tracing::warn!(
            column = grouping_column,
            skipped = dataset.len() - kept,
            "Rows without a grouping value are left out"
        );
    }

    let jobs: Vec<(String, Vec<usize>, RandomNumberGenerator)> = subgroups
        .into_iter()
        .map(|(key, rows)| (key.to_string(), rows, rng.fork()))
        .collect();

    jobs.into_par_iter()
        .map(|(key, rows, mut rng)| -> Result<SubgroupOutcome> {
            let _span = tracing::info_span!("subgroup", key = %key).entered();
            let outcome = build_groups(&dataset.select_rows(&rows), request, &mut rng)?;
            Ok(SubgroupOutcome { key, rows, outcome })
        })
        .collect()
}
