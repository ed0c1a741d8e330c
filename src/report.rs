//! # Violation report
//!
//! Explains, constraint by constraint, how well a final partition honors the
//! repulsion and affinity columns it was optimized against. The report is
//! meant for the operator: when the search could not reach the optimum it
//! lists every offending pair by name so they can be fixed by hand.
//!
//! ## Example
//!
//! ```rust
//! use groupalg::constraints::build_cost_data;
//! use groupalg::dataset::Dataset;
//! use groupalg::partition::Partition;
//! use groupalg::report::explain;
//!
//! let names: Vec<String> = ["Ada", "Alan", "Grace", "Edsger"].iter().map(|s| s.to_string()).collect();
//! let dataset = Dataset::new(names)
//!     .with_labels("Projet1", &["p1", "p1", "p2", "p2"])
//!     .unwrap();
//! let cost_data = build_cost_data(&dataset, &["Projet1"], &[]).unwrap();
//!
//! let partition = Partition::new(vec![0, 0, 1, 1], 2).unwrap();
//! let report = explain(&partition, &cost_data, dataset.row_names()).unwrap();
//!
//! assert_eq!(report.total_violations(), 2);
//! assert!(report.to_string().contains("Ada -- Alan"));
//! ```

use std::fmt;

use ndarray::Array2;

use crate::{
    constraints::{ConstraintKind, ConstraintMatrix, CostData},
    error::{GroupingError, Result},
    partition::Partition,
};

/// Two items, `first < second`, that break a constraint.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolatedPair {
    pub first: usize,
    pub second: usize,
    pub first_name: String,
    pub second_name: String,
}

/// Outcome of one constraint column.
///
/// For a repulsion column a violation is a pair sharing a label inside one
/// group. For an affinity column it is a pair sharing a label across two
/// groups; affinity columns also list the *mixed* pairs, grouped together
/// although their labels differ, which is what the cost penalizes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintReport {
    column: String,
    kind: ConstraintKind,
    violation_count: usize,
    pairs: Vec<ViolatedPair>,
    mixed_count: usize,
    mixed_pairs: Vec<ViolatedPair>,
}

impl ConstraintReport {
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// Number of unordered pairs breaking this constraint.
    pub fn violation_count(&self) -> usize {
        self.violation_count
    }

    /// The offending pairs, ordered by first then second item.
    pub fn pairs(&self) -> &[ViolatedPair] {
        &self.pairs
    }

    /// Number of unordered pairs grouped together with different affinity
    /// labels. Always 0 for a repulsion column.
    pub fn mixed_count(&self) -> usize {
        self.mixed_count
    }

    pub fn mixed_pairs(&self) -> &[ViolatedPair] {
        &self.mixed_pairs
    }

    pub fn is_satisfied(&self) -> bool {
        self.violation_count == 0 && self.mixed_count == 0
    }

    /// One headline per non-empty pair list, or a single `satisfied` line.
    fn sections(&self) -> Vec<(String, &[ViolatedPair])> {
        let kind = match self.kind {
            ConstraintKind::Repulsion => "Repulsion",
            ConstraintKind::Affinity => "Affinity",
        };
        if self.is_satisfied() {
            let no_pairs: &[ViolatedPair] = &[];
            return vec![(
                format!("{} constraint on column `{}` satisfied", kind, self.column),
                no_pairs,
            )];
        }

        let mut sections = Vec::new();
        if self.violation_count > 0 {
            sections.push((
                format!(
                    "{} constraint on column `{}` violated {} time(s)",
                    kind, self.column, self.violation_count
                ),
                self.pairs.as_slice(),
            ));
        }
        if self.mixed_count > 0 {
            sections.push((
                format!(
                    "{} constraint on column `{}` groups {} pair(s) with different labels",
                    kind, self.column, self.mixed_count
                ),
                self.mixed_pairs.as_slice(),
            ));
        }
        sections
    }
}

/// Per-constraint account of a partition.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    constraints: Vec<ConstraintReport>,
}

impl Report {
    /// Repulsion constraints first, then affinity constraints, each in the
    /// order their columns were given.
    pub fn constraints(&self) -> &[ConstraintReport] {
        &self.constraints
    }

    pub fn is_satisfied(&self) -> bool {
        self.constraints.iter().all(ConstraintReport::is_satisfied)
    }

    /// Violated and mixed pairs over every constraint.
    pub fn total_violations(&self) -> usize {
        self.constraints
            .iter()
            .map(|c| c.violation_count + c.mixed_count)
            .sum()
    }

    pub fn violated(&self) -> impl Iterator<Item = &ConstraintReport> {
        self.constraints.iter().filter(|c| !c.is_satisfied())
    }

    /// Emits the report through `tracing`: satisfied constraints at `info`,
    /// violated constraints and their pairs at `warn`.
    pub fn log(&self) {
        for constraint in &self.constraints {
            for (headline, pairs) in constraint.sections() {
                if constraint.is_satisfied() {
                    tracing::info!("- {}", headline);
                    continue;
                }
                tracing::warn!("- {}:", headline);
                for pair in pairs {
                    tracing::warn!("  - {} -- {}", pair.first_name, pair.second_name);
                }
            }
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for constraint in &self.constraints {
            for (headline, pairs) in constraint.sections() {
                if pairs.is_empty() {
                    writeln!(f, "- {}", headline)?;
                    continue;
                }
                writeln!(f, "- {}:", headline)?;
                for pair in pairs {
                    writeln!(f, "  - {} -- {}", pair.first_name, pair.second_name)?;
                }
            }
        }
        Ok(())
    }
}

fn violated_pairs(violations: &Array2<i64>, row_names: &[String]) -> Vec<ViolatedPair> {
    violations
        .indexed_iter()
        .filter(|&((i, j), &v)| i < j && v > 0)
        .map(|((i, j), _)| ViolatedPair {
            first: i,
            second: j,
            first_name: row_names[i].clone(),
            second_name: row_names[j].clone(),
        })
        .collect()
}

fn explain_constraint(
    constraint: &ConstraintMatrix,
    together: &Array2<i64>,
    row_names: &[String],
) -> ConstraintReport {
    let size = together.nrows() as i64;
    let (violations, count, mixed) = match constraint.kind() {
        ConstraintKind::Repulsion => {
            // grouped together although they share a label; the diagonal is
            // always 1 and is taken out
            let violations = together * constraint.matrix();
            let count = (violations.sum() - size) / 2;
            (violations, count, None)
        }
        ConstraintKind::Affinity => {
            // share a label but were split up
            let violations = &together.mapv(|t| 1 - t) * constraint.matrix();
            let count = violations.sum() / 2;
            // grouped together with different labels; zero on the diagonal
            let mixed = together * &constraint.matrix().mapv(|m| 1 - m);
            (violations, count, Some(mixed))
        }
    };

    let (mixed_count, mixed_pairs) = match mixed {
        Some(mixed) => ((mixed.sum() / 2) as usize, violated_pairs(&mixed, row_names)),
        None => (0, Vec::new()),
    };

    ConstraintReport {
        column: constraint.column().to_string(),
        kind: constraint.kind(),
        violation_count: count.max(0) as usize,
        pairs: violated_pairs(&violations, row_names),
        mixed_count,
        mixed_pairs,
    }
}

/// Builds the report of `partition` against the constraints of `cost_data`.
///
/// `row_names` gives the display name of each item.
///
/// # Errors
///
/// Returns a dimension error if `partition` or `row_names` does not cover
/// exactly the items of `cost_data`.
pub fn explain(
    partition: &Partition,
    cost_data: &CostData,
    row_names: &[String],
) -> Result<Report> {
    let size = cost_data.size();
    if partition.len() != size {
        return Err(GroupingError::DimensionMismatch {
            what: "partition".to_string(),
            expected: size,
            found: partition.len(),
        });
    }
    if row_names.len() != size {
        return Err(GroupingError::DimensionMismatch {
            what: "row names".to_string(),
            expected: size,
            found: row_names.len(),
        });
    }

    let together = partition.cooccurrence();
    let constraints = cost_data
        .repulsion()
        .iter()
        .chain(cost_data.affinity())
        .map(|constraint| explain_constraint(constraint, &together, row_names))
        .collect();

    Ok(Report { constraints })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::build_cost_data;
    use crate::dataset::Dataset;
    use crate::evolution::Challenge;
    use crate::partition::{make_partition, Distribution};
    use crate::rng::RandomNumberGenerator;
    use crate::strategy::mutate;

    fn dataset() -> Dataset {
        let names = ["Ada", "Alan", "Grace", "Edsger", "Barbara", "Donald"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Dataset::new(names)
            .with_labels("Projet1", &["a", "a", "b", "b", "c", "c"])
            .unwrap()
            .with_column(
                "Binome",
                vec![
                    Some("x".to_string()),
                    Some("y".to_string()),
                    Some("x".to_string()),
                    Some("y".to_string()),
                    Some("z".to_string()),
                    Some("w".to_string()),
                ],
            )
            .unwrap()
    }

    #[test]
    fn test_repulsion_violation_then_fix() {
        let dataset = dataset();
        let cost_data = build_cost_data(&dataset, &["Projet1"], &[]).unwrap();

        // Ada and Alan (same project) together
        let bad = Partition::new(vec![0, 0, 1, 2, 1, 2], 3).unwrap();
        let report = explain(&bad, &cost_data, dataset.row_names()).unwrap();
        let constraint = &report.constraints()[0];
        assert_eq!(constraint.violation_count(), 1);
        assert_eq!(constraint.pairs().len(), 1);
        assert_eq!(constraint.pairs()[0].first_name, "Ada");
        assert_eq!(constraint.pairs()[0].second_name, "Alan");

        // Move Alan away: swap with Grace
        let good = Partition::new(vec![0, 1, 0, 2, 1, 2], 3).unwrap();
        let report = explain(&good, &cost_data, dataset.row_names()).unwrap();
        assert!(report.is_satisfied());
        assert_eq!(report.total_violations(), 0);

        // Score drops by the two ordered entries of the separated pair
        let entry = cost_data.cost_matrix()[[0, 1]];
        assert_eq!(cost_data.score(&bad) - cost_data.score(&good), 2 * entry);
    }

    #[test]
    fn test_affinity_violation_then_fix() {
        let dataset = dataset();
        let cost_data = build_cost_data(&dataset, &[], &["Binome"]).unwrap();

        // Ada and Grace share `x` but are split; Alan and Edsger share `y` and are together
        let split = Partition::new(vec![0, 1, 2, 1, 0, 2], 3).unwrap();
        let report = explain(&split, &cost_data, dataset.row_names()).unwrap();
        let constraint = &report.constraints()[0];
        assert_eq!(constraint.kind(), ConstraintKind::Affinity);
        assert_eq!(constraint.violation_count(), 1);
        assert_eq!(constraint.pairs()[0].first, 0);
        assert_eq!(constraint.pairs()[0].second, 2);
        // Ada sits with Barbara (z), Grace with Donald (w)
        assert_eq!(constraint.mixed_count(), 2);
        let mixed: Vec<(usize, usize)> = constraint
            .mixed_pairs()
            .iter()
            .map(|pair| (pair.first, pair.second))
            .collect();
        assert_eq!(mixed, vec![(0, 4), (2, 5)]);
        assert_eq!(
            cost_data.score(&split),
            cost_data.minimal_cost() + 2 * constraint.mixed_count() as i64
        );

        // Reunite Ada and Grace; Barbara and Donald now share a group
        let joined = Partition::new(vec![0, 1, 0, 1, 2, 2], 3).unwrap();
        let report = explain(&joined, &cost_data, dataset.row_names()).unwrap();
        let constraint = &report.constraints()[0];
        assert_eq!(constraint.violation_count(), 0);
        assert_eq!(constraint.mixed_count(), 1);
        assert_eq!(constraint.mixed_pairs()[0].first_name, "Barbara");
        assert_eq!(constraint.mixed_pairs()[0].second_name, "Donald");
        assert!(!report.is_satisfied());
        assert_eq!(cost_data.score(&joined), cost_data.minimal_cost() + 2);
    }

    #[test]
    fn test_repulsion_has_no_mixed_pairs() {
        let dataset = dataset();
        let cost_data = build_cost_data(&dataset, &["Projet1"], &[]).unwrap();
        let partition = Partition::new(vec![0, 0, 0, 1, 1, 1], 2).unwrap();

        let report = explain(&partition, &cost_data, dataset.row_names()).unwrap();
        assert_eq!(report.constraints()[0].mixed_count(), 0);
        assert!(report.constraints()[0].mixed_pairs().is_empty());
    }

    #[test]
    fn test_unreachable_affinity_optimum_is_explained() {
        // Affinity classes of two, groups of four: every group mixes labels
        let names = (0..8).map(|i| format!("s{}", i)).collect();
        let dataset = Dataset::new(names)
            .with_labels("Binome", &["a", "a", "b", "b", "c", "c", "d", "d"])
            .unwrap();
        let cost_data = build_cost_data(&dataset, &[], &["Binome"]).unwrap();
        let partition = Partition::new(vec![0, 0, 0, 0, 1, 1, 1, 1], 2).unwrap();

        let report = explain(&partition, &cost_data, dataset.row_names()).unwrap();

        assert_ne!(cost_data.score(&partition), cost_data.minimal_cost());
        assert_eq!(report.constraints()[0].violation_count(), 0);
        assert_eq!(report.constraints()[0].mixed_count(), 8);
        assert!(!report.is_satisfied());
    }

    #[test]
    fn test_not_optimal_is_never_reported_satisfied() {
        let dataset = dataset();
        let cost_data = build_cost_data(&dataset, &["Projet1"], &["Binome"]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(13);

        for distribution in [Distribution::GroupSize(2), Distribution::NumGroups(2)] {
            let mut partition = make_partition(6, &distribution).unwrap();
            for _ in 0..200 {
                partition = mutate(&partition, 3, &mut rng);
                let report = explain(&partition, &cost_data, dataset.row_names()).unwrap();
                if cost_data.score(&partition) != cost_data.minimal_cost() {
                    assert!(!report.is_satisfied(), "{:?}", partition);
                }
            }
        }
    }

    #[test]
    fn test_report_lists_constraints_in_order() {
        let dataset = dataset();
        let cost_data = build_cost_data(&dataset, &["Projet1"], &["Binome"]).unwrap();
        let partition = Partition::new(vec![0, 0, 0, 1, 1, 1], 2).unwrap();

        let report = explain(&partition, &cost_data, dataset.row_names()).unwrap();
        let columns: Vec<&str> = report.constraints().iter().map(|c| c.column()).collect();
        assert_eq!(columns, vec!["Projet1", "Binome"]);

        // Projet1: (Ada, Alan) in group 0 and (Barbara, Donald) in group 1
        assert_eq!(report.constraints()[0].violation_count(), 2);
        // Binome: Alan (y) and Edsger (y) are split
        assert_eq!(report.constraints()[1].violation_count(), 1);
        // Binome: Alan mixes with Ada and Grace, group 1 holds three labels
        assert_eq!(report.constraints()[1].mixed_count(), 5);
        assert_eq!(report.violated().count(), 2);
        assert_eq!(report.total_violations(), 8);
    }

    #[test]
    fn test_display() {
        let dataset = dataset();
        let cost_data = build_cost_data(&dataset, &["Projet1"], &["Binome"]).unwrap();
        let partition = Partition::new(vec![0, 0, 1, 1, 2, 2], 3).unwrap();

        let text = explain(&partition, &cost_data, dataset.row_names())
            .unwrap()
            .to_string();

        assert!(text.contains("Repulsion constraint on column `Projet1` violated 3 time(s):"));
        assert!(text.contains("  - Ada -- Alan\n"));
        assert!(text.contains("  - Grace -- Edsger\n"));
        assert!(text.contains("  - Barbara -- Donald\n"));
        assert!(text.contains("Affinity constraint on column `Binome` violated 2 time(s):"));
        assert!(text.contains("  - Ada -- Grace\n"));
        assert!(text.contains("  - Alan -- Edsger\n"));
        assert!(text.contains(
            "Affinity constraint on column `Binome` groups 3 pair(s) with different labels:"
        ));
    }

    #[test]
    fn test_display_satisfied() {
        let dataset = dataset();
        let cost_data = build_cost_data(&dataset, &["Projet1"], &[]).unwrap();
        let partition = Partition::new(vec![0, 1, 0, 2, 1, 2], 3).unwrap();

        let text = explain(&partition, &cost_data, dataset.row_names())
            .unwrap()
            .to_string();
        assert_eq!(text, "- Repulsion constraint on column `Projet1` satisfied\n");
    }

    #[test]
    fn test_no_constraints_report_is_empty() {
        let dataset = dataset();
        let cost_data = build_cost_data::<&str>(&dataset, &[], &[]).unwrap();
        let partition = Partition::new(vec![0, 0, 0, 1, 1, 1], 2).unwrap();
        let report = explain(&partition, &cost_data, dataset.row_names()).unwrap();
        assert!(report.constraints().is_empty());
        assert!(report.is_satisfied());
        assert_eq!(report.to_string(), "");
    }

    #[test]
    fn test_dimension_checks() {
        let dataset = dataset();
        let cost_data = build_cost_data(&dataset, &["Projet1"], &[]).unwrap();
        let short = Partition::new(vec![0, 1], 2).unwrap();
        assert!(explain(&short, &cost_data, dataset.row_names()).is_err());

        let partition = Partition::new(vec![0, 1, 0, 1, 0, 1], 2).unwrap();
        assert!(explain(&partition, &cost_data, &dataset.row_names()[..3]).is_err());
    }
}
