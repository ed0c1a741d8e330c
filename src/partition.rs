//! # Partition
//!
//! A `Partition` assigns each of N items to one of K groups. This module
//! builds the contiguous *baseline* partition from a target size
//! distribution, and exposes the matrix views of a partition used for
//! scoring.
//!
//! ## Example
//!
//! ```rust
//! use groupalg::partition::{make_partition, Distribution};
//!
//! let partition = make_partition(10, &Distribution::Proportions(vec![1.0, 1.0, 1.0])).unwrap();
//!
//! assert_eq!(partition.group_sizes(), vec![4, 3, 3]);
//! assert_eq!(partition.labels(), &[0, 0, 0, 0, 1, 1, 1, 2, 2, 2]);
//! ```
//!
//! The baseline is never shuffled: item `i` of the baseline is simply the
//! `i`-th item in whatever order the caller prepared.

use ndarray::Array2;

use crate::error::{GroupingError, Result};

/// Target size distribution of the groups to build.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    /// One group per entry, sized in proportion to the entries.
    Proportions(Vec<f64>),
    /// Groups of (about) this many items.
    ///
    /// For sizes above 2 the number of groups is rounded up, so leftover
    /// items make some groups one smaller. For pairs it is rounded down, so
    /// a leftover item makes one triple instead of a singleton.
    GroupSize(usize),
    /// This many groups, as equal as possible.
    NumGroups(usize),
}

impl Distribution {
    /// Builds a distribution from the three mutually exclusive descriptors a
    /// caller may expose as options.
    ///
    /// Exactly one of them must be given.
    pub fn from_options(
        proportions: Option<Vec<f64>>,
        group_size: Option<usize>,
        num_groups: Option<usize>,
    ) -> Result<Self> {
        match (proportions, group_size, num_groups) {
            (Some(proportions), None, None) => Ok(Distribution::Proportions(proportions)),
            (None, Some(size), None) => Ok(Distribution::GroupSize(size)),
            (None, None, Some(count)) => Ok(Distribution::NumGroups(count)),
            (proportions, group_size, num_groups) => {
                let given: Vec<&str> = [
                    proportions.is_some().then_some("proportions"),
                    group_size.is_some().then_some("group_size"),
                    num_groups.is_some().then_some("num_groups"),
                ]
                .into_iter()
                .flatten()
                .collect();
                Err(GroupingError::Configuration(format!(
                    "Specify exactly one of proportions, group_size, num_groups (given: {})",
                    if given.is_empty() {
                        "none".to_string()
                    } else {
                        given.join(", ")
                    }
                )))
            }
        }
    }

    /// Number of groups this distribution yields for `n` items.
    pub fn num_groups(&self, n: usize) -> usize {
        match self {
            Distribution::Proportions(proportions) => proportions.len(),
            Distribution::NumGroups(count) => *count,
            Distribution::GroupSize(0) => 0,
            Distribution::GroupSize(size) if *size > 2 => n.div_ceil(*size),
            Distribution::GroupSize(size) => n / size,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Distribution::Proportions(proportions) => {
                if proportions.is_empty() {
                    return Err(GroupingError::Configuration(
                        "Proportions cannot be empty".to_string(),
                    ));
                }
                if let Some(bad) = proportions.iter().find(|p| !p.is_finite() || **p <= 0.0) {
                    return Err(GroupingError::Configuration(format!(
                        "Proportions must be positive and finite, got {}",
                        bad
                    )));
                }
            }
            Distribution::GroupSize(0) => {
                return Err(GroupingError::Configuration(
                    "Group size must be greater than 0".to_string(),
                ))
            }
            Distribution::NumGroups(0) => {
                return Err(GroupingError::Configuration(
                    "Number of groups must be greater than 0".to_string(),
                ))
            }
            _ => {}
        }
        Ok(())
    }

    /// Unnormalized relative group sizes.
    fn weights(&self, n: usize) -> Vec<f64> {
        match self {
            Distribution::Proportions(proportions) => proportions.clone(),
            _ => vec![1.0; self.num_groups(n)],
        }
    }
}

/// Group sizes for `n` items following `weights`.
///
/// Each group first gets `floor(n * w / Σw)` items; the remaining items are
/// handed out one at a time to the currently smallest group (lowest index
/// among ties). The result always sums to `n`.
pub fn group_frequencies(n: usize, weights: &[f64]) -> Vec<usize> {
    let total: f64 = weights.iter().sum();
    let mut frequency: Vec<usize> = weights
        .iter()
        .map(|w| (n as f64 * w / total).floor() as usize)
        .collect();

    let assigned: usize = frequency.iter().sum();
    for _ in 0..n.saturating_sub(assigned) {
        let smallest = frequency
            .iter()
            .enumerate()
            .min_by_key(|(_, count)| **count)
            .map(|(group, _)| group);
        match smallest {
            Some(group) => frequency[group] += 1,
            None => break,
        }
    }

    frequency
}

/// Builds the contiguous baseline partition of `n` items.
///
/// # Errors
///
/// Returns a configuration error if the distribution is malformed, if
/// `n == 0`, or if the distribution yields no group for `n` items.
pub fn make_partition(n: usize, distribution: &Distribution) -> Result<Partition> {
    distribution.validate()?;

    if n == 0 {
        return Err(GroupingError::Configuration(
            "Cannot build groups from an empty population".to_string(),
        ));
    }

    let num_groups = distribution.num_groups(n);
    if num_groups == 0 {
        return Err(GroupingError::Configuration(format!(
            "{:?} yields no group for {} item(s)",
            distribution, n
        )));
    }

    let frequency = group_frequencies(n, &distribution.weights(n));
    debug_assert_eq!(frequency.iter().sum::<usize>(), n);
    debug_assert_eq!(frequency.len(), num_groups);

    let labels = frequency
        .iter()
        .enumerate()
        .flat_map(|(group, &count)| std::iter::repeat(group).take(count))
        .collect();

    Ok(Partition { labels, num_groups })
}

/// Assignment of N items to K groups.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPartition"))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    labels: Vec<usize>,
    num_groups: usize,
}

/// Unchecked wire form of a [`Partition`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPartition {
    labels: Vec<usize>,
    num_groups: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPartition> for Partition {
    type Error = GroupingError;

    fn try_from(raw: RawPartition) -> Result<Self> {
        Partition::new(raw.labels, raw.num_groups)
    }
}

impl Partition {
    /// Creates a partition from explicit group labels.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a label is not below `num_groups`.
    pub fn new(labels: Vec<usize>, num_groups: usize) -> Result<Self> {
        if let Some((item, label)) = labels
            .iter()
            .enumerate()
            .find(|(_, &label)| label >= num_groups)
        {
            return Err(GroupingError::Configuration(format!(
                "Item {} has group {} but only {} group(s) exist",
                item, label, num_groups
            )));
        }
        Ok(Self { labels, num_groups })
    }

    /// Builds a partition whose labels are already known to be in range.
    pub(crate) fn from_labels_unchecked(labels: Vec<usize>, num_groups: usize) -> Self {
        debug_assert!(labels.iter().all(|&label| label < num_groups));
        Self { labels, num_groups }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn into_labels(self) -> Vec<usize> {
        self.labels
    }

    /// Group of item `item`, if it exists.
    pub fn group_of(&self, item: usize) -> Option<usize> {
        self.labels.get(item).copied()
    }

    /// Number of items in each group, indexed by group.
    pub fn group_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.num_groups];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }

    /// Item indices of each group, indexed by group, in ascending item order.
    pub fn groups(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.num_groups];
        for (item, &label) in self.labels.iter().enumerate() {
            groups[label].push(item);
        }
        groups
    }

    /// N×K indicator matrix: entry `(i, g)` is 1 iff item `i` is in group `g`.
    pub fn one_hot(&self) -> Array2<i64> {
        let mut one_hot = Array2::zeros((self.len(), self.num_groups));
        for (item, &label) in self.labels.iter().enumerate() {
            one_hot[[item, label]] = 1;
        }
        one_hot
    }

    /// N×N same-group indicator, 1 on the diagonal.
    pub fn cooccurrence(&self) -> Array2<i64> {
        let one_hot = self.one_hot();
        one_hot.dot(&one_hot.t())
    }

    /// Places this partition over rows visited in `order`: the returned
    /// partition gives row `order[k]` the group of item `k`.
    pub(crate) fn scatter(&self, order: &[usize]) -> Self {
        debug_assert_eq!(order.len(), self.len());
        let mut labels = vec![0; self.len()];
        for (&row, &label) in order.iter().zip(&self.labels) {
            labels[row] = label;
        }
        Self::from_labels_unchecked(labels, self.num_groups)
    }
}
