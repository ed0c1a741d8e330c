//! Co-occurrence matrices of nominal label columns.

use std::collections::HashMap;

use ndarray::Array2;

/// How missing labels compare when building a co-occurrence matrix.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Every missing value is its own class: two missing items never co-occur.
    Different,
    /// All missing values share one class: two missing items co-occur.
    Same,
}

/// Dense class index of every item, classes numbered by first appearance.
fn class_indices(values: &[Option<String>], policy: MissingPolicy) -> (Vec<usize>, usize) {
    let mut classes: HashMap<&str, usize> = HashMap::new();
    let mut shared_missing: Option<usize> = None;
    let mut num_classes = 0;

    let indices = values
        .iter()
        .map(|value| {
            let mut next_class = || {
                num_classes += 1;
                num_classes - 1
            };
            match (value, policy) {
                (Some(label), _) => *classes.entry(label.as_str()).or_insert_with(next_class),
                (None, MissingPolicy::Different) => next_class(),
                (None, MissingPolicy::Same) => *shared_missing.get_or_insert_with(next_class),
            }
        })
        .collect();

    (indices, num_classes)
}

/// N×N matrix with `C[i, j] = 1` iff items `i` and `j` carry the same label.
///
/// Computed as `Z · Zᵀ` where `Z` is the one-hot encoding of the labels.
pub fn cooccurrence_matrix(values: &[Option<String>], policy: MissingPolicy) -> Array2<i64> {
    let (indices, num_classes) = class_indices(values, policy);

    let mut one_hot = Array2::<i64>::zeros((values.len(), num_classes));
    for (item, &class) in indices.iter().enumerate() {
        one_hot[[item, class]] = 1;
    }
    one_hot.dot(&one_hot.t())
}
