use crate::error::{GroupingError, Result};
use crate::partition::Partition;
use crate::selection::selection_strategy::SelectionStrategy;

/// A selection strategy that keeps the lowest-scoring candidates.
///
/// Candidates are ranked by score; equal scores keep their order in the
/// population. Since the optimizer puts the surviving parents first in every
/// pool, a parent is never displaced by an equally good newcomer, and the
/// best score can only go down from one round to the next.
///
/// # Examples
///
/// ```
/// use groupalg::partition::Partition;
/// use groupalg::selection::elitist::ElitistSelection;
/// use groupalg::selection::SelectionStrategy;
///
/// let population = vec![
///     Partition::new(vec![0, 0, 1, 1], 2).unwrap(),
///     Partition::new(vec![0, 1, 0, 1], 2).unwrap(),
///     Partition::new(vec![0, 1, 1, 0], 2).unwrap(),
/// ];
/// let scores = vec![8, 4, 4];
///
/// let selected = ElitistSelection.select(&population, &scores, 2).unwrap();
/// assert_eq!(selected, vec![1, 2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ElitistSelection;

impl SelectionStrategy for ElitistSelection {
    fn select(
        &self,
        population: &[Partition],
        scores: &[i64],
        num_to_select: usize,
    ) -> Result<Vec<usize>> {
        if population.is_empty() {
            return Err(GroupingError::EmptyPopulation);
        }

        if scores.len() != population.len() {
            return Err(GroupingError::DimensionMismatch {
                what: "scores".to_string(),
                expected: population.len(),
                found: scores.len(),
            });
        }

        let mut ranked: Vec<usize> = (0..population.len()).collect();
        // stable: ties keep population order
        ranked.sort_by_key(|&idx| scores[idx]);
        ranked.truncate(num_to_select);

        Ok(ranked)
    }
}
