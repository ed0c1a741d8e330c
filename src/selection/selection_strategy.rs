use std::fmt::Debug;

use crate::error::Result;
use crate::partition::Partition;

/// Trait for selection strategies.
///
/// Selection strategies choose which candidates of a round survive into the
/// next one, based on their scores.
///
/// # Examples
///
/// ```
/// use groupalg::partition::Partition;
/// use groupalg::selection::{ElitistSelection, SelectionStrategy};
/// use groupalg::error::Result;
///
/// fn main() -> Result<()> {
///     let population = vec![
///         Partition::new(vec![0, 1], 2)?,
///         Partition::new(vec![1, 0], 2)?,
///         Partition::new(vec![0, 0], 2)?,
///     ];
///     let scores = vec![5, 3, 9];
///
///     let selected = ElitistSelection.select(&population, &scores, 2)?;
///     assert_eq!(selected, vec![1, 0]);
///
///     Ok(())
/// }
/// ```
pub trait SelectionStrategy: Debug + Send + Sync {
    /// Selects candidates from `population` based on `scores` (lower is better).
    ///
    /// # Arguments
    ///
    /// * `population` - The candidates of the current round.
    /// * `scores` - The score of each candidate, in the same order.
    /// * `num_to_select` - The number of candidates to keep.
    ///
    /// # Returns
    ///
    /// Indices into `population` of the selected candidates, best first.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The population is empty
    /// - The scores length doesn't match the population length
    fn select(
        &self,
        population: &[Partition],
        scores: &[i64],
        num_to_select: usize,
    ) -> Result<Vec<usize>>;
}
