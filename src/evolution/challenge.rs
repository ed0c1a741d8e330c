use ndarray::Array2;

use crate::{
    constraints::CostData,
    error::{GroupingError, Result},
    partition::Partition,
};

/// Something a partition can be scored against. Lower is better.
pub trait Challenge: Send + Sync {
    /// Exact integer score of `partition`.
    fn score(&self, partition: &Partition) -> i64;

    /// Best score any partition can reach. The search stops as soon as it
    /// finds a partition with this score.
    fn target_score(&self) -> i64;

    /// Rejects partitions this challenge cannot score.
    fn check(&self, _partition: &Partition) -> Result<()> {
        Ok(())
    }
}

impl<C: Challenge + ?Sized> Challenge for &C {
    fn score(&self, partition: &Partition) -> i64 {
        (**self).score(partition)
    }

    fn target_score(&self) -> i64 {
        (**self).target_score()
    }

    fn check(&self, partition: &Partition) -> Result<()> {
        (**self).check(partition)
    }
}

/// Sum of `cost[i, j]` over every ordered pair `(i, j)` in the same group,
/// `i == j` included.
///
/// With `Z` the one-hot matrix of the partition this is `Σ Z ⊙ (cost · Z)`,
/// the same value as `Σ cooccurrence(p) ⊙ cost` without materializing the
/// N×N co-occurrence matrix.
pub fn score_partition(cost_matrix: &Array2<i64>, partition: &Partition) -> i64 {
    let one_hot = partition.one_hot();
    (&one_hot * &cost_matrix.dot(&one_hot)).sum()
}

impl Challenge for CostData {
    fn score(&self, partition: &Partition) -> i64 {
        score_partition(self.cost_matrix(), partition)
    }

    fn target_score(&self) -> i64 {
        self.minimal_cost()
    }

    fn check(&self, partition: &Partition) -> Result<()> {
        if partition.len() != self.size() {
            return Err(GroupingError::DimensionMismatch {
                what: "partition".to_string(),
                expected: self.size(),
                found: partition.len(),
            });
        }
        Ok(())
    }
}
