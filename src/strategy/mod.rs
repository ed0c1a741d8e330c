//! # BreedStrategy
//!
//! The `BreedStrategy` trait defines the interface for strategies responsible for breeding
//! new candidate partitions from the partitions that survived the previous round.
pub mod permutation;

use std::fmt::Debug;

use crate::{
    error::Result, evolution::options::OptimizerOptions, partition::Partition,
    rng::RandomNumberGenerator,
};

/// # BreedStrategy
///
/// Breeds new candidates from a set of parents. Implementations return only
/// the *new* candidates: the optimizer carries the parents over itself.
pub trait BreedStrategy
where
    Self: Debug + Clone + Send + Sync,
{
    /// Breeds new candidates from `parents`.
    ///
    /// ## Parameters
    ///
    /// - `parents`: The partitions that survived the previous round.
    /// - `options`: The optimizer options (variants per round, mutation size).
    /// - `rng`: The random number generator driving the mutations.
    ///
    /// ## Errors
    ///
    /// Fails if `parents` is empty.
    fn breed(
        &self,
        parents: &[Partition],
        options: &OptimizerOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Partition>>;
}

pub use permutation::{mutate, PermutationStrategy};
