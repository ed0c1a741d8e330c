use super::BreedStrategy;
use crate::{
    error::{GroupingError, Result},
    evolution::options::OptimizerOptions,
    partition::Partition,
    rng::RandomNumberGenerator,
};

/// Returns a copy of `partition` where the labels at `mutation_size`
/// distinct random positions have been randomly permuted among themselves.
///
/// Only labels already present at the chosen positions are moved around,
/// so the size of every group is unchanged.
pub fn mutate(
    partition: &Partition,
    mutation_size: usize,
    rng: &mut RandomNumberGenerator,
) -> Partition {
    let positions = rng.sample_positions(partition.len(), mutation_size);
    let shuffled = rng.permutation(positions.len());

    let mut labels = partition.labels().to_vec();
    for (source, &target) in positions.iter().zip(&shuffled) {
        labels[positions[target]] = partition.labels()[*source];
    }

    Partition::from_labels_unchecked(labels, partition.num_groups())
}

/// # PermutationStrategy
///
/// Every parent yields `variants_per_round - 1` independent mutations of
/// itself. There is no crossover: mixing two partitions would not preserve
/// group sizes.
#[derive(Debug, Clone, Default)]
pub struct PermutationStrategy;

impl BreedStrategy for PermutationStrategy {
    fn breed(
        &self,
        parents: &[Partition],
        options: &OptimizerOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Partition>> {
        if parents.is_empty() {
            return Err(GroupingError::EmptyPopulation);
        }

        let per_parent = options.get_variants_per_round().saturating_sub(1);
        let mut children = Vec::with_capacity(parents.len() * per_parent);

        for parent in parents {
            children.extend(
                (0..per_parent).map(|_| mutate(parent, options.get_mutation_size(), rng)),
            );
        }

        Ok(children)
    }
}
