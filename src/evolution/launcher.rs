use std::time::Instant;

use rayon::prelude::*;

use super::{challenge::Challenge, options::OptimizerOptions};
use crate::{
    constraints::CostData,
    error::{GroupingError, OptionExt, Result},
    partition::Partition,
    rng::RandomNumberGenerator,
    selection::{ElitistSelection, SelectionStrategy},
    strategy::{BreedStrategy, PermutationStrategy},
};

/// Rounds breeding at least this many candidates score them in parallel.
const PARALLEL_THRESHOLD: usize = 64;

/// Outcome of one search.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionResult {
    /// The best partition found.
    pub partition: Partition,
    /// Its score.
    pub score: i64,
    /// Number of newly generated candidates that were evaluated.
    pub attempts: usize,
    /// Number of completed mutate-evaluate-select rounds.
    pub rounds: usize,
    /// Whether `score` equals the challenge's target score.
    pub is_optimal: bool,
    /// Best score after each round.
    pub score_history: Vec<i64>,
}

/// Runs the evolutionary search with a breeding strategy, a selection
/// strategy and a challenge.
#[derive(Debug, Clone)]
pub struct EvolutionLauncher<Strategy, Selection, Chall>
where
    Strategy: BreedStrategy,
    Selection: SelectionStrategy,
    Chall: Challenge,
{
    strategy: Strategy,
    selection: Selection,
    challenge: Chall,
}

impl<Strategy, Selection, Chall> EvolutionLauncher<Strategy, Selection, Chall>
where
    Strategy: BreedStrategy,
    Selection: SelectionStrategy,
    Chall: Challenge,
{
    /// Creates a new `EvolutionLauncher`.
    ///
    /// # Arguments
    ///
    /// * `strategy` - Breeds the new candidates of each round.
    /// * `selection` - Picks the survivors of each round.
    /// * `challenge` - Scores the candidates.
    pub fn new(strategy: Strategy, selection: Selection, challenge: Chall) -> Self {
        Self {
            strategy,
            selection,
            challenge,
        }
    }

    /// Improves `starting_value` until the target score is reached or the
    /// budget runs out.
    ///
    /// Each round, the surviving partitions breed new candidates; the pool of
    /// survivors followed by newcomers is scored and the `top_k` best are
    /// kept. Only newcomers count against `max_variants`.
    ///
    /// # Errors
    ///
    /// This method only fails on malformed input, before any search:
    /// - invalid options (see [`OptimizerOptions::validate`])
    /// - a starting partition the challenge cannot score
    ///
    /// Running out of budget is not an error; the result then has
    /// `is_optimal == false`.
    pub fn evolve(
        &self,
        options: &OptimizerOptions,
        starting_value: Partition,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult> {
        options.validate()?;
        self.challenge.check(&starting_value)?;

        let target = self.challenge.target_score();
        let started = Instant::now();

        let mut best_score = self.challenge.score(&starting_value);
        let mut parents = vec![starting_value];
        let mut parent_scores = vec![best_score];
        let mut attempts = 0;
        let mut score_history = Vec::new();

        while attempts < options.get_max_variants() && best_score != target {
            if let Some(limit) = options.get_time_limit() {
                if started.elapsed() >= limit {
                    tracing::debug!(
                        attempts,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Time limit reached"
                    );
                    break;
                }
            }

            let children = self.strategy.breed(&parents, options, rng)?;
            if children.is_empty() {
                return Err(GroupingError::Configuration(
                    "Breeding strategy produced no candidate".to_string(),
                ));
            }
            attempts += children.len();

            let child_scores: Vec<i64> = if children.len() >= PARALLEL_THRESHOLD {
                children
                    .par_iter()
                    .map(|child| self.challenge.score(child))
                    .collect()
            } else {
                children
                    .iter()
                    .map(|child| self.challenge.score(child))
                    .collect()
            };

            let mut pool = parents;
            pool.extend(children);
            let mut pool_scores = parent_scores;
            pool_scores.extend(child_scores);

            let selected = self
                .selection
                .select(&pool, &pool_scores, options.get_top_k())?;

            parents = selected.iter().map(|&idx| pool[idx].clone()).collect();
            parent_scores = selected.iter().map(|&idx| pool_scores[idx]).collect();

            best_score = parent_scores
                .first()
                .copied()
                .ok_or_else_grouping(|| GroupingError::EmptyPopulation)?;
            score_history.push(best_score);

            tracing::debug!(
                round = score_history.len(),
                attempts,
                best_score,
                target,
                "Round completed"
            );
        }

        let partition = parents
            .into_iter()
            .next()
            .ok_or_else_grouping(|| GroupingError::EmptyPopulation)?;

        Ok(EvolutionResult {
            partition,
            score: best_score,
            attempts,
            rounds: score_history.len(),
            is_optimal: best_score == target,
            score_history,
        })
    }
}

/// Searches for a partition of minimal cost, starting from `initial`.
///
/// Uses [`PermutationStrategy`] mutations and [`ElitistSelection`]; see
/// [`EvolutionLauncher::evolve`] for the loop itself.
///
/// # Example
///
/// ```rust
/// use groupalg::constraints::build_cost_data;
/// use groupalg::dataset::Dataset;
/// use groupalg::evolution::{optimize, OptimizerOptions};
/// use groupalg::partition::{make_partition, Distribution};
/// use groupalg::rng::RandomNumberGenerator;
///
/// let names: Vec<String> = (0..6).map(|i| format!("s{}", i)).collect();
/// let dataset = Dataset::new(names)
///     .with_labels("Projet1", &["a", "a", "b", "b", "c", "c"])
///     .unwrap();
/// let cost_data = build_cost_data(&dataset, &["Projet1"], &[]).unwrap();
///
/// let initial = make_partition(6, &Distribution::GroupSize(2)).unwrap();
/// let mut rng = RandomNumberGenerator::from_seed(1);
/// let result = optimize(initial, &cost_data, &OptimizerOptions::default(), &mut rng).unwrap();
///
/// assert!(result.is_optimal);
/// assert_eq!(result.score, cost_data.minimal_cost());
/// ```
pub fn optimize(
    initial: Partition,
    cost_data: &CostData,
    options: &OptimizerOptions,
    rng: &mut RandomNumberGenerator,
) -> Result<EvolutionResult> {
    EvolutionLauncher::new(PermutationStrategy, ElitistSelection, cost_data)
        .evolve(options, initial, rng)
}
