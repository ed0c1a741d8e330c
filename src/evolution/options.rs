//! # OptimizerOptions
//!
//! The `OptimizerOptions` struct holds the knobs of the evolutionary search:
//! the attempt budget, how many variants each surviving partition spawns per
//! round, how many positions a mutation shuffles, and how many candidates
//! survive a round.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use groupalg::evolution::options::OptimizerOptions;
//!
//! // Create a new OptimizerOptions instance with custom parameters
//! let custom_options = OptimizerOptions::new(5000, 10, 4, 20);
//!
//! // Or through the builder
//! let options = OptimizerOptions::builder()
//!     .max_variants(5000)
//!     .time_limit(Duration::from_secs(2))
//!     .build();
//!
//! assert_eq!(options.get_max_variants(), custom_options.get_max_variants());
//! assert_eq!(options.get_top_k(), 20);
//! ```
//!
//! ## Fields
//!
//! - `max_variants`: Budget of newly generated candidates over the whole search.
//! - `variants_per_round`: Each surviving partition yields `variants_per_round - 1` mutations per round.
//! - `mutation_size`: Number of distinct positions whose labels a mutation permutes.
//! - `top_k`: Number of candidates kept after each round.
//! - `time_limit`: Optional wall-clock bound, checked between rounds.

use std::time::Duration;

use crate::error::{GroupingError, Result};

const DEFAULT_MAX_VARIANTS: usize = 1000;
const DEFAULT_VARIANTS_PER_ROUND: usize = 10;
const DEFAULT_MUTATION_SIZE: usize = 4;
const DEFAULT_TOP_K: usize = 20;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerOptions {
    max_variants: usize,
    variants_per_round: usize,
    mutation_size: usize,
    top_k: usize,
    time_limit: Option<Duration>,
}

impl OptimizerOptions {
    pub fn new(
        max_variants: usize,
        variants_per_round: usize,
        mutation_size: usize,
        top_k: usize,
    ) -> Self {
        Self {
            max_variants,
            variants_per_round,
            mutation_size,
            top_k,
            time_limit: None,
        }
    }

    pub fn get_max_variants(&self) -> usize {
        self.max_variants
    }

    pub fn get_variants_per_round(&self) -> usize {
        self.variants_per_round
    }

    pub fn get_mutation_size(&self) -> usize {
        self.mutation_size
    }

    pub fn get_top_k(&self) -> usize {
        self.top_k
    }

    pub fn get_time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Sets the attempt budget.
    pub fn set_max_variants(&mut self, max_variants: usize) {
        self.max_variants = max_variants;
    }

    /// Sets the number of variants per round.
    pub fn set_variants_per_round(&mut self, variants_per_round: usize) {
        self.variants_per_round = variants_per_round;
    }

    /// Sets the number of positions permuted by one mutation.
    pub fn set_mutation_size(&mut self, mutation_size: usize) {
        self.mutation_size = mutation_size;
    }

    /// Sets the number of survivors per round.
    pub fn set_top_k(&mut self, top_k: usize) {
        self.top_k = top_k;
    }

    /// Sets or clears the wall-clock limit.
    pub fn set_time_limit(&mut self, time_limit: Option<Duration>) {
        self.time_limit = time_limit;
    }

    /// Checks that the options describe a search that can make progress.
    ///
    /// A zero `max_variants` is allowed: the search then returns its
    /// starting partition untouched.
    pub fn validate(&self) -> Result<()> {
        if self.variants_per_round < 2 {
            return Err(GroupingError::Configuration(format!(
                "Variants per round must be at least 2, got {}",
                self.variants_per_round
            )));
        }

        if self.mutation_size == 0 {
            return Err(GroupingError::Configuration(
                "Mutation size cannot be zero".to_string(),
            ));
        }

        if self.top_k == 0 {
            return Err(GroupingError::Configuration(
                "Number of survivors (top_k) cannot be zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns a builder for creating an `OptimizerOptions` instance.
    pub fn builder() -> OptimizerOptionsBuilder {
        OptimizerOptionsBuilder::default()
    }
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self {
            max_variants: DEFAULT_MAX_VARIANTS,
            variants_per_round: DEFAULT_VARIANTS_PER_ROUND,
            mutation_size: DEFAULT_MUTATION_SIZE,
            top_k: DEFAULT_TOP_K,
            time_limit: None,
        }
    }
}

/// Builder for `OptimizerOptions`.
///
/// Unset fields take their default value.
#[derive(Debug, Clone, Default)]
pub struct OptimizerOptionsBuilder {
    max_variants: Option<usize>,
    variants_per_round: Option<usize>,
    mutation_size: Option<usize>,
    top_k: Option<usize>,
    time_limit: Option<Duration>,
}

impl OptimizerOptionsBuilder {
    pub fn max_variants(mut self, value: usize) -> Self {
        self.max_variants = Some(value);
        self
    }

    pub fn variants_per_round(mut self, value: usize) -> Self {
        self.variants_per_round = Some(value);
        self
    }

    pub fn mutation_size(mut self, value: usize) -> Self {
        self.mutation_size = Some(value);
        self
    }

    pub fn top_k(mut self, value: usize) -> Self {
        self.top_k = Some(value);
        self
    }

    pub fn time_limit(mut self, value: Duration) -> Self {
        self.time_limit = Some(value);
        self
    }

    /// Builds the `OptimizerOptions` instance.
    pub fn build(self) -> OptimizerOptions {
        OptimizerOptions {
            max_variants: self.max_variants.unwrap_or(DEFAULT_MAX_VARIANTS),
            variants_per_round: self.variants_per_round.unwrap_or(DEFAULT_VARIANTS_PER_ROUND),
            mutation_size: self.mutation_size.unwrap_or(DEFAULT_MUTATION_SIZE),
            top_k: self.top_k.unwrap_or(DEFAULT_TOP_K),
            time_limit: self.time_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = OptimizerOptions::default();
        assert_eq!(options.get_max_variants(), 1000);
        assert_eq!(options.get_variants_per_round(), 10);
        assert_eq!(options.get_mutation_size(), 4);
        assert_eq!(options.get_top_k(), 20);
        assert_eq!(options.get_time_limit(), None);
        assert_eq!(OptimizerOptions::builder().build(), options);
    }

    #[test]
    fn test_builder_overrides() {
        let options = OptimizerOptions::builder()
            .max_variants(50)
            .variants_per_round(5)
            .mutation_size(2)
            .top_k(3)
            .time_limit(Duration::from_millis(10))
            .build();
        assert_eq!(options.get_max_variants(), 50);
        assert_eq!(options.get_variants_per_round(), 5);
        assert_eq!(options.get_mutation_size(), 2);
        assert_eq!(options.get_top_k(), 3);
        assert_eq!(options.get_time_limit(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn test_setters() {
        let mut options = OptimizerOptions::default();
        options.set_max_variants(7);
        options.set_variants_per_round(3);
        options.set_mutation_size(5);
        options.set_top_k(2);
        options.set_time_limit(Some(Duration::from_secs(1)));
        assert_eq!(options, {
            let mut expected = OptimizerOptions::new(7, 3, 5, 2);
            expected.set_time_limit(Some(Duration::from_secs(1)));
            expected
        });
    }

    #[test]
    fn test_validate() {
        assert!(OptimizerOptions::default().validate().is_ok());
        assert!(OptimizerOptions::new(0, 10, 4, 20).validate().is_ok());
        assert!(OptimizerOptions::new(1000, 1, 4, 20).validate().is_err());
        assert!(OptimizerOptions::new(1000, 10, 0, 20).validate().is_err());
        assert!(OptimizerOptions::new(1000, 10, 4, 0).validate().is_err());
    }
}
