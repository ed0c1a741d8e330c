pub mod constraints;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod evolution;
pub mod partition;
pub mod report;
pub mod rng;
pub mod selection;
pub mod strategy;

// Re-export commonly used types for convenience
pub use constraints::{build_cost_data, CostData};
pub use dataset::Dataset;
pub use engine::{build_groups, build_groups_by, GroupingOutcome, GroupingRequest, RowOrder};
pub use error::{GroupingError, OptionExt, Result};
pub use evolution::{optimize, EvolutionResult, OptimizerOptions};
pub use partition::{make_partition, Distribution, Partition};
pub use report::{explain, Report};
pub use rng::RandomNumberGenerator;
