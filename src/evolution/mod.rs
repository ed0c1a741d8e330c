pub mod challenge;
pub mod launcher;
pub mod options;

pub use challenge::{score_partition, Challenge};
pub use launcher::{optimize, EvolutionLauncher, EvolutionResult};
pub use options::{OptimizerOptions, OptimizerOptionsBuilder};
