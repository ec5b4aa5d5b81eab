// Infrastructure: configuration, logging and the solve worker

pub mod config;
pub mod logging;
pub mod worker;

pub use config::{ConfigError, InsightsConfig, ObjectiveWeights, SchedulerConfig};
pub use worker::SolveWorker;
