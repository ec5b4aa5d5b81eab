// Application layer: model building, solving, decoding and reporting

pub mod decoder;
pub mod driver;
pub mod insights;
pub mod model_builder;
pub mod objective;
pub mod presentation;
pub mod service;

pub use model_builder::{ScheduleModel, VariableIndex};
pub use service::{solve, ScheduleOutcome, ShiftScheduler};
