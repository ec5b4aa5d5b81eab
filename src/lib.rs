// Domain layer: scheduling model, program model and reports
pub mod domain;

// Application layer: model builder, solver driver, decoder and insights
pub mod application;

// Infrastructure layer: configuration, logging and the solve worker
pub mod infrastructure;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    CoverageGap, Employee, FeasibilityAnalysis, FeasibilityIssue, FixedShift, IssueKind,
    ManagementInsights, ProductionChain, Role, ScheduleView, SchedulerError, SchedulerInput,
    SchedulerResult, ShiftBlock, ShiftMode, SlotAssignment, SlotGrid, Solution, SolutionStatus,
    SolverBackend, SolverError, SolverService,
};

pub use application::{solve, ScheduleOutcome, ShiftScheduler};

pub use infrastructure::{ConfigError, InsightsConfig, ObjectiveWeights, SchedulerConfig};

#[cfg(feature = "cbc")]
pub use solver::CoinCbcSolver;
pub use solver::{HighsSolver, SolverFactory};
