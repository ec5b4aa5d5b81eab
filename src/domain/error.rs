use super::solver_service::SolverError;

/// Errors surfaced by a scheduling request.
///
/// Solve outcomes (infeasible, timed out, solver failure) are not errors;
/// they come back as a [`SolutionStatus`](super::SolutionStatus).
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("Invalid scheduler input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("Scheduling worker failed: {0}")]
    Worker(String),
}

pub type SchedulerResult<T> = std::result::Result<T, SchedulerError>;
