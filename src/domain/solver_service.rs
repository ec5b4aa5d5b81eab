// Domain service interface for solving linear programs
// Any backend (HiGHS, CBC) plugs in behind this trait

use super::models::{OptimizationProblem, ProgramSolution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for optimization solvers
///
/// Implementations translate an [`OptimizationProblem`] into their engine's
/// API, honour `solver_config.time_limit`, and report the raw outcome.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<ProgramSolution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();
        let num_vars = problem.num_variables();

        if problem.objective.num_variables() != num_vars {
            errors.push(format!(
                "Objective has {} coefficients but problem has {} variables",
                problem.objective.num_variables(),
                num_vars
            ));
        }

        for (i, constraint) in problem.constraints.iter().enumerate() {
            if let Some(&(index, _)) = constraint.terms.iter().find(|(idx, _)| *idx >= num_vars) {
                errors.push(format!(
                    "Constraint {} '{}' references variable {} but problem has {} variables",
                    i, constraint.name, index, num_vars
                ));
            }
            if !constraint.bound.is_finite() || constraint.terms.iter().any(|(_, c)| !c.is_finite()) {
                errors.push(format!(
                    "Constraint {} '{}' has non-finite coefficients",
                    i, constraint.name
                ));
            }
        }

        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if let Some(limit) = problem.solver_config.time_limit {
            if limit.is_nan() || limit <= 0.0 {
                errors.push(format!("Time limit must be positive, got {}", limit));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Constraint, LinearExpr, Variable};
    use crate::domain::value_objects::OptimizationType;

    struct NoopSolver;

    impl SolverService for NoopSolver {
        fn solve(&self, _problem: &OptimizationProblem) -> Result<ProgramSolution> {
            Err(SolverError::ExecutionFailed("noop".into()))
        }
        fn name(&self) -> &str {
            "noop"
        }
        fn supports_mip(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_validate_reports_all_problems() {
        let mut problem = OptimizationProblem::new(OptimizationType::Minimize);
        problem.add_variable(Variable::binary("x").with_bounds(2.0, Some(1.0)));
        problem.add_constraint(Constraint::leq(LinearExpr::var(7), 1.0).with_name("dangling"));
        problem.solver_config.time_limit = Some(0.0);

        let err = NoopSolver.validate(&problem).unwrap_err().to_string();
        assert!(err.contains("dangling"));
        assert!(err.contains("lower bound"));
        assert!(err.contains("Time limit"));
    }

    #[test]
    fn test_validate_accepts_well_formed_problem() {
        let mut problem = OptimizationProblem::new(OptimizationType::Minimize);
        let x = problem.add_variable(Variable::binary("x"));
        problem.add_constraint(Constraint::leq(LinearExpr::var(x), 1.0));
        assert!(NoopSolver.validate(&problem).is_ok());
    }
}
