// Solver driver
// Runs a built program on the solve worker and folds the backend status into
// the status vocabulary callers see.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::domain::models::{OptimizationProblem, ProgramSolution, SolverStatistics};
use crate::domain::value_objects::{ProgramStatus, SolutionStatus};
use crate::infrastructure::worker::SolveWorker;

/// Result of one solve, before decoding.
#[derive(Debug, Clone)]
pub struct SolveRun {
    pub status: SolutionStatus,
    pub objective_value: Option<f64>,
    /// Column values; empty unless `status` has a schedule
    pub values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl SolveRun {
    fn without_values(status: SolutionStatus, message: String, statistics: SolverStatistics) -> Self {
        Self {
            status,
            objective_value: None,
            values: Vec::new(),
            message,
            statistics,
        }
    }
}

pub fn run(worker: &SolveWorker, problem: Arc<OptimizationProblem>) -> SolveRun {
    let started = Instant::now();

    // Rows with no columns left cannot be helped by any assignment
    let violated: Vec<&str> = problem
        .violated_constant_rows()
        .into_iter()
        .map(|c| c.name.as_str())
        .collect();
    if !violated.is_empty() {
        let shown: Vec<&str> = violated.iter().take(5).copied().collect();
        let message = format!(
            "Infeasible before solving: {} rule(s) cannot be met by any schedule ({}{})",
            violated.len(),
            shown.join(", "),
            if violated.len() > shown.len() { ", ..." } else { "" }
        );
        info!(rows = violated.len(), "model infeasible by construction");
        return SolveRun::without_values(
            SolutionStatus::Infeasible,
            message,
            SolverStatistics::for_problem(&problem, elapsed_ms(started)),
        );
    }

    let outcome = match worker.run(Arc::clone(&problem)) {
        Ok(solution) => map_solution(&problem, solution),
        Err(err) => {
            warn!(solver = worker.solver_name(), error = %err, "solver failed");
            SolveRun::without_values(
                SolutionStatus::Error,
                err.to_string(),
                SolverStatistics::for_problem(&problem, elapsed_ms(started)),
            )
        }
    };

    info!(
        status = %outcome.status,
        objective = ?outcome.objective_value,
        solve_time_ms = outcome.statistics.solve_time_ms,
        "solve finished"
    );
    outcome
}

fn map_solution(problem: &OptimizationProblem, solution: ProgramSolution) -> SolveRun {
    let ProgramSolution {
        status,
        objective_value,
        variable_values,
        message,
        statistics,
        ..
    } = solution;

    match status {
        ProgramStatus::Optimal | ProgramStatus::Feasible => {
            let objective_value =
                objective_value.or_else(|| Some(problem.objective.evaluate(&variable_values)));
            SolveRun {
                status: if status == ProgramStatus::Optimal {
                    SolutionStatus::Optimal
                } else {
                    SolutionStatus::Feasible
                },
                objective_value,
                values: variable_values,
                message,
                statistics,
            }
        }
        ProgramStatus::Infeasible => {
            SolveRun::without_values(SolutionStatus::Infeasible, message, statistics)
        }
        ProgramStatus::TimeLimit | ProgramStatus::IterationLimit => {
            // incumbents carry solver noise on integer columns
            let variable_values = problem.round_integers(&variable_values);
            let usable = variable_values.len() == problem.num_variables()
                && problem.check_solution(&variable_values).is_feasible();
            if usable {
                SolveRun {
                    status: SolutionStatus::Feasible,
                    objective_value: Some(problem.objective.evaluate(&variable_values)),
                    values: variable_values,
                    message: format!("{}; returning the best schedule found", message),
                    statistics,
                }
            } else {
                SolveRun::without_values(
                    SolutionStatus::Unknown,
                    format!("{}; no feasible schedule found in time", message),
                    statistics,
                )
            }
        }
        ProgramStatus::Unbounded | ProgramStatus::Error => {
            SolveRun::without_values(SolutionStatus::Error, message, statistics)
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Constraint, LinearExpr, Variable};
    use crate::domain::solver_service::{Result, SolverError, SolverService};
    use crate::domain::value_objects::OptimizationType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays a canned backend answer and counts calls.
    struct Canned {
        status: ProgramStatus,
        values: Vec<f64>,
        calls: AtomicUsize,
    }

    impl Canned {
        fn new(status: ProgramStatus, values: Vec<f64>) -> Self {
            Self {
                status,
                values,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SolverService for Canned {
        fn solve(&self, _problem: &OptimizationProblem) -> Result<ProgramSolution> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ProgramSolution::limited(
                self.status,
                self.values.clone(),
                format!("canned {}", self.status),
            ))
        }
        fn name(&self) -> &str {
            "canned"
        }
        fn supports_mip(&self) -> bool {
            true
        }
    }

    struct Failing;

    impl SolverService for Failing {
        fn solve(&self, _problem: &OptimizationProblem) -> Result<ProgramSolution> {
            Err(SolverError::ExecutionFailed("license expired".into()))
        }
        fn name(&self) -> &str {
            "failing"
        }
        fn supports_mip(&self) -> bool {
            true
        }
    }

    // x ≥ 1, x binary, minimize x
    fn program() -> Arc<OptimizationProblem> {
        let mut problem = OptimizationProblem::new(OptimizationType::Minimize);
        let x = problem.add_variable(Variable::binary("x"));
        problem.objective.add_expr(&LinearExpr::var(x), 3.0);
        problem.add_constraint(Constraint::geq(LinearExpr::var(x), 1.0).with_name("cover"));
        Arc::new(problem)
    }

    fn run_with(solver: Arc<dyn SolverService>, problem: Arc<OptimizationProblem>) -> SolveRun {
        run(&SolveWorker::new(solver), problem)
    }

    #[test]
    fn test_time_limit_with_feasible_incumbent() {
        let outcome = run_with(
            Arc::new(Canned::new(ProgramStatus::TimeLimit, vec![1.0])),
            program(),
        );
        assert_eq!(outcome.status, SolutionStatus::Feasible);
        assert_eq!(outcome.objective_value, Some(3.0));
        assert_eq!(outcome.values, vec![1.0]);
    }

    #[test]
    fn test_time_limit_with_violating_incumbent_is_unknown() {
        let outcome = run_with(
            Arc::new(Canned::new(ProgramStatus::TimeLimit, vec![0.0])),
            program(),
        );
        assert_eq!(outcome.status, SolutionStatus::Unknown);
        assert!(outcome.values.is_empty());

        let empty = run_with(
            Arc::new(Canned::new(ProgramStatus::IterationLimit, vec![])),
            program(),
        );
        assert_eq!(empty.status, SolutionStatus::Unknown);
    }

    #[test]
    fn test_unbounded_and_failures_are_errors() {
        let outcome = run_with(
            Arc::new(Canned::new(ProgramStatus::Unbounded, vec![])),
            program(),
        );
        assert_eq!(outcome.status, SolutionStatus::Error);

        let failed = run_with(Arc::new(Failing), program());
        assert_eq!(failed.status, SolutionStatus::Error);
        assert!(failed.message.contains("license expired"));
    }

    #[test]
    fn test_constant_row_short_circuits() {
        let solver = Arc::new(Canned::new(ProgramStatus::Optimal, vec![]));
        let mut problem = OptimizationProblem::new(OptimizationType::Minimize);
        problem.add_constraint(Constraint::geq(LinearExpr::new(), 2.0).with_name("min_staff[server,0,0]"));

        let outcome = run(&SolveWorker::new(solver.clone()), Arc::new(problem));
        assert_eq!(outcome.status, SolutionStatus::Infeasible);
        assert!(outcome.message.contains("min_staff[server,0,0]"));
        assert_eq!(solver.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_highs_round_trip() {
        let solver = crate::solver::HighsSolver::new();
        let outcome = run_with(Arc::new(solver), program());
        assert_eq!(outcome.status, SolutionStatus::Optimal);
        assert!((outcome.objective_value.unwrap() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_near_integral_incumbent_is_rounded() {
        // y·20 ≥ 20 fails by 2e-6 at y = 1 - 1e-7 unless y is snapped
        let mut problem = OptimizationProblem::new(OptimizationType::Minimize);
        let y = problem.add_variable(Variable::binary("y"));
        let mut supply = LinearExpr::new();
        supply.add_term(y, 20.0);
        problem.add_constraint(Constraint::geq(supply, 20.0).with_name("demand[0,0]"));

        let outcome = run_with(
            Arc::new(Canned::new(ProgramStatus::TimeLimit, vec![1.0 - 1e-7])),
            Arc::new(problem),
        );
        assert_eq!(outcome.status, SolutionStatus::Feasible);
        assert_eq!(outcome.values, vec![1.0]);
    }
}
