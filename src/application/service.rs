// Scheduling service.
//
// `ShiftScheduler` runs a request end to end: validate, build the
// program, solve it on the worker, decode and report. Every solve outcome
// is `Ok`; `Err` is reserved for requests that could not be attempted.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use crate::application::{decoder, driver, insights, model_builder::ScheduleModel, objective, presentation};
use crate::domain::error::{SchedulerError, SchedulerResult};
use crate::domain::insights::ManagementInsights;
use crate::domain::scheduling::{SchedulerInput, ShiftMode};
use crate::domain::solution::{ScheduleView, Solution};
use crate::domain::solver_service::SolverService;
use crate::domain::validation::validate_input;
use crate::infrastructure::config::SchedulerConfig;
use crate::infrastructure::worker::SolveWorker;
use crate::solver::SolverFactory;

/// The schedule and its management reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    pub solution: Solution,
    pub insights: ManagementInsights,
}

#[derive(Clone)]
pub struct ShiftScheduler {
    config: SchedulerConfig,
    solver: Arc<dyn SolverService>,
}

impl ShiftScheduler {
    /// Scheduler on the backend named by `config`.
    pub fn new(config: SchedulerConfig) -> SchedulerResult<Self> {
        config.validate()?;
        let solver = SolverFactory::create_from_backend(config.backend)?;
        Ok(Self { config, solver })
    }

    /// Scheduler on an explicit backend.
    pub fn with_solver(
        config: SchedulerConfig,
        solver: Arc<dyn SolverService>,
    ) -> SchedulerResult<Self> {
        config.validate()?;
        Ok(Self { config, solver })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Solve one request. `time_limit_seconds` overrides the configured limit.
    pub fn solve(
        &self,
        input: &SchedulerInput,
        time_limit_seconds: Option<f64>,
    ) -> SchedulerResult<ScheduleOutcome> {
        if let Some(limit) = time_limit_seconds {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(SchedulerError::InvalidInput(format!(
                    "time limit must be a positive number of seconds, got {}",
                    limit
                )));
            }
        }
        validate_input(input)?;

        let span = info_span!(
            "solve",
            employees = input.employees.len(),
            roles = input.roles.len(),
            days = input.num_days,
            slots = input.num_slots_per_day
        );
        let _guard = span.enter();

        let mut model = ScheduleModel::build(input);
        objective::compose(&mut model, input, &self.config.weights);
        let ScheduleModel { problem, index } = model;
        let problem = problem.with_config(self.config.solver_config(time_limit_seconds));

        let worker = SolveWorker::new(Arc::clone(&self.solver));
        let run = driver::run(&worker, Arc::new(problem));

        let solution = if run.status.has_schedule() {
            let decoded = decoder::decode(input, &index, &run.values);
            let (schedule, shift_blocks) = match &input.shift_mode {
                ShiftMode::Slots => (
                    presentation::slot_rows(&decoded.assignments),
                    presentation::merge_blocks(input, &decoded.assignments),
                ),
                ShiftMode::Fixed { .. } => (
                    ScheduleView::Shifts(presentation::shift_table(input, &decoded.shifts)),
                    presentation::shift_blocks(input, &decoded.shifts, &decoded.assignments),
                ),
            };
            Solution {
                status: run.status,
                objective_value: run.objective_value,
                message: run.message,
                assignments: decoded.assignments,
                schedule,
                shift_blocks,
                unmet_demand: decoded.unmet,
                employee_stats: decoded.employee_stats,
                supply: decoded.supply,
                statistics: run.statistics,
            }
        } else {
            let mut solution = Solution::without_schedule(run.status, run.message)
                .with_statistics(run.statistics);
            // fixed mode keeps its day table shape, every template unstaffed
            if input.shift_mode.is_fixed() {
                solution.schedule = ScheduleView::Shifts(presentation::shift_table(input, &[]));
            }
            solution
        };

        let insights = insights::generate(input, &solution, &self.config.insights);
        info!(
            status = %solution.status,
            objective = ?solution.objective_value,
            unmet = solution.total_unmet(),
            issues = insights.feasibility_analysis.issues.len(),
            "schedule request finished"
        );
        Ok(ScheduleOutcome { solution, insights })
    }

    /// [`solve`](Self::solve) on tokio's blocking pool.
    pub async fn solve_async(
        &self,
        input: SchedulerInput,
        time_limit_seconds: Option<f64>,
    ) -> SchedulerResult<ScheduleOutcome> {
        let scheduler = self.clone();
        tokio::task::spawn_blocking(move || scheduler.solve(&input, time_limit_seconds))
            .await
            .map_err(|e| SchedulerError::Worker(e.to_string()))?
    }
}

/// Solve `input` with the default configuration and HiGHS.
pub fn solve(input: &SchedulerInput, time_limit_seconds: f64) -> SchedulerResult<ScheduleOutcome> {
    ShiftScheduler::new(SchedulerConfig::default())?.solve(input, Some(time_limit_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scheduling::{Employee, Role};
    use crate::domain::value_objects::{SolutionStatus, SolverBackend};
    use crate::solver::HighsSolver;

    fn small() -> SchedulerInput {
        SchedulerInput::new(1, 4, 1.0)
            .with_role(Role::producing("server", 20.0).with_min_present(1))
            .with_employee(
                Employee::new("ana", 15.0, 40.0)
                    .with_roles(["server"])
                    .available_always(1, 4),
            )
            .with_uniform_demand(10.0)
    }

    #[test]
    fn test_invalid_input_is_an_error() {
        let mut input = small();
        input.slot_len_hour = 0.0;
        let err = solve(&input, 10.0).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidInput(_)));
    }

    #[test]
    fn test_invalid_time_limit_is_an_error() {
        let scheduler = ShiftScheduler::new(SchedulerConfig::default()).unwrap();
        assert!(matches!(
            scheduler.solve(&small(), Some(0.0)),
            Err(SchedulerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_explicit_backend_still_checks_config() {
        let mut config = SchedulerConfig::default();
        config.insights.bottleneck_utilization = f64::NAN;
        let err = ShiftScheduler::with_solver(config, Arc::new(HighsSolver::new()))
            .err()
            .expect("config rejected");
        assert!(matches!(err, SchedulerError::InvalidConfig(_)));
        assert!(err.to_string().contains("bottleneck_utilization"));

        let scheduler =
            ShiftScheduler::with_solver(SchedulerConfig::default(), Arc::new(HighsSolver::new()))
                .unwrap();
        assert_eq!(scheduler.solver_name(), "HiGHS");
    }

    #[cfg(not(feature = "cbc"))]
    #[test]
    fn test_unavailable_backend_is_an_error() {
        let config = SchedulerConfig::default().with_backend(SolverBackend::CoinCbc);
        assert!(matches!(
            ShiftScheduler::new(config),
            Err(SchedulerError::Solver(_))
        ));
    }

    #[test]
    fn test_small_request_end_to_end() {
        let outcome = solve(&small(), 10.0).unwrap();
        assert_eq!(outcome.solution.status, SolutionStatus::Optimal);
        assert_eq!(outcome.solution.assignments.len(), 4);
        assert_eq!(outcome.solution.hours_worked("ana"), 4.0);
        assert_eq!(outcome.solution.shift_blocks.len(), 1);
        assert_eq!(outcome.solution.total_unmet(), 0.0);
        assert!(outcome.insights.feasibility_analysis.is_feasible);
    }
}
