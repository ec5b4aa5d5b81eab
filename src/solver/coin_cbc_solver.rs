// COIN-OR CBC Solver Adapter (via good_lp)
// Only compiled with the `cbc` feature; needs the system Cbc library

use crate::domain::{
    models::{OptimizationProblem, ProgramSolution, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, ProgramStatus, VariableType},
};
use good_lp::{
    solvers::{coin_cbc, SolutionStatus}, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolverModel, Variable as GoodLpVariable,
};
use std::time::Instant;

#[derive(Debug, Default, Clone, Copy)]
pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

/// good_lp expression over `columns` for sparse `(column, coefficient)` terms.
fn linear(columns: &[GoodLpVariable], terms: impl IntoIterator<Item = (usize, f64)>) -> Expression {
    terms
        .into_iter()
        .filter(|&(_, coeff)| coeff != 0.0)
        .fold(Expression::from(0.0), |acc, (col, coeff)| acc + coeff * columns[col])
}

/// Status for a run that returned a point.
fn reached(status: SolutionStatus) -> ProgramStatus {
    match status {
        SolutionStatus::Optimal => ProgramStatus::Optimal,
        SolutionStatus::TimeLimit => ProgramStatus::TimeLimit,
        SolutionStatus::GapLimit => ProgramStatus::Feasible,
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<ProgramSolution> {
        self.validate(problem)?;
        let started = Instant::now();

        let mut vars = variables!();
        let columns: Vec<GoodLpVariable> = problem
            .variables
            .iter()
            .map(|column| {
                let bounded = variable()
                    .min(column.lower_bound)
                    .max(column.upper_bound.unwrap_or(f64::INFINITY));
                match column.variable_type {
                    VariableType::Binary | VariableType::Integer => vars.add(bounded.integer()),
                    VariableType::Continuous => vars.add(bounded),
                }
            })
            .collect();

        // good_lp only minimises
        let sign = match problem.objective.optimization_type {
            OptimizationType::Maximize => -1.0,
            OptimizationType::Minimize => 1.0,
        };
        let objective = linear(
            &columns,
            problem
                .objective
                .coefficients
                .iter()
                .enumerate()
                .map(|(col, &coeff)| (col, sign * coeff)),
        );

        let mut lp_model = vars.minimise(objective).using(coin_cbc::coin_cbc);

        let config = &problem.solver_config;
        lp_model.set_parameter("logLevel", if config.verbose { "1" } else { "0" });
        if let Some(limit) = config.time_limit {
            lp_model.set_parameter("seconds", &limit.to_string());
        }
        if let Some(gap) = config.gap_tolerance {
            lp_model.set_parameter("ratioGap", &gap.to_string());
        }
        if let Some(seed) = config.random_seed {
            lp_model.set_parameter("randomCbcSeed", &seed.to_string());
        }

        for row in &problem.constraints {
            let lhs = linear(&columns, row.terms.iter().copied());
            lp_model = lp_model.with(match row.constraint_type {
                ConstraintType::LessThanOrEqual => lhs.leq(row.bound),
                ConstraintType::Equal => lhs.eq(row.bound),
                ConstraintType::GreaterThanOrEqual => lhs.geq(row.bound),
            });
        }

        let outcome = lp_model.solve();
        let statistics =
            SolverStatistics::for_problem(problem, started.elapsed().as_secs_f64() * 1000.0);

        let solution = match outcome {
            Ok(found) => {
                let values: Vec<f64> = columns.iter().map(|&col| found.value(col)).collect();
                let value = problem.objective.evaluate(&values);
                match reached(found.status()) {
                    ProgramStatus::Optimal => {
                        let mut solution = ProgramSolution::optimal(value, values);
                        solution.message = format!("CBC proved '{}' optimal", problem.name);
                        solution
                    }
                    ProgramStatus::Feasible => {
                        let mut solution = ProgramSolution::limited(
                            ProgramStatus::Feasible,
                            values,
                            "CBC stopped within the gap tolerance",
                        );
                        solution.objective_value = Some(value);
                        solution
                    }
                    status => ProgramSolution::limited(
                        status,
                        values,
                        "CBC stopped at the time limit",
                    ),
                }
            }
            Err(ResolutionError::Infeasible) => {
                ProgramSolution::new(ProgramStatus::Infeasible, "CBC: model is infeasible")
            }
            Err(ResolutionError::Unbounded) => {
                ProgramSolution::new(ProgramStatus::Unbounded, "CBC: model is unbounded")
            }
            // stopped before any incumbent was found
            Err(ResolutionError::Other(reason)) if reason.contains("Stopped") => {
                ProgramSolution::limited(
                    ProgramStatus::TimeLimit,
                    Vec::new(),
                    format!("CBC stopped early: {}", reason),
                )
            }
            Err(e) => return Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        };

        Ok(solution.with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
