// HiGHS Solver Adapter
// Implements the SolverService interface for HiGHS
// This is an adapter pattern - translates our program model to the HiGHS API

use crate::domain::{
    models::{OptimizationProblem, ProgramSolution, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, ProgramStatus, VariableType},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome for a terminal status that carries no usable point.
///
/// Presolve may answer `UnboundedOrInfeasible` without deciding which. Every
/// column with a negative cost in a scheduling model is bounded, so that
/// answer can only mean there is no feasible point.
fn unsolved(status: HighsModelStatus) -> Option<ProgramSolution> {
    let (kind, message) = match status {
        HighsModelStatus::Infeasible => (ProgramStatus::Infeasible, "HiGHS: model is infeasible"),
        HighsModelStatus::UnboundedOrInfeasible => (
            ProgramStatus::Infeasible,
            "HiGHS: UnboundedOrInfeasible after presolve, no feasible point exists",
        ),
        HighsModelStatus::Unbounded => (ProgramStatus::Unbounded, "HiGHS: model is unbounded"),
        _ => return None,
    };
    Some(ProgramSolution::new(kind, message))
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<ProgramSolution> {
        // Validate first
        self.validate(problem)?;

        let start_time = Instant::now();

        // Use HiGHS RowProblem (add columns first, then rows)
        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(problem.num_variables());

        for (i, var_def) in problem.variables.iter().enumerate() {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);
            let obj_coeff = problem.objective.coefficients.get(i).copied().unwrap_or(0.0);

            let col = match var_def.variable_type {
                VariableType::Integer | VariableType::Binary => {
                    pb.add_integer_column(obj_coeff, lower..=upper)
                }
                VariableType::Continuous => pb.add_column(obj_coeff, lower..=upper),
            };
            cols.push(col);
        }

        for constraint in &problem.constraints {
            let terms: Vec<_> = constraint
                .terms
                .iter()
                .filter(|(_, coeff)| *coeff != 0.0)
                .map(|&(i, coeff)| (cols[i], coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = if problem.objective.optimization_type == OptimizationType::Maximize {
            Sense::Maximise
        } else {
            Sense::Minimise
        };

        let config = &problem.solver_config;
        let mut model = pb.optimise(sense);
        model.set_option("output_flag", config.verbose);
        if let Some(limit) = config.time_limit {
            model.set_option("time_limit", limit);
        }
        if let Some(gap) = config.gap_tolerance {
            model.set_option("mip_rel_gap", gap);
        }
        if let Some(seed) = config.random_seed {
            model.set_option("random_seed", seed);
        }

        let solved = model.try_solve().map_err(|status| {
            SolverError::ExecutionFailed(format!("HiGHS failed to run: {:?}", status))
        })?;
        let statistics = SolverStatistics::for_problem(
            problem,
            start_time.elapsed().as_secs_f64() * 1000.0,
        );

        let status = solved.status();
        let solution = match status {
            HighsModelStatus::Optimal | HighsModelStatus::ModelEmpty => {
                let values = if matches!(status, HighsModelStatus::ModelEmpty) {
                    vec![0.0; problem.num_variables()]
                } else {
                    solved.get_solution().columns().to_vec()
                };
                let value = problem.objective.evaluate(&values);
                let mut solution = ProgramSolution::optimal(value, values);
                solution.message = format!("HiGHS proved '{}' optimal", problem.name);
                solution
            }
            HighsModelStatus::ReachedTimeLimit => ProgramSolution::limited(
                ProgramStatus::TimeLimit,
                solved.get_solution().columns().to_vec(),
                "HiGHS stopped at the time limit",
            ),
            HighsModelStatus::ReachedIterationLimit => ProgramSolution::limited(
                ProgramStatus::IterationLimit,
                solved.get_solution().columns().to_vec(),
                "HiGHS stopped at the iteration limit",
            ),
            other => unsolved(other).ok_or_else(|| {
                SolverError::ExecutionFailed(format!("HiGHS solver returned status: {:?}", other))
            })?,
        };

        Ok(solution.with_statistics(statistics))
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
