use serde::{Deserialize, Serialize};

use super::value_objects::{
    ConstraintType, OptimizationType, ProgramStatus, SolverBackend, VariableType,
};

/// Tolerance used when checking a candidate solution against the program.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Decision variable in a linear program
#[derive(Debug, Clone)]
pub struct Variable {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Variable {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Continuous,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: Some(1.0),
            name: name.into(),
        }
    }

    pub fn with_bounds(mut self, lower: f64, upper: Option<f64>) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Pin the variable to zero (the column stays in the program).
    pub fn fixed_to_zero(self) -> Self {
        self.with_bounds(0.0, Some(0.0))
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.variable_type,
            VariableType::Integer | VariableType::Binary
        )
    }
}

/// Sparse affine expression `Σ coeff·var + constant` over column indices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    pub terms: Vec<(usize, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn var(index: usize) -> Self {
        Self {
            terms: vec![(index, 1.0)],
            constant: 0.0,
        }
    }

    pub fn add_term(&mut self, index: usize, coeff: f64) {
        if coeff != 0.0 {
            self.terms.push((index, coeff));
        }
    }

    /// Add `factor · other` to this expression.
    pub fn add_scaled(&mut self, other: &LinearExpr, factor: f64) {
        if factor == 0.0 {
            return;
        }
        for &(index, coeff) in &other.terms {
            self.terms.push((index, coeff * factor));
        }
        self.constant += other.constant * factor;
    }

    pub fn scaled(&self, factor: f64) -> LinearExpr {
        let mut out = LinearExpr::new();
        out.add_scaled(self, factor);
        out
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(i, c)| c * values.get(i).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }
}

/// Objective function to minimize or maximize
#[derive(Debug, Clone)]
pub struct ObjectiveFunction {
    pub optimization_type: OptimizationType,
    /// One coefficient per column
    pub coefficients: Vec<f64>,
    pub offset: f64,
}

impl ObjectiveFunction {
    pub fn new(optimization_type: OptimizationType) -> Self {
        Self {
            optimization_type,
            coefficients: Vec::new(),
            offset: 0.0,
        }
    }

    /// Add `factor · expr` to the objective.
    pub fn add_expr(&mut self, expr: &LinearExpr, factor: f64) {
        for &(index, coeff) in &expr.terms {
            if index >= self.coefficients.len() {
                self.coefficients.resize(index + 1, 0.0);
            }
            self.coefficients[index] += coeff * factor;
        }
        self.offset += expr.constant * factor;
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(c, v)| c * v)
            .sum::<f64>()
            + self.offset
    }
}

/// Linear constraint `Σ terms  (≤ | = | ≥)  bound`
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub terms: Vec<(usize, f64)>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    /// Build `expr (op) rhs`, folding the expression constant into the bound.
    ///
    /// Repeated columns are merged and zero coefficients dropped, so each
    /// column appears at most once per row.
    pub fn new(constraint_type: ConstraintType, expr: LinearExpr, rhs: f64) -> Self {
        Self {
            constraint_type,
            bound: rhs - expr.constant,
            terms: merge_terms(expr.terms),
            name: String::new(),
        }
    }

    pub fn leq(expr: LinearExpr, rhs: f64) -> Self {
        Self::new(ConstraintType::LessThanOrEqual, expr, rhs)
    }

    pub fn geq(expr: LinearExpr, rhs: f64) -> Self {
        Self::new(ConstraintType::GreaterThanOrEqual, expr, rhs)
    }

    pub fn eq(expr: LinearExpr, rhs: f64) -> Self {
        Self::new(ConstraintType::Equal, expr, rhs)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Amount by which `values` violate this row (0 when satisfied).
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs: f64 = self
            .terms
            .iter()
            .map(|&(i, c)| c * values.get(i).copied().unwrap_or(0.0))
            .sum();
        match self.constraint_type {
            ConstraintType::LessThanOrEqual => (lhs - self.bound).max(0.0),
            ConstraintType::GreaterThanOrEqual => (self.bound - lhs).max(0.0),
            ConstraintType::Equal => (lhs - self.bound).abs(),
        }
    }
}

fn merge_terms(terms: Vec<(usize, f64)>) -> Vec<(usize, f64)> {
    let mut merged: Vec<(usize, f64)> = Vec::with_capacity(terms.len());
    let mut position: std::collections::HashMap<usize, usize> =
        std::collections::HashMap::with_capacity(terms.len());
    for (index, coeff) in terms {
        match position.get(&index) {
            Some(&at) => merged[at].1 += coeff,
            None => {
                position.insert(index, merged.len());
                merged.push((index, coeff));
            }
        }
    }
    merged.retain(|&(_, coeff)| coeff != 0.0);
    merged
}

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Wall-clock limit in seconds
    pub time_limit: Option<f64>,
    /// Relative MIP gap
    pub gap_tolerance: Option<f64>,
    pub random_seed: Option<i32>,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: None,
            gap_tolerance: None,
            random_seed: None,
            verbose: false,
        }
    }
}

/// Complete optimization problem
#[derive(Debug, Clone)]
pub struct OptimizationProblem {
    pub name: String,
    pub description: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    pub solver_config: SolverConfig,
}

impl OptimizationProblem {
    pub fn new(optimization_type: OptimizationType) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            objective: ObjectiveFunction::new(optimization_type),
            constraints: Vec::new(),
            variables: Vec::new(),
            solver_config: SolverConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    /// Append a column and return its index.
    pub fn add_variable(&mut self, variable: Variable) -> usize {
        self.variables.push(variable);
        self.objective.coefficients.push(0.0);
        self.variables.len() - 1
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_integer_variables(&self) -> usize {
        self.variables.iter().filter(|v| v.is_integer()).count()
    }

    pub fn num_binary_variables(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.variable_type == VariableType::Binary)
            .count()
    }

    /// Rows without terms whose constant bound cannot hold.
    pub fn violated_constant_rows(&self) -> Vec<&Constraint> {
        self.constraints
            .iter()
            .filter(|c| c.terms.is_empty() && c.violation(&[]) > FEASIBILITY_TOLERANCE)
            .collect()
    }

    /// Check `values` against bounds, integrality and rows.
    pub fn check_solution(&self, values: &[f64]) -> SolutionQuality {
        let mut max_bound = 0.0_f64;
        let mut max_integrality = 0.0_f64;
        for (i, var) in self.variables.iter().enumerate() {
            let v = values.get(i).copied().unwrap_or(0.0);
            max_bound = max_bound.max(var.lower_bound - v);
            if let Some(upper) = var.upper_bound {
                max_bound = max_bound.max(v - upper);
            }
            if var.is_integer() {
                max_integrality = max_integrality.max((v - v.round()).abs());
            }
        }
        let max_row = self
            .constraints
            .iter()
            .map(|c| c.violation(values))
            .fold(0.0_f64, f64::max);

        SolutionQuality {
            max_constraint_violation: max_bound.max(max_row),
            max_integrality_violation: max_integrality,
        }
    }

    /// `values` with every integer column snapped to the nearest integer.
    pub fn round_integers(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .zip(&self.variables)
            .map(|(&v, var)| if var.is_integer() { v.round() } else { v })
            .collect()
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_integer_vars: u32,
    pub num_binary_vars: u32,
}

impl SolverStatistics {
    pub fn for_problem(problem: &OptimizationProblem, solve_time_ms: f64) -> Self {
        Self {
            solve_time_ms,
            num_variables: problem.num_variables() as u32,
            num_constraints: problem.constraints.len() as u32,
            num_integer_vars: (problem.num_integer_variables() - problem.num_binary_variables())
                as u32,
            num_binary_vars: problem.num_binary_variables() as u32,
        }
    }
}

/// Worst violations of a candidate point
#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionQuality {
    pub max_constraint_violation: f64,
    pub max_integrality_violation: f64,
}

impl SolutionQuality {
    pub fn is_feasible(&self) -> bool {
        self.max_constraint_violation <= FEASIBILITY_TOLERANCE
            && self.max_integrality_violation <= FEASIBILITY_TOLERANCE
    }
}

/// Solution to an optimization problem, as reported by a backend
#[derive(Debug, Clone)]
pub struct ProgramSolution {
    pub status: ProgramStatus,
    pub objective_value: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl ProgramSolution {
    pub fn new(status: ProgramStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            objective_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: ProgramStatus::Optimal,
            objective_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
        }
    }

    /// A limit was hit; `variable_values` is the incumbent, if the backend has one.
    pub fn limited(status: ProgramStatus, variable_values: Vec<f64>, message: impl Into<String>) -> Self {
        Self {
            status,
            objective_value: None,
            variable_values,
            message: message.into(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == ProgramStatus::Optimal
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self.status, ProgramStatus::Optimal | ProgramStatus::Feasible)
    }
}
