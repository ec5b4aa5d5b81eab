// Domain value objects: enumerations shared by the program model, the
// schedule solution and the insight reports

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of decision variable in the linear program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Continuous real number (x ∈ ℝ)
    Continuous,
    /// Integer number (x ∈ ℤ)
    Integer,
    /// Binary variable (x ∈ {0, 1})
    Binary,
}

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

/// Raw outcome reported by a solver backend for a linear program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramStatus {
    /// Found optimal solution
    Optimal,
    /// Found feasible solution (may not be optimal)
    Feasible,
    /// Problem has no feasible solution
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
    /// Time limit reached; `variable_values` holds the incumbent if any
    TimeLimit,
    /// Iteration or node limit reached
    IterationLimit,
    /// Solver error occurred
    Error,
}

impl fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramStatus::Optimal => write!(f, "Optimal"),
            ProgramStatus::Feasible => write!(f, "Feasible"),
            ProgramStatus::Infeasible => write!(f, "Infeasible"),
            ProgramStatus::Unbounded => write!(f, "Unbounded"),
            ProgramStatus::TimeLimit => write!(f, "Time Limit Reached"),
            ProgramStatus::IterationLimit => write!(f, "Iteration Limit Reached"),
            ProgramStatus::Error => write!(f, "Error"),
        }
    }
}

/// Status of a schedule returned to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolutionStatus {
    /// Proven optimal schedule
    Optimal,
    /// Usable schedule without proof of optimality
    Feasible,
    /// No schedule satisfies the hard rules
    Infeasible,
    /// Nothing found within the time limit
    Unknown,
    /// The solver failed
    Error,
}

impl SolutionStatus {
    /// Whether the solution carries a usable schedule.
    pub fn has_schedule(&self) -> bool {
        matches!(self, SolutionStatus::Optimal | SolutionStatus::Feasible)
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "OPTIMAL"),
            SolutionStatus::Feasible => write!(f, "FEASIBLE"),
            SolutionStatus::Infeasible => write!(f, "INFEASIBLE"),
            SolutionStatus::Unknown => write!(f, "UNKNOWN"),
            SolutionStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// Automatically select best solver
    #[default]
    Auto,
    /// COIN-OR CBC solver
    CoinCbc,
    /// HiGHS solver
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}

/// Utilization bucket of an employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationStatus {
    Unused,
    Underutilized,
    WellUtilized,
    Overutilized,
}

impl UtilizationStatus {
    /// Bucket a utilization percentage (0..=100+).
    pub fn from_percent(percent: f64) -> Self {
        if percent <= 0.0 {
            UtilizationStatus::Unused
        } else if percent < 50.0 {
            UtilizationStatus::Underutilized
        } else if percent < 90.0 {
            UtilizationStatus::WellUtilized
        } else {
            UtilizationStatus::Overutilized
        }
    }
}

/// Severity of a coverage gap or feasibility issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Urgency of a hiring recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiringPriority {
    Medium,
    High,
    Critical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization_buckets() {
        assert_eq!(UtilizationStatus::from_percent(0.0), UtilizationStatus::Unused);
        assert_eq!(UtilizationStatus::from_percent(1.0), UtilizationStatus::Underutilized);
        assert_eq!(UtilizationStatus::from_percent(49.9), UtilizationStatus::Underutilized);
        assert_eq!(UtilizationStatus::from_percent(50.0), UtilizationStatus::WellUtilized);
        assert_eq!(UtilizationStatus::from_percent(89.9), UtilizationStatus::WellUtilized);
        assert_eq!(UtilizationStatus::from_percent(90.0), UtilizationStatus::Overutilized);
        assert_eq!(UtilizationStatus::from_percent(120.0), UtilizationStatus::Overutilized);
    }

    #[test]
    fn test_status_serializes_upper_case() {
        let json = serde_json::to_string(&SolutionStatus::Infeasible).unwrap();
        assert_eq!(json, "\"INFEASIBLE\"");
        assert!(SolutionStatus::Feasible.has_schedule());
        assert!(!SolutionStatus::Unknown.has_schedule());
    }

    #[test]
    fn test_backend_from_config_names() {
        let backend: SolverBackend = serde_json::from_str("\"coin_cbc\"").unwrap();
        assert_eq!(backend, SolverBackend::CoinCbc);
        assert_eq!(SolverBackend::Highs.to_string(), "HiGHS");
    }
}
