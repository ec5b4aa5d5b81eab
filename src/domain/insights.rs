// Management report types.
//
// The seven sections are always serialized; sections that cannot be
// computed for a given outcome are empty rather than missing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::value_objects::{HiringPriority, Severity, SolutionStatus, UtilizationStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeUtilization {
    pub employee_id: String,
    pub hours_worked: f64,
    pub max_hours: f64,
    pub utilization_pct: f64,
    pub status: UtilizationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDemand {
    pub role_id: String,
    pub eligible_employees: usize,
    pub working_employees: usize,
    pub hours_worked: f64,
    /// Hours eligible staff could give, each capped by their weekly limit
    pub available_hours: f64,
    pub capacity_utilization_pct: f64,
    /// Unmet items in slots where this role sits on the supply path
    pub unmet_demand: f64,
    pub is_bottleneck: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiringRecommendation {
    /// `None` for a general capacity recommendation
    pub role_id: Option<String>,
    pub priority: HiringPriority,
    pub reason: String,
    pub recommended_hires: u32,
    /// Extra items per week one full-time hire would add
    pub estimated_capacity_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageGap {
    pub day: usize,
    pub day_name: String,
    pub slot: usize,
    pub time: String,
    pub demand: f64,
    pub supply: f64,
    pub unmet: f64,
    pub workers_present: usize,
    pub minimum_required: u32,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    pub total_wage_cost: f64,
    pub cost_by_role: BTreeMap<String, f64>,
    pub unmet_units: f64,
    pub unmet_item_value: f64,
    pub opportunity_cost: f64,
    pub units_served: f64,
    pub cost_per_unit_served: Option<f64>,
    /// Wages plus opportunity cost
    pub total_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadDistribution {
    pub mean_hours: f64,
    pub min_hours: f64,
    pub max_hours: f64,
    pub range_hours: f64,
    pub std_dev_hours: f64,
    pub status_counts: BTreeMap<UtilizationStatus, usize>,
    /// 1.0 = perfectly even, 0.0 = highly skewed
    pub balance_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    InsufficientTotalCapacity,
    SlotCapacityShortfall,
    UnderstaffedRole,
    SlotOverSubscribed,
    ChainBlocked,
    UnschedulableEmployee,
    SolverLimit,
    SolverFailure,
    ConstraintInteraction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    pub role_id: Option<String>,
    pub day: Option<usize>,
    pub slot: Option<usize>,
    pub shortfall: Option<f64>,
}

impl FeasibilityIssue {
    pub fn new(kind: IssueKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            role_id: None,
            day: None,
            slot: None,
            shortfall: None,
        }
    }

    pub fn for_role(mut self, role_id: impl Into<String>) -> Self {
        self.role_id = Some(role_id.into());
        self
    }

    pub fn at(mut self, day: usize, slot: usize) -> Self {
        self.day = Some(day);
        self.slot = Some(slot);
        self
    }

    pub fn with_shortfall(mut self, shortfall: f64) -> Self {
        self.shortfall = Some(shortfall);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityAnalysis {
    pub status: SolutionStatus,
    pub is_feasible: bool,
    pub issues: Vec<FeasibilityIssue>,
    pub summary: String,
}

impl FeasibilityAnalysis {
    pub fn feasible(status: SolutionStatus) -> Self {
        Self {
            status,
            is_feasible: true,
            issues: Vec::new(),
            summary: "A schedule satisfying every hard rule was found".to_string(),
        }
    }

    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagementInsights {
    pub employee_utilization: Vec<EmployeeUtilization>,
    pub role_demand: Vec<RoleDemand>,
    pub hiring_recommendations: Vec<HiringRecommendation>,
    pub coverage_gaps: Vec<CoverageGap>,
    pub cost_analysis: CostAnalysis,
    pub workload_distribution: WorkloadDistribution,
    pub feasibility_analysis: FeasibilityAnalysis,
}

impl ManagementInsights {
    pub fn bottleneck_roles(&self) -> impl Iterator<Item = &RoleDemand> {
        self.role_demand.iter().filter(|r| r.is_bottleneck)
    }
}
