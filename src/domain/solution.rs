use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::models::SolverStatistics;
use super::scheduling::SlotGrid;
use super::value_objects::SolutionStatus;

/// One employee working one slot in one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub employee_id: String,
    pub day: usize,
    pub slot: usize,
    pub role_id: String,
}

/// Contiguous run of slots worked by one employee on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftBlock {
    pub employee_id: String,
    pub day: usize,
    pub start_slot: usize,
    /// Exclusive
    pub end_slot: usize,
    /// `HH:MM-HH:MM`
    pub label: String,
    /// Distinct roles covered during the block, in first-seen order
    pub roles: Vec<String>,
}

impl ShiftBlock {
    pub fn num_slots(&self) -> usize {
        self.end_slot - self.start_slot
    }
}

/// Day name → one `{"HH:MM-HH:MM": [employee ids]}` object per shift template.
pub type ShiftTable = IndexMap<String, Vec<IndexMap<String, Vec<String>>>>;

/// Schedule in the shape downstream consumers expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScheduleView {
    /// `[employee_id, day, slot, role_id]` rows
    Slots(Vec<(String, usize, usize, String)>),
    Shifts(ShiftTable),
}

impl Default for ScheduleView {
    fn default() -> Self {
        ScheduleView::Slots(Vec::new())
    }
}

/// Per-employee totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeStats {
    pub hours_worked: f64,
    pub preferred_hours: f64,
    /// `hours_worked - preferred_hours`
    pub deviation: f64,
}

/// Outcome of one scheduling request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub status: SolutionStatus,
    pub objective_value: Option<f64>,
    pub message: String,
    /// Authoritative per-slot assignments
    pub assignments: Vec<SlotAssignment>,
    pub schedule: ScheduleView,
    pub shift_blocks: Vec<ShiftBlock>,
    pub unmet_demand: SlotGrid<f64>,
    pub employee_stats: BTreeMap<String, EmployeeStats>,
    pub supply: SlotGrid<f64>,
    pub statistics: SolverStatistics,
}

impl Solution {
    /// A solution carrying no schedule (infeasible, unknown or failed).
    pub fn without_schedule(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            objective_value: None,
            message: message.into(),
            assignments: Vec::new(),
            schedule: ScheduleView::default(),
            shift_blocks: Vec::new(),
            unmet_demand: SlotGrid::default(),
            employee_stats: BTreeMap::new(),
            supply: SlotGrid::default(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn hours_worked(&self, employee_id: &str) -> f64 {
        self.employee_stats
            .get(employee_id)
            .map(|s| s.hours_worked)
            .unwrap_or(0.0)
    }

    pub fn total_unmet(&self) -> f64 {
        self.unmet_demand.total()
    }

    pub fn assignments_on(&self, day: usize, slot: usize) -> impl Iterator<Item = &SlotAssignment> {
        self.assignments
            .iter()
            .filter(move |a| a.day == day && a.slot == slot)
    }
}
