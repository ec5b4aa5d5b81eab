// Role demand: how much of each role's staffing capacity was used and
// whether the role is what keeps demand unmet.

use std::collections::BTreeSet;

use crate::domain::insights::RoleDemand;
use crate::domain::scheduling::SchedulerInput;
use crate::domain::solution::Solution;
use crate::infrastructure::config::InsightsConfig;

/// Unmet totals below this count as fully served.
pub(crate) const UNMET_EPSILON: f64 = 1e-6;

pub fn report(input: &SchedulerInput, solution: &Solution, config: &InsightsConfig) -> Vec<RoleDemand> {
    let total_unmet = solution.total_unmet();

    input
        .roles
        .iter()
        .map(|role| {
            let eligible: Vec<_> = input
                .employees
                .iter()
                .filter(|e| e.is_eligible(&role.id))
                .collect();
            let available_hours: f64 = eligible
                .iter()
                .map(|e| e.usable_hours(input.slot_len_hour))
                .sum();

            let mut working = BTreeSet::new();
            let mut slots_worked = 0usize;
            for a in solution.assignments.iter().filter(|a| a.role_id == role.id) {
                working.insert(a.employee_id.as_str());
                slots_worked += 1;
            }
            let hours_worked = slots_worked as f64 * input.slot_len_hour;
            let capacity_utilization_pct = if available_hours > 0.0 {
                hours_worked / available_hours * 100.0
            } else {
                0.0
            };

            let on_supply_path = input.contributes_to_supply(role);
            let unmet_demand = if on_supply_path { total_unmet } else { 0.0 };
            let is_bottleneck = on_supply_path
                && unmet_demand > UNMET_EPSILON
                && (eligible.is_empty()
                    || capacity_utilization_pct >= config.bottleneck_utilization);

            RoleDemand {
                role_id: role.id.clone(),
                eligible_employees: eligible.len(),
                working_employees: working.len(),
                hours_worked,
                available_hours,
                capacity_utilization_pct,
                unmet_demand,
                is_bottleneck,
            }
        })
        .collect()
}
