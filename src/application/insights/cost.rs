// Cost analysis: wages actually paid, split by role, plus the opportunity
// cost of demand left unserved.

use std::collections::BTreeMap;

use crate::domain::insights::CostAnalysis;
use crate::domain::scheduling::SchedulerInput;
use crate::domain::solution::Solution;
use crate::infrastructure::config::InsightsConfig;

pub fn report(input: &SchedulerInput, solution: &Solution, config: &InsightsConfig) -> CostAnalysis {
    let mut analysis = CostAnalysis {
        unmet_item_value: config.unmet_item_value,
        ..Default::default()
    };
    if !solution.status.has_schedule() {
        return analysis;
    }

    let wages: BTreeMap<&str, f64> = input
        .employees
        .iter()
        .map(|e| (e.id.as_str(), e.hourly_wage))
        .collect();
    let mut cost_by_role: BTreeMap<String, f64> = input
        .roles
        .iter()
        .map(|r| (r.id.clone(), 0.0))
        .collect();
    for a in &solution.assignments {
        let cost = wages.get(a.employee_id.as_str()).copied().unwrap_or(0.0) * input.slot_len_hour;
        *cost_by_role.entry(a.role_id.clone()).or_insert(0.0) += cost;
    }

    let total_wage_cost: f64 = cost_by_role.values().sum();
    let unmet_units = solution.total_unmet();
    let units_served = (input.total_demand() - unmet_units).max(0.0);
    let opportunity_cost = unmet_units * config.unmet_item_value;

    analysis.total_wage_cost = total_wage_cost;
    analysis.cost_by_role = cost_by_role;
    analysis.unmet_units = unmet_units;
    analysis.opportunity_cost = opportunity_cost;
    analysis.units_served = units_served;
    analysis.cost_per_unit_served = (units_served > 0.0).then(|| total_wage_cost / units_served);
    analysis.total_cost = total_wage_cost + opportunity_cost;
    analysis
}
