// Employee utilization: hours worked against each weekly cap.

use crate::domain::insights::EmployeeUtilization;
use crate::domain::scheduling::SchedulerInput;
use crate::domain::solution::Solution;
use crate::domain::value_objects::UtilizationStatus;

pub fn report(input: &SchedulerInput, solution: &Solution) -> Vec<EmployeeUtilization> {
    input
        .employees
        .iter()
        .map(|employee| {
            let hours_worked = solution.hours_worked(&employee.id);
            let utilization_pct = if employee.max_hours_per_week > 0.0 {
                hours_worked / employee.max_hours_per_week * 100.0
            } else {
                0.0
            };
            EmployeeUtilization {
                employee_id: employee.id.clone(),
                hours_worked,
                max_hours: employee.max_hours_per_week,
                utilization_pct,
                status: UtilizationStatus::from_percent(utilization_pct),
            }
        })
        .collect()
}
