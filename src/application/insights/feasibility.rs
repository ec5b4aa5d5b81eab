// Feasibility analysis.
//
// Structural checks on the request explain why no schedule exists, or warn
// about rules that will leave demand unserved. They run for every outcome;
// the status decides whether a finding is fatal.
//
// | Check | Issue kind |
// |-------|-----------|
// | Weekly demand above theoretical capacity | `insufficient_total_capacity` |
// | Slot demand above what available staff can supply (hard demand) | `slot_capacity_shortfall` |
// | `min_present` above eligible (available) staff | `understaffed_role` |
// | Sum of `min_present` above available staff in a slot | `slot_over_subscribed` |
// | Chain stage nobody can work | `chain_blocked` |
// | Employee who can never be scheduled | `unschedulable_employee` |

use tracing::debug;

use crate::domain::insights::{FeasibilityAnalysis, FeasibilityIssue, IssueKind};
use crate::domain::scheduling::{Employee, SchedulerInput};
use crate::domain::value_objects::{Severity, SolutionStatus};

const CAPACITY_EPSILON: f64 = 1e-6;

/// Best supply rate `employee` can reach in any of their roles.
fn best_rate(input: &SchedulerInput, employee: &Employee) -> f64 {
    input
        .roles
        .iter()
        .filter(|r| employee.is_eligible(&r.id))
        .map(|r| input.reachable_rate(r))
        .fold(0.0, f64::max)
}

/// Upper bound on weekly output: every employee works all usable hours in
/// their most productive role.
pub fn theoretical_capacity(input: &SchedulerInput) -> f64 {
    input
        .employees
        .iter()
        .map(|e| best_rate(input, e) * e.usable_hours(input.slot_len_hour))
        .sum()
}

pub fn analyze(input: &SchedulerInput, status: SolutionStatus, message: &str) -> FeasibilityAnalysis {
    let hard = if input.meet_all_demand {
        Severity::Critical
    } else {
        Severity::Warning
    };

    let mut issues = Vec::new();
    check_total_capacity(input, hard, &mut issues);
    if input.meet_all_demand {
        check_slot_capacity(input, &mut issues);
    }
    check_min_staffing(input, &mut issues);
    check_chains(input, hard, &mut issues);
    check_employees(input, &mut issues);

    match status {
        SolutionStatus::Unknown => issues.push(FeasibilityIssue::new(
            IssueKind::SolverLimit,
            Severity::Warning,
            "No feasible schedule was found within the time limit; retry with a larger time limit or relax constraints",
        )),
        SolutionStatus::Error => issues.push(FeasibilityIssue::new(
            IssueKind::SolverFailure,
            Severity::Critical,
            format!("The solver failed: {}", message),
        )),
        SolutionStatus::Infeasible
            if !issues.iter().any(|i| i.severity == Severity::Critical) =>
        {
            issues.push(FeasibilityIssue::new(
                IssueKind::ConstraintInteraction,
                Severity::Critical,
                "No single rule explains the infeasibility; the combination of rest periods, \
                 shift length, consecutive-slot limits and weekly hours leaves no valid schedule",
            ))
        }
        _ => {}
    }

    let is_feasible = status.has_schedule();
    let critical = issues.iter().filter(|i| i.severity == Severity::Critical).count();
    let summary = if is_feasible {
        if issues.is_empty() {
            format!("Schedule found ({})", status)
        } else {
            format!("Schedule found ({}) with {} finding(s) to review", status, issues.len())
        }
    } else {
        let first = issues
            .iter()
            .max_by_key(|i| i.severity)
            .map(|i| i.message.as_str())
            .unwrap_or("");
        format!(
            "No usable schedule ({}): {} critical issue(s). {}",
            status, critical, first
        )
    };

    debug!(status = %status, issues = issues.len(), critical, "feasibility analyzed");
    FeasibilityAnalysis {
        status,
        is_feasible,
        issues,
        summary,
    }
}

fn check_total_capacity(input: &SchedulerInput, severity: Severity, issues: &mut Vec<FeasibilityIssue>) {
    let demand = input.total_demand();
    let capacity = theoretical_capacity(input);
    if demand > capacity + CAPACITY_EPSILON {
        let shortfall = demand - capacity;
        issues.push(
            FeasibilityIssue::new(
                IssueKind::InsufficientTotalCapacity,
                severity,
                format!(
                    "Total demand of {:.1} items exceeds the theoretical capacity of {:.1} items (shortfall {:.1})",
                    demand, capacity, shortfall
                ),
            )
            .with_shortfall(shortfall),
        );
    }
}

fn check_slot_capacity(input: &SchedulerInput, issues: &mut Vec<FeasibilityIssue>) {
    for (d, t, &demand) in input.demand.iter() {
        if demand <= 0.0 {
            continue;
        }
        let capacity: f64 = input
            .employees
            .iter()
            .filter(|e| e.is_available(d, t))
            .map(|e| best_rate(input, e) * input.slot_len_hour)
            .sum();
        if demand > capacity + CAPACITY_EPSILON {
            issues.push(
                FeasibilityIssue::new(
                    IssueKind::SlotCapacityShortfall,
                    Severity::Critical,
                    format!(
                        "{} {}: demand {:.1} exceeds the {:.1} items available staff can supply",
                        input.day_name(d),
                        input.clock_at(t),
                        demand,
                        capacity
                    ),
                )
                .at(d, t)
                .with_shortfall(demand - capacity),
            );
        }
    }
}

fn check_min_staffing(input: &SchedulerInput, issues: &mut Vec<FeasibilityIssue>) {
    let active: Vec<(usize, usize)> = input
        .demand
        .iter()
        .filter(|(_, _, v)| **v > 0.0)
        .map(|(d, t, _)| (d, t))
        .collect();
    if active.is_empty() {
        return;
    }

    for role in input.roles.iter().filter(|r| r.min_present > 0) {
        let eligible = input
            .employees
            .iter()
            .filter(|e| e.is_eligible(&role.id))
            .count();
        let required = role.min_present as usize;
        if eligible < required {
            issues.push(
                FeasibilityIssue::new(
                    IssueKind::UnderstaffedRole,
                    Severity::Critical,
                    format!(
                        "Role '{}' needs {} staff present but only {} employee(s) can work it",
                        role.id, required, eligible
                    ),
                )
                .for_role(&role.id)
                .with_shortfall((required - eligible) as f64),
            );
            continue;
        }

        for &(d, t) in &active {
            let present = input
                .employees
                .iter()
                .filter(|e| e.is_eligible(&role.id) && e.is_available(d, t))
                .count();
            if present < required {
                issues.push(
                    FeasibilityIssue::new(
                        IssueKind::UnderstaffedRole,
                        Severity::Critical,
                        format!(
                            "Role '{}' needs {} staff on {} at {} but only {} eligible employee(s) are available",
                            role.id,
                            required,
                            input.day_name(d),
                            input.clock_at(t),
                            present
                        ),
                    )
                    .for_role(&role.id)
                    .at(d, t)
                    .with_shortfall((required - present) as f64),
                );
            }
        }
    }

    let total_required: usize = input.roles.iter().map(|r| r.min_present as usize).sum();
    if total_required == 0 {
        return;
    }
    for &(d, t) in &active {
        let available = input
            .employees
            .iter()
            .filter(|e| e.is_available(d, t) && !e.eligible_roles.is_empty())
            .count();
        if available < total_required {
            issues.push(
                FeasibilityIssue::new(
                    IssueKind::SlotOverSubscribed,
                    Severity::Critical,
                    format!(
                        "{} at {}: roles require {} staff in total but only {} employee(s) are available",
                        input.day_name(d),
                        input.clock_at(t),
                        total_required,
                        available
                    ),
                )
                .at(d, t)
                .with_shortfall((total_required - available) as f64),
            );
        }
    }
}

fn check_chains(input: &SchedulerInput, severity: Severity, issues: &mut Vec<FeasibilityIssue>) {
    for chain in &input.chains {
        for role_id in &chain.roles {
            if input.employees.iter().any(|e| e.is_eligible(role_id)) {
                continue;
            }
            issues.push(
                FeasibilityIssue::new(
                    IssueKind::ChainBlocked,
                    severity,
                    format!(
                        "Chain '{}' cannot produce anything: no employee can work '{}'",
                        chain.id, role_id
                    ),
                )
                .for_role(role_id),
            );
        }
    }
}

fn check_employees(input: &SchedulerInput, issues: &mut Vec<FeasibilityIssue>) {
    let fixed = input.shift_mode.fixed_shifts();
    for employee in &input.employees {
        let reason = if employee.eligible_roles.is_empty() {
            Some("is not eligible for any role".to_string())
        } else if employee.availability.count_true() == 0 {
            Some("has no available slots".to_string())
        } else if input.shift_mode.is_fixed()
            && fixed.iter().all(|s| s.len() > employee.max_consec_slots)
        {
            Some(format!(
                "cannot work any shift template within {} consecutive slots",
                employee.max_consec_slots
            ))
        } else if !input.shift_mode.is_fixed()
            && input.min_shift_length_slots > employee.max_consec_slots
        {
            Some(format!(
                "has a consecutive-slot limit of {} below the minimum shift length of {}",
                employee.max_consec_slots, input.min_shift_length_slots
            ))
        } else {
            None
        };

        if let Some(reason) = reason {
            issues.push(FeasibilityIssue::new(
                IssueKind::UnschedulableEmployee,
                Severity::Warning,
                format!("Employee '{}' {} and will never be scheduled", employee.id, reason),
            ));
        }
    }
}
