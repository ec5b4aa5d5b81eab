// Shared fixtures and post-hoc checks for the integration tests

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use shiftopt::{Employee, Role, SchedulerConfig, SchedulerInput, ShiftScheduler, Solution};

pub const TIME_LIMIT: f64 = 30.0;

pub fn scheduler() -> ShiftScheduler {
    shiftopt::infrastructure::logging::init_test();
    ShiftScheduler::new(SchedulerConfig::default().with_time_limit(TIME_LIMIT))
        .expect("default scheduler")
}

/// One "server" role (20 items/h, one present), two staff always available.
pub fn server_week(num_slots: usize, demand: f64) -> SchedulerInput {
    let mut input = SchedulerInput::new(7, num_slots, 1.0)
        .with_role(Role::producing("server", 20.0).with_min_present(1))
        .with_uniform_demand(demand);
    for id in ["ana", "ben"] {
        input = input.with_employee(
            Employee::new(id, 15.0, 40.0)
                .with_roles(["server"])
                .available_always(7, num_slots),
        );
    }
    input
}

/// Every hard rule a returned schedule must satisfy, checked from the
/// decoded assignments alone.
pub fn violations(input: &SchedulerInput, solution: &Solution) -> Vec<String> {
    let mut found = Vec::new();
    let employees: BTreeMap<&str, &Employee> =
        input.employees.iter().map(|e| (e.id.as_str(), e)).collect();

    let mut worked: BTreeMap<&str, BTreeSet<(usize, usize)>> = BTreeMap::new();
    for a in &solution.assignments {
        let Some(employee) = employees.get(a.employee_id.as_str()) else {
            found.push(format!("unknown employee {}", a.employee_id));
            continue;
        };
        if !employee.is_available(a.day, a.slot) {
            found.push(format!("{} works unavailable slot {}/{}", a.employee_id, a.day, a.slot));
        }
        if !employee.is_eligible(&a.role_id) {
            found.push(format!("{} works ineligible role {}", a.employee_id, a.role_id));
        }
        if !worked
            .entry(a.employee_id.as_str())
            .or_default()
            .insert((a.day, a.slot))
        {
            found.push(format!("{} holds two roles in {}/{}", a.employee_id, a.day, a.slot));
        }
    }

    let slots = input.num_slots_per_day;
    for employee in &input.employees {
        let cells = worked.get(employee.id.as_str()).cloned().unwrap_or_default();
        let hours = cells.len() as f64 * input.slot_len_hour;
        if hours > employee.max_hours_per_week + 1e-9 {
            found.push(format!("{} works {} h over the cap", employee.id, hours));
        }

        for d in 0..input.num_days {
            let mut run = 0;
            for t in 0..=slots {
                if t < slots && cells.contains(&(d, t)) {
                    run += 1;
                    continue;
                }
                if run > employee.max_consec_slots {
                    found.push(format!("{} works {} slots in a row on day {}", employee.id, run, d));
                }
                if run > 0 && !input.shift_mode.is_fixed() && run < input.min_shift_length_slots {
                    found.push(format!("{} has a {}-slot shift on day {}", employee.id, run, d));
                }
                run = 0;
            }

            if d + 1 < input.num_days && input.min_rest_slots > 0 {
                let last = (0..slots).rev().find(|&t| cells.contains(&(d, t)));
                let first = (0..slots).find(|&u| cells.contains(&(d + 1, u)));
                if let (Some(t), Some(u)) = (last, first) {
                    if (slots - 1 - t) + u < input.min_rest_slots {
                        found.push(format!("{} rests too little after day {}", employee.id, d));
                    }
                }
            }
        }
    }

    for (d, t, &demand) in input.demand.iter() {
        if demand <= 0.0 {
            continue;
        }
        for role in input.roles.iter().filter(|r| r.min_present > 0) {
            let present = solution
                .assignments_on(d, t)
                .filter(|a| a.role_id == role.id)
                .count();
            if present < role.min_present as usize {
                found.push(format!("{} understaffed in {}/{}", role.id, d, t));
            }
        }
        if input.meet_all_demand && solution.unmet_demand.value(d, t) > 1e-6 {
            found.push(format!("hard demand unmet in {}/{}", d, t));
        }
    }
    found
}
