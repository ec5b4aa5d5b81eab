// Solution decoder.
//
// Reads solved column values back into per-slot assignments, per-employee
// totals and the supply actually delivered. Supply is recomputed from the
// rounded assignments rather than read off the program, so chain output is
// the true minimum of the stage capacities.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::application::model_builder::VariableIndex;
use crate::domain::scheduling::{SchedulerInput, SlotGrid};
use crate::domain::solution::{EmployeeStats, SlotAssignment};

/// Unmet amounts closer than this are considered equal.
const UNMET_TOLERANCE: f64 = 1e-4;

/// One worked shift instance in fixed mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftInstance {
    pub employee: usize,
    pub day: usize,
    /// Index into the shift templates
    pub shift: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DecodedSchedule {
    /// Employee-major, then day, then slot
    pub assignments: Vec<SlotAssignment>,
    pub shifts: Vec<ShiftInstance>,
    pub employee_stats: BTreeMap<String, EmployeeStats>,
    pub supply: SlotGrid<f64>,
    pub unmet: SlotGrid<f64>,
}

fn is_set(values: &[f64], column: usize) -> bool {
    values.get(column).copied().unwrap_or(0.0) > 0.5
}

pub fn decode(input: &SchedulerInput, index: &VariableIndex, values: &[f64]) -> DecodedSchedule {
    let mut decoded = DecodedSchedule {
        supply: SlotGrid::filled(input.num_days, input.num_slots_per_day, 0.0),
        unmet: SlotGrid::filled(input.num_days, input.num_slots_per_day, 0.0),
        ..Default::default()
    };

    // staffed[r][cell]: people working role r in the slot
    let cells = input.num_slots();
    let mut staffed = vec![vec![0usize; cells]; input.roles.len()];

    for (e, employee) in input.employees.iter().enumerate() {
        let mut slots_worked = 0usize;
        for d in 0..input.num_days {
            for k in 0..index.shift_templates().len() {
                if index.shift(e, d, k).is_some_and(|col| is_set(values, col)) {
                    decoded.shifts.push(ShiftInstance {
                        employee: e,
                        day: d,
                        shift: k,
                    });
                }
            }

            for t in 0..input.num_slots_per_day {
                let chosen = (0..input.roles.len())
                    .filter_map(|r| index.role(e, r, d, t).map(|col| (r, col)))
                    .find(|&(_, col)| is_set(values, col));
                let worked = index.work(e, d, t).evaluate(values) > 0.5;

                match chosen {
                    Some((r, _)) => {
                        slots_worked += 1;
                        staffed[r][d * input.num_slots_per_day + t] += 1;
                        decoded.assignments.push(SlotAssignment {
                            employee_id: employee.id.clone(),
                            day: d,
                            slot: t,
                            role_id: input.roles[r].id.clone(),
                        });
                    }
                    None if worked => warn!(
                        employee = %employee.id,
                        day = d,
                        slot = t,
                        "slot worked without a role, dropped from the schedule"
                    ),
                    None => {}
                }
            }
        }

        let hours_worked = slots_worked as f64 * input.slot_len_hour;
        decoded.employee_stats.insert(
            employee.id.clone(),
            EmployeeStats {
                hours_worked,
                preferred_hours: employee.preferred_hours,
                deviation: hours_worked - employee.preferred_hours,
            },
        );
    }
    // stable: employees keep input order within a slot
    decoded.assignments.sort_by_key(|a| (a.day, a.slot));

    let mut mismatches = 0usize;
    for d in 0..input.num_days {
        for t in 0..input.num_slots_per_day {
            let cell = d * input.num_slots_per_day + t;
            let capacity: Vec<f64> = input
                .roles
                .iter()
                .enumerate()
                .map(|(r, role)| staffed[r][cell] as f64 * role.rate() * input.slot_len_hour)
                .collect();
            let supply = slot_supply(input, &capacity);
            let unmet = (input.demand_at(d, t) - supply).max(0.0);
            decoded.supply.set(d, t, supply);
            decoded.unmet.set(d, t, unmet);

            let modelled = index.unmet(d, t).map_or(0.0, |col| values.get(col).copied().unwrap_or(0.0));
            if (modelled - unmet).abs() > UNMET_TOLERANCE {
                mismatches += 1;
                warn!(
                    day = d,
                    slot = t,
                    modelled,
                    recomputed = unmet,
                    "unmet demand differs from the solver's value"
                );
            }
        }
    }

    debug!(
        assignments = decoded.assignments.len(),
        shifts = decoded.shifts.len(),
        unmet = decoded.unmet.total(),
        mismatches,
        "solution decoded"
    );
    decoded
}

/// Supply of one slot given each role's capacity there.
pub fn slot_supply(input: &SchedulerInput, capacity: &[f64]) -> f64 {
    let direct: f64 = input
        .roles
        .iter()
        .zip(capacity)
        .filter(|(role, _)| role.supplies_directly())
        .map(|(_, c)| *c)
        .sum();

    let chained: f64 = input
        .chains
        .iter()
        .map(|chain| {
            let slowest = chain
                .roles
                .iter()
                .map(|id| input.role_index(id).map_or(0.0, |r| capacity[r]))
                .fold(f64::INFINITY, f64::min);
            if slowest.is_finite() {
                chain.contrib_factor * slowest
            } else {
                0.0
            }
        })
        .sum();

    direct + chained
}
