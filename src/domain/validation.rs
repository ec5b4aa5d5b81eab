// Input validation for scheduling requests.
//
// Every structural problem is collected before anything is built, so a
// caller sees all reasons at once. Nothing invalid is silently dropped.

use std::collections::HashSet;

use super::error::{SchedulerError, SchedulerResult};
use super::scheduling::{SchedulerInput, ShiftMode};

/// Validate `input`, returning every problem found joined into one error.
pub fn validate_input(input: &SchedulerInput) -> SchedulerResult<()> {
    let mut errors = Vec::new();

    check_horizon(input, &mut errors);
    check_roles(input, &mut errors);
    check_chains(input, &mut errors);
    check_employees(input, &mut errors);
    check_shift_mode(input, &mut errors);
    check_day_names(input, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchedulerError::InvalidInput(errors.join("; ")))
    }
}

fn check_horizon(input: &SchedulerInput, errors: &mut Vec<String>) {
    if !(input.slot_len_hour.is_finite() && input.slot_len_hour > 0.0) {
        errors.push(format!(
            "slot_len_hour must be positive, got {}",
            input.slot_len_hour
        ));
    }
    if input.num_days == 0 {
        errors.push("num_days must be at least 1".to_string());
    }
    if input.num_slots_per_day == 0 {
        errors.push("num_slots_per_day must be at least 1".to_string());
    }
    if input.min_shift_length_slots == 0 {
        errors.push("min_shift_length_slots must be at least 1".to_string());
    }
    if !input.day_start_hour.is_finite() {
        errors.push("day_start_hour must be finite".to_string());
    }

    if !input.demand.has_shape(input.num_days, input.num_slots_per_day) {
        errors.push(format!(
            "demand must be a {} x {} grid",
            input.num_days, input.num_slots_per_day
        ));
    }
    for (day, slot, &value) in input.demand.iter() {
        if !(value.is_finite() && value >= 0.0) {
            errors.push(format!(
                "demand at day {} slot {} must be non-negative, got {}",
                day, slot, value
            ));
        }
    }
}

fn check_roles(input: &SchedulerInput, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for role in &input.roles {
        if !seen.insert(role.id.as_str()) {
            errors.push(format!("Duplicate role ID: {}", role.id));
        }
        match (role.producing, role.items_per_hour) {
            (true, None) => errors.push(format!(
                "Producing role '{}' needs items_per_hour",
                role.id
            )),
            (true, Some(rate)) if !(rate.is_finite() && rate >= 0.0) => errors.push(format!(
                "Role '{}' has negative items_per_hour ({})",
                role.id, rate
            )),
            (false, Some(_)) => errors.push(format!(
                "Non-producing role '{}' must not set items_per_hour",
                role.id
            )),
            _ => {}
        }
    }
}

fn check_chains(input: &SchedulerInput, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for chain in &input.chains {
        if !seen.insert(chain.id.as_str()) {
            errors.push(format!("Duplicate chain ID: {}", chain.id));
        }
        if chain.roles.is_empty() {
            errors.push(format!("Chain '{}' has no roles", chain.id));
        }
        if !(0.0..=1.0).contains(&chain.contrib_factor) {
            errors.push(format!(
                "Chain '{}' contrib_factor must be within [0, 1], got {}",
                chain.id, chain.contrib_factor
            ));
        }
        let mut stages = HashSet::new();
        for role_id in &chain.roles {
            if !stages.insert(role_id.as_str()) {
                errors.push(format!(
                    "Chain '{}' lists role '{}' more than once",
                    chain.id, role_id
                ));
            }
            match input.role(role_id) {
                None => errors.push(format!(
                    "Chain '{}' references unknown role '{}'",
                    chain.id, role_id
                )),
                Some(role) if role.is_independent => errors.push(format!(
                    "Chain '{}' references independent role '{}'",
                    chain.id, role_id
                )),
                Some(_) => {}
            }
        }
    }
}

fn check_employees(input: &SchedulerInput, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for employee in &input.employees {
        let id = &employee.id;
        if !seen.insert(id.as_str()) {
            errors.push(format!("Duplicate employee ID: {}", id));
        }
        if !(employee.hourly_wage.is_finite() && employee.hourly_wage >= 0.0) {
            errors.push(format!(
                "Employee '{}' has negative hourly_wage ({})",
                id, employee.hourly_wage
            ));
        }
        if !(employee.max_hours_per_week.is_finite() && employee.max_hours_per_week >= 0.0) {
            errors.push(format!(
                "Employee '{}' has negative max_hours_per_week ({})",
                id, employee.max_hours_per_week
            ));
        }
        if !(employee.preferred_hours.is_finite() && employee.preferred_hours >= 0.0) {
            errors.push(format!(
                "Employee '{}' has negative preferred_hours ({})",
                id, employee.preferred_hours
            ));
        } else if employee.preferred_hours > employee.max_hours_per_week {
            errors.push(format!(
                "Employee '{}' prefers {} hours but may work at most {}",
                id, employee.preferred_hours, employee.max_hours_per_week
            ));
        }
        if employee.max_consec_slots == 0 {
            errors.push(format!("Employee '{}' has max_consec_slots of 0", id));
        }
        if !employee
            .availability
            .has_shape(input.num_days, input.num_slots_per_day)
        {
            errors.push(format!(
                "Employee '{}' availability must be a {} x {} grid",
                id, input.num_days, input.num_slots_per_day
            ));
        }
        if !employee.preferences.is_empty()
            && !employee
                .preferences
                .has_shape(input.num_days, input.num_slots_per_day)
        {
            errors.push(format!(
                "Employee '{}' preferences must be empty or a {} x {} grid",
                id, input.num_days, input.num_slots_per_day
            ));
        }
        for role_id in &employee.eligible_roles {
            if input.role(role_id).is_none() {
                errors.push(format!(
                    "Employee '{}' is eligible for unknown role '{}'",
                    id, role_id
                ));
            }
        }
    }
}

fn check_shift_mode(input: &SchedulerInput, errors: &mut Vec<String>) {
    let ShiftMode::Fixed { shifts } = &input.shift_mode else {
        return;
    };
    if shifts.is_empty() {
        errors.push("Fixed shift mode needs at least one shift".to_string());
    }
    let mut seen = HashSet::new();
    for shift in shifts {
        if shift.start_slot >= shift.end_slot || shift.end_slot > input.num_slots_per_day {
            errors.push(format!(
                "Fixed shift {}..{} must satisfy start < end <= {}",
                shift.start_slot, shift.end_slot, input.num_slots_per_day
            ));
        }
        if !seen.insert(*shift) {
            errors.push(format!(
                "Fixed shift {}..{} is listed twice",
                shift.start_slot, shift.end_slot
            ));
        }
    }
}

fn check_day_names(input: &SchedulerInput, errors: &mut Vec<String>) {
    if !input.day_names.is_empty() && input.day_names.len() != input.num_days {
        errors.push(format!(
            "day_names must be empty or name all {} days, got {}",
            input.num_days,
            input.day_names.len()
        ));
        return;
    }
    let mut seen = HashSet::new();
    for day in 0..input.num_days {
        let name = input.day_name(day);
        if !seen.insert(name.clone()) {
            errors.push(format!("Day name '{}' is used for more than one day", name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scheduling::{Employee, FixedShift, ProductionChain, Role, SlotGrid};

    fn base() -> SchedulerInput {
        SchedulerInput::new(2, 4, 1.0)
            .with_role(Role::producing("server", 20.0))
            .with_employee(
                Employee::new("ana", 15.0, 40.0)
                    .with_roles(["server"])
                    .available_always(2, 4),
            )
    }

    fn message(input: &SchedulerInput) -> String {
        validate_input(input).unwrap_err().to_string()
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate_input(&base()).is_ok());
    }

    #[test]
    fn test_zero_slot_length_rejected() {
        let mut input = base();
        input.slot_len_hour = 0.0;
        assert!(message(&input).contains("slot_len_hour"));
    }

    #[test]
    fn test_negative_hour_cap_rejected() {
        let mut input = base();
        input.employees[0].max_hours_per_week = -1.0;
        assert!(message(&input).contains("max_hours_per_week"));
    }

    #[test]
    fn test_preferred_above_cap_rejected() {
        let mut input = base();
        input.employees[0].preferred_hours = 50.0;
        assert!(message(&input).contains("prefers 50 hours"));
    }

    #[test]
    fn test_chain_with_unknown_and_independent_roles() {
        let input = base()
            .with_role(Role::producing("cook", 10.0).chained())
            .with_chain(ProductionChain::new("kitchen", ["cook", "ghost", "server"], 0.8));
        let msg = message(&input);
        assert!(msg.contains("unknown role 'ghost'"));
        assert!(msg.contains("independent role 'server'"));
    }

    #[test]
    fn test_contrib_factor_out_of_range() {
        let input = base()
            .with_role(Role::producing("cook", 10.0).chained())
            .with_chain(ProductionChain::new("kitchen", ["cook"], 1.5));
        assert!(message(&input).contains("contrib_factor"));
    }

    #[test]
    fn test_demand_shape_and_sign() {
        let input = base().with_demand(SlotGrid::from_rows(vec![vec![1.0, -2.0, 0.0, 0.0]]));
        let msg = message(&input);
        assert!(msg.contains("demand must be a 2 x 4 grid"));
        assert!(msg.contains("must be non-negative"));
    }

    #[test]
    fn test_role_rate_rules() {
        let mut input = base();
        input.roles.push(Role {
            id: "baker".into(),
            producing: true,
            items_per_hour: None,
            min_present: 0,
            is_independent: true,
        });
        let mut manager = Role::support("manager");
        manager.items_per_hour = Some(3.0);
        input.roles.push(manager);
        let msg = message(&input);
        assert!(msg.contains("'baker' needs items_per_hour"));
        assert!(msg.contains("Non-producing role 'manager'"));
    }

    #[test]
    fn test_unknown_eligible_role_and_duplicates() {
        let input = base()
            .with_employee(
                Employee::new("ana", 15.0, 40.0)
                    .with_roles(["chef"])
                    .available_always(2, 4),
            );
        let msg = message(&input);
        assert!(msg.contains("Duplicate employee ID: ana"));
        assert!(msg.contains("unknown role 'chef'"));
    }

    #[test]
    fn test_fixed_shift_bounds() {
        let input = base().with_fixed_shifts(vec![FixedShift::new(2, 6), FixedShift::new(3, 3)]);
        let msg = message(&input);
        assert!(msg.contains("Fixed shift 2..6"));
        assert!(msg.contains("Fixed shift 3..3"));

        let empty = base().with_fixed_shifts(Vec::new());
        assert!(message(&empty).contains("at least one shift"));
    }

    #[test]
    fn test_day_names_must_cover_horizon() {
        let mut input = base();
        input.day_names = vec!["Tuesday".into()];
        assert!(message(&input).contains("day_names must be empty or name all 2 days"));
    }

    #[test]
    fn test_duplicate_day_names_rejected() {
        let mut input = base();
        input.day_names = vec!["Sat".into(), "Sat".into()];
        assert!(message(&input).contains("Day name 'Sat' is used for more than one day"));

        input.day_names = vec!["Sat".into(), "Sun".into()];
        assert!(validate_input(&input).is_ok());
    }
}
