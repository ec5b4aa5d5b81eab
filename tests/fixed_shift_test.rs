// Fixed shift templates: whole-shift staffing and the day → shift table

mod helpers;

use helpers::{scheduler, violations, TIME_LIMIT};
use shiftopt::{
    Employee, FixedShift, Role, ScheduleView, SchedulerInput, SlotGrid, SolutionStatus,
};

fn diner() -> SchedulerInput {
    // 08:00-20:00 in hourly slots, three 4-hour templates
    let mut demand = SlotGrid::filled(2, 12, 0.0);
    for d in 0..2 {
        for t in 0..8 {
            demand.set(d, t, 10.0);
        }
    }
    let mut ben_availability = SlotGrid::filled(2, 12, true);
    ben_availability.set(1, 2, false);

    SchedulerInput::new(2, 12, 1.0)
        .with_day_start_hour(8.0)
        .with_role(Role::producing("server", 20.0).with_min_present(1))
        .with_employee(
            Employee::new("ana", 15.0, 40.0)
                .with_roles(["server"])
                .available_always(2, 12),
        )
        .with_employee(
            Employee::new("ben", 13.0, 40.0)
                .with_roles(["server"])
                .with_availability(ben_availability),
        )
        .with_fixed_shifts(vec![
            FixedShift::new(0, 4),
            FixedShift::new(4, 8),
            FixedShift::new(8, 12),
        ])
        .with_demand(demand)
}

#[test]
fn test_fixed_shifts_cover_whole_templates() {
    let input = diner();
    let outcome = scheduler().solve(&input, Some(TIME_LIMIT)).unwrap();
    let solution = &outcome.solution;

    assert_eq!(solution.status, SolutionStatus::Optimal);
    assert!(violations(&input, solution).is_empty());
    // morning and afternoon on both days, evenings have no demand
    assert_eq!(solution.shift_blocks.len(), 4);
    for block in &solution.shift_blocks {
        assert_eq!(block.num_slots(), 4);
        assert!(block.end_slot <= 8);
    }
    assert_eq!(solution.assignments.len(), 16);
    // ben cannot take the Tuesday morning shift
    assert!(!solution
        .shift_blocks
        .iter()
        .any(|b| b.employee_id == "ben" && b.day == 1 && b.start_slot == 0));
}

#[test]
fn test_shift_table_shape() {
    let outcome = scheduler().solve(&diner(), Some(TIME_LIMIT)).unwrap();
    let ScheduleView::Shifts(table) = &outcome.solution.schedule else {
        panic!("fixed mode must produce a shift table");
    };

    let days: Vec<&str> = table.keys().map(String::as_str).collect();
    assert_eq!(days, vec!["Monday", "Tuesday"]);
    let monday = &table["Monday"];
    let labels: Vec<&str> = monday
        .iter()
        .flat_map(|entry| entry.keys().map(String::as_str))
        .collect();
    assert_eq!(labels, vec!["08:00-12:00", "12:00-16:00", "16:00-20:00"]);
    assert_eq!(monday[0]["08:00-12:00"].len(), 1);
    assert!(monday[2]["16:00-20:00"].is_empty());

    let json = serde_json::to_value(&outcome.solution.schedule).unwrap();
    assert!(json["Tuesday"].as_array().unwrap()[1]["12:00-16:00"].is_array());
}

#[test]
fn test_shift_longer_than_consecutive_cap_is_never_used() {
    let mut input = diner();
    for employee in &mut input.employees {
        employee.max_consec_slots = 3;
    }
    let outcome = scheduler().solve(&input, Some(TIME_LIMIT)).unwrap();

    // min_present cannot be met with no usable template
    assert_eq!(outcome.solution.status, SolutionStatus::Infeasible);
    // the table shape does not depend on the status
    let json = serde_json::to_value(&outcome.solution).unwrap();
    let schedule = json["schedule"].as_object().expect("day table");
    assert_eq!(schedule.len(), 2);
    let monday = schedule["Monday"].as_array().unwrap();
    assert_eq!(monday.len(), 3);
    assert!(monday[0]["08:00-12:00"].as_array().unwrap().is_empty());
    assert!(outcome
        .insights
        .feasibility_analysis
        .issues
        .iter()
        .any(|i| i.message.contains("cannot work any shift template")));
}
