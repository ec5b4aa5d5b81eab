// End-to-end scheduling scenarios on the HiGHS backend

mod helpers;

use helpers::{scheduler, server_week, violations, TIME_LIMIT};
use shiftopt::ShiftScheduler;
use shiftopt::{
    Employee, IssueKind, ProductionChain, Role, SchedulerInput, SlotGrid, SolutionStatus,
};

#[test]
fn test_single_role_week_is_optimal() {
    let input = server_week(4, 10.0);
    let outcome = scheduler().solve(&input, Some(TIME_LIMIT)).unwrap();
    let solution = &outcome.solution;

    assert_eq!(solution.status, SolutionStatus::Optimal);
    assert!(solution.total_unmet() < 1e-6);
    assert!(violations(&input, solution).is_empty(), "{:?}", violations(&input, solution));
    // one server per slot covers 10 items easily; min_present forces exactly that
    assert_eq!(solution.assignments.len(), 28);
    for u in &outcome.insights.employee_utilization {
        assert!(u.utilization_pct <= 100.0);
    }
    assert!(outcome.insights.feasibility_analysis.is_feasible);
    assert!(outcome.insights.coverage_gaps.iter().all(|g| g.unmet == 0.0));
}

#[test]
fn test_zero_demand_schedules_nobody() {
    let input = server_week(8, 0.0);
    let outcome = scheduler().solve(&input, Some(TIME_LIMIT)).unwrap();

    assert_eq!(outcome.solution.status, SolutionStatus::Optimal);
    assert!(outcome.solution.assignments.is_empty());
    assert_eq!(outcome.solution.hours_worked("ana"), 0.0);
    assert_eq!(outcome.insights.cost_analysis.total_wage_cost, 0.0);
    assert!(outcome.insights.coverage_gaps.is_empty());
    assert_eq!(outcome.insights.workload_distribution.balance_score, 1.0);
}

#[test]
fn test_min_present_above_staff_is_infeasible() {
    let mut input = server_week(4, 10.0);
    input.roles[0].min_present = 3;
    let outcome = scheduler().solve(&input, Some(TIME_LIMIT)).unwrap();

    assert_eq!(outcome.solution.status, SolutionStatus::Infeasible);
    assert!(outcome.solution.assignments.is_empty());
    let feasibility = &outcome.insights.feasibility_analysis;
    assert!(!feasibility.is_feasible);
    let issue = feasibility
        .issues
        .iter()
        .find(|i| i.kind == IssueKind::UnderstaffedRole)
        .expect("understaffed role issue");
    assert_eq!(issue.role_id.as_deref(), Some("server"));
}

#[test]
fn test_hard_demand_above_capacity_reports_shortfall() {
    let input = SchedulerInput::new(1, 8, 1.0)
        .with_role(Role::producing("server", 10.0))
        .with_employee(
            Employee::new("ana", 15.0, 40.0)
                .with_roles(["server"])
                .available_always(1, 8),
        )
        .with_employee(
            Employee::new("ben", 15.0, 40.0)
                .with_roles(["server"])
                .available_always(1, 8),
        )
        .with_uniform_demand(30.0)
        .with_meet_all_demand(true);
    let outcome = scheduler().solve(&input, Some(TIME_LIMIT)).unwrap();

    assert_eq!(outcome.solution.status, SolutionStatus::Infeasible);
    let issue = outcome
        .insights
        .feasibility_analysis
        .issues
        .iter()
        .find(|i| i.kind == IssueKind::InsufficientTotalCapacity)
        .expect("capacity issue");
    assert_eq!(issue.shortfall, Some(80.0));
    assert!(!outcome.insights.hiring_recommendations.is_empty());
}

#[test]
fn test_soft_demand_above_capacity_leaves_unmet() {
    let input = SchedulerInput::new(1, 4, 1.0)
        .with_role(Role::producing("server", 10.0))
        .with_employee(
            Employee::new("ana", 15.0, 40.0)
                .with_roles(["server"])
                .available_always(1, 4),
        )
        .with_uniform_demand(25.0);
    let outcome = scheduler().solve(&input, Some(TIME_LIMIT)).unwrap();
    let solution = &outcome.solution;

    assert_eq!(solution.status, SolutionStatus::Optimal);
    // ana works every slot and still leaves 15 per slot unserved
    assert_eq!(solution.hours_worked("ana"), 4.0);
    assert!((solution.total_unmet() - 60.0).abs() < 1e-6);
    let cost = &outcome.insights.cost_analysis;
    assert!((cost.opportunity_cost - 300.0).abs() < 1e-6);
    assert_eq!(cost.total_wage_cost, 60.0);
    assert_eq!(outcome.insights.coverage_gaps.len(), 4);

    let server = &outcome.insights.role_demand[0];
    assert!(server.is_bottleneck);
    assert_eq!(server.capacity_utilization_pct, 100.0);
}

#[test]
fn test_chain_without_staff_is_bottleneck() {
    let input = SchedulerInput::new(2, 4, 1.0)
        .with_role(Role::producing("prep", 20.0).chained())
        .with_role(Role::producing("cook", 10.0).chained())
        .with_chain(ProductionChain::new("kitchen", ["prep", "cook"], 1.0))
        .with_employee(
            Employee::new("ana", 15.0, 40.0)
                .with_roles(["prep"])
                .available_always(2, 4),
        )
        .with_uniform_demand(5.0);
    let outcome = scheduler().solve(&input, Some(TIME_LIMIT)).unwrap();

    assert_eq!(outcome.solution.status, SolutionStatus::Optimal);
    assert_eq!(outcome.solution.supply.total(), 0.0);
    assert!((outcome.solution.total_unmet() - 40.0).abs() < 1e-6);

    let cook = outcome
        .insights
        .role_demand
        .iter()
        .find(|r| r.role_id == "cook")
        .unwrap();
    assert!(cook.is_bottleneck);
    assert!(outcome
        .insights
        .hiring_recommendations
        .iter()
        .any(|h| h.role_id.as_deref() == Some("cook")));
}

#[test]
fn test_rules_hold_on_a_constrained_week() {
    let mut availability = SlotGrid::filled(3, 8, true);
    availability.set(0, 0, false);
    availability.set(1, 5, false);
    let input = SchedulerInput::new(3, 8, 0.5)
        .with_day_start_hour(10.0)
        .with_role(Role::producing("server", 20.0).with_min_present(1))
        .with_role(Role::support("host"))
        .with_employee(
            Employee::new("ana", 18.0, 6.0)
                .with_roles(["server", "host"])
                .with_max_consec_slots(4)
                .with_availability(availability),
        )
        .with_employee(
            Employee::new("ben", 14.0, 8.0)
                .with_roles(["server"])
                .with_max_consec_slots(6)
                .with_preferred_hours(6.0)
                .available_always(3, 8),
        )
        .with_employee(
            Employee::new("cy", 12.0, 8.0)
                .with_roles(["server"])
                .with_max_consec_slots(5)
                .available_always(3, 8),
        )
        .with_min_shift_length(2)
        .with_min_rest_slots(3)
        .with_uniform_demand(4.0);
    let outcome = scheduler().solve(&input, Some(TIME_LIMIT)).unwrap();
    let solution = &outcome.solution;

    assert!(solution.status.has_schedule(), "{}", solution.message);
    let found = violations(&input, solution);
    assert!(found.is_empty(), "{:?}", found);

    // hours in the stats match the assignments
    let stats_total: f64 = solution.employee_stats.values().map(|s| s.hours_worked).sum();
    assert!((stats_total - solution.assignments.len() as f64 * 0.5).abs() < 1e-9);
    let block_slots: usize = solution.shift_blocks.iter().map(|b| b.num_slots()).sum();
    assert_eq!(block_slots, solution.assignments.len());
    assert!(solution.shift_blocks.iter().all(|b| b.num_slots() >= 2));
}

#[test]
fn test_same_input_same_objective() {
    let input = server_week(6, 12.0);
    let scheduler = scheduler();
    let first = scheduler.solve(&input, Some(TIME_LIMIT)).unwrap();
    let second = scheduler.solve(&input, Some(TIME_LIMIT)).unwrap();

    assert_eq!(first.solution.status, second.solution.status);
    let a = first.solution.objective_value.unwrap();
    let b = second.solution.objective_value.unwrap();
    assert!((a - b).abs() < 1e-6);
}

#[test]
fn test_infeasible_by_construction_skips_solver() {
    // nobody can work the only role that must be present
    let input = SchedulerInput::new(1, 2, 1.0)
        .with_role(Role::producing("server", 20.0).with_min_present(1))
        .with_role(Role::support("host"))
        .with_employee(
            Employee::new("ana", 15.0, 40.0)
                .with_roles(["host"])
                .available_always(1, 2),
        )
        .with_uniform_demand(5.0);
    let outcome = scheduler().solve(&input, Some(TIME_LIMIT)).unwrap();

    assert_eq!(outcome.solution.status, SolutionStatus::Infeasible);
    assert!(outcome.solution.message.contains("min_staff[server"));
    assert!(outcome
        .insights
        .feasibility_analysis
        .has_issue(IssueKind::UnderstaffedRole));
}

#[test]
fn test_outcome_json_contract() {
    let input = server_week(2, 5.0);
    let outcome = scheduler().solve(&input, Some(TIME_LIMIT)).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["solution"]["status"], "OPTIMAL");
    let rows = json["solution"]["schedule"].as_array().unwrap();
    let first = rows[0].as_array().unwrap();
    assert_eq!(first.len(), 4);
    assert!(first[0].is_string() && first[1].is_u64() && first[3] == "server");
    assert!(json["insights"]["feasibility_analysis"]["is_feasible"]
        .as_bool()
        .unwrap());
}

#[test]
fn test_demo_request_is_valid() {
    let input: SchedulerInput =
        serde_json::from_str(include_str!("../demos/cafe_week.json")).unwrap();
    assert!(shiftopt::domain::validation::validate_input(&input).is_ok());
    assert_eq!(input.num_days, 7);
    assert_eq!(input.chains[0].roles, vec!["prep", "cook"]);

    let config = shiftopt::SchedulerConfig::load(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/demos/shiftopt.toml"
    ))
    .unwrap();
    assert_eq!(config.insights.unmet_item_value, 6.5);
    assert!(ShiftScheduler::new(config).is_ok());
}
