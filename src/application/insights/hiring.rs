// Hiring recommendations
// Derived from bottleneck roles first, then from role-level feasibility
// findings, and finally a general capacity recommendation when demand goes
// unserved without a single role to blame.

use crate::domain::insights::{FeasibilityAnalysis, HiringRecommendation, IssueKind, RoleDemand};
use crate::domain::scheduling::SchedulerInput;
use crate::domain::value_objects::{HiringPriority, Severity};
use crate::infrastructure::config::InsightsConfig;

use super::role_demand::UNMET_EPSILON;

/// Share of total demand left unmet above which a bottleneck is urgent.
const HIGH_PRIORITY_UNMET_SHARE: f64 = 0.1;

fn hires_for(shortfall: f64, per_hire: f64) -> u32 {
    if per_hire > 0.0 && shortfall > 0.0 {
        (shortfall / per_hire).ceil().max(1.0) as u32
    } else {
        1
    }
}

pub fn report(
    input: &SchedulerInput,
    role_demand: &[RoleDemand],
    feasibility: &FeasibilityAnalysis,
    total_unmet: f64,
    config: &InsightsConfig,
) -> Vec<HiringRecommendation> {
    let mut recommendations: Vec<HiringRecommendation> = Vec::new();
    let total_demand = input.total_demand();

    let per_hire = |role_id: &str| {
        input
            .role(role_id)
            .map_or(0.0, |r| input.reachable_rate(r) * config.full_time_hours)
    };

    for demand in role_demand.iter().filter(|r| r.is_bottleneck) {
        let impact = per_hire(&demand.role_id);
        let priority = if demand.eligible_employees == 0 {
            HiringPriority::Critical
        } else if total_demand > 0.0 && demand.unmet_demand / total_demand >= HIGH_PRIORITY_UNMET_SHARE {
            HiringPriority::High
        } else {
            HiringPriority::Medium
        };
        let reason = if demand.eligible_employees == 0 {
            format!(
                "No employee can work '{}', leaving {:.1} items of demand unmet",
                demand.role_id, demand.unmet_demand
            )
        } else {
            format!(
                "'{}' is at {:.0}% of its staffing capacity with {:.1} items of demand unmet",
                demand.role_id, demand.capacity_utilization_pct, demand.unmet_demand
            )
        };
        recommendations.push(HiringRecommendation {
            role_id: Some(demand.role_id.clone()),
            priority,
            reason,
            recommended_hires: hires_for(demand.unmet_demand, impact),
            estimated_capacity_impact: impact,
        });
    }

    for issue in &feasibility.issues {
        if !matches!(issue.kind, IssueKind::UnderstaffedRole | IssueKind::ChainBlocked) {
            continue;
        }
        let Some(role_id) = issue.role_id.as_deref() else {
            continue;
        };
        if recommendations
            .iter()
            .any(|r| r.role_id.as_deref() == Some(role_id))
        {
            continue;
        }
        let priority = if issue.severity == Severity::Critical {
            HiringPriority::Critical
        } else {
            HiringPriority::High
        };
        let hires = match issue.kind {
            IssueKind::UnderstaffedRole => issue.shortfall.unwrap_or(1.0).ceil().max(1.0) as u32,
            _ => 1,
        };
        recommendations.push(HiringRecommendation {
            role_id: Some(role_id.to_string()),
            priority,
            reason: issue.message.clone(),
            recommended_hires: hires,
            estimated_capacity_impact: per_hire(role_id),
        });
    }

    let capacity_issue = feasibility
        .issues
        .iter()
        .find(|i| i.kind == IssueKind::InsufficientTotalCapacity);
    let shortfall = if total_unmet > UNMET_EPSILON {
        Some(total_unmet)
    } else {
        capacity_issue.and_then(|i| i.shortfall)
    };
    if let (Some(shortfall), true) = (shortfall, recommendations.is_empty()) {
        let impact = input
            .roles
            .iter()
            .map(|r| input.reachable_rate(r) * config.full_time_hours)
            .fold(0.0, f64::max);
        let priority = match capacity_issue {
            Some(issue) if issue.severity == Severity::Critical => HiringPriority::Critical,
            _ => HiringPriority::High,
        };
        recommendations.push(HiringRecommendation {
            role_id: None,
            priority,
            reason: format!(
                "{:.1} items of demand cannot be served with the current staff",
                shortfall
            ),
            recommended_hires: hires_for(shortfall, impact),
            estimated_capacity_impact: impact,
        });
    }

    recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::insights::feasibility;
    use crate::domain::scheduling::{Employee, ProductionChain, Role};
    use crate::domain::value_objects::SolutionStatus;

    fn bottleneck(role_id: &str, eligible: usize, unmet: f64) -> RoleDemand {
        RoleDemand {
            role_id: role_id.into(),
            eligible_employees: eligible,
            working_employees: eligible,
            hours_worked: 0.0,
            available_hours: 0.0,
            capacity_utilization_pct: 100.0,
            unmet_demand: unmet,
            is_bottleneck: true,
        }
    }

    fn input() -> SchedulerInput {
        SchedulerInput::new(1, 10, 1.0)
            .with_role(Role::producing("server", 10.0))
            .with_role(Role::producing("cook", 5.0).chained())
            .with_chain(ProductionChain::new("kitchen", ["cook"], 1.0))
            .with_employee(
                Employee::new("ana", 15.0, 40.0)
                    .with_roles(["server"])
                    .available_always(1, 10),
            )
            .with_uniform_demand(20.0)
    }

    #[test]
    fn test_bottleneck_recommendations_ranked() {
        let input = input();
        let roles = vec![bottleneck("server", 1, 5.0), bottleneck("cook", 0, 100.0)];
        let feasibility = FeasibilityAnalysis::feasible(SolutionStatus::Optimal);
        let recs = report(&input, &roles, &feasibility, 100.0, &InsightsConfig::default());

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].role_id.as_deref(), Some("cook"));
        assert_eq!(recs[0].priority, HiringPriority::Critical);
        // one cook adds 5 × 40 = 200 items per week
        assert_eq!(recs[0].estimated_capacity_impact, 200.0);
        assert_eq!(recs[0].recommended_hires, 1);
        assert_eq!(recs[1].priority, HiringPriority::Medium);
        assert_eq!(recs[1].estimated_capacity_impact, 400.0);
    }

    #[test]
    fn test_general_recommendation_from_capacity_issue() {
        let input = input().with_meet_all_demand(true);
        let feasibility = feasibility::analyze(&input, SolutionStatus::Infeasible, "");
        let recs = report(&input, &[], &feasibility, 0.0, &InsightsConfig::default());

        // chain blocked on cook comes first, then no general entry since a role is named
        assert_eq!(recs[0].role_id.as_deref(), Some("cook"));
        assert!(recs.iter().all(|r| r.role_id.is_some()));
    }

    #[test]
    fn test_general_recommendation_when_no_role_to_blame() {
        let mut input = input();
        input.chains.clear();
        input.roles.truncate(1);
        let input = input.with_meet_all_demand(true);
        let feasibility = feasibility::analyze(&input, SolutionStatus::Infeasible, "");
        let recs = report(&input, &[], &feasibility, 0.0, &InsightsConfig::default());

        assert_eq!(recs.len(), 1);
        assert!(recs[0].role_id.is_none());
        assert_eq!(recs[0].priority, HiringPriority::Critical);
        // 200 demanded, 100 capacity, 400 per full-time hire
        assert_eq!(recs[0].recommended_hires, 1);
    }

    #[test]
    fn test_nothing_to_recommend() {
        let mut input = input();
        input.chains.clear();
        input.roles.truncate(1);
        input = input.with_uniform_demand(1.0);
        let feasibility = feasibility::analyze(&input, SolutionStatus::Optimal, "");
        assert!(report(&input, &[], &feasibility, 0.0, &InsightsConfig::default()).is_empty());
    }
}
