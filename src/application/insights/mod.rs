// Management insights generator.
//
// Runs after every solve, whatever the status. Reports that depend on an
// assignment come back empty when there is none; the feasibility analysis
// then carries the explanation.

pub mod cost;
pub mod coverage;
pub mod feasibility;
pub mod hiring;
pub mod role_demand;
pub mod utilization;
pub mod workload;

use tracing::debug;

use crate::domain::insights::ManagementInsights;
use crate::domain::scheduling::SchedulerInput;
use crate::domain::solution::Solution;
use crate::infrastructure::config::InsightsConfig;

pub fn generate(input: &SchedulerInput, solution: &Solution, config: &InsightsConfig) -> ManagementInsights {
    let feasibility_analysis = feasibility::analyze(input, solution.status, &solution.message);
    let employee_utilization = utilization::report(input, solution);
    let role_demand = role_demand::report(input, solution, config);
    let hiring_recommendations = hiring::report(
        input,
        &role_demand,
        &feasibility_analysis,
        solution.total_unmet(),
        config,
    );
    let coverage_gaps = coverage::report(input, solution);
    let cost_analysis = cost::report(input, solution, config);
    let workload_distribution = workload::report(&employee_utilization);

    let insights = ManagementInsights {
        employee_utilization,
        role_demand,
        hiring_recommendations,
        coverage_gaps,
        cost_analysis,
        workload_distribution,
        feasibility_analysis,
    };
    debug!(
        bottlenecks = insights.bottleneck_roles().count(),
        gaps = insights.coverage_gaps.len(),
        hires = insights.hiring_recommendations.len(),
        "management insights generated"
    );
    insights
}
