// Coverage gaps: active slots left short, empty, or staffed with no buffer.

use crate::domain::insights::CoverageGap;
use crate::domain::scheduling::SchedulerInput;
use crate::domain::solution::Solution;
use crate::domain::value_objects::Severity;

use super::role_demand::UNMET_EPSILON;

pub fn report(input: &SchedulerInput, solution: &Solution) -> Vec<CoverageGap> {
    if !solution.status.has_schedule() {
        return Vec::new();
    }
    let minimum_required: u32 = input.roles.iter().map(|r| r.min_present).sum();

    let mut gaps = Vec::new();
    for (d, t, &demand) in input.demand.iter() {
        if demand <= 0.0 {
            continue;
        }
        let workers_present = solution.assignments_on(d, t).count();
        let unmet = solution.unmet_demand.value(d, t);

        let severity = if unmet > UNMET_EPSILON || workers_present == 0 {
            Severity::Critical
        } else if minimum_required > 0 && workers_present == minimum_required as usize {
            Severity::Warning
        } else {
            continue;
        };

        gaps.push(CoverageGap {
            day: d,
            day_name: input.day_name(d),
            slot: t,
            time: input.clock_at(t),
            demand,
            supply: solution.supply.value(d, t),
            unmet,
            workers_present,
            minimum_required,
            severity,
        });
    }
    gaps
}
