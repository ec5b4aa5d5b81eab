// Objective composer
// Adds the linearized cost terms on top of a built constraint model:
// wage cost, unmet demand, |hours - preferred|, the fairness range and the
// slot-preference reward.

use crate::application::model_builder::ScheduleModel;
use crate::domain::models::{Constraint, LinearExpr, Variable};
use crate::domain::scheduling::SchedulerInput;
use crate::infrastructure::config::ObjectiveWeights;

/// Auxiliary columns the objective introduced.
#[derive(Debug, Clone, Default)]
pub struct ObjectiveColumns {
    /// `dev[e] ≥ |hours[e] − preferred_hours[e]|`
    pub deviation: Vec<usize>,
    /// `(hmax, hmin)`, only with two or more employees
    pub range: Option<(usize, usize)>,
}

pub fn compose(
    model: &mut ScheduleModel,
    input: &SchedulerInput,
    weights: &ObjectiveWeights,
) -> ObjectiveColumns {
    let mut columns = ObjectiveColumns::default();
    let num_employees = input.employees.len();

    for (e, employee) in input.employees.iter().enumerate() {
        let hours = model.index.hours(e).clone();
        model
            .problem
            .objective
            .add_expr(&hours, weights.wage * employee.hourly_wage);

        let dev = model
            .problem
            .add_variable(Variable::continuous(format!("dev[{}]", employee.id)));
        let mut above = LinearExpr::var(dev);
        above.add_scaled(&hours, -1.0);
        model.problem.add_constraint(
            Constraint::geq(above, -employee.preferred_hours)
                .with_name(format!("dev_above[{}]", employee.id)),
        );
        let mut below = LinearExpr::var(dev);
        below.add_scaled(&hours, 1.0);
        model.problem.add_constraint(
            Constraint::geq(below, employee.preferred_hours)
                .with_name(format!("dev_below[{}]", employee.id)),
        );
        model
            .problem
            .objective
            .add_expr(&LinearExpr::var(dev), weights.hours);
        columns.deviation.push(dev);

        if weights.slot_preference > 0.0 {
            for (d, t, preferred) in employee.preferences.iter() {
                if *preferred && d < input.num_days && t < input.num_slots_per_day {
                    let work = model.index.work(e, d, t).clone();
                    model
                        .problem
                        .objective
                        .add_expr(&work, -weights.slot_preference);
                }
            }
        }
    }

    if num_employees >= 2 {
        let hmax = model.problem.add_variable(Variable::continuous("hours_max"));
        let hmin = model.problem.add_variable(Variable::continuous("hours_min"));
        for (e, employee) in input.employees.iter().enumerate() {
            let hours = model.index.hours(e).clone();
            let mut upper = LinearExpr::var(hmax);
            upper.add_scaled(&hours, -1.0);
            model.problem.add_constraint(
                Constraint::geq(upper, 0.0).with_name(format!("range_max[{}]", employee.id)),
            );
            let mut lower = LinearExpr::var(hmin);
            lower.add_scaled(&hours, -1.0);
            model.problem.add_constraint(
                Constraint::leq(lower, 0.0).with_name(format!("range_min[{}]", employee.id)),
            );
        }
        model
            .problem
            .objective
            .add_expr(&LinearExpr::var(hmax), weights.fairness);
        model
            .problem
            .objective
            .add_expr(&LinearExpr::var(hmin), -weights.fairness);
        columns.range = Some((hmax, hmin));
    }

    for d in 0..input.num_days {
        for t in 0..input.num_slots_per_day {
            if let Some(unmet) = model.index.unmet(d, t) {
                model
                    .problem
                    .objective
                    .add_expr(&LinearExpr::var(unmet), weights.unmet);
            }
        }
    }

    columns
}
