// Constraint model builder.
//
// Turns a validated `SchedulerInput` into an `OptimizationProblem` whose
// columns are the scheduling decisions, together with a `VariableIndex`
// that maps (employee, role, day, slot) coordinates back to columns.
//
// Slot mode owns one binary `x[e,d,t]` per employee and slot. Fixed mode owns
// one binary `z[e,d,k]` per employee and shift instance, and `x[e,d,t]` is the
// sum of the shift columns covering that slot. Everything downstream reads
// `x` through `VariableIndex::work`, so both modes share the same rows.

use tracing::debug;

use crate::domain::models::{Constraint, LinearExpr, OptimizationProblem, Variable};
use crate::domain::scheduling::{FixedShift, SchedulerInput, ShiftMode};
use crate::domain::value_objects::OptimizationType;

/// Column lookup for one built model.
#[derive(Debug, Clone)]
pub struct VariableIndex {
    num_roles: usize,
    num_days: usize,
    num_slots: usize,
    work: Vec<LinearExpr>,
    role: Vec<Option<usize>>,
    shift: Vec<Option<usize>>,
    shift_templates: Vec<FixedShift>,
    start: Vec<Option<usize>>,
    chain_output: Vec<Option<usize>>,
    unmet: Vec<Option<usize>>,
    hours: Vec<LinearExpr>,
}

impl VariableIndex {
    fn new(input: &SchedulerInput) -> Self {
        let e = input.employees.len();
        let cells = input.num_days * input.num_slots_per_day;
        let shift_templates = input.shift_mode.fixed_shifts().to_vec();
        Self {
            num_roles: input.roles.len(),
            num_days: input.num_days,
            num_slots: input.num_slots_per_day,
            work: vec![LinearExpr::new(); e * cells],
            role: vec![None; e * input.roles.len() * cells],
            shift: vec![None; e * input.num_days * shift_templates.len()],
            shift_templates,
            start: vec![None; e * cells],
            chain_output: vec![None; input.chains.len() * cells],
            unmet: vec![None; cells],
            hours: vec![LinearExpr::new(); e],
        }
    }

    fn cell(&self, day: usize, slot: usize) -> usize {
        day * self.num_slots + slot
    }

    fn employee_cell(&self, employee: usize, day: usize, slot: usize) -> usize {
        employee * self.num_days * self.num_slots + self.cell(day, slot)
    }

    fn role_cell(&self, employee: usize, role: usize, day: usize, slot: usize) -> usize {
        (employee * self.num_roles + role) * self.num_days * self.num_slots + self.cell(day, slot)
    }

    fn shift_cell(&self, employee: usize, day: usize, shift: usize) -> usize {
        (employee * self.num_days + day) * self.shift_templates.len() + shift
    }

    /// `x[e,d,t]`: 1 when employee `e` works day `d`, slot `t`.
    pub fn work(&self, employee: usize, day: usize, slot: usize) -> &LinearExpr {
        &self.work[self.employee_cell(employee, day, slot)]
    }

    /// `y[e,r,d,t]`; `None` when the employee cannot take the role there.
    pub fn role(&self, employee: usize, role: usize, day: usize, slot: usize) -> Option<usize> {
        self.role[self.role_cell(employee, role, day, slot)]
    }

    /// `z[e,d,k]` (fixed mode only).
    pub fn shift(&self, employee: usize, day: usize, shift: usize) -> Option<usize> {
        if self.shift_templates.is_empty() {
            return None;
        }
        self.shift[self.shift_cell(employee, day, shift)]
    }

    pub fn shift_templates(&self) -> &[FixedShift] {
        &self.shift_templates
    }

    /// Shift-start indicator `s[e,d,t]` (slot mode with minimum shift length).
    pub fn start(&self, employee: usize, day: usize, slot: usize) -> Option<usize> {
        self.start[self.employee_cell(employee, day, slot)]
    }

    /// Chain output column; exists for slots with demand only.
    pub fn chain_output(&self, chain: usize, day: usize, slot: usize) -> Option<usize> {
        self.chain_output[chain * self.num_days * self.num_slots + self.cell(day, slot)]
    }

    /// Unmet demand column; exists in soft mode for slots with demand.
    pub fn unmet(&self, day: usize, slot: usize) -> Option<usize> {
        self.unmet[self.cell(day, slot)]
    }

    /// Hours worked by employee `e` over the horizon.
    pub fn hours(&self, employee: usize) -> &LinearExpr {
        &self.hours[employee]
    }

    pub fn num_employees(&self) -> usize {
        self.hours.len()
    }
}

/// Program plus column index for one scheduling request.
#[derive(Debug, Clone)]
pub struct ScheduleModel {
    pub problem: OptimizationProblem,
    pub index: VariableIndex,
}

impl ScheduleModel {
    /// Build every decision column and hard rule for `input`.
    ///
    /// `input` must already have passed validation.
    pub fn build(input: &SchedulerInput) -> Self {
        let problem = OptimizationProblem::new(OptimizationType::Minimize)
            .with_name("shift_schedule")
            .with_description(format!(
                "{} employees, {} roles, {} days x {} slots",
                input.employees.len(),
                input.roles.len(),
                input.num_days,
                input.num_slots_per_day
            ));
        let mut builder = ModelBuilder {
            input,
            index: VariableIndex::new(input),
            problem,
        };

        match &input.shift_mode {
            ShiftMode::Slots => builder.add_slot_columns(),
            ShiftMode::Fixed { shifts } => builder.add_shift_columns(shifts),
        }
        builder.add_role_columns();
        builder.add_min_staffing();
        builder.add_hour_caps();
        builder.add_consecutive_caps();
        if !input.shift_mode.is_fixed() {
            builder.add_min_shift_length();
        }
        builder.add_rest_rules();
        builder.add_supply_balance();

        debug!(
            variables = builder.problem.num_variables(),
            constraints = builder.problem.constraints.len(),
            binaries = builder.problem.num_binary_variables(),
            "constraint model built"
        );

        ScheduleModel {
            problem: builder.problem,
            index: builder.index,
        }
    }

    /// Capacity expression `Σ_e y[e,r,d,t] · items_per_hour[r] · slot_len_hour`.
    pub fn capacity(&self, input: &SchedulerInput, role: usize, day: usize, slot: usize) -> LinearExpr {
        capacity_expr(&self.index, input, role, day, slot)
    }
}

fn capacity_expr(
    index: &VariableIndex,
    input: &SchedulerInput,
    role: usize,
    day: usize,
    slot: usize,
) -> LinearExpr {
    let per_person = input.roles[role].rate() * input.slot_len_hour;
    let mut expr = LinearExpr::new();
    for e in 0..input.employees.len() {
        if let Some(col) = index.role(e, role, day, slot) {
            expr.add_term(col, per_person);
        }
    }
    expr
}

struct ModelBuilder<'a> {
    input: &'a SchedulerInput,
    index: VariableIndex,
    problem: OptimizationProblem,
}

impl ModelBuilder<'_> {
    fn slots(&self) -> Vec<(usize, usize)> {
        let slots = self.input.num_slots_per_day;
        (0..self.input.num_days)
            .flat_map(|d| (0..slots).map(move |t| (d, t)))
            .collect()
    }

    // Availability lives in the column bounds: an unavailable slot gets ub = 0.
    fn add_slot_columns(&mut self) {
        let input = self.input;
        for (e, employee) in input.employees.iter().enumerate() {
            for (d, t) in self.slots() {
                let mut var = Variable::binary(format!("x[{},{},{}]", employee.id, d, t));
                if !employee.is_available(d, t) {
                    var = var.fixed_to_zero();
                }
                let col = self.problem.add_variable(var);
                let cell = self.index.employee_cell(e, d, t);
                self.index.work[cell] = LinearExpr::var(col);
            }
        }
    }

    fn add_shift_columns(&mut self, shifts: &[FixedShift]) {
        let input = self.input;
        for (e, employee) in input.employees.iter().enumerate() {
            for d in 0..input.num_days {
                for (k, shift) in shifts.iter().enumerate() {
                    let workable = (shift.start_slot..shift.end_slot)
                        .all(|t| employee.is_available(d, t))
                        && shift.len() <= employee.max_consec_slots;
                    let mut var = Variable::binary(format!(
                        "z[{},{},{}-{}]",
                        employee.id, d, shift.start_slot, shift.end_slot
                    ));
                    if !workable {
                        var = var.fixed_to_zero();
                    }
                    let col = self.problem.add_variable(var);
                    let shift_cell = self.index.shift_cell(e, d, k);
                    self.index.shift[shift_cell] = Some(col);
                    for t in shift.start_slot..shift.end_slot {
                        let cell = self.index.employee_cell(e, d, t);
                        self.index.work[cell].add_term(col, 1.0);
                    }
                }

                // Overlapping templates must not double-book a slot
                for t in 0..input.num_slots_per_day {
                    let work = self.index.work(e, d, t);
                    if work.terms.len() > 1 {
                        let row = Constraint::leq(work.clone(), 1.0)
                            .with_name(format!("overlap[{},{},{}]", employee.id, d, t));
                        self.problem.add_constraint(row);
                    }
                }
            }
        }
    }

    // Eligibility by omission: y only exists for eligible, workable slots.
    // Every worked slot carries exactly one role: Σ_r y = x.
    fn add_role_columns(&mut self) {
        let input = self.input;
        for (e, employee) in input.employees.iter().enumerate() {
            for (d, t) in self.slots() {
                let work = self.index.work(e, d, t).clone();
                // unavailable, or no shift template covers the slot
                if !employee.is_available(d, t) || work.is_constant() {
                    continue;
                }
                let mut roles = LinearExpr::new();
                for (r, role) in input.roles.iter().enumerate() {
                    if !employee.is_eligible(&role.id) {
                        continue;
                    }
                    let col = self.problem.add_variable(Variable::binary(format!(
                        "y[{},{},{},{}]",
                        employee.id, role.id, d, t
                    )));
                    let cell = self.index.role_cell(e, r, d, t);
                    self.index.role[cell] = Some(col);
                    roles.add_term(col, 1.0);
                }

                if roles.terms.len() > 1 {
                    self.problem.add_constraint(
                        Constraint::leq(roles.clone(), 1.0)
                            .with_name(format!("one_role[{},{},{}]", employee.id, d, t)),
                    );
                }
                let mut link = roles;
                link.add_scaled(&work, -1.0);
                self.problem.add_constraint(
                    Constraint::eq(link, 0.0)
                        .with_name(format!("role_link[{},{},{}]", employee.id, d, t)),
                );
            }
        }
    }

    fn add_min_staffing(&mut self) {
        let input = self.input;
        for (r, role) in input.roles.iter().enumerate() {
            if role.min_present == 0 {
                continue;
            }
            for (d, t) in self.slots() {
                if !input.is_active(d, t) {
                    continue;
                }
                let mut staff = LinearExpr::new();
                for e in 0..input.employees.len() {
                    if let Some(col) = self.index.role(e, r, d, t) {
                        staff.add_term(col, 1.0);
                    }
                }
                self.problem.add_constraint(
                    Constraint::geq(staff, role.min_present as f64)
                        .with_name(format!("min_staff[{},{},{}]", role.id, d, t)),
                );
            }
        }
    }

    fn add_hour_caps(&mut self) {
        let input = self.input;
        for (e, employee) in input.employees.iter().enumerate() {
            let mut hours = LinearExpr::new();
            for (d, t) in self.slots() {
                hours.add_scaled(self.index.work(e, d, t), input.slot_len_hour);
            }
            if !hours.is_constant() {
                self.problem.add_constraint(
                    Constraint::leq(hours.clone(), employee.max_hours_per_week)
                        .with_name(format!("max_hours[{}]", employee.id)),
                );
            }
            self.index.hours[e] = hours;
        }
    }

    // Every window of max_consec + 1 slots within a day has at least one gap.
    fn add_consecutive_caps(&mut self) {
        let input = self.input;
        let num_slots = input.num_slots_per_day;
        for (e, employee) in input.employees.iter().enumerate() {
            let window = employee.max_consec_slots + 1;
            if window > num_slots {
                continue;
            }
            for d in 0..input.num_days {
                for first in 0..=num_slots - window {
                    let mut run = LinearExpr::new();
                    for t in first..first + window {
                        run.add_scaled(self.index.work(e, d, t), 1.0);
                    }
                    if run.is_constant() {
                        continue;
                    }
                    self.problem.add_constraint(
                        Constraint::leq(run, employee.max_consec_slots as f64)
                            .with_name(format!("max_consec[{},{},{}]", employee.id, d, first)),
                    );
                }
            }
        }
    }

    // s[e,d,t] ≥ x_t − x_{t−1}; a start forces the next L−1 slots on.
    fn add_min_shift_length(&mut self) {
        let input = self.input;
        let length = input.min_shift_length_slots;
        if length <= 1 {
            return;
        }
        let num_slots = input.num_slots_per_day;
        for (e, employee) in input.employees.iter().enumerate() {
            for d in 0..input.num_days {
                for t in 0..num_slots {
                    if !employee.is_available(d, t) {
                        continue;
                    }
                    let mut var = Variable::binary(format!("s[{},{},{}]", employee.id, d, t));
                    if t + length > num_slots {
                        var = var.fixed_to_zero();
                    }
                    let start = self.problem.add_variable(var);
                    let cell = self.index.employee_cell(e, d, t);
                    self.index.start[cell] = Some(start);

                    let mut def = LinearExpr::var(start);
                    def.add_scaled(self.index.work(e, d, t), -1.0);
                    if t > 0 {
                        def.add_scaled(self.index.work(e, d, t - 1), 1.0);
                    }
                    self.problem.add_constraint(
                        Constraint::geq(def, 0.0)
                            .with_name(format!("shift_start[{},{},{}]", employee.id, d, t)),
                    );

                    for k in 1..length {
                        if t + k >= num_slots {
                            break;
                        }
                        let mut follow = self.index.work(e, d, t + k).clone();
                        follow.add_term(start, -1.0);
                        self.problem.add_constraint(
                            Constraint::geq(follow, 0.0).with_name(format!(
                                "min_shift[{},{},{},{}]",
                                employee.id, d, t, k
                            )),
                        );
                    }
                }
            }
        }
    }

    // Slot t on day d and slot u on day d+1 are (T−1−t)+u slots apart.
    fn add_rest_rules(&mut self) {
        let input = self.input;
        let rest = input.min_rest_slots;
        if rest == 0 || input.num_days < 2 {
            return;
        }
        let num_slots = input.num_slots_per_day;
        for (e, employee) in input.employees.iter().enumerate() {
            for d in 0..input.num_days - 1 {
                for t in num_slots.saturating_sub(rest)..num_slots {
                    let tail = num_slots - 1 - t;
                    if tail >= rest {
                        continue;
                    }
                    for u in 0..(rest - tail).min(num_slots) {
                        if !employee.is_available(d, t) || !employee.is_available(d + 1, u) {
                            continue;
                        }
                        let late = self.index.work(e, d, t);
                        let early = self.index.work(e, d + 1, u);
                        if late.is_constant() || early.is_constant() {
                            continue;
                        }
                        let mut pair = late.clone();
                        pair.add_scaled(early, 1.0);
                        self.problem.add_constraint(
                            Constraint::leq(pair, 1.0)
                                .with_name(format!("rest[{},{},{},{}]", employee.id, d, t, u)),
                        );
                    }
                }
            }
        }
    }

    fn add_supply_balance(&mut self) {
        let input = self.input;
        for (d, t) in self.slots() {
            let demand = input.demand_at(d, t);
            if demand <= 0.0 {
                continue;
            }

            let mut supply = LinearExpr::new();
            for (r, role) in input.roles.iter().enumerate() {
                if role.supplies_directly() {
                    supply.add_scaled(&capacity_expr(&self.index, input, r, d, t), 1.0);
                }
            }

            for (c, chain) in input.chains.iter().enumerate() {
                let output = self.problem.add_variable(Variable::continuous(format!(
                    "chain_output[{},{},{}]",
                    chain.id, d, t
                )));
                let cell = c * input.num_slots() + self.index.cell(d, t);
                self.index.chain_output[cell] = Some(output);

                // output ≤ contrib · capacity of every stage, i.e. the slowest one
                for role_id in &chain.roles {
                    let Some(r) = input.role_index(role_id) else {
                        continue;
                    };
                    let mut row = LinearExpr::var(output);
                    row.add_scaled(
                        &capacity_expr(&self.index, input, r, d, t),
                        -chain.contrib_factor,
                    );
                    self.problem.add_constraint(
                        Constraint::leq(row, 0.0)
                            .with_name(format!("chain_cap[{},{},{},{}]", chain.id, role_id, d, t)),
                    );
                }
                supply.add_term(output, 1.0);
            }

            if !input.meet_all_demand {
                let unmet = self.problem.add_variable(
                    Variable::continuous(format!("unmet[{},{}]", d, t))
                        .with_bounds(0.0, Some(demand)),
                );
                let cell = self.index.cell(d, t);
                self.index.unmet[cell] = Some(unmet);
                supply.add_term(unmet, 1.0);
            }

            self.problem.add_constraint(
                Constraint::geq(supply, demand).with_name(format!("demand[{},{}]", d, t)),
            );
        }
    }
}
