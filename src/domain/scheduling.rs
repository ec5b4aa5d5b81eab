// Scheduling domain: employees, roles, production chains and the
// day × slot horizon a request is planned over.
//
// Every type here is a plain serde value. A `SchedulerInput` is built once
// per request and only read afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Dense `[day][slot]` grid, serialized as a nested array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotGrid<T> {
    rows: Vec<Vec<T>>,
}

impl<T> Default for SlotGrid<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Clone> SlotGrid<T> {
    pub fn filled(num_days: usize, num_slots: usize, value: T) -> Self {
        Self {
            rows: vec![vec![value; num_slots]; num_days],
        }
    }
}

impl<T> SlotGrid<T> {
    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn num_days(&self) -> usize {
        self.rows.len()
    }

    /// Whether the grid is exactly `num_days × num_slots`.
    pub fn has_shape(&self, num_days: usize, num_slots: usize) -> bool {
        self.rows.len() == num_days && self.rows.iter().all(|row| row.len() == num_slots)
    }

    pub fn get(&self, day: usize, slot: usize) -> Option<&T> {
        self.rows.get(day).and_then(|row| row.get(slot))
    }

    pub fn set(&mut self, day: usize, slot: usize, value: T) {
        if let Some(cell) = self.rows.get_mut(day).and_then(|row| row.get_mut(slot)) {
            *cell = value;
        }
    }

    pub fn rows(&self) -> &[Vec<T>] {
        &self.rows
    }

    /// Iterate `(day, slot, value)` in day-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(d, row)| row.iter().enumerate().map(move |(t, v)| (d, t, v)))
    }
}

impl SlotGrid<f64> {
    /// Value at `(day, slot)`, 0.0 outside the grid.
    pub fn value(&self, day: usize, slot: usize) -> f64 {
        self.get(day, slot).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, _, v)| *v).sum()
    }
}

impl SlotGrid<bool> {
    /// Flag at `(day, slot)`, false outside the grid.
    pub fn flag(&self, day: usize, slot: usize) -> bool {
        self.get(day, slot).copied().unwrap_or(false)
    }

    pub fn count_true(&self) -> usize {
        self.iter().filter(|(_, _, v)| **v).count()
    }
}

/// A member of staff who can be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub hourly_wage: f64,
    pub max_hours_per_week: f64,
    /// Longest run of consecutive slots within a day
    pub max_consec_slots: usize,
    #[serde(default)]
    pub preferred_hours: f64,
    pub eligible_roles: BTreeSet<String>,
    pub availability: SlotGrid<bool>,
    /// Slots the employee would like to work; empty means no preference
    #[serde(default)]
    pub preferences: SlotGrid<bool>,
}

impl Employee {
    pub fn new(id: impl Into<String>, hourly_wage: f64, max_hours_per_week: f64) -> Self {
        Self {
            id: id.into(),
            hourly_wage,
            max_hours_per_week,
            max_consec_slots: 8,
            preferred_hours: 0.0,
            eligible_roles: BTreeSet::new(),
            availability: SlotGrid::default(),
            preferences: SlotGrid::default(),
        }
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.eligible_roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn with_max_consec_slots(mut self, slots: usize) -> Self {
        self.max_consec_slots = slots;
        self
    }

    pub fn with_preferred_hours(mut self, hours: f64) -> Self {
        self.preferred_hours = hours;
        self
    }

    pub fn with_availability(mut self, availability: SlotGrid<bool>) -> Self {
        self.availability = availability;
        self
    }

    /// Available in every slot of a `num_days × num_slots` horizon.
    pub fn available_always(self, num_days: usize, num_slots: usize) -> Self {
        self.with_availability(SlotGrid::filled(num_days, num_slots, true))
    }

    pub fn with_preferences(mut self, preferences: SlotGrid<bool>) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn is_available(&self, day: usize, slot: usize) -> bool {
        self.availability.flag(day, slot)
    }

    pub fn prefers(&self, day: usize, slot: usize) -> bool {
        self.preferences.flag(day, slot)
    }

    pub fn is_eligible(&self, role_id: &str) -> bool {
        self.eligible_roles.contains(role_id)
    }

    /// Hours this employee could work at most: the weekly cap or the
    /// available time, whichever is smaller.
    pub fn usable_hours(&self, slot_len_hour: f64) -> f64 {
        let available = self.availability.count_true() as f64 * slot_len_hour;
        available.min(self.max_hours_per_week).max(0.0)
    }
}

/// A job function staff can perform in a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub producing: bool,
    /// Output rate; required on producing roles only
    #[serde(default)]
    pub items_per_hour: Option<f64>,
    #[serde(default)]
    pub min_present: u32,
    /// Contributes to supply directly rather than through a chain
    #[serde(default = "default_true")]
    pub is_independent: bool,
}

fn default_true() -> bool {
    true
}

impl Role {
    pub fn producing(id: impl Into<String>, items_per_hour: f64) -> Self {
        Self {
            id: id.into(),
            producing: true,
            items_per_hour: Some(items_per_hour),
            min_present: 0,
            is_independent: true,
        }
    }

    pub fn support(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            producing: false,
            items_per_hour: None,
            min_present: 0,
            is_independent: true,
        }
    }

    pub fn with_min_present(mut self, min_present: u32) -> Self {
        self.min_present = min_present;
        self
    }

    /// Mark the role as a chain stage.
    pub fn chained(mut self) -> Self {
        self.is_independent = false;
        self
    }

    /// Items one person produces per hour in this role.
    pub fn rate(&self) -> f64 {
        if self.producing {
            self.items_per_hour.unwrap_or(0.0)
        } else {
            0.0
        }
    }

    /// Whether this role adds to supply on its own.
    pub fn supplies_directly(&self) -> bool {
        self.is_independent && self.producing
    }
}

/// Sequential workflow whose throughput is capped by its slowest stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionChain {
    pub id: String,
    pub roles: Vec<String>,
    pub contrib_factor: f64,
}

impl ProductionChain {
    pub fn new<I, S>(id: impl Into<String>, roles: I, contrib_factor: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
            contrib_factor,
        }
    }

    pub fn contains(&self, role_id: &str) -> bool {
        self.roles.iter().any(|r| r == role_id)
    }
}

/// Predefined shift template `[start_slot, end_slot)`, repeated every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedShift {
    pub start_slot: usize,
    pub end_slot: usize,
}

impl FixedShift {
    pub fn new(start_slot: usize, end_slot: usize) -> Self {
        Self {
            start_slot,
            end_slot,
        }
    }

    pub fn len(&self) -> usize {
        self.end_slot.saturating_sub(self.start_slot)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn covers(&self, slot: usize) -> bool {
        (self.start_slot..self.end_slot).contains(&slot)
    }
}

/// How work is carved out of the horizon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ShiftMode {
    /// Any contiguous run of slots, subject to the shift rules
    #[default]
    Slots,
    /// Only the listed shift templates may be worked
    Fixed { shifts: Vec<FixedShift> },
}

impl ShiftMode {
    pub fn is_fixed(&self) -> bool {
        matches!(self, ShiftMode::Fixed { .. })
    }

    pub fn fixed_shifts(&self) -> &[FixedShift] {
        match self {
            ShiftMode::Fixed { shifts } => shifts,
            ShiftMode::Slots => &[],
        }
    }
}

/// Everything one scheduling request needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerInput {
    pub employees: Vec<Employee>,
    pub roles: Vec<Role>,
    #[serde(default)]
    pub chains: Vec<ProductionChain>,
    pub num_days: usize,
    pub num_slots_per_day: usize,
    pub slot_len_hour: f64,
    #[serde(default)]
    pub min_rest_slots: usize,
    #[serde(default = "default_min_shift_length")]
    pub min_shift_length_slots: usize,
    /// Required output quantity per (day, slot)
    pub demand: SlotGrid<f64>,
    #[serde(default)]
    pub shift_mode: ShiftMode,
    #[serde(default)]
    pub meet_all_demand: bool,
    /// Clock time of slot 0, used for labels only
    #[serde(default)]
    pub day_start_hour: f64,
    #[serde(default)]
    pub day_names: Vec<String>,
}

fn default_min_shift_length() -> usize {
    1
}

impl SchedulerInput {
    /// Empty request over `num_days × num_slots_per_day`, zero demand.
    pub fn new(num_days: usize, num_slots_per_day: usize, slot_len_hour: f64) -> Self {
        Self {
            employees: Vec::new(),
            roles: Vec::new(),
            chains: Vec::new(),
            num_days,
            num_slots_per_day,
            slot_len_hour,
            min_rest_slots: 0,
            min_shift_length_slots: 1,
            demand: SlotGrid::filled(num_days, num_slots_per_day, 0.0),
            shift_mode: ShiftMode::Slots,
            meet_all_demand: false,
            day_start_hour: 0.0,
            day_names: Vec::new(),
        }
    }

    pub fn with_employee(mut self, employee: Employee) -> Self {
        self.employees.push(employee);
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    pub fn with_chain(mut self, chain: ProductionChain) -> Self {
        self.chains.push(chain);
        self
    }

    pub fn with_demand(mut self, demand: SlotGrid<f64>) -> Self {
        self.demand = demand;
        self
    }

    /// Same demand in every slot.
    pub fn with_uniform_demand(self, per_slot: f64) -> Self {
        let grid = SlotGrid::filled(self.num_days, self.num_slots_per_day, per_slot);
        self.with_demand(grid)
    }

    pub fn with_fixed_shifts(mut self, shifts: Vec<FixedShift>) -> Self {
        self.shift_mode = ShiftMode::Fixed { shifts };
        self
    }

    pub fn with_meet_all_demand(mut self, meet_all_demand: bool) -> Self {
        self.meet_all_demand = meet_all_demand;
        self
    }

    pub fn with_min_rest_slots(mut self, slots: usize) -> Self {
        self.min_rest_slots = slots;
        self
    }

    pub fn with_min_shift_length(mut self, slots: usize) -> Self {
        self.min_shift_length_slots = slots;
        self
    }

    pub fn with_day_start_hour(mut self, hour: f64) -> Self {
        self.day_start_hour = hour;
        self
    }

    pub fn role(&self, id: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn role_index(&self, id: &str) -> Option<usize> {
        self.roles.iter().position(|r| r.id == id)
    }

    pub fn demand_at(&self, day: usize, slot: usize) -> f64 {
        self.demand.value(day, slot)
    }

    /// A role is active in a slot whenever that slot has demand.
    pub fn is_active(&self, day: usize, slot: usize) -> bool {
        self.demand_at(day, slot) > 0.0
    }

    pub fn total_demand(&self) -> f64 {
        self.demand.total()
    }

    pub fn num_slots(&self) -> usize {
        self.num_days * self.num_slots_per_day
    }

    pub fn day_name(&self, day: usize) -> String {
        match self.day_names.get(day) {
            Some(name) => name.clone(),
            None if day < WEEKDAYS.len() => WEEKDAYS[day].to_string(),
            None => format!("{} (week {})", WEEKDAYS[day % WEEKDAYS.len()], day / WEEKDAYS.len() + 1),
        }
    }

    /// Clock time at the start of `slot`, as `HH:MM`.
    pub fn clock_at(&self, slot: usize) -> String {
        let minutes = ((self.day_start_hour + slot as f64 * self.slot_len_hour) * 60.0).round() as i64;
        let minutes = minutes.rem_euclid(24 * 60);
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }

    /// `HH:MM-HH:MM` label for the slot range `[start, end)`.
    pub fn range_label(&self, start_slot: usize, end_slot: usize) -> String {
        format!("{}-{}", self.clock_at(start_slot), self.clock_at(end_slot))
    }

    /// Chains that list `role_id` as a stage.
    pub fn chains_with(&self, role_id: &str) -> impl Iterator<Item = &ProductionChain> + '_ {
        let role_id = role_id.to_string();
        self.chains.iter().filter(move |c| c.contains(&role_id))
    }

    /// Best output rate one person-hour in `role` can add to supply.
    pub fn reachable_rate(&self, role: &Role) -> f64 {
        if role.supplies_directly() {
            return role.rate();
        }
        self.chains_with(&role.id)
            .map(|c| role.rate() * c.contrib_factor)
            .fold(0.0, f64::max)
    }

    /// Whether staffing `role` can raise supply at all.
    pub fn contributes_to_supply(&self, role: &Role) -> bool {
        role.supplies_directly() || (role.producing && self.chains_with(&role.id).next().is_some())
    }
}
