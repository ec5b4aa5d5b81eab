// Schedule presentation
// Turns decoded assignments into the shapes people read: merged shift blocks
// and, in fixed mode, the per-day shift table.

use indexmap::IndexMap;

use crate::application::decoder::ShiftInstance;
use crate::domain::scheduling::SchedulerInput;
use crate::domain::solution::{ScheduleView, ShiftBlock, ShiftTable, SlotAssignment};

/// `[employee_id, day, slot, role_id]` rows in assignment order.
pub fn slot_rows(assignments: &[SlotAssignment]) -> ScheduleView {
    ScheduleView::Slots(
        assignments
            .iter()
            .map(|a| (a.employee_id.clone(), a.day, a.slot, a.role_id.clone()))
            .collect(),
    )
}

/// Merge contiguous same-employee, same-day slots into blocks.
pub fn merge_blocks(input: &SchedulerInput, assignments: &[SlotAssignment]) -> Vec<ShiftBlock> {
    let position = |id: &str| {
        input
            .employees
            .iter()
            .position(|e| e.id == id)
            .unwrap_or(usize::MAX)
    };
    let mut ordered: Vec<&SlotAssignment> = assignments.iter().collect();
    ordered.sort_by_key(|a| (position(&a.employee_id), a.day, a.slot));

    let mut blocks: Vec<ShiftBlock> = Vec::new();
    for a in ordered {
        match blocks.last_mut() {
            Some(block)
                if block.employee_id == a.employee_id
                    && block.day == a.day
                    && block.end_slot == a.slot =>
            {
                block.end_slot += 1;
                if !block.roles.contains(&a.role_id) {
                    block.roles.push(a.role_id.clone());
                }
            }
            _ => blocks.push(ShiftBlock {
                employee_id: a.employee_id.clone(),
                day: a.day,
                start_slot: a.slot,
                end_slot: a.slot + 1,
                label: String::new(),
                roles: vec![a.role_id.clone()],
            }),
        }
    }

    for block in &mut blocks {
        block.label = input.range_label(block.start_slot, block.end_slot);
    }
    blocks
}

/// One block per worked shift instance, with the roles taken inside it.
pub fn shift_blocks(
    input: &SchedulerInput,
    shifts: &[ShiftInstance],
    assignments: &[SlotAssignment],
) -> Vec<ShiftBlock> {
    let templates = input.shift_mode.fixed_shifts();
    shifts
        .iter()
        .filter_map(|instance| {
            let template = templates.get(instance.shift)?;
            let employee = input.employees.get(instance.employee)?;
            let mut roles: Vec<String> = Vec::new();
            for a in assignments.iter().filter(|a| {
                a.employee_id == employee.id && a.day == instance.day && template.covers(a.slot)
            }) {
                if !roles.contains(&a.role_id) {
                    roles.push(a.role_id.clone());
                }
            }
            Some(ShiftBlock {
                employee_id: employee.id.clone(),
                day: instance.day,
                start_slot: template.start_slot,
                end_slot: template.end_slot,
                label: input.range_label(template.start_slot, template.end_slot),
                roles,
            })
        })
        .collect()
}

/// Day name → one `{label: [employees]}` entry per template, in template order.
///
/// Every day and every template is listed, staffed or not.
pub fn shift_table(input: &SchedulerInput, shifts: &[ShiftInstance]) -> ShiftTable {
    let templates = input.shift_mode.fixed_shifts();
    let mut table = ShiftTable::new();
    for d in 0..input.num_days {
        let row: Vec<IndexMap<String, Vec<String>>> = templates
            .iter()
            .enumerate()
            .map(|(k, template)| {
                let staff: Vec<String> = shifts
                    .iter()
                    .filter(|s| s.day == d && s.shift == k)
                    .filter_map(|s| input.employees.get(s.employee))
                    .map(|e| e.id.clone())
                    .collect();
                let mut entry = IndexMap::new();
                entry.insert(input.range_label(template.start_slot, template.end_slot), staff);
                entry
            })
            .collect();
        table.insert(input.day_name(d), row);
    }
    table
}
