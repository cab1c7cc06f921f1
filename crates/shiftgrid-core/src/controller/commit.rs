//! Commit pipelines shared by the gesture controller and the CLI.
//!
//! Each function takes one employee's day and returns the complete new day:
//! algebra transform, then `validate_slots`, then (for move and resize)
//! `consolidate_slots`. The result is what gets handed to storage.

use chrono::Weekday;

use crate::algebra::{
    clamp_resize_against_others, clamp_slot_against_others, consolidate_slots, erase_range,
    merge_slots, validate_slots, Edge,
};
use crate::error::ValidationError;
use crate::slot::{is_weekend, Category, Minute, TimeRange, TimeSlot};

/// Vacation cannot be booked on Saturday or Sunday.
pub fn check_category_allowed(category: Category, day: Weekday) -> Result<(), ValidationError> {
    if category == Category::Vacation && is_weekend(day) {
        return Err(ValidationError::InvalidValue {
            field: "category".into(),
            message: format!("vacation cannot be placed on {day}"),
        });
    }
    Ok(())
}

/// Paint `range` as `category` into the day.
pub fn paint(
    day: &[TimeSlot],
    range: TimeRange,
    category: Category,
    note: Option<String>,
    bounds: TimeRange,
) -> Vec<TimeSlot> {
    let new_slot = TimeSlot {
        start: range.start,
        end: range.end,
        category,
        note,
    };
    validate_slots(&merge_slots(day, &new_slot), bounds.start, bounds.end)
}

/// Cut `range` out of every slot of the day.
pub fn erase(day: &[TimeSlot], range: TimeRange, bounds: TimeRange) -> Vec<TimeSlot> {
    validate_slots(&erase_range(day, range.start, range.end), bounds.start, bounds.end)
}

/// Drop the slot at `index`. `None` if there is no such slot.
pub fn delete(day: &[TimeSlot], index: usize, bounds: TimeRange) -> Option<Vec<TimeSlot>> {
    if index >= day.len() {
        return None;
    }
    let remaining: Vec<TimeSlot> = day
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, s)| s.clone())
        .collect();
    Some(validate_slots(&remaining, bounds.start, bounds.end))
}

/// Give the slot at `index` a new range and heal same-category overlap.
pub fn relocate(
    day: &[TimeSlot],
    index: usize,
    range: TimeRange,
    bounds: TimeRange,
) -> Option<Vec<TimeSlot>> {
    let slot = day.get(index)?;
    let mut edited = day.to_vec();
    edited[index] = slot.with_range(range.start, range.end);
    let valid = validate_slots(&edited, bounds.start, bounds.end);
    Some(consolidate_slots(&valid))
}

/// Move the slot at `index` toward `candidate_start`, stopping at
/// different-category neighbors. `None` if the slot does not exist or
/// cannot be placed anywhere.
pub fn move_slot(
    day: &[TimeSlot],
    index: usize,
    candidate_start: Minute,
    bounds: TimeRange,
) -> Option<Vec<TimeSlot>> {
    let range = clamp_slot_against_others(day, index, candidate_start, bounds)?;
    relocate(day, index, range, bounds)
}

/// Drag one edge of the slot at `index` toward `candidate`.
pub fn resize_slot(
    day: &[TimeSlot],
    index: usize,
    edge: Edge,
    candidate: Minute,
    min_duration: Minute,
    bounds: TimeRange,
) -> Option<Vec<TimeSlot>> {
    let slot = day.get(index)?;
    let moved = clamp_resize_against_others(day, index, edge, candidate, min_duration, bounds)?;
    let range = match edge {
        Edge::Start => TimeRange::new(moved, slot.end),
        Edge::End => TimeRange::new(slot.start, moved),
    };
    relocate(day, index, range, bounds)
}
