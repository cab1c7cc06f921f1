//! Interval algebra over one employee's day.
//!
//! Every function here is pure and total: malformed or zero-length slots are
//! dropped from the output rather than reported. Callers rely on the combined
//! pipeline (transform, [`validate_slots`], optionally [`consolidate_slots`])
//! to keep a day free of same-category touching and cross-category overlap.

mod clamp;

pub use clamp::{clamp_resize_against_others, clamp_slot_against_others, Edge};

use std::collections::BTreeMap;

use crate::slot::{Category, Minute, TimeRange, TimeSlot};

/// Merge `new_slot` into `existing`.
///
/// Same-category slots that overlap or touch the new range are fused with it
/// into one slot. Different-category slots lose the overlapped portion,
/// keeping up to one remnant on each side. Returns `existing` unchanged when
/// `new_slot` is empty.
pub fn merge_slots(existing: &[TimeSlot], new_slot: &TimeSlot) -> Vec<TimeSlot> {
    if !new_slot.is_well_formed() {
        return existing.to_vec();
    }

    let candidates: Vec<&TimeSlot> = existing.iter().filter(|s| s.is_well_formed()).collect();

    // Grow the fused range until no same-category slot touches it.
    let mut fused = new_slot.range();
    let mut absorbed = vec![false; candidates.len()];
    loop {
        let mut grew = false;
        for (i, slot) in candidates.iter().enumerate() {
            if absorbed[i] || slot.category != new_slot.category {
                continue;
            }
            if slot.range().touches(&fused) {
                absorbed[i] = true;
                fused.start = fused.start.min(slot.start);
                fused.end = fused.end.max(slot.end);
                grew = true;
            }
        }
        if !grew {
            break;
        }
    }

    let note = new_slot.note.clone().or_else(|| {
        candidates
            .iter()
            .zip(&absorbed)
            .filter(|(_, a)| **a)
            .find_map(|(s, _)| s.note.clone())
    });

    let mut out = Vec::with_capacity(candidates.len() + 1);
    for (slot, absorbed) in candidates.iter().zip(&absorbed) {
        if *absorbed {
            continue;
        }
        if slot.category != new_slot.category && slot.range().overlaps(&fused) {
            out.extend(subtract(slot, fused.start, fused.end));
        } else {
            out.push((*slot).clone());
        }
    }
    out.push(TimeSlot {
        start: fused.start,
        end: fused.end,
        category: new_slot.category,
        note,
    });
    sort_by_time(&mut out);
    out
}

/// Remove `[from, to)` from every slot regardless of category.
pub fn erase_range(existing: &[TimeSlot], from: Minute, to: Minute) -> Vec<TimeSlot> {
    let cut = TimeRange::new(from, to);
    let mut out = Vec::with_capacity(existing.len() + 1);
    for slot in existing.iter().filter(|s| s.is_well_formed()) {
        if !cut.is_empty() && slot.range().overlaps(&cut) {
            out.extend(subtract(slot, from, to));
        } else {
            out.push(slot.clone());
        }
    }
    out
}

/// Clamp every slot into `[grid_start, grid_end]`, dropping the ones left
/// with no duration. Order is preserved and the function is idempotent.
pub fn validate_slots(slots: &[TimeSlot], grid_start: Minute, grid_end: Minute) -> Vec<TimeSlot> {
    slots
        .iter()
        .filter_map(|slot| {
            let start = slot.start.max(grid_start);
            let end = slot.end.min(grid_end);
            (end > start).then(|| slot.with_range(start, end))
        })
        .collect()
}

/// Fuse same-category slots that overlap or touch.
///
/// The result is sorted by start time whatever the input order was.
pub fn consolidate_slots(slots: &[TimeSlot]) -> Vec<TimeSlot> {
    let mut groups: BTreeMap<Category, Vec<&TimeSlot>> = BTreeMap::new();
    for slot in slots.iter().filter(|s| s.is_well_formed()) {
        groups.entry(slot.category).or_default().push(slot);
    }

    let mut out = Vec::with_capacity(slots.len());
    for (_, mut group) in groups {
        group.sort_by_key(|s| (s.start, s.end));
        let mut current: Option<TimeSlot> = None;
        for slot in group {
            if let Some(run) = current.as_mut() {
                if slot.start <= run.end {
                    run.end = run.end.max(slot.end);
                    if run.note.is_none() {
                        run.note = slot.note.clone();
                    }
                    continue;
                }
            }
            if let Some(done) = current.replace(slot.clone()) {
                out.push(done);
            }
        }
        out.extend(current);
    }
    sort_by_time(&mut out);
    out
}

/// The 0-2 remnants of `slot` left after cutting out `[from, to)`.
fn subtract(slot: &TimeSlot, from: Minute, to: Minute) -> Vec<TimeSlot> {
    let mut remnants = Vec::with_capacity(2);
    if slot.start < from {
        remnants.push(slot.with_range(slot.start, slot.end.min(from)));
    }
    if slot.end > to {
        remnants.push(slot.with_range(slot.start.max(to), slot.end));
    }
    remnants.retain(TimeSlot::is_well_formed);
    remnants
}

fn sort_by_time(slots: &mut [TimeSlot]) {
    slots.sort_by_key(|s| (s.start, s.end, s.category));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const H: Minute = 60;

    fn work(start: Minute, end: Minute) -> TimeSlot {
        TimeSlot::new(start, end, Category::Work)
    }

    fn vacation(start: Minute, end: Minute) -> TimeSlot {
        TimeSlot::new(start, end, Category::Vacation)
    }

    #[test]
    fn merge_into_empty_day() {
        assert_eq!(merge_slots(&[], &work(9 * H, 10 * H)), vec![work(9 * H, 10 * H)]);
    }

    #[test]
    fn merge_fuses_same_category_overlap() {
        let merged = merge_slots(&[work(8 * H, 9 * H)], &work(8 * H + 30, 10 * H));
        assert_eq!(merged, vec![work(8 * H, 10 * H)]);
    }

    #[test]
    fn merge_fuses_touching_slots_on_both_sides() {
        let existing = [work(8 * H, 9 * H), work(10 * H, 11 * H), work(14 * H, 15 * H)];
        let merged = merge_slots(&existing, &work(9 * H, 10 * H));
        assert_eq!(merged, vec![work(8 * H, 11 * H), work(14 * H, 15 * H)]);
    }

    #[test]
    fn merge_splits_other_category() {
        let merged = merge_slots(&[vacation(8 * H, 12 * H)], &work(9 * H, 10 * H));
        assert_eq!(
            merged,
            vec![vacation(8 * H, 9 * H), work(9 * H, 10 * H), vacation(10 * H, 12 * H)]
        );
    }

    #[test]
    fn merge_drops_fully_covered_other_category() {
        let merged = merge_slots(&[vacation(9 * H, 10 * H)], &work(8 * H, 12 * H));
        assert_eq!(merged, vec![work(8 * H, 12 * H)]);
    }

    #[test]
    fn merge_keeps_touching_other_category() {
        let merged = merge_slots(&[vacation(8 * H, 9 * H)], &work(9 * H, 10 * H));
        assert_eq!(merged, vec![vacation(8 * H, 9 * H), work(9 * H, 10 * H)]);
    }

    #[test]
    fn merge_ignores_empty_new_slot() {
        let existing = vec![work(8 * H, 9 * H)];
        assert_eq!(merge_slots(&existing, &work(10 * H, 10 * H)), existing);
        assert_eq!(merge_slots(&existing, &work(11 * H, 10 * H)), existing);
    }

    #[test]
    fn merge_keeps_note_of_absorbed_slot() {
        let existing = [work(8 * H, 9 * H).with_note("opening")];
        let merged = merge_slots(&existing, &work(9 * H, 10 * H));
        assert_eq!(merged[0].note.as_deref(), Some("opening"));
    }

    #[test]
    fn erase_full_and_partial() {
        assert!(erase_range(&[work(9 * H, 17 * H)], 9 * H, 17 * H).is_empty());
        assert_eq!(
            erase_range(&[work(9 * H, 17 * H)], 12 * H, 13 * H),
            vec![work(9 * H, 12 * H), work(13 * H, 17 * H)]
        );
    }

    #[test]
    fn erase_hits_every_category() {
        let existing = [work(8 * H, 10 * H), vacation(10 * H, 12 * H)];
        assert_eq!(
            erase_range(&existing, 9 * H, 11 * H),
            vec![work(8 * H, 9 * H), vacation(11 * H, 12 * H)]
        );
    }

    #[test]
    fn erase_with_empty_range_is_noop() {
        let existing = vec![work(8 * H, 10 * H)];
        assert_eq!(erase_range(&existing, 9 * H, 9 * H), existing);
    }

    #[test]
    fn validate_clamps_and_drops() {
        let slots = [work(5 * H, 9 * H), work(20 * H, 23 * H), work(3 * H, 4 * H)];
        assert_eq!(
            validate_slots(&slots, 6 * H, 20 * H),
            vec![work(6 * H, 9 * H)]
        );
    }

    #[test]
    fn consolidate_closes_gapless_runs() {
        let slots = [work(10 * H, 11 * H), work(9 * H, 10 * H)];
        assert_eq!(consolidate_slots(&slots), vec![work(9 * H, 11 * H)]);
    }

    #[test]
    fn consolidate_keeps_categories_apart() {
        let slots = [work(9 * H, 10 * H), vacation(10 * H, 11 * H), work(12 * H, 13 * H)];
        assert_eq!(consolidate_slots(&slots), slots.to_vec());
    }

    fn arb_slot() -> impl Strategy<Value = TimeSlot> {
        (-120i32..1800, -60i32..600, 0usize..4).prop_map(|(start, len, cat)| {
            TimeSlot::new(start, start + len, Category::ALL[cat])
        })
    }

    proptest! {
        #[test]
        fn validate_is_idempotent(
            slots in prop::collection::vec(arb_slot(), 0..12),
            a in 0i32..900,
            span in 1i32..1200,
        ) {
            let once = validate_slots(&slots, a, a + span);
            let twice = validate_slots(&once, a, a + span);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn consolidate_ignores_input_order(slots in prop::collection::vec(arb_slot(), 0..10)) {
            let mut reversed = slots.clone();
            reversed.reverse();
            prop_assert_eq!(consolidate_slots(&slots), consolidate_slots(&reversed));
        }

        #[test]
        fn merge_leaves_no_cross_category_overlap(
            slots in prop::collection::vec(arb_slot(), 0..8),
            new_slot in arb_slot(),
        ) {
            let day = consolidate_slots(&slots);
            let merged = merge_slots(&day, &new_slot);
            if new_slot.is_well_formed() {
                for other in merged.iter().filter(|s| s.category != new_slot.category) {
                    prop_assert!(!other.range().overlaps(&new_slot.range()));
                }
            }
        }
    }
}
