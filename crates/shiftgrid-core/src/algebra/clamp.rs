//! Live clamping for move and resize drags.
//!
//! Only different-category neighbors block a drag. Same-category overlap is
//! tolerated while the pointer is down and healed by consolidation at commit.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::slot::{Minute, TimeRange, TimeSlot};

/// Which edge of a slot a resize drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Start,
    End,
}

impl FromStr for Edge {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "top" => Ok(Edge::Start),
            "end" | "bottom" => Ok(Edge::End),
            other => Err(ValidationError::InvalidValue {
                field: "edge".into(),
                message: format!("unknown edge '{other}'"),
            }),
        }
    }
}

/// Place the slot at `index` as close to `candidate_start` as possible.
///
/// The slot keeps its duration. The returned range lies inside `bounds` and
/// intersects no slot of a different category. Between two equally close
/// placements the one nearer the slot's current start wins. Returns `None`
/// if `index` is out of range or no free gap can hold the slot.
pub fn clamp_slot_against_others(
    slots: &[TimeSlot],
    index: usize,
    candidate_start: Minute,
    bounds: TimeRange,
) -> Option<TimeRange> {
    let moving = slots.get(index).filter(|s| s.is_well_formed())?;
    let duration = moving.duration();

    let mut blockers: Vec<TimeRange> = slots
        .iter()
        .enumerate()
        .filter(|(i, s)| *i != index && s.is_well_formed() && s.category != moving.category)
        .map(|(_, s)| s.range())
        .collect();
    blockers.sort_by_key(|r| (r.start, r.end));

    let mut best: Option<(Minute, Minute, Minute)> = None;
    for gap in free_gaps(&blockers, bounds) {
        if gap.duration() < duration {
            continue;
        }
        let start = candidate_start.clamp(gap.start, gap.end - duration);
        let key = (
            (start - candidate_start).abs(),
            (start - moving.start).abs(),
            start,
        );
        if best.map_or(true, |b| key < b) {
            best = Some(key);
        }
    }

    best.map(|(_, _, start)| TimeRange::new(start, start + duration))
}

/// Stop a dragged edge of the slot at `index` before it crosses a
/// different-category neighbor, the grid bounds, or comes closer than
/// `min_duration` to the slot's opposite edge.
///
/// Returns the slot's current edge unchanged when the slot is already
/// wedged in too tightly to move, and `None` for a bad `index`.
pub fn clamp_resize_against_others(
    slots: &[TimeSlot],
    index: usize,
    edge: Edge,
    candidate: Minute,
    min_duration: Minute,
    bounds: TimeRange,
) -> Option<Minute> {
    let slot = slots.get(index).filter(|s| s.is_well_formed())?;
    let min_duration = min_duration.max(1);
    let others = slots
        .iter()
        .enumerate()
        .filter(|(i, s)| *i != index && s.is_well_formed() && s.category != slot.category)
        .map(|(_, s)| s);

    let clamped = match edge {
        Edge::Start => {
            let lower = others
                .filter(|o| o.start < slot.start)
                .map(|o| o.end)
                .fold(bounds.start, Minute::max);
            let upper = slot.end - min_duration;
            if lower > upper {
                slot.start
            } else {
                candidate.clamp(lower, upper)
            }
        }
        Edge::End => {
            let upper = others
                .filter(|o| o.end > slot.end)
                .map(|o| o.start)
                .fold(bounds.end, Minute::min);
            let lower = slot.start + min_duration;
            if lower > upper {
                slot.end
            } else {
                candidate.clamp(lower, upper)
            }
        }
    };
    Some(clamped)
}

/// Complement of the sorted `blockers` within `bounds`.
fn free_gaps(blockers: &[TimeRange], bounds: TimeRange) -> Vec<TimeRange> {
    let mut gaps = Vec::new();
    let mut cursor = bounds.start;
    for blocker in blockers {
        if blocker.end <= cursor {
            continue;
        }
        if blocker.start >= bounds.end {
            break;
        }
        if blocker.start > cursor {
            gaps.push(TimeRange::new(cursor, blocker.start));
        }
        cursor = cursor.max(blocker.end);
    }
    if cursor < bounds.end {
        gaps.push(TimeRange::new(cursor, bounds.end));
    }
    gaps
}
