//! Stacking layout for one day column shared by several employees.
//!
//! Slots that overlap in time are grouped into clusters; each cluster is
//! split into just enough columns that no two slots in a column collide.
//! The assignment depends only on the input order, so re-rendering the same
//! data never makes boxes jump between columns.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::schedule::WeekSchedule;
use crate::slot::{Category, EmployeeId, Minute};

/// One slot to be laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackItem {
    pub start: Minute,
    pub end: Minute,
    pub owner_id: EmployeeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl StackItem {
    pub fn new(start: Minute, end: Minute, owner_id: impl Into<EmployeeId>) -> Self {
        Self {
            start,
            end,
            owner_id: owner_id.into(),
            category: None,
        }
    }
}

/// A laid out slot. `index` points back into the input slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackedSlot {
    pub index: usize,
    pub owner_id: EmployeeId,
    pub start: Minute,
    pub end: Minute,
    pub column: usize,
    pub columns_in_cluster: usize,
}

/// Assign every item a column and its cluster's column count.
///
/// The output has one entry per input item, in input order.
pub fn layout(items: &[StackItem]) -> Vec<StackedSlot> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&i| (items[i].start, items[i].end, i));

    let mut placed: Vec<(usize, usize)> = vec![(0, 1); items.len()];
    let mut cluster: Vec<usize> = Vec::new();
    let mut watermark = Minute::MIN;

    for &i in &order {
        let item = &items[i];
        if item.end <= item.start {
            // Degenerate items stand alone so they never widen a real cluster.
            placed[i] = (0, 1);
            continue;
        }
        if item.start >= watermark {
            assign_columns(items, &cluster, &mut placed);
            cluster.clear();
            watermark = item.end;
        } else {
            watermark = watermark.max(item.end);
        }
        cluster.push(i);
    }
    assign_columns(items, &cluster, &mut placed);

    items
        .iter()
        .enumerate()
        .map(|(i, item)| StackedSlot {
            index: i,
            owner_id: item.owner_id.clone(),
            start: item.start,
            end: item.end,
            column: placed[i].0,
            columns_in_cluster: placed[i].1,
        })
        .collect()
}

/// Greedy first-fit over one cluster (already in start order).
fn assign_columns(items: &[StackItem], cluster: &[usize], placed: &mut [(usize, usize)]) {
    if cluster.is_empty() {
        return;
    }
    let mut column_ends: Vec<Minute> = Vec::new();
    let mut columns = Vec::with_capacity(cluster.len());
    for &i in cluster {
        let item = &items[i];
        let column = match column_ends.iter().position(|&end| end <= item.start) {
            Some(c) => {
                column_ends[c] = item.end;
                c
            }
            None => {
                column_ends.push(item.end);
                column_ends.len() - 1
            }
        };
        columns.push(column);
    }
    let count = column_ends.len();
    for (&i, column) in cluster.iter().zip(columns) {
        placed[i] = (column, count);
    }
}

/// Horizontal placement `(x, width)` of a stacked slot in a day column
/// `column_width` pixels wide.
pub fn column_geometry(slot: &StackedSlot, column_width: f32) -> (f32, f32) {
    let width = column_width / slot.columns_in_cluster.max(1) as f32;
    (slot.column as f32 * width, width)
}

/// Flatten every employee's slots for `day` into layout input, ordered by
/// employee id and then by the employee's own slot order.
pub fn items_for_day(schedule: &WeekSchedule, day: Weekday) -> Vec<StackItem> {
    schedule
        .employees_on(day)
        .flat_map(|(employee, slots)| {
            slots.iter().map(move |slot| StackItem {
                start: slot.start,
                end: slot.end,
                owner_id: employee.clone(),
                category: Some(slot.category),
            })
        })
        .collect()
}
