use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::controller::GestureKind;
use crate::slot::{EmployeeId, TimeRange, TimeSlot, WeekKey};

/// Every handled grid input produces at most one GridEvent.
/// The rendering layer redraws from them; commits are forwarded to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GridEvent {
    GestureStarted {
        kind: GestureKind,
        employee_id: EmployeeId,
        day: Weekday,
    },
    /// The live preview or ghost moved.
    PreviewChanged {
        kind: GestureKind,
        range: TimeRange,
    },
    /// A gesture produced a new day list.
    Committed {
        kind: GestureKind,
        commit: DayCommit,
    },
    /// A click with the erase tool removed one slot.
    SlotDeleted {
        removed: TimeSlot,
        commit: DayCommit,
    },
    /// Released without changing anything.
    GestureEnded {
        kind: GestureKind,
    },
    /// Escape during a gesture; nothing was written.
    GestureCancelled {
        kind: GestureKind,
    },
    /// Escape while idle cleared the active employee.
    SelectionCleared {
        employee_id: EmployeeId,
    },
    Rejected {
        reason: String,
    },
}

impl GridEvent {
    /// The commit carried by this event, if any.
    pub fn commit(&self) -> Option<&DayCommit> {
        match self {
            GridEvent::Committed { commit, .. } | GridEvent::SlotDeleted { commit, .. } => {
                Some(commit)
            }
            _ => None,
        }
    }
}

/// Full replacement list for one `(employee, week, day)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCommit {
    pub employee_id: EmployeeId,
    pub week: WeekKey,
    pub day: Weekday,
    pub slots: Vec<TimeSlot>,
    pub at: DateTime<Utc>,
}

impl DayCommit {
    pub fn new(employee_id: EmployeeId, week: WeekKey, day: Weekday, slots: Vec<TimeSlot>) -> Self {
        Self {
            employee_id,
            week,
            day,
            slots,
            at: Utc::now(),
        }
    }
}
