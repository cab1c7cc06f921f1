//! Abstract pointer and keyboard input consumed by the controller.

use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::algebra::Edge;
use crate::error::ValidationError;
use crate::slot::EmployeeId;

/// Active drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Paint,
    Erase,
}

impl FromStr for Tool {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paint" => Ok(Tool::Paint),
            "erase" => Ok(Tool::Erase),
            other => Err(ValidationError::InvalidValue {
                field: "tool".into(),
                message: format!("unknown tool '{other}'"),
            }),
        }
    }
}

/// What the pointer was over when pressed. Hit testing belongs to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HitTarget {
    /// Empty grid area of the day column.
    Grid,
    /// Body of a rendered slot.
    Slot {
        employee_id: EmployeeId,
        slot_index: usize,
    },
    /// Resize handle of a rendered slot.
    SlotEdge {
        employee_id: EmployeeId,
        slot_index: usize,
        edge: Edge,
    },
}

/// One input to the gesture state machine. `y` is in pixels from the top
/// of the day column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Press {
        day: Weekday,
        y: f32,
        target: HitTarget,
    },
    Move {
        y: f32,
    },
    Release {
        y: f32,
    },
    Escape,
}
