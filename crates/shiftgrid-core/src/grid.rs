//! Grid window configuration and pixel/minute mapping.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::slot::{Minute, TimeRange, MAX_MINUTE, MINUTES_PER_DAY};

/// Editable window and snapping of the weekly grid.
///
/// `grid_start = base_hour * 60`, `grid_end = (base_hour + total_hours) * 60`.
/// Without `extended_mode` the window stops at midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_base_hour")]
    pub base_hour: u32,
    #[serde(default = "default_total_hours")]
    pub total_hours: u32,
    /// Let the window run past midnight (overnight shifts).
    #[serde(default)]
    pub extended_mode: bool,
    /// Step for move and resize drags.
    #[serde(default = "default_snap_minutes")]
    pub snap_minutes: Minute,
    /// Step for paint and erase anchors.
    #[serde(default = "default_paint_quantum")]
    pub paint_quantum_minutes: Minute,
    #[serde(default = "default_hour_height")]
    pub hour_height_px: f32,
}

fn default_base_hour() -> u32 {
    6
}
fn default_total_hours() -> u32 {
    14
}
fn default_snap_minutes() -> Minute {
    15
}
fn default_paint_quantum() -> Minute {
    60
}
fn default_hour_height() -> f32 {
    48.0
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            base_hour: default_base_hour(),
            total_hours: default_total_hours(),
            extended_mode: false,
            snap_minutes: default_snap_minutes(),
            paint_quantum_minutes: default_paint_quantum(),
            hour_height_px: default_hour_height(),
        }
    }
}

impl GridConfig {
    pub const BASE_HOURS: [u32; 2] = [6, 8];
    pub const TOTAL_HOURS: [u32; 2] = [14, 24];

    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: String| {
            Err(ConfigError::InvalidValue {
                key: format!("grid.{key}"),
                message,
            })
        };
        if !Self::BASE_HOURS.contains(&self.base_hour) {
            return invalid("base_hour", format!("{} is not one of 6, 8", self.base_hour));
        }
        if !Self::TOTAL_HOURS.contains(&self.total_hours) {
            return invalid(
                "total_hours",
                format!("{} is not one of 14, 24", self.total_hours),
            );
        }
        if self.snap_minutes <= 0 {
            return invalid("snap_minutes", "must be positive".into());
        }
        if self.paint_quantum_minutes <= 0 {
            return invalid("paint_quantum_minutes", "must be positive".into());
        }
        if !(self.hour_height_px > 0.0) {
            return invalid("hour_height_px", "must be positive".into());
        }
        Ok(())
    }

    pub fn grid_start(&self) -> Minute {
        self.base_hour as Minute * 60
    }

    pub fn grid_end(&self) -> Minute {
        let end = (self.base_hour + self.total_hours) as Minute * 60;
        if self.extended_mode {
            end
        } else {
            end.min(MINUTES_PER_DAY)
        }
    }

    pub fn bounds(&self) -> TimeRange {
        TimeRange::new(self.grid_start(), self.grid_end())
    }

    /// Minute under a pointer `y` pixels below the top of the grid.
    ///
    /// Pointers far outside the grid saturate at `MAX_MINUTE` minutes from
    /// `grid_start`; a NaN `y` maps to `grid_start`.
    pub fn minute_at(&self, y: f32) -> Minute {
        let limit = MAX_MINUTE as f32;
        let offset = (y / self.hour_height_px * 60.0).floor().clamp(-limit, limit) as Minute;
        self.grid_start().saturating_add(offset)
    }

    /// Pixel offset of `minute` from the top of the grid.
    pub fn y_at(&self, minute: Minute) -> f32 {
        (minute - self.grid_start()) as f32 / 60.0 * self.hour_height_px
    }
}

/// Round `minute` to the nearest multiple of `step`.
pub fn snap_round(minute: Minute, step: Minute) -> Minute {
    if step <= 1 {
        return minute;
    }
    (minute + step / 2).div_euclid(step) * step
}

/// Round `minute` down to a multiple of `step`.
pub fn snap_floor(minute: Minute, step: Minute) -> Minute {
    if step <= 1 {
        return minute;
    }
    minute.div_euclid(step) * step
}
