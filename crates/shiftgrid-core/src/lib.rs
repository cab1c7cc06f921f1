//! # shiftgrid Core Library
//!
//! This library provides the editing logic behind a weekly employee shift
//! grid: one column per day, one interval per assignment, edited by painting,
//! erasing, dragging and resizing. The `shiftgrid-cli` binary drives the same
//! operations from the command line.
//!
//! ## Architecture
//!
//! - **Slot algebra**: pure functions over one employee's day (merge, erase,
//!   validate, consolidate, clamp). Never fails; degenerate input is dropped.
//! - **Layout**: assigns side-by-side columns to overlapping intervals of
//!   different employees sharing a day column.
//! - **Controller**: a caller-driven gesture state machine that turns pointer
//!   input into previews and day commits.
//! - **Storage**: SQLite day store, TOML configuration, and a background
//!   writer that persists commits without blocking the controller.
//!
//! ## Key Components
//!
//! - [`GestureController`]: gesture state machine
//! - [`WeekSchedule`]: in-memory week, source of truth during a session
//! - [`ScheduleDb`]: SQLite implementation of [`ScheduleRepository`]
//! - [`CommitWriter`]: fire-and-forget persistence of [`DayCommit`]s
//! - [`Config`]: application configuration management

pub mod algebra;
pub mod controller;
pub mod error;
pub mod events;
pub mod grid;
pub mod layout;
pub mod reference;
pub mod schedule;
pub mod slot;
pub mod storage;

pub use algebra::{
    clamp_resize_against_others, clamp_slot_against_others, consolidate_slots, erase_range,
    merge_slots, validate_slots, Edge,
};
pub use controller::{ControllerState, GestureController, GestureKind, HitTarget, InputEvent, Tool};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::{DayCommit, GridEvent};
pub use grid::GridConfig;
pub use layout::{layout, StackItem, StackedSlot};
pub use reference::{Employee, Holiday, HolidayCalendar, HolidayList, Roster};
pub use schedule::WeekSchedule;
pub use slot::{Category, EmployeeId, Minute, TimeRange, TimeSlot, WeekKey};
pub use storage::{CommitWriter, Config, MemoryRepository, ScheduleDb, ScheduleRepository, WriteOutcome};
