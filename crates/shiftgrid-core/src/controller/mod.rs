//! Pointer-driven editing of the weekly grid.
//!
//! [`GestureController`] turns abstract [`InputEvent`]s into previews and
//! commits. The [`commit`] pipelines are the same edits without a pointer,
//! used by the CLI and by replayed input.

pub mod commit;
mod engine;
mod input;

pub use engine::{ControllerState, GestureController, GestureKind, Preview};
pub use input::{HitTarget, InputEvent, Tool};
