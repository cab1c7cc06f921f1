//! Gesture state machine for one grid.
//!
//! The controller owns no threads and no rendering surface. The host feeds it
//! [`InputEvent`]s in arrival order and gets back at most one [`GridEvent`]
//! per input. All edits are computed synchronously inside the release
//! handler; the resulting [`DayCommit`] is written into the in-memory
//! [`WeekSchedule`] and returned so the host can forward it to storage.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> (Painting | Erasing | Moving | Resizing(edge)) -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = GestureController::new(GridConfig::default());
//! controller.set_active_employee("e1".into())?;
//! controller.handle(&mut schedule, InputEvent::Press { .. });
//! controller.handle(&mut schedule, InputEvent::Move { y: 200.0 });
//! if let Some(event) = controller.handle(&mut schedule, InputEvent::Release { y: 200.0 }) {
//!     if let Some(commit) = event.commit() { writer.submit(commit.clone())?; }
//! }
//! ```

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::commit;
use super::input::{HitTarget, InputEvent, Tool};
use crate::algebra::{clamp_resize_against_others, clamp_slot_against_others, Edge};
use crate::error::ValidationError;
use crate::events::{DayCommit, GridEvent};
use crate::grid::{snap_floor, snap_round, GridConfig};
use crate::reference::Roster;
use crate::schedule::WeekSchedule;
use crate::slot::{Category, EmployeeId, Minute, TimeRange, TimeSlot};

/// Kind of edit a gesture performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Paint,
    Erase,
    Move,
    Resize,
}

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerState {
    Idle,
    Painting,
    Erasing,
    Moving,
    Resizing(Edge),
}

/// Paint or erase drag. Anchor and current are floored to the paint quantum.
#[derive(Debug, Clone, PartialEq)]
struct RangeGesture {
    employee_id: EmployeeId,
    day: Weekday,
    category: Category,
    anchor: Minute,
    current: Minute,
    /// Set by the first `Move` away from `press_y`.
    moved: bool,
    press_y: f32,
    /// Slot under the pointer at press time (erase tool only).
    pressed_slot: Option<usize>,
}

impl RangeGesture {
    fn range(&self, quantum: Minute) -> TimeRange {
        TimeRange::new(
            self.anchor.min(self.current),
            self.anchor.max(self.current) + quantum,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
struct MoveGesture {
    employee_id: EmployeeId,
    day: Weekday,
    slot_index: usize,
    original: TimeRange,
    /// Pointer minute minus slot start at press time.
    grab_offset: Minute,
    ghost: TimeRange,
}

#[derive(Debug, Clone, PartialEq)]
struct ResizeGesture {
    employee_id: EmployeeId,
    day: Weekday,
    slot_index: usize,
    edge: Edge,
    original: TimeRange,
    ghost: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Default)]
enum Gesture {
    #[default]
    Idle,
    Painting(RangeGesture),
    Erasing(RangeGesture),
    Moving(MoveGesture),
    Resizing(ResizeGesture),
}

impl Gesture {
    fn kind(&self) -> Option<GestureKind> {
        match self {
            Gesture::Idle => None,
            Gesture::Painting(_) => Some(GestureKind::Paint),
            Gesture::Erasing(_) => Some(GestureKind::Erase),
            Gesture::Moving(_) => Some(GestureKind::Move),
            Gesture::Resizing(_) => Some(GestureKind::Resize),
        }
    }
}

/// What the active employee's day would look like if the pointer were
/// released now. Rendering only; never written anywhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub employee_id: EmployeeId,
    pub day: Weekday,
    pub ghost: TimeRange,
    pub slots: Vec<TimeSlot>,
}

/// One gesture state machine per grid instance.
#[derive(Debug, Clone)]
pub struct GestureController {
    config: GridConfig,
    tool: Tool,
    category: Category,
    active_employee: Option<EmployeeId>,
    roster: Option<Roster>,
    gesture: Gesture,
}

impl GestureController {
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            tool: Tool::Paint,
            category: Category::Work,
            active_employee: None,
            roster: None,
            gesture: Gesture::Idle,
        }
    }

    /// Restrict `set_active_employee` to the employees of `roster`.
    pub fn with_roster(mut self, roster: Roster) -> Self {
        self.roster = Some(roster);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> ControllerState {
        match &self.gesture {
            Gesture::Idle => ControllerState::Idle,
            Gesture::Painting(_) => ControllerState::Painting,
            Gesture::Erasing(_) => ControllerState::Erasing,
            Gesture::Moving(_) => ControllerState::Moving,
            Gesture::Resizing(g) => ControllerState::Resizing(g.edge),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn active_employee(&self) -> Option<&EmployeeId> {
        self.active_employee.as_ref()
    }

    /// Range drawn under the pointer: paint/erase preview or move/resize ghost.
    pub fn ghost(&self) -> Option<TimeRange> {
        let quantum = self.config.paint_quantum_minutes;
        match &self.gesture {
            Gesture::Idle => None,
            Gesture::Painting(g) | Gesture::Erasing(g) => Some(g.range(quantum)),
            Gesture::Moving(g) => Some(g.ghost),
            Gesture::Resizing(g) => Some(g.ghost),
        }
    }

    /// The day being edited as it would look after release.
    pub fn preview_slots(&self, schedule: &WeekSchedule) -> Option<Preview> {
        let bounds = self.config.bounds();
        let quantum = self.config.paint_quantum_minutes;
        let (employee_id, day, ghost, slots) = match &self.gesture {
            Gesture::Idle => return None,
            Gesture::Painting(g) => {
                let range = g.range(quantum);
                let day = schedule.day(&g.employee_id, g.day);
                let slots = commit::paint(day, range, g.category, None, bounds);
                (&g.employee_id, g.day, range, slots)
            }
            Gesture::Erasing(g) => {
                let range = g.range(quantum);
                let day = schedule.day(&g.employee_id, g.day);
                // An undragged press on a slot deletes it on release.
                let slots = match (g.moved, g.pressed_slot) {
                    (false, Some(index)) => commit::delete(day, index, bounds)
                        .unwrap_or_else(|| commit::erase(day, range, bounds)),
                    _ => commit::erase(day, range, bounds),
                };
                (&g.employee_id, g.day, range, slots)
            }
            Gesture::Moving(g) => {
                let slots = with_ghost(schedule.day(&g.employee_id, g.day), g.slot_index, g.ghost);
                (&g.employee_id, g.day, g.ghost, slots)
            }
            Gesture::Resizing(g) => {
                let slots = with_ghost(schedule.day(&g.employee_id, g.day), g.slot_index, g.ghost);
                (&g.employee_id, g.day, g.ghost, slots)
            }
        };
        Some(Preview {
            employee_id: employee_id.clone(),
            day,
            ghost,
            slots,
        })
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Category used by the next paint gesture.
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    /// Select the employee that paint and grid-erase gestures apply to.
    ///
    /// # Errors
    /// Rejects ids missing from an attached, non-empty roster.
    pub fn set_active_employee(&mut self, employee_id: EmployeeId) -> Result<(), ValidationError> {
        if let Some(roster) = &self.roster {
            if !roster.is_empty() && !roster.contains(&employee_id) {
                return Err(ValidationError::InvalidValue {
                    field: "employee".into(),
                    message: format!("unknown employee '{employee_id}'"),
                });
            }
        }
        self.active_employee = Some(employee_id);
        Ok(())
    }

    pub fn clear_active_employee(&mut self) -> Option<EmployeeId> {
        self.active_employee.take()
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Feed one input. Commits are applied to `schedule` before returning.
    pub fn handle(&mut self, schedule: &mut WeekSchedule, input: InputEvent) -> Option<GridEvent> {
        match input {
            InputEvent::Press { y, .. } | InputEvent::Move { y } | InputEvent::Release { y }
                if !y.is_finite() =>
            {
                Some(reject(format!("pointer y {y} is not a finite number")))
            }
            InputEvent::Press { day, y, target } => self.press(schedule, day, y, target),
            InputEvent::Move { y } => self.pointer_moved(schedule, y, true),
            InputEvent::Release { y } => self.release(schedule, y),
            InputEvent::Escape => self.escape(),
        }
    }

    fn press(
        &mut self,
        schedule: &WeekSchedule,
        day: Weekday,
        y: f32,
        target: HitTarget,
    ) -> Option<GridEvent> {
        if !self.is_idle() {
            debug!(state = ?self.state(), "press ignored while a gesture holds the pointer");
            return None;
        }
        let minute = self.config.minute_at(y);

        match target {
            HitTarget::Grid => {
                let kind = match self.tool {
                    Tool::Paint => GestureKind::Paint,
                    Tool::Erase => GestureKind::Erase,
                };
                match self.active_employee.clone() {
                    Some(employee_id) => self.begin_range(kind, employee_id, day, y, None),
                    None => Some(reject("no active employee selected")),
                }
            }
            HitTarget::Slot {
                employee_id,
                slot_index,
            } => {
                let Some(slot) = schedule.day(&employee_id, day).get(slot_index) else {
                    return Some(reject(format!("{employee_id} has no slot {slot_index} on {day}")));
                };
                match self.tool {
                    Tool::Erase => self.begin_range(
                        GestureKind::Erase,
                        employee_id,
                        day,
                        y,
                        Some(slot_index),
                    ),
                    Tool::Paint if slot.category == Category::Work => {
                        let original = slot.range();
                        self.begin_move(employee_id, day, slot_index, original, minute)
                    }
                    Tool::Paint => match self.active_employee.clone() {
                        Some(active) => self.begin_range(GestureKind::Paint, active, day, y, None),
                        None => Some(reject("no active employee selected")),
                    },
                }
            }
            HitTarget::SlotEdge {
                employee_id,
                slot_index,
                edge,
            } => {
                let Some(slot) = schedule.day(&employee_id, day).get(slot_index) else {
                    return Some(reject(format!("{employee_id} has no slot {slot_index} on {day}")));
                };
                match self.tool {
                    Tool::Erase => self.begin_range(
                        GestureKind::Erase,
                        employee_id,
                        day,
                        y,
                        Some(slot_index),
                    ),
                    Tool::Paint => {
                        let original = slot.range();
                        self.gesture = Gesture::Resizing(ResizeGesture {
                            employee_id: employee_id.clone(),
                            day,
                            slot_index,
                            edge,
                            original,
                            ghost: original,
                        });
                        debug!(%employee_id, ?day, slot_index, ?edge, "Idle -> Resizing");
                        Some(GridEvent::GestureStarted {
                            kind: GestureKind::Resize,
                            employee_id,
                            day,
                        })
                    }
                }
            }
        }
    }

    fn begin_range(
        &mut self,
        kind: GestureKind,
        employee_id: EmployeeId,
        day: Weekday,
        y: f32,
        pressed_slot: Option<usize>,
    ) -> Option<GridEvent> {
        if kind == GestureKind::Paint {
            if let Err(e) = commit::check_category_allowed(self.category, day) {
                return Some(reject(e.to_string()));
            }
        }
        let anchor = snap_floor(self.config.minute_at(y), self.config.paint_quantum_minutes);
        let gesture = RangeGesture {
            employee_id: employee_id.clone(),
            day,
            category: self.category,
            anchor,
            current: anchor,
            moved: false,
            press_y: y,
            pressed_slot,
        };
        self.gesture = match kind {
            GestureKind::Erase => Gesture::Erasing(gesture),
            _ => Gesture::Painting(gesture),
        };
        debug!(%employee_id, ?day, anchor, ?kind, "Idle -> {:?}", self.state());
        Some(GridEvent::GestureStarted {
            kind,
            employee_id,
            day,
        })
    }

    fn begin_move(
        &mut self,
        employee_id: EmployeeId,
        day: Weekday,
        slot_index: usize,
        original: TimeRange,
        minute: Minute,
    ) -> Option<GridEvent> {
        self.gesture = Gesture::Moving(MoveGesture {
            employee_id: employee_id.clone(),
            day,
            slot_index,
            original,
            grab_offset: minute - original.start,
            ghost: original,
        });
        debug!(%employee_id, ?day, slot_index, "Idle -> Moving");
        Some(GridEvent::GestureStarted {
            kind: GestureKind::Move,
            employee_id,
            day,
        })
    }

    /// `dragged` is false for the coordinate carried by a release, which
    /// only counts as movement when it lands in another quantum.
    fn pointer_moved(&mut self, schedule: &WeekSchedule, y: f32, dragged: bool) -> Option<GridEvent> {
        let kind = self.gesture.kind()?;
        let minute = self.config.minute_at(y);
        let quantum = self.config.paint_quantum_minutes;
        let snap = self.config.snap_minutes;
        let bounds = self.config.bounds();

        match &mut self.gesture {
            Gesture::Idle => None,
            Gesture::Painting(g) | Gesture::Erasing(g) => {
                let current = snap_floor(minute, quantum);
                let starts_drag = dragged && !g.moved && y != g.press_y;
                if current == g.current && !starts_drag {
                    return None;
                }
                g.current = current;
                g.moved = true;
                Some(GridEvent::PreviewChanged {
                    kind,
                    range: g.range(quantum),
                })
            }
            Gesture::Moving(g) => {
                let candidate = snap_round(minute - g.grab_offset, snap);
                let day = schedule.day(&g.employee_id, g.day);
                // No legal placement keeps the previous ghost.
                let placed = clamp_slot_against_others(day, g.slot_index, candidate, bounds)?;
                if placed == g.ghost {
                    return None;
                }
                g.ghost = placed;
                Some(GridEvent::PreviewChanged {
                    kind,
                    range: placed,
                })
            }
            Gesture::Resizing(g) => {
                let candidate = snap_round(minute, snap);
                let day = schedule.day(&g.employee_id, g.day);
                let edge_at =
                    clamp_resize_against_others(day, g.slot_index, g.edge, candidate, snap, bounds)?;
                let ghost = match g.edge {
                    Edge::Start => TimeRange::new(edge_at, g.original.end),
                    Edge::End => TimeRange::new(g.original.start, edge_at),
                };
                if ghost == g.ghost {
                    return None;
                }
                g.ghost = ghost;
                Some(GridEvent::PreviewChanged { kind, range: ghost })
            }
        }
    }

    fn release(&mut self, schedule: &mut WeekSchedule, y: f32) -> Option<GridEvent> {
        self.gesture.kind()?;
        self.pointer_moved(schedule, y, false);

        let bounds = self.config.bounds();
        let quantum = self.config.paint_quantum_minutes;
        let gesture = std::mem::take(&mut self.gesture);
        debug!("{:?} -> Idle", gesture.kind());

        let event = match gesture {
            Gesture::Idle => return None,
            Gesture::Painting(g) => {
                let range = g.range(quantum);
                let clipped = TimeRange::new(range.start.max(bounds.start), range.end.min(bounds.end));
                if clipped.is_empty() {
                    return Some(GridEvent::GestureEnded {
                        kind: GestureKind::Paint,
                    });
                }
                let next = commit::paint(
                    schedule.day(&g.employee_id, g.day),
                    range,
                    g.category,
                    None,
                    bounds,
                );
                commit_day(schedule, GestureKind::Paint, g.employee_id, g.day, next)
            }
            Gesture::Erasing(g) => match (g.moved, g.pressed_slot) {
                (false, Some(index)) => {
                    let day = schedule.day(&g.employee_id, g.day);
                    let removed = day.get(index).cloned();
                    match (removed, commit::delete(day, index, bounds)) {
                        (Some(removed), Some(next)) => {
                            let commit = DayCommit::new(
                                g.employee_id.clone(),
                                schedule.week().clone(),
                                g.day,
                                next.clone(),
                            );
                            schedule.set_day(g.employee_id, g.day, next);
                            info!(employee = %commit.employee_id, day = ?commit.day, "slot deleted");
                            GridEvent::SlotDeleted { removed, commit }
                        }
                        _ => reject(format!("slot {index} no longer exists")),
                    }
                }
                _ => {
                    let next = commit::erase(
                        schedule.day(&g.employee_id, g.day),
                        g.range(quantum),
                        bounds,
                    );
                    commit_day(schedule, GestureKind::Erase, g.employee_id, g.day, next)
                }
            },
            Gesture::Moving(g) => {
                if g.ghost == g.original {
                    return Some(GridEvent::GestureEnded {
                        kind: GestureKind::Move,
                    });
                }
                let day = schedule.day(&g.employee_id, g.day);
                match commit::relocate(day, g.slot_index, g.ghost, bounds) {
                    Some(next) => commit_day(schedule, GestureKind::Move, g.employee_id, g.day, next),
                    None => reject(format!("slot {} no longer exists", g.slot_index)),
                }
            }
            Gesture::Resizing(g) => {
                if g.ghost == g.original {
                    return Some(GridEvent::GestureEnded {
                        kind: GestureKind::Resize,
                    });
                }
                let day = schedule.day(&g.employee_id, g.day);
                match commit::relocate(day, g.slot_index, g.ghost, bounds) {
                    Some(next) => {
                        commit_day(schedule, GestureKind::Resize, g.employee_id, g.day, next)
                    }
                    None => reject(format!("slot {} no longer exists", g.slot_index)),
                }
            }
        };
        Some(event)
    }

    fn escape(&mut self) -> Option<GridEvent> {
        match std::mem::take(&mut self.gesture).kind() {
            Some(kind) => {
                debug!(?kind, "gesture cancelled");
                Some(GridEvent::GestureCancelled { kind })
            }
            None => {
                let employee_id = self.active_employee.take()?;
                debug!(%employee_id, "selection cleared");
                Some(GridEvent::SelectionCleared { employee_id })
            }
        }
    }
}

/// Store `slots` as the new day and describe the commit.
fn commit_day(
    schedule: &mut WeekSchedule,
    kind: GestureKind,
    employee_id: EmployeeId,
    day: Weekday,
    slots: Vec<TimeSlot>,
) -> GridEvent {
    let commit = DayCommit::new(employee_id.clone(), schedule.week().clone(), day, slots.clone());
    schedule.set_day(employee_id, day, slots);
    info!(
        ?kind,
        employee = %commit.employee_id,
        week = %commit.week,
        day = ?commit.day,
        slots = commit.slots.len(),
        "gesture committed"
    );
    GridEvent::Committed { kind, commit }
}

fn with_ghost(day: &[TimeSlot], index: usize, ghost: TimeRange) -> Vec<TimeSlot> {
    let mut slots = day.to_vec();
    if let Some(slot) = slots.get_mut(index) {
        *slot = slot.with_range(ghost.start, ghost.end);
    }
    slots
}

fn reject(reason: impl Into<String>) -> GridEvent {
    let reason = reason.into();
    warn!(%reason, "input rejected");
    GridEvent::Rejected { reason }
}
