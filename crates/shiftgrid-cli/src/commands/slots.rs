//! Day editing commands for CLI.
//!
//! Each action runs the same commit pipeline the gesture controller uses and
//! writes the resulting day back as a whole.

use chrono::Weekday;
use clap::{Args, Subcommand};
use shiftgrid_core::controller::commit;
use shiftgrid_core::grid::snap_round;
use shiftgrid_core::slot::{format_minute, parse_day, parse_minute};
use shiftgrid_core::{
    Category, Config, Edge, EmployeeId, Minute, ScheduleDb, ScheduleRepository, TimeRange,
    TimeSlot, ValidationError, WeekKey,
};

use super::{check_employee, week_or_current};

/// Which `(employee, week, day)` to edit.
#[derive(Args)]
pub struct DayTarget {
    /// Employee id
    #[arg(long, short)]
    employee: String,
    /// ISO week (e.g. 2026-W42); defaults to the current week
    #[arg(long, short)]
    week: Option<WeekKey>,
    /// Day name or column index 0 (Mon) .. 6 (Sun)
    #[arg(long, short, value_parser = parse_day)]
    day: Weekday,
}

#[derive(Subcommand)]
pub enum SlotsAction {
    /// List slots of one day
    List {
        #[command(flatten)]
        target: DayTarget,
        #[arg(long)]
        json: bool,
    },
    /// Paint a range, fusing with same-category slots and trimming others
    Paint {
        #[command(flatten)]
        target: DayTarget,
        /// Start time (HH:MM)
        #[arg(value_parser = parse_minute)]
        from: Minute,
        /// End time (HH:MM)
        #[arg(value_parser = parse_minute)]
        to: Minute,
        /// Category; defaults to the configured default category
        #[arg(long, short)]
        category: Option<Category>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Erase a range from every slot of the day
    Erase {
        #[command(flatten)]
        target: DayTarget,
        #[arg(value_parser = parse_minute)]
        from: Minute,
        #[arg(value_parser = parse_minute)]
        to: Minute,
        #[arg(long)]
        json: bool,
    },
    /// Move a slot toward a new start, stopping at other categories
    Move {
        #[command(flatten)]
        target: DayTarget,
        /// Slot index as printed by `slots list`
        index: usize,
        /// Requested start time (HH:MM)
        #[arg(value_parser = parse_minute)]
        start: Minute,
        #[arg(long)]
        json: bool,
    },
    /// Drag one edge of a slot
    Resize {
        #[command(flatten)]
        target: DayTarget,
        index: usize,
        /// start | end
        edge: Edge,
        /// Requested edge time (HH:MM)
        #[arg(value_parser = parse_minute)]
        to: Minute,
        #[arg(long)]
        json: bool,
    },
    /// Delete one slot
    Delete {
        #[command(flatten)]
        target: DayTarget,
        index: usize,
        #[arg(long)]
        json: bool,
    },
}

fn print_day(slots: &[TimeSlot], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(slots)?);
        return Ok(());
    }
    if slots.is_empty() {
        println!("No slots.");
    }
    for (i, slot) in slots.iter().enumerate() {
        println!(
            "{i:>2}  {}-{}  {:<8} {}",
            format_minute(slot.start),
            format_minute(slot.end),
            slot.category,
            slot.note.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn checked_range(from: Minute, to: Minute) -> Result<TimeRange, ValidationError> {
    if to <= from {
        return Err(ValidationError::InvalidTimeRange {
            start: from,
            end: to,
        });
    }
    Ok(TimeRange::new(from, to))
}

pub fn run(action: SlotsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut db = ScheduleDb::open()?;
    let bounds = config.grid.bounds();
    let snap = config.grid.snap_minutes;

    let (target, json) = match &action {
        SlotsAction::List { target, json }
        | SlotsAction::Paint { target, json, .. }
        | SlotsAction::Erase { target, json, .. }
        | SlotsAction::Move { target, json, .. }
        | SlotsAction::Resize { target, json, .. }
        | SlotsAction::Delete { target, json, .. } => (target, *json),
    };
    let employee = EmployeeId::new(target.employee.clone());
    check_employee(&config, &employee)?;
    let week = week_or_current(target.week.clone());
    let day = target.day;
    let current = db.get_day_slots(&employee, &week, day)?;

    let next = match action {
        SlotsAction::List { .. } => return print_day(&current, json),
        SlotsAction::Paint {
            from,
            to,
            category,
            note,
            ..
        } => {
            let range = checked_range(from, to)?;
            let category = category.unwrap_or(config.default_category);
            commit::check_category_allowed(category, day)?;
            commit::paint(&current, range, category, note, bounds)
        }
        SlotsAction::Erase { from, to, .. } => {
            commit::erase(&current, checked_range(from, to)?, bounds)
        }
        SlotsAction::Move { index, start, .. } => {
            commit::move_slot(&current, index, snap_round(start, snap), bounds)
                .ok_or_else(|| format!("slot {index} cannot be moved to {}", format_minute(start)))?
        }
        SlotsAction::Resize {
            index, edge, to, ..
        } => commit::resize_slot(&current, index, edge, snap_round(to, snap), snap, bounds)
            .ok_or_else(|| format!("slot {index} does not exist"))?,
        SlotsAction::Delete { index, .. } => commit::delete(&current, index, bounds)
            .ok_or_else(|| format!("slot {index} does not exist"))?,
    };

    db.set_day_slots(&employee, &week, day, &next)?;
    tracing::info!(%employee, %week, ?day, slots = next.len(), "day updated");
    print_day(&next, json)
}
