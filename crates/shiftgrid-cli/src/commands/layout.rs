use chrono::Weekday;
use clap::Args;
use serde_json::json;
use shiftgrid_core::layout::{column_geometry, items_for_day, layout};
use shiftgrid_core::slot::{format_minute, parse_day};
use shiftgrid_core::{ScheduleDb, ScheduleRepository, WeekKey};

use super::week_or_current;

#[derive(Args)]
pub struct LayoutArgs {
    /// ISO week (e.g. 2026-W42); defaults to the current week
    #[arg(long, short)]
    week: Option<WeekKey>,
    /// Day name or column index 0 (Mon) .. 6 (Sun)
    #[arg(long, short, value_parser = parse_day)]
    day: Weekday,
    /// Day column width in pixels
    #[arg(long, default_value_t = 120.0)]
    width: f32,
    #[arg(long)]
    json: bool,
}

pub fn run(args: LayoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = ScheduleDb::open()?;
    let week = week_or_current(args.week);
    let schedule = db.load_week(&week)?;
    let items = items_for_day(&schedule, args.day);
    let stacked = layout(&items);

    if args.json {
        let rows: Vec<_> = stacked
            .iter()
            .zip(&items)
            .map(|(slot, item)| {
                let (x, width) = column_geometry(slot, args.width);
                json!({
                    "owner_id": slot.owner_id,
                    "start": slot.start,
                    "end": slot.end,
                    "category": item.category,
                    "column": slot.column,
                    "columns_in_cluster": slot.columns_in_cluster,
                    "x": x,
                    "width": width,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if stacked.is_empty() {
        println!("No slots on {} of {week}.", args.day);
    }
    for (slot, item) in stacked.iter().zip(&items) {
        let (x, width) = column_geometry(slot, args.width);
        println!(
            "{:<12} {}-{}  {:<8} col {}/{}  x={x:.1} w={width:.1}",
            slot.owner_id,
            format_minute(slot.start),
            format_minute(slot.end),
            item.category.map(|c| c.as_str()).unwrap_or("-"),
            slot.column + 1,
            slot.columns_in_cluster,
        );
    }
    Ok(())
}
