use clap::Args;
use serde::Serialize;
use shiftgrid_core::slot::is_weekend;
use shiftgrid_core::{Config, HolidayCalendar, ScheduleDb, ScheduleRepository, WeekKey};

use super::week_or_current;

const DAYS: [chrono::Weekday; 7] = [
    chrono::Weekday::Mon,
    chrono::Weekday::Tue,
    chrono::Weekday::Wed,
    chrono::Weekday::Thu,
    chrono::Weekday::Fri,
    chrono::Weekday::Sat,
    chrono::Weekday::Sun,
];

#[derive(Args)]
pub struct WeekArgs {
    /// ISO week (e.g. 2026-W42); defaults to the current week
    #[arg(long, short)]
    week: Option<WeekKey>,
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct DaySummary {
    day: chrono::Weekday,
    date: chrono::NaiveDate,
    weekend: bool,
    holiday: Option<String>,
    employees: usize,
    slots: usize,
}

pub fn run(args: WeekArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let holidays = config.holiday_list();
    let db = ScheduleDb::open()?;
    let week = week_or_current(args.week);
    let schedule = db.load_week(&week)?;

    let days: Vec<DaySummary> = DAYS
        .iter()
        .map(|&day| {
            let date = week.date_of(day);
            DaySummary {
                day,
                date,
                weekend: is_weekend(day),
                holiday: holidays.label_for(date),
                employees: schedule.employees_on(day).count(),
                slots: schedule.slot_count(day),
            }
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&days)?);
        return Ok(());
    }

    println!("Week {week}");
    for d in &days {
        println!(
            "{:<4} {}  {:>2} employees {:>3} slots{}{}",
            d.day.to_string(),
            d.date,
            d.employees,
            d.slots,
            if d.weekend { "  (weekend)" } else { "" },
            d.holiday
                .as_deref()
                .map(|label| format!("  holiday: {label}"))
                .unwrap_or_default(),
        );
    }
    Ok(())
}
