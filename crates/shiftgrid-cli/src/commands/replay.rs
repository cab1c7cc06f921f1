//! Replay recorded pointer input through the gesture controller.
//!
//! Events are read as a JSON array of `InputEvent`s. Every resulting
//! `GridEvent` is printed as one JSON line; commits are persisted through the
//! background `CommitWriter` exactly as an interactive host would.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use shiftgrid_core::{
    Category, CommitWriter, Config, EmployeeId, GestureController, InputEvent, ScheduleDb,
    ScheduleRepository, Tool, WeekKey, WriteOutcome,
};

use super::week_or_current;

#[derive(Args)]
pub struct ReplayArgs {
    /// JSON file with an array of input events ("-" reads stdin)
    file: PathBuf,
    /// ISO week (e.g. 2026-W42); defaults to the current week
    #[arg(long, short)]
    week: Option<WeekKey>,
    /// Active employee for paint and erase on the empty grid
    #[arg(long, short)]
    employee: Option<String>,
    /// paint | erase
    #[arg(long, default_value = "paint")]
    tool: Tool,
    /// Paint category; defaults to the configured default category
    #[arg(long, short)]
    category: Option<Category>,
}

fn read_events(file: &PathBuf) -> Result<Vec<InputEvent>, Box<dyn std::error::Error>> {
    let content = if file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file)?
    };
    Ok(serde_json::from_str(&content)?)
}

pub fn run(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let inputs = read_events(&args.file)?;
    let config = Config::load()?;
    let week = week_or_current(args.week);
    let db = ScheduleDb::open()?;
    let mut schedule = db.load_week(&week)?;

    let mut controller = GestureController::new(config.grid.clone()).with_roster(config.roster());
    controller.set_tool(args.tool);
    controller.set_category(args.category.unwrap_or(config.default_category));
    if let Some(employee) = args.employee {
        controller.set_active_employee(EmployeeId::new(employee))?;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let (writer, mut outcomes, handle) = CommitWriter::spawn(db);
        let mut submitted = 0usize;
        for input in inputs {
            let Some(event) = controller.handle(&mut schedule, input) else {
                continue;
            };
            println!("{}", serde_json::to_string(&event)?);
            if let Some(commit) = event.commit() {
                writer.submit(commit.clone())?;
                submitted += 1;
            }
        }
        drop(writer);

        let mut failed = 0usize;
        while let Some(outcome) = outcomes.recv().await {
            if let WriteOutcome::Failed { commit, error } = &outcome {
                eprintln!(
                    "warning: {} {} {} was not saved: {error}",
                    commit.employee_id, commit.week, commit.day
                );
                failed += 1;
            }
        }
        handle.await?;

        if failed > 0 {
            return Err(format!("{failed} of {submitted} commits were not saved").into());
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
