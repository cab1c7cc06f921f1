//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with a private data directory and verify outputs.

use std::path::Path;
use std::process::Command;

const WEEK: &str = "2026-W42";

/// Run a CLI command against `data_dir` and return (stdout, stderr, code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_shiftgrid-cli"))
        .env("SHIFTGRID_DATA_DIR", data_dir)
        .env_remove("SHIFTGRID_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    stdout
}

fn slots_json(stdout: &str) -> Vec<(i64, i64, String)> {
    let parsed: serde_json::Value = serde_json::from_str(stdout).expect("JSON output");
    parsed
        .as_array()
        .expect("array")
        .iter()
        .map(|s| {
            (
                s["start"].as_i64().unwrap(),
                s["end"].as_i64().unwrap(),
                s["category"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn day_args<'a>(employee: &'a str, day: &'a str) -> Vec<&'a str> {
    vec!["--employee", employee, "--week", WEEK, "--day", day]
}

#[test]
fn test_config_get_and_set() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "grid.base_hour"]).trim(), "6");

    run_cli_success(dir.path(), &["config", "set", "grid.base_hour", "8"]);
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "grid.base_hour"]).trim(), "8");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "grid.base_hour", "7"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("grid.base_hour"), "{stderr}");

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "grid.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_paint_fuses_and_lists() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = vec!["slots", "paint"];
    args.extend(day_args("e1", "mon"));
    args.extend(["09:00", "11:00", "--json"]);
    run_cli_success(dir.path(), &args);

    let mut args = vec!["slots", "paint"];
    args.extend(day_args("e1", "mon"));
    args.extend(["10:00", "12:00", "-c", "work", "--json"]);
    let out = run_cli_success(dir.path(), &args);
    assert_eq!(slots_json(&out), vec![(540, 720, "work".to_string())]);

    let mut args = vec!["slots", "list"];
    args.extend(day_args("e1", "0"));
    args.push("--json");
    let out = run_cli_success(dir.path(), &args);
    assert_eq!(slots_json(&out), vec![(540, 720, "work".to_string())]);
}

#[test]
fn test_vacation_on_weekend_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = vec!["slots", "paint"];
    args.extend(day_args("e1", "sat"));
    args.extend(["09:00", "12:00", "--category", "vacation"]);
    let (_, stderr, code) = run_cli(dir.path(), &args);
    assert_ne!(code, 0);
    assert!(stderr.contains("vacation"), "{stderr}");
}

#[test]
fn test_move_stops_at_other_category() {
    let dir = tempfile::tempdir().unwrap();
    let mut paint_work = vec!["slots", "paint"];
    paint_work.extend(day_args("e1", "tue"));
    paint_work.extend(["09:00", "12:00"]);
    run_cli_success(dir.path(), &paint_work);

    let mut paint_vacation = vec!["slots", "paint"];
    paint_vacation.extend(day_args("e1", "tue"));
    paint_vacation.extend(["13:00", "14:00", "-c", "vacation"]);
    run_cli_success(dir.path(), &paint_vacation);

    let mut mv = vec!["slots", "move"];
    mv.extend(day_args("e1", "tue"));
    mv.extend(["0", "11:00", "--json"]);
    let out = run_cli_success(dir.path(), &mv);
    assert_eq!(
        slots_json(&out),
        vec![(600, 780, "work".to_string()), (780, 840, "vacation".to_string())]
    );
}

#[test]
fn test_erase_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let mut paint = vec!["slots", "paint"];
    paint.extend(day_args("e1", "wed"));
    paint.extend(["08:00", "16:00"]);
    run_cli_success(dir.path(), &paint);

    let mut erase = vec!["slots", "erase"];
    erase.extend(day_args("e1", "wed"));
    erase.extend(["11:00", "12:00", "--json"]);
    let out = run_cli_success(dir.path(), &erase);
    assert_eq!(
        slots_json(&out),
        vec![(480, 660, "work".to_string()), (720, 960, "work".to_string())]
    );

    let mut delete = vec!["slots", "delete"];
    delete.extend(day_args("e1", "wed"));
    delete.extend(["0", "--json"]);
    let out = run_cli_success(dir.path(), &delete);
    assert_eq!(slots_json(&out), vec![(720, 960, "work".to_string())]);

    let mut missing = vec!["slots", "delete"];
    missing.extend(day_args("e1", "wed"));
    missing.push("5");
    let (_, _, code) = run_cli(dir.path(), &missing);
    assert_ne!(code, 0);
}

#[test]
fn test_layout_stacks_overlapping_employees() {
    let dir = tempfile::tempdir().unwrap();
    for employee in ["a", "b"] {
        let mut paint = vec!["slots", "paint"];
        paint.extend(day_args(employee, "thu"));
        paint.extend(["09:00", "12:00"]);
        run_cli_success(dir.path(), &paint);
    }

    let out = run_cli_success(
        dir.path(),
        &["layout", "--week", WEEK, "--day", "thu", "--width", "100", "--json"],
    );
    let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["column"], 0);
    assert_eq!(rows[1]["column"], 1);
    assert_eq!(rows[1]["columns_in_cluster"], 2);
    assert_eq!(rows[1]["x"].as_f64().unwrap(), 50.0);
}

#[test]
fn test_replay_commits_through_writer() {
    let dir = tempfile::tempdir().unwrap();
    // Default grid: 48 px per hour starting at 06:00, so 09:00 is y = 144.
    let events = r#"[
        {"type": "press", "day": "Fri", "y": 144.0, "target": {"kind": "grid"}},
        {"type": "move", "y": 240.0},
        {"type": "release", "y": 240.0}
    ]"#;
    let file = dir.path().join("events.json");
    std::fs::write(&file, events).unwrap();

    let out = run_cli_success(
        dir.path(),
        &["replay", file.to_str().unwrap(), "--week", WEEK, "--employee", "e1"],
    );
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.first().unwrap()["type"], "gesture_started");
    let last = lines.last().unwrap();
    assert_eq!(last["type"], "committed");
    assert_eq!(last["commit"]["slots"][0]["start"], 540);
    assert_eq!(last["commit"]["slots"][0]["end"], 720);

    let mut list = vec!["slots", "list"];
    list.extend(day_args("e1", "fri"));
    list.push("--json");
    let out = run_cli_success(dir.path(), &list);
    assert_eq!(slots_json(&out), vec![(540, 720, "work".to_string())]);
}

#[test]
fn test_week_shows_holidays() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(
        dir.path(),
        &[
            "config",
            "set",
            "holidays",
            r#"[{"date": "2026-10-12", "label": "Regional day"}]"#,
        ],
    );
    let out = run_cli_success(dir.path(), &["week", "--week", WEEK, "--json"]);
    let days: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(days[0]["holiday"], "Regional day");
    assert_eq!(days[5]["weekend"], true);
}

#[test]
fn test_roster_rejects_unknown_employee() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(
        dir.path(),
        &["config", "set", "employees", r#"[{"id": "e1", "name": "Ana"}]"#],
    );
    let out = run_cli_success(dir.path(), &["employees", "list"]);
    assert!(out.contains("Ana"));

    let mut args = vec!["slots", "list"];
    args.extend(day_args("ghost", "mon"));
    let (_, _, code) = run_cli(dir.path(), &args);
    assert_ne!(code, 0);
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["completions", "bash"]);
    assert!(out.contains("shiftgrid-cli"));
}
