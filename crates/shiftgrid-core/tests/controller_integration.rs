//! End-to-end tests for the gesture controller.
//!
//! Pointer input goes in as `InputEvent`s; the tests check the emitted
//! `GridEvent`s, the in-memory week, and what reaches storage.

use chrono::Weekday;
use shiftgrid_core::slot::parse_minute;
use shiftgrid_core::{
    Category, CommitWriter, ControllerState, Edge, Employee, GestureController, GridConfig,
    GridEvent, HitTarget, InputEvent, MemoryRepository, Roster, ScheduleRepository, TimeSlot,
    Tool, WeekKey, WeekSchedule,
};

fn t(hhmm: &str) -> i32 {
    parse_minute(hhmm).unwrap()
}

fn week() -> WeekKey {
    "2026-W42".parse().unwrap()
}

fn controller() -> GestureController {
    let roster = Roster::new(vec![Employee::new("a", "Ana"), Employee::new("b", "Ben")]);
    let mut c = GestureController::new(GridConfig::default()).with_roster(roster);
    c.set_active_employee("a".into()).unwrap();
    c
}

fn y(c: &GestureController, hhmm: &str) -> f32 {
    c.config().y_at(t(hhmm))
}

fn press(c: &GestureController, day: Weekday, hhmm: &str, target: HitTarget) -> InputEvent {
    InputEvent::Press {
        day,
        y: y(c, hhmm),
        target,
    }
}

fn on_slot(employee: &str, slot_index: usize) -> HitTarget {
    HitTarget::Slot {
        employee_id: employee.into(),
        slot_index,
    }
}

#[test]
fn test_move_toward_vacation_end_to_end() {
    let mut c = controller();
    let mut s = WeekSchedule::new(week());
    let vacation = TimeSlot::new(t("13:00"), t("14:00"), Category::Vacation);
    s.load_day(
        "a".into(),
        Weekday::Mon,
        vec![TimeSlot::new(t("09:00"), t("12:00"), Category::Work), vacation.clone()],
    )
    .unwrap();

    c.handle(&mut s, press(&c, Weekday::Mon, "09:30", on_slot("a", 0)));
    for step in ["10:00", "10:30", "11:00", "11:30"] {
        c.handle(&mut s, InputEvent::Move { y: y(&c, step) });
        let ghost = c.ghost().unwrap();
        assert!(ghost.end <= t("13:00"), "ghost {ghost:?} crossed the vacation");
        assert_eq!(ghost.duration(), 180);
    }
    let event = c
        .handle(&mut s, InputEvent::Release { y: y(&c, "11:30") })
        .unwrap();
    let commit = event.commit().expect("move commits");
    assert_eq!(
        commit.slots,
        vec![TimeSlot::new(t("10:00"), t("13:00"), Category::Work), vacation]
    );
    assert_eq!(s.day(&"a".into(), Weekday::Mon), commit.slots.as_slice());
}

#[test]
fn test_move_overlapping_same_category_is_healed() {
    let mut c = controller();
    let mut s = WeekSchedule::new(week());
    s.load_day(
        "a".into(),
        Weekday::Tue,
        vec![
            TimeSlot::new(t("08:00"), t("09:00"), Category::Work),
            TimeSlot::new(t("10:00"), t("12:00"), Category::Work),
        ],
    )
    .unwrap();

    c.handle(&mut s, press(&c, Weekday::Tue, "08:00", on_slot("a", 0)));
    c.handle(&mut s, InputEvent::Move { y: y(&c, "09:30") });
    // Same-category overlap is allowed while dragging.
    assert_eq!(c.preview_slots(&s).unwrap().slots.len(), 2);
    let event = c
        .handle(&mut s, InputEvent::Release { y: y(&c, "09:30") })
        .unwrap();
    assert_eq!(
        event.commit().unwrap().slots,
        vec![TimeSlot::new(t("09:30"), t("12:00"), Category::Work)]
    );
}

#[test]
fn test_resize_start_edge() {
    let mut c = controller();
    let mut s = WeekSchedule::new(week());
    s.load_day(
        "b".into(),
        Weekday::Wed,
        vec![
            TimeSlot::new(t("07:00"), t("08:00"), Category::Personal),
            TimeSlot::new(t("10:00"), t("12:00"), Category::Sick),
        ],
    )
    .unwrap();

    c.handle(
        &mut s,
        press(
            &c,
            Weekday::Wed,
            "10:00",
            HitTarget::SlotEdge {
                employee_id: "b".into(),
                slot_index: 1,
                edge: Edge::Start,
            },
        ),
    );
    assert_eq!(c.state(), ControllerState::Resizing(Edge::Start));
    c.handle(&mut s, InputEvent::Move { y: y(&c, "06:30") });
    assert_eq!(c.ghost().unwrap().start, t("08:00"));

    let event = c
        .handle(&mut s, InputEvent::Release { y: y(&c, "06:30") })
        .unwrap();
    let commit = event.commit().unwrap();
    assert_eq!(commit.employee_id.as_str(), "b");
    assert_eq!(commit.slots[1], TimeSlot::new(t("08:00"), t("12:00"), Category::Sick));
}

#[test]
fn test_paint_other_category_splits_existing() {
    let mut c = controller();
    let mut s = WeekSchedule::new(week());
    s.load_day(
        "a".into(),
        Weekday::Thu,
        vec![TimeSlot::new(t("08:00"), t("12:00"), Category::Vacation)],
    )
    .unwrap();
    c.set_category(Category::Work);

    // Pressing on a vacation body with the paint tool paints, it does not move.
    c.handle(&mut s, press(&c, Weekday::Thu, "09:15", on_slot("a", 0)));
    assert_eq!(c.state(), ControllerState::Painting);
    let event = c
        .handle(&mut s, InputEvent::Release { y: y(&c, "09:45") })
        .unwrap();
    assert_eq!(
        event.commit().unwrap().slots,
        vec![
            TimeSlot::new(t("08:00"), t("09:00"), Category::Vacation),
            TimeSlot::new(t("09:00"), t("10:00"), Category::Work),
            TimeSlot::new(t("10:00"), t("12:00"), Category::Vacation),
        ]
    );
}

#[test]
fn test_erase_tool_drag_over_slot_erases_range() {
    let mut c = controller();
    let mut s = WeekSchedule::new(week());
    s.load_day(
        "a".into(),
        Weekday::Fri,
        vec![TimeSlot::new(t("08:00"), t("16:00"), Category::Work)],
    )
    .unwrap();
    c.set_tool(Tool::Erase);

    c.handle(&mut s, press(&c, Weekday::Fri, "10:00", on_slot("a", 0)));
    assert_eq!(c.state(), ControllerState::Erasing);
    c.handle(&mut s, InputEvent::Move { y: y(&c, "11:00") });
    let event = c
        .handle(&mut s, InputEvent::Release { y: y(&c, "11:00") })
        .unwrap();
    assert_eq!(
        event.commit().unwrap().slots,
        vec![
            TimeSlot::new(t("08:00"), t("10:00"), Category::Work),
            TimeSlot::new(t("12:00"), t("16:00"), Category::Work),
        ]
    );
}

#[test]
fn test_erase_tool_short_drag_inside_slot_commits_preview() {
    let mut c = controller();
    let mut s = WeekSchedule::new(week());
    s.load_day(
        "a".into(),
        Weekday::Fri,
        vec![TimeSlot::new(t("09:00"), t("17:00"), Category::Work)],
    )
    .unwrap();
    c.set_tool(Tool::Erase);

    c.handle(&mut s, press(&c, Weekday::Fri, "14:00", on_slot("a", 0)));
    c.handle(&mut s, InputEvent::Move { y: y(&c, "14:30") });
    let previewed = c.preview_slots(&s).unwrap().slots;
    let event = c
        .handle(&mut s, InputEvent::Release { y: y(&c, "14:30") })
        .unwrap();
    assert!(matches!(event, GridEvent::Committed { .. }), "{event:?}");
    assert_eq!(event.commit().unwrap().slots, previewed);
    assert_eq!(
        s.day(&"a".into(), Weekday::Fri),
        &[
            TimeSlot::new(t("09:00"), t("14:00"), Category::Work),
            TimeSlot::new(t("15:00"), t("17:00"), Category::Work),
        ]
    );
}

#[test]
fn test_escape_then_new_gesture() {
    let mut c = controller();
    let mut s = WeekSchedule::new(week());
    c.handle(&mut s, press(&c, Weekday::Mon, "09:00", HitTarget::Grid));
    c.handle(&mut s, InputEvent::Move { y: y(&c, "15:00") });
    assert!(matches!(
        c.handle(&mut s, InputEvent::Escape),
        Some(GridEvent::GestureCancelled { .. })
    ));
    assert!(s.iter().next().is_none());

    c.handle(&mut s, press(&c, Weekday::Mon, "09:00", HitTarget::Grid));
    let event = c
        .handle(&mut s, InputEvent::Release { y: y(&c, "09:00") })
        .unwrap();
    assert_eq!(
        event.commit().unwrap().slots,
        vec![TimeSlot::new(t("09:00"), t("10:00"), Category::Work)]
    );
}

#[test]
fn test_paint_is_clipped_to_grid() {
    let mut c = controller();
    let mut s = WeekSchedule::new(week());
    c.handle(&mut s, press(&c, Weekday::Mon, "18:00", HitTarget::Grid));
    let event = c
        .handle(&mut s, InputEvent::Release { y: y(&c, "23:00") })
        .unwrap();
    assert_eq!(
        event.commit().unwrap().slots,
        vec![TimeSlot::new(t("18:00"), t("20:00"), Category::Work)]
    );
}

#[test]
fn test_unknown_active_employee_is_refused() {
    let mut c = controller();
    assert!(c.set_active_employee("zz".into()).is_err());
    assert_eq!(c.active_employee().unwrap().as_str(), "a");
}

#[tokio::test]
async fn test_commits_reach_repository_through_writer() {
    let mut c = controller();
    let mut s = WeekSchedule::new(week());
    let (writer, mut outcomes, handle) = CommitWriter::spawn(MemoryRepository::new());

    let inputs = vec![
        press(&c, Weekday::Mon, "09:00", HitTarget::Grid),
        InputEvent::Move { y: y(&c, "11:00") },
        InputEvent::Release { y: y(&c, "11:00") },
        press(&c, Weekday::Mon, "10:00", on_slot("a", 0)),
        InputEvent::Move { y: y(&c, "12:00") },
        InputEvent::Release { y: y(&c, "12:00") },
    ];
    for input in inputs {
        if let Some(commit) = c.handle(&mut s, input).as_ref().and_then(GridEvent::commit) {
            writer.submit(commit.clone()).unwrap();
        }
    }
    drop(writer);

    let mut saved = 0;
    while let Some(outcome) = outcomes.recv().await {
        assert!(outcome.is_saved());
        saved += 1;
    }
    assert_eq!(saved, 2);

    let repo = handle.await.unwrap();
    let stored = repo.get_day_slots(&"a".into(), &week(), Weekday::Mon).unwrap();
    assert_eq!(stored, vec![TimeSlot::new(t("11:00"), t("14:00"), Category::Work)]);
    assert_eq!(stored, s.day(&"a".into(), Weekday::Mon));
}
