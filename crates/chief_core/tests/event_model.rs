use chief_core::{
    Alignment, CalendarEvent, EventId, EventKind, EventValidationError, GoalId, PlannerConfig,
    WorkWeek,
};
use chrono::{NaiveDate, NaiveDateTime};

fn week() -> WorkWeek {
    let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    WorkWeek::containing(monday, &PlannerConfig::default())
}

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    week().at(day, hour, minute).unwrap()
}

#[test]
fn meeting_constructor_keeps_fields() {
    let event = CalendarEvent::meeting(
        EventId::new("e3"),
        "Design Huddle",
        at(0, 14, 0),
        at(0, 15, 0),
        Alignment::Green,
        Some(GoalId::new("g3")),
    )
    .unwrap();

    assert_eq!(event.kind, EventKind::Meeting);
    assert_eq!(event.alignment, Alignment::Green);
    assert_eq!(event.goal_id, Some(GoalId::new("g3")));
    assert_eq!(event.duration_minutes(), 60);
    assert!(event.note.is_none());
}

#[test]
fn meeting_rejects_reversed_or_empty_window() {
    let err = CalendarEvent::meeting(
        EventId::new("e1"),
        "Backwards",
        at(0, 10, 0),
        at(0, 9, 0),
        Alignment::Yellow,
        None,
    )
    .unwrap_err();
    assert_eq!(
        err,
        EventValidationError::InvalidWindow {
            start: at(0, 10, 0),
            end: at(0, 9, 0),
        }
    );

    let err = CalendarEvent::meeting(
        EventId::new("e1"),
        "Zero length",
        at(0, 9, 0),
        at(0, 9, 0),
        Alignment::Yellow,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, EventValidationError::InvalidWindow { .. }));
}

#[test]
fn green_requires_goal_and_other_tiers_forbid_it() {
    let err = CalendarEvent::meeting(
        EventId::new("e1"),
        "Green without goal",
        at(0, 9, 0),
        at(0, 10, 0),
        Alignment::Green,
        None,
    )
    .unwrap_err();
    assert_eq!(err, EventValidationError::MissingGoal(EventId::new("e1")));

    let err = CalendarEvent::meeting(
        EventId::new("e2"),
        "Red with goal",
        at(0, 9, 0),
        at(0, 10, 0),
        Alignment::Red,
        Some(GoalId::new("g1")),
    )
    .unwrap_err();
    assert_eq!(
        err,
        EventValidationError::UnexpectedGoal {
            event_id: EventId::new("e2"),
            alignment: Alignment::Red,
        }
    );
}

#[test]
fn focus_without_goal_is_rejected_by_validation() {
    let mut block = CalendarEvent::focus(
        EventId::new("f1"),
        "Focus: Launch V1",
        at(0, 13, 0),
        at(0, 15, 0),
        GoalId::new("g1"),
    )
    .unwrap();
    block.goal_id = None;
    block.alignment = Alignment::Yellow;

    assert_eq!(
        block.validate().unwrap_err(),
        EventValidationError::FocusWithoutGoal(EventId::new("f1"))
    );
}

#[test]
fn empty_id_is_rejected() {
    let err = CalendarEvent::meeting(
        EventId::new("  "),
        "Nameless",
        at(0, 9, 0),
        at(0, 10, 0),
        Alignment::Yellow,
        None,
    )
    .unwrap_err();
    assert_eq!(err, EventValidationError::EmptyId);
}

#[test]
fn overlap_uses_half_open_intervals() {
    let first = CalendarEvent::meeting(
        EventId::new("a"),
        "A",
        at(0, 9, 0),
        at(0, 10, 0),
        Alignment::Yellow,
        None,
    )
    .unwrap();
    let adjacent = CalendarEvent::meeting(
        EventId::new("b"),
        "B",
        at(0, 10, 0),
        at(0, 11, 0),
        Alignment::Yellow,
        None,
    )
    .unwrap();
    let nested = CalendarEvent::meeting(
        EventId::new("c"),
        "C",
        at(0, 9, 15),
        at(0, 9, 45),
        Alignment::Yellow,
        None,
    )
    .unwrap();

    assert!(!first.overlaps(&adjacent));
    assert!(first.overlaps(&nested));
    assert!(nested.overlaps(&first));
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let event = CalendarEvent::meeting(
        EventId::new("e2"),
        "Stakeholder Review",
        at(0, 11, 0),
        at(0, 12, 0),
        Alignment::Red,
        None,
    )
    .unwrap()
    .with_note("Recommended: Decline.");

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["id"], "e2");
    assert_eq!(json["type"], "meeting");
    assert_eq!(json["alignment"], "red");
    assert_eq!(json["start"], "2026-10-19T11:00:00");
    assert_eq!(json["note"], "Recommended: Decline.");
    assert!(json.get("goalId").is_none());

    let decoded: CalendarEvent = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, event);
}

#[test]
fn deserialize_accepts_description_alias_and_goal_id() {
    let value = serde_json::json!({
        "id": "imp6",
        "title": "Design Critique",
        "start": "2026-10-21T14:00:00",
        "end": "2026-10-21T15:30:00",
        "alignment": "green",
        "type": "meeting",
        "goalId": "g3",
        "description": "Portfolio review"
    });

    let event: CalendarEvent = serde_json::from_value(value).unwrap();
    assert_eq!(event.goal_id, Some(GoalId::new("g3")));
    assert_eq!(event.note.as_deref(), Some("Portfolio review"));
}

#[test]
fn deserialize_rejects_focus_without_goal() {
    let value = serde_json::json!({
        "id": "f9",
        "title": "Focus",
        "start": "2026-10-19T13:00:00",
        "end": "2026-10-19T15:00:00",
        "alignment": "green",
        "type": "focus"
    });

    let err = serde_json::from_value::<CalendarEvent>(value).unwrap_err();
    assert!(
        err.to_string().contains("focus event f9 must cite a goal"),
        "unexpected error: {err}"
    );
}
