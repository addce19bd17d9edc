use chief_core::{
    reconcile, seed, Alignment, CalendarEvent, ClassifyError, EventId, EventKind, Goal, GoalId,
    GoalRegistry, PlannerConfig, RecordedAlignment, SkipReason, WorkWeek,
};
use chrono::NaiveDate;

fn week() -> WorkWeek {
    let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    WorkWeek::containing(monday, &PlannerConfig::default())
}

fn registry() -> GoalRegistry {
    GoalRegistry::seeded("#ec4899", seed::goals()).unwrap()
}

fn meeting(
    id: &str,
    day: u32,
    start: (u32, u32),
    end: (u32, u32),
    alignment: Alignment,
    goal: Option<&str>,
) -> CalendarEvent {
    let week = week();
    CalendarEvent::meeting(
        EventId::new(id),
        id,
        week.at(day, start.0, start.1).unwrap(),
        week.at(day, end.0, end.1).unwrap(),
        alignment,
        goal.map(GoalId::new),
    )
    .unwrap()
}

fn monday_scenario() -> Vec<CalendarEvent> {
    vec![
        meeting("sync", 0, (9, 0), (10, 0), Alignment::Yellow, None),
        meeting("review", 0, (11, 0), (12, 0), Alignment::Red, None),
        meeting("huddle", 0, (14, 0), (15, 0), Alignment::Green, Some("g3")),
    ]
}

fn assert_no_focus_overlap(events: &[CalendarEvent]) {
    for block in events.iter().filter(|event| event.is_focus()) {
        for other in events.iter().filter(|other| other.id != block.id) {
            assert!(
                !block.overlaps(other),
                "focus block {} overlaps {}",
                block.id,
                other.id
            );
        }
    }
}

#[test]
fn removes_red_and_adds_focus_for_under_served_goals() {
    let week = week();
    let config = PlannerConfig::default();
    let outcome = reconcile(
        &monday_scenario(),
        &registry(),
        &RecordedAlignment,
        &week,
        &config,
    )
    .unwrap();

    let removed: Vec<&str> = outcome.removed.iter().map(|event| event.id.as_str()).collect();
    assert_eq!(removed, vec!["review"]);
    assert_eq!(outcome.removed_minutes(), 60);
    assert!(outcome
        .events
        .iter()
        .all(|event| event.alignment != Alignment::Red));

    // g3 is at 50% against 60%; g1 and g2 have nothing yet.
    let added_goals: Vec<&str> = outcome
        .added
        .iter()
        .map(|block| block.goal_id.as_ref().unwrap().as_str())
        .collect();
    assert_eq!(added_goals, vec!["g1", "g2", "g3"]);

    let g1_block = &outcome.added[0];
    assert_eq!(g1_block.kind, EventKind::Focus);
    assert_eq!(g1_block.alignment, Alignment::Green);
    assert_eq!(g1_block.title, "Focus: Launch V1");
    assert_eq!(g1_block.start, week.at(0, 10, 0).unwrap());
    assert_eq!(g1_block.end, week.at(0, 12, 0).unwrap());
    assert_eq!(outcome.added[1].start, week.at(0, 12, 0).unwrap());
    assert_eq!(outcome.added[2].start, week.at(0, 15, 0).unwrap());

    assert!(outcome.events.iter().any(|event| event.id.as_str() == "sync"));
    assert!(outcome.events.iter().any(|event| event.id.as_str() == "huddle"));
    assert_eq!(outcome.events.len(), 5);
    assert!(outcome.skipped.is_empty());
    assert_no_focus_overlap(&outcome.events);
}

#[test]
fn kept_events_are_unchanged_and_sorted() {
    let input = monday_scenario();
    let outcome = reconcile(
        &input,
        &registry(),
        &RecordedAlignment,
        &week(),
        &PlannerConfig::default(),
    )
    .unwrap();

    for original in input.iter().filter(|event| event.alignment != Alignment::Red) {
        let kept = outcome
            .events
            .iter()
            .find(|event| event.id == original.id)
            .unwrap();
        assert_eq!(kept, original);
    }
    assert!(outcome
        .events
        .windows(2)
        .all(|pair| pair[0].start <= pair[1].start));
}

#[test]
fn second_pass_is_a_noop() {
    let week = week();
    let config = PlannerConfig::default();
    let registry = registry();

    let first = reconcile(
        &seed::initial_events(&week),
        &registry,
        &RecordedAlignment,
        &week,
        &config,
    )
    .unwrap();
    assert!(!first.is_noop());

    let second = reconcile(&first.events, &registry, &RecordedAlignment, &week, &config).unwrap();
    assert!(second.is_noop());
    assert!(second.skipped.is_empty());
    assert_eq!(second.events, first.events);
}

#[test]
fn demo_week_gets_blocks_for_most_behind_goals() {
    let week = week();
    let outcome = reconcile(
        &seed::initial_events(&week),
        &registry(),
        &RecordedAlignment,
        &week,
        &PlannerConfig::default(),
    )
    .unwrap();

    let removed: Vec<&str> = outcome.removed.iter().map(|event| event.id.as_str()).collect();
    assert_eq!(removed, vec!["e2", "e4"]);
    assert_eq!(outcome.removed_minutes(), 90);

    // After removal: g1 16% of 40, g2 33% of 15, g3 16% of 60.
    let added_goals: Vec<&str> = outcome
        .added
        .iter()
        .map(|block| block.goal_id.as_ref().unwrap().as_str())
        .collect();
    assert_eq!(added_goals, vec!["g3", "g1"]);
    assert_eq!(outcome.added[0].start, week.at(0, 10, 0).unwrap());
    assert_eq!(outcome.added[1].start, week.at(0, 12, 0).unwrap());
    assert_no_focus_overlap(&outcome.events);
}

#[test]
fn ties_on_start_keep_input_order() {
    let events = vec![
        meeting("first", 2, (9, 0), (10, 0), Alignment::Yellow, None),
        meeting("second", 2, (9, 0), (9, 30), Alignment::Yellow, None),
        meeting("early", 0, (9, 0), (10, 0), Alignment::Green, Some("g1")),
    ];
    let config = PlannerConfig {
        max_focus_blocks: 0,
        ..PlannerConfig::default()
    };

    let outcome = reconcile(&events, &registry(), &RecordedAlignment, &week(), &config).unwrap();
    let ids: Vec<&str> = outcome.events.iter().map(|event| event.id.as_str()).collect();
    assert_eq!(ids, vec!["early", "first", "second"]);
    assert!(outcome.added.is_empty());
}

#[test]
fn full_week_skips_blocks_without_error() {
    let events: Vec<CalendarEvent> = (0..5)
        .map(|day| {
            meeting(
                &format!("busy{day}"),
                day,
                (8, 0),
                (18, 0),
                Alignment::Yellow,
                None,
            )
        })
        .collect();

    let outcome = reconcile(
        &events,
        &registry(),
        &RecordedAlignment,
        &week(),
        &PlannerConfig::default(),
    )
    .unwrap();

    assert!(outcome.added.is_empty());
    assert_eq!(outcome.skipped.len(), 3);
    assert!(outcome
        .skipped
        .iter()
        .all(|skip| skip.reason == SkipReason::NoAvailableSlot));
    assert_eq!(outcome.events, events);
}

#[test]
fn block_count_is_capped_by_config() {
    let config = PlannerConfig {
        max_focus_blocks: 1,
        ..PlannerConfig::default()
    };
    let outcome = reconcile(
        &monday_scenario(),
        &registry(),
        &RecordedAlignment,
        &week(),
        &config,
    )
    .unwrap();

    assert_eq!(outcome.added.len(), 1);
    assert_eq!(outcome.added[0].goal_id, Some(GoalId::new("g1")));
}

#[test]
fn goal_with_zero_target_gets_no_block() {
    let registry = GoalRegistry::seeded(
        "#ec4899",
        vec![Goal::new(GoalId::new("g0"), "Someday", "#ec4899", 0)],
    )
    .unwrap();
    let events = vec![meeting("sync", 0, (9, 0), (10, 0), Alignment::Yellow, None)];

    let outcome = reconcile(
        &events,
        &registry,
        &RecordedAlignment,
        &week(),
        &PlannerConfig::default(),
    )
    .unwrap();
    assert!(outcome.is_noop());
    assert_eq!(outcome.events, events);
}

#[test]
fn empty_calendar_gets_blocks_from_opening_hour() {
    let week = week();
    let outcome = reconcile(
        &[],
        &registry(),
        &RecordedAlignment,
        &week,
        &PlannerConfig::default(),
    )
    .unwrap();

    // Every goal sits at 0%, so the largest target goes first.
    let added_goals: Vec<&str> = outcome
        .added
        .iter()
        .map(|block| block.goal_id.as_ref().unwrap().as_str())
        .collect();
    assert_eq!(added_goals, vec!["g3", "g1", "g2"]);
    assert_eq!(outcome.added[0].start, week.at(0, 8, 0).unwrap());
    assert!(outcome.removed.is_empty());
    assert_eq!(outcome.events, outcome.added);
}

#[test]
fn dangling_goal_aborts_the_pass() {
    let events = vec![meeting("orphan", 0, (9, 0), (10, 0), Alignment::Green, Some("g9"))];
    let err = reconcile(
        &events,
        &registry(),
        &RecordedAlignment,
        &week(),
        &PlannerConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ClassifyError::DanglingGoalReference { .. }));
}

#[test]
fn shorter_focus_blocks_follow_config() {
    let week = week();
    let config = PlannerConfig {
        focus_block_minutes: 60,
        max_focus_blocks: 1,
        ..PlannerConfig::default()
    };
    let outcome = reconcile(&monday_scenario(), &registry(), &RecordedAlignment, &week, &config)
        .unwrap();

    let block = &outcome.added[0];
    assert_eq!(block.duration_minutes(), 60);
    assert_eq!(block.start, week.at(0, 8, 0).unwrap());
}

#[test]
fn capped_pass_only_serves_remaining_goals_next_time() {
    let goals = ["ga", "gb", "gc", "gd"]
        .into_iter()
        .map(|id| Goal::new(GoalId::new(id), id, "#ec4899", 25))
        .collect();
    let registry = GoalRegistry::seeded("#ec4899", goals).unwrap();
    let week = week();
    let config = PlannerConfig::default();

    let first = reconcile(&[], &registry, &RecordedAlignment, &week, &config).unwrap();
    let first_goals: Vec<&GoalId> = first
        .added
        .iter()
        .filter_map(|block| block.goal_id.as_ref())
        .collect();
    assert_eq!(first_goals.len(), 3);

    let second = reconcile(&first.events, &registry, &RecordedAlignment, &week, &config).unwrap();
    assert!(second.removed.is_empty());
    let second_goals: Vec<&GoalId> = second
        .added
        .iter()
        .filter_map(|block| block.goal_id.as_ref())
        .collect();
    assert_eq!(second_goals, vec![&GoalId::new("gd")]);
    assert!(second_goals
        .iter()
        .all(|goal_id| !first_goals.contains(goal_id)));
    assert_no_focus_overlap(&second.events);

    let third = reconcile(&second.events, &registry, &RecordedAlignment, &week, &config).unwrap();
    assert!(third.is_noop());
}
