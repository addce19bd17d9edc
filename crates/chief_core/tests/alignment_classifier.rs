use chief_core::{
    seed, Alignment, AlignmentClassifier, AlignmentStrategy, CalendarEvent, Classification,
    ClassifyError, EventId, Goal, GoalId, GoalRegistry, PlannerConfig, RecordedAlignment,
    WorkWeek,
};
use chrono::NaiveDate;

fn week() -> WorkWeek {
    let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    WorkWeek::containing(monday, &PlannerConfig::default())
}

fn registry() -> GoalRegistry {
    GoalRegistry::seeded("#ec4899", seed::goals()).unwrap()
}

fn meeting(id: &str, title: &str, alignment: Alignment, goal: Option<&str>) -> CalendarEvent {
    let week = week();
    CalendarEvent::meeting(
        EventId::new(id),
        title,
        week.at(0, 9, 0).unwrap(),
        week.at(0, 10, 0).unwrap(),
        alignment,
        goal.map(GoalId::new),
    )
    .unwrap()
}

/// Flags coffee chats as conflicting and links anything mentioning V1 to g1.
struct KeywordStrategy;

impl AlignmentStrategy for KeywordStrategy {
    fn assess(&self, event: &CalendarEvent, goals: &[Goal]) -> Classification {
        if event.title.contains("Coffee") {
            return Classification::Conflicting;
        }
        goals
            .iter()
            .find(|goal| goal.title.contains("V1") && event.title.contains("V1"))
            .map(|goal| Classification::Aligned(goal.id.clone()))
            .unwrap_or(Classification::Ambiguous)
    }
}

/// Always links to a goal that is not registered.
struct RogueStrategy;

impl AlignmentStrategy for RogueStrategy {
    fn assess(&self, _event: &CalendarEvent, _goals: &[Goal]) -> Classification {
        Classification::Aligned(GoalId::new("ghost"))
    }
}

#[test]
fn recorded_strategy_returns_each_tier() {
    let registry = registry();
    let classifier = AlignmentClassifier::new(&registry, &RecordedAlignment);

    assert_eq!(
        classifier
            .classify(&meeting("e3", "Design Huddle", Alignment::Green, Some("g3")))
            .unwrap(),
        Classification::Aligned(GoalId::new("g3"))
    );
    assert_eq!(
        classifier
            .classify(&meeting("e1", "Weekly Sync", Alignment::Yellow, None))
            .unwrap(),
        Classification::Ambiguous
    );
    assert_eq!(
        classifier
            .classify(&meeting("e2", "Stakeholder Review", Alignment::Red, None))
            .unwrap(),
        Classification::Conflicting
    );
}

#[test]
fn classification_tier_and_goal_travel_together() {
    let aligned = Classification::Aligned(GoalId::new("g1"));
    assert_eq!(aligned.tier(), Alignment::Green);
    assert_eq!(aligned.goal_id(), Some(&GoalId::new("g1")));
    assert_eq!(Classification::Ambiguous.tier(), Alignment::Yellow);
    assert_eq!(Classification::Conflicting.goal_id(), None);

    let event = meeting("e1", "Weekly Sync", Alignment::Yellow, None);
    let applied = aligned.apply_to(&event);
    assert_eq!(applied.alignment, Alignment::Green);
    assert_eq!(applied.goal_id, Some(GoalId::new("g1")));
    assert!(applied.validate().is_ok());
}

#[test]
fn dangling_goal_reference_is_an_error() {
    let registry = registry();
    let classifier = AlignmentClassifier::new(&registry, &RecordedAlignment);
    let event = meeting("e9", "Orphan", Alignment::Green, Some("g9"));

    let err = classifier.classify(&event).unwrap_err();
    assert_eq!(
        err,
        ClassifyError::DanglingGoalReference {
            event_id: EventId::new("e9"),
            goal_id: GoalId::new("g9"),
        }
    );
}

#[test]
fn focus_blocks_are_always_green_regardless_of_strategy() {
    let registry = registry();
    let week = week();
    let block = CalendarEvent::focus(
        EventId::new("f1"),
        "Focus: Coffee with V1 team",
        week.at(0, 13, 0).unwrap(),
        week.at(0, 15, 0).unwrap(),
        GoalId::new("g2"),
    )
    .unwrap();

    let classifier = AlignmentClassifier::new(&registry, &KeywordStrategy);
    assert_eq!(
        classifier.classify(&block).unwrap(),
        Classification::Aligned(GoalId::new("g2"))
    );
}

#[test]
fn focus_block_without_goal_fails_classification() {
    let registry = registry();
    let week = week();
    let mut block = CalendarEvent::focus(
        EventId::new("f2"),
        "Focus",
        week.at(1, 8, 0).unwrap(),
        week.at(1, 10, 0).unwrap(),
        GoalId::new("g1"),
    )
    .unwrap();
    block.goal_id = None;

    let classifier = AlignmentClassifier::new(&registry, &RecordedAlignment);
    assert_eq!(
        classifier.classify(&block).unwrap_err(),
        ClassifyError::FocusWithoutGoal(EventId::new("f2"))
    );
}

#[test]
fn custom_strategy_drives_meeting_tiers() {
    let registry = registry();
    let classifier = AlignmentClassifier::new(&registry, &KeywordStrategy);

    let events = vec![
        meeting("a", "Coffee Chat", Alignment::Yellow, None),
        meeting("b", "V1 Bug Triage", Alignment::Yellow, None),
        meeting("c", "All Hands", Alignment::Red, None),
    ];
    let classifications = classifier.classify_all(&events).unwrap();

    assert_eq!(
        classifications,
        vec![
            Classification::Conflicting,
            Classification::Aligned(GoalId::new("g1")),
            Classification::Ambiguous,
        ]
    );
}

#[test]
fn strategy_linking_unknown_goal_is_rejected() {
    let registry = registry();
    let classifier = AlignmentClassifier::new(&registry, &RogueStrategy);
    let event = meeting("e1", "Weekly Sync", Alignment::Yellow, None);

    assert!(matches!(
        classifier.classify(&event).unwrap_err(),
        ClassifyError::DanglingGoalReference { .. }
    ));
}

#[test]
fn classification_is_deterministic() {
    let registry = registry();
    let classifier = AlignmentClassifier::new(&registry, &KeywordStrategy);
    let events = seed::initial_events(&week());

    let first = classifier.classify_all(&events).unwrap();
    let second = classifier.classify_all(&events).unwrap();
    assert_eq!(first, second);
}

#[test]
fn renaming_goal_keeps_green_links() {
    let mut registry = registry();
    registry.rename(&GoalId::new("g3"), "Hire Product Designer").unwrap();
    let classifier = AlignmentClassifier::new(&registry, &RecordedAlignment);

    let event = meeting("e3", "Design Huddle", Alignment::Green, Some("g3"));
    assert_eq!(
        classifier.classify(&event).unwrap(),
        Classification::Aligned(GoalId::new("g3"))
    );
}
