//! Demo week used by the CLI smoke run, FFI bootstrap and tests.
//!
//! Tiers are recorded on the events, as a calendar import would deliver them.

use crate::model::document::DocAnalysis;
use crate::model::event::{Alignment, CalendarEvent, EventId};
use crate::model::goal::{Goal, GoalId};
use crate::policy::week::WorkWeek;

/// Demo account reported by the simulated calendar connect flow.
pub const DEMO_ACCOUNT: &str = "demo@chief.local";

#[derive(Clone, Copy)]
enum Tier {
    Green(&'static str),
    Yellow,
    Red,
}

pub fn goals() -> Vec<Goal> {
    vec![
        Goal::new(GoalId::new("g1"), "Launch V1", "#3b82f6", 40),
        Goal::new(GoalId::new("g2"), "Q3 Strategy", "#8b5cf6", 15),
        Goal::new(GoalId::new("g3"), "Hire Designer", "#10b981", 60),
    ]
}

/// Canned review returned by the simulated document analysis flow.
pub fn doc_analysis() -> DocAnalysis {
    DocAnalysis::new(
        80,
        "Aligned",
        vec![
            "Conflict: This feature contradicts the 'Simplicity' principle defined in the Org Strategy."
                .to_string(),
        ],
        vec!["Missing user retention metrics to justify this feature.".to_string()],
    )
}

/// Meetings shown before any calendar is connected.
pub fn initial_events(week: &WorkWeek) -> Vec<CalendarEvent> {
    vec![
        meeting(week, "e1", "Weekly Sync", 0, (9, 0), (10, 0), Tier::Yellow),
        meeting(week, "e2", "Stakeholder Review", 0, (11, 0), (12, 0), Tier::Red)
            .with_note("This meeting does not map to any active goal. Recommended: Decline."),
        meeting(week, "e3", "Design Huddle", 0, (14, 0), (15, 0), Tier::Green("g3")),
        meeting(week, "e4", "Random 1:1", 1, (10, 0), (10, 30), Tier::Red),
        meeting(week, "e5", "Strategy Workshop", 1, (13, 0), (15, 0), Tier::Green("g2")),
        meeting(week, "e6", "V1 Bug Triage", 2, (9, 0), (10, 0), Tier::Green("g1")),
        meeting(week, "e7", "Marketing Sync", 3, (11, 0), (12, 0), Tier::Yellow),
    ]
}

/// Meetings delivered by the simulated calendar connect flow.
pub fn imported_events(week: &WorkWeek) -> Vec<CalendarEvent> {
    vec![
        meeting(week, "imp1", "GVC: Weekly PM Sync", 0, (9, 0), (10, 0), Tier::Yellow),
        meeting(week, "imp2", "1:1 with Director", 0, (10, 30), (11, 0), Tier::Green("g2")),
        meeting(week, "imp3", "Eng Sync - V1 Launch", 0, (13, 0), (14, 0), Tier::Green("g1")),
        meeting(week, "imp4", "Coffee Chat", 0, (15, 0), (15, 30), Tier::Red)
            .with_note("Social catch-up. Low priority."),
        meeting(week, "imp5", "Q3 Roadmap Review", 1, (10, 0), (12, 0), Tier::Green("g2")),
        meeting(week, "imp6", "Design Critique", 2, (14, 0), (15, 30), Tier::Green("g3")),
        meeting(week, "imp7", "All Hands", 4, (11, 0), (12, 0), Tier::Yellow),
        meeting(week, "imp8", "Interview: Sr PM Candidate", 3, (13, 0), (14, 0), Tier::Green("g3")),
    ]
}

fn meeting(
    week: &WorkWeek,
    id: &str,
    title: &str,
    day: u32,
    start: (u32, u32),
    end: (u32, u32),
    tier: Tier,
) -> CalendarEvent {
    let (alignment, goal_id) = match tier {
        Tier::Green(goal_id) => (Alignment::Green, Some(GoalId::new(goal_id))),
        Tier::Yellow => (Alignment::Yellow, None),
        Tier::Red => (Alignment::Red, None),
    };
    let start = week
        .at(day, start.0, start.1)
        .expect("seed start time is valid");
    let end = week.at(day, end.0, end.1).expect("seed end time is valid");
    CalendarEvent::meeting(EventId::new(id), title, start, end, alignment, goal_id)
        .expect("seed events satisfy event invariants")
}
