//! Calendar event domain model.
//!
//! # Responsibility
//! - Define the event record shown on the weekly calendar.
//! - Enforce tier/goal/kind consistency at construction and deserialization.
//!
//! # Invariants
//! - `end` strictly follows `start`.
//! - `alignment == Green` iff `goal_id.is_some()`.
//! - `kind == Focus` implies `alignment == Green`.
//! - Goal existence is not checked here; the classifier reports dangling ids.

use crate::model::goal::GoalId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque event identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh id for synthesized focus blocks.
    pub fn generate_focus() -> Self {
        Self(format!("focus-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Alignment tier of an event against the user's goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Conflicts with goals; recommended to decline.
    Red,
    /// Ambiguous; no clear goal link.
    Yellow,
    /// Serves a specific goal.
    Green,
}

impl Alignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
        }
    }
}

/// Event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Meeting,
    /// Protected work time synthesized by reconciliation.
    Focus,
}

/// Validation failures for event construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    EmptyId,
    InvalidWindow {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// Green event without a goal link.
    MissingGoal(EventId),
    /// Red/yellow event carrying a goal link.
    UnexpectedGoal {
        event_id: EventId,
        alignment: Alignment,
    },
    FocusNotGreen(EventId),
    FocusWithoutGoal(EventId),
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "event id must not be empty"),
            Self::InvalidWindow { start, end } => {
                write!(f, "event end ({end}) must be after start ({start})")
            }
            Self::MissingGoal(id) => write!(f, "green event {id} must cite a goal"),
            Self::UnexpectedGoal {
                event_id,
                alignment,
            } => write!(
                f,
                "{} event {event_id} must not cite a goal",
                alignment.as_str()
            ),
            Self::FocusNotGreen(id) => write!(f, "focus event {id} must be green"),
            Self::FocusWithoutGoal(id) => write!(f, "focus event {id} must cite a goal"),
        }
    }
}

impl Error for EventValidationError {}

/// One calendar entry in the visible week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventWire", into = "EventWire")]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    /// Wall-clock start in the user's zone.
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub alignment: Alignment,
    pub kind: EventKind,
    pub goal_id: Option<GoalId>,
    pub note: Option<String>,
}

impl CalendarEvent {
    /// Creates a meeting with a pre-assigned tier.
    ///
    /// # Errors
    /// - Returns `InvalidWindow` when `end <= start`.
    /// - Returns `MissingGoal`/`UnexpectedGoal` when tier and goal disagree.
    pub fn meeting(
        id: EventId,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        alignment: Alignment,
        goal_id: Option<GoalId>,
    ) -> Result<Self, EventValidationError> {
        let event = Self {
            id,
            title: title.into(),
            start,
            end,
            alignment,
            kind: EventKind::Meeting,
            goal_id,
            note: None,
        };
        event.validate()?;
        Ok(event)
    }

    /// Creates a green focus block serving `goal_id`.
    pub fn focus(
        id: EventId,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        goal_id: GoalId,
    ) -> Result<Self, EventValidationError> {
        let event = Self {
            id,
            title: title.into(),
            start,
            end,
            alignment: Alignment::Green,
            kind: EventKind::Focus,
            goal_id: Some(goal_id),
            note: None,
        };
        event.validate()?;
        Ok(event)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Checks structural invariants. Goal existence is not checked.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.id.is_empty() {
            return Err(EventValidationError::EmptyId);
        }
        if self.end <= self.start {
            return Err(EventValidationError::InvalidWindow {
                start: self.start,
                end: self.end,
            });
        }
        if self.kind == EventKind::Focus {
            if self.goal_id.is_none() {
                return Err(EventValidationError::FocusWithoutGoal(self.id.clone()));
            }
            if self.alignment != Alignment::Green {
                return Err(EventValidationError::FocusNotGreen(self.id.clone()));
            }
        }
        match (self.alignment, &self.goal_id) {
            (Alignment::Green, None) => Err(EventValidationError::MissingGoal(self.id.clone())),
            (Alignment::Red | Alignment::Yellow, Some(_)) => {
                Err(EventValidationError::UnexpectedGoal {
                    event_id: self.id.clone(),
                    alignment: self.alignment,
                })
            }
            _ => Ok(()),
        }
    }

    pub fn is_focus(&self) -> bool {
        self.kind == EventKind::Focus
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Half-open interval overlap: `[a.start, a.end)` vs `[b.start, b.end)`.
    pub fn overlaps(&self, other: &CalendarEvent) -> bool {
        intervals_overlap(self.start, self.end, other.start, other.end)
    }
}

/// Returns whether two half-open intervals intersect.
pub fn intervals_overlap(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Serialized event shape shared with the UI shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventWire {
    id: EventId,
    title: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    alignment: Alignment,
    #[serde(rename = "type")]
    kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    goal_id: Option<GoalId>,
    #[serde(default, alias = "description", skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl TryFrom<EventWire> for CalendarEvent {
    type Error = EventValidationError;

    fn try_from(wire: EventWire) -> Result<Self, Self::Error> {
        let event = Self {
            id: wire.id,
            title: wire.title,
            start: wire.start,
            end: wire.end,
            alignment: wire.alignment,
            kind: wire.kind,
            goal_id: wire.goal_id,
            note: wire.note,
        };
        event.validate()?;
        Ok(event)
    }
}

impl From<CalendarEvent> for EventWire {
    fn from(event: CalendarEvent) -> Self {
        Self {
            id: event.id,
            title: event.title,
            start: event.start,
            end: event.end,
            alignment: event.alignment,
            kind: event.kind,
            goal_id: event.goal_id,
            note: event.note,
        }
    }
}
