//! Event-to-goal alignment classifier.
//!
//! # Responsibility
//! - Map `(event, goal registry)` to exactly one alignment tier.
//! - Delegate meeting scoring to a pluggable `AlignmentStrategy`.
//!
//! # Invariants
//! - Pure and deterministic for a given `(event, goal set)`.
//! - Focus blocks are always `Aligned` with the goal they were created for.
//! - Goal ids that do not resolve fail with `DanglingGoalReference`; the tier
//!   is never silently downgraded.

use crate::model::event::{Alignment, CalendarEvent, EventId, EventValidationError};
use crate::model::goal::{Goal, GoalId};
use crate::repo::goal_registry::GoalRegistry;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Classifier output. The tier and the goal link travel together so a green
/// result can never lack its goal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Green: serves `GoalId`.
    Aligned(GoalId),
    /// Yellow.
    Ambiguous,
    /// Red.
    Conflicting,
}

impl Classification {
    pub fn tier(&self) -> Alignment {
        match self {
            Self::Aligned(_) => Alignment::Green,
            Self::Ambiguous => Alignment::Yellow,
            Self::Conflicting => Alignment::Red,
        }
    }

    pub fn goal_id(&self) -> Option<&GoalId> {
        match self {
            Self::Aligned(goal_id) => Some(goal_id),
            Self::Ambiguous | Self::Conflicting => None,
        }
    }

    /// Returns a copy of `event` carrying this tier and goal link.
    pub fn apply_to(&self, event: &CalendarEvent) -> CalendarEvent {
        let mut classified = event.clone();
        classified.alignment = self.tier();
        classified.goal_id = self.goal_id().cloned();
        classified
    }
}

/// Classification failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    DanglingGoalReference { event_id: EventId, goal_id: GoalId },
    FocusWithoutGoal(EventId),
    InvalidEvent(EventValidationError),
}

impl Display for ClassifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingGoalReference { event_id, goal_id } => write!(
                f,
                "event {event_id} references unknown goal {goal_id}"
            ),
            Self::FocusWithoutGoal(event_id) => {
                write!(f, "focus event {event_id} has no goal")
            }
            Self::InvalidEvent(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ClassifyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEvent(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EventValidationError> for ClassifyError {
    fn from(value: EventValidationError) -> Self {
        match value {
            EventValidationError::FocusWithoutGoal(event_id) => Self::FocusWithoutGoal(event_id),
            other => Self::InvalidEvent(other),
        }
    }
}

/// Scoring seam for meeting tiers.
///
/// Implementations must be deterministic: no randomness, no wall-clock
/// reads. They are only consulted for `EventKind::Meeting` events.
pub trait AlignmentStrategy {
    fn assess(&self, event: &CalendarEvent, goals: &[Goal]) -> Classification;
}

/// Uses the tier recorded on the event by import or fixture data.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordedAlignment;

impl AlignmentStrategy for RecordedAlignment {
    fn assess(&self, event: &CalendarEvent, _goals: &[Goal]) -> Classification {
        match (event.alignment, &event.goal_id) {
            (Alignment::Green, Some(goal_id)) => Classification::Aligned(goal_id.clone()),
            (Alignment::Red, _) => Classification::Conflicting,
            // Green without goal is rejected by validation before we get here.
            (Alignment::Green, None) | (Alignment::Yellow, _) => Classification::Ambiguous,
        }
    }
}

/// Classifier bound to one registry snapshot and one strategy.
pub struct AlignmentClassifier<'a> {
    registry: &'a GoalRegistry,
    strategy: &'a dyn AlignmentStrategy,
}

impl<'a> AlignmentClassifier<'a> {
    pub fn new(registry: &'a GoalRegistry, strategy: &'a dyn AlignmentStrategy) -> Self {
        Self { registry, strategy }
    }

    pub fn classify(&self, event: &CalendarEvent) -> Result<Classification, ClassifyError> {
        event.validate()?;

        if let Some(goal_id) = &event.goal_id {
            self.ensure_goal(event, goal_id)?;
        }

        if event.is_focus() {
            return match &event.goal_id {
                Some(goal_id) => Ok(Classification::Aligned(goal_id.clone())),
                None => Err(ClassifyError::FocusWithoutGoal(event.id.clone())),
            };
        }

        let classification = self.strategy.assess(event, self.registry.list());
        if let Classification::Aligned(goal_id) = &classification {
            self.ensure_goal(event, goal_id)?;
        }
        Ok(classification)
    }

    /// Classifies every event, failing on the first error.
    pub fn classify_all(
        &self,
        events: &[CalendarEvent],
    ) -> Result<Vec<Classification>, ClassifyError> {
        events.iter().map(|event| self.classify(event)).collect()
    }

    fn ensure_goal(&self, event: &CalendarEvent, goal_id: &GoalId) -> Result<(), ClassifyError> {
        if self.registry.contains(goal_id) {
            return Ok(());
        }
        Err(ClassifyError::DanglingGoalReference {
            event_id: event.id.clone(),
            goal_id: goal_id.clone(),
        })
    }
}
