//! Schedule reconciliation ("auto-fix").
//!
//! # Responsibility
//! - Drop conflicting (red) events.
//! - Insert green focus blocks for goals below their target allocation.
//!
//! # Invariants
//! - Kept events are returned unchanged and in stable `start` order.
//! - Focus blocks never overlap another event of the result.
//! - A goal that already has a focus block this week gets no new one. A
//!   second run on the output drops nothing more, but goals cut by
//!   `max_focus_blocks` can still get their block then.
//! - A block without a free slot is skipped, never an error.

use crate::config::PlannerConfig;
use crate::model::event::{intervals_overlap, CalendarEvent, EventId};
use crate::model::goal::GoalId;
use crate::policy::allocation::TimeAllocation;
use crate::policy::classifier::{
    AlignmentClassifier, AlignmentStrategy, Classification, ClassifyError,
};
use crate::policy::week::WorkWeek;
use crate::repo::goal_registry::GoalRegistry;
use chrono::{NaiveDateTime, TimeDelta};
use log::{debug, info};
use std::collections::HashSet;

/// Why a focus block was not placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoAvailableSlot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    pub goal_id: GoalId,
    pub reason: SkipReason,
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// New authoritative event list, sorted by start.
    pub events: Vec<CalendarEvent>,
    /// Red events that were dropped, in input order.
    pub removed: Vec<CalendarEvent>,
    /// Focus blocks synthesized by this pass.
    pub added: Vec<CalendarEvent>,
    pub skipped: Vec<SkippedBlock>,
}

impl ReconcileOutcome {
    pub fn removed_minutes(&self) -> i64 {
        self.removed.iter().map(CalendarEvent::duration_minutes).sum()
    }

    /// Whether the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Runs one reconciliation pass over `events`.
///
/// # Errors
/// Any classification failure (for example a dangling goal reference) aborts
/// the pass; the caller's event list is left as is.
pub fn reconcile(
    events: &[CalendarEvent],
    registry: &GoalRegistry,
    strategy: &dyn AlignmentStrategy,
    week: &WorkWeek,
    config: &PlannerConfig,
) -> Result<ReconcileOutcome, ClassifyError> {
    let classifier = AlignmentClassifier::new(registry, strategy);
    let classifications = classifier.classify_all(events)?;

    let mut kept: Vec<(&CalendarEvent, &Classification)> = Vec::with_capacity(events.len());
    let mut removed = Vec::new();
    for (event, classification) in events.iter().zip(&classifications) {
        if *classification == Classification::Conflicting {
            removed.push(event.clone());
        } else {
            kept.push((event, classification));
        }
    }

    let allocation = TimeAllocation::compute(kept.iter().copied(), registry, week);
    let already_served: HashSet<&GoalId> = kept
        .iter()
        .filter(|(event, _)| event.is_focus() && week.contains(event.start))
        .filter_map(|(event, _)| event.goal_id.as_ref())
        .collect();

    let candidates: Vec<GoalId> = allocation
        .under_served()
        .into_iter()
        .map(|row| row.goal_id)
        .filter(|goal_id| !already_served.contains(goal_id))
        .take(config.max_focus_blocks)
        .collect();

    let mut occupied: Vec<(NaiveDateTime, NaiveDateTime)> = kept
        .iter()
        .map(|(event, _)| (event.start, event.end))
        .collect();
    let mut added = Vec::new();
    let mut skipped = Vec::new();

    for goal_id in candidates {
        let Some(goal) = registry.get(&goal_id) else {
            continue;
        };
        match find_free_slot(&occupied, week, config) {
            Some((start, end)) => {
                let block = CalendarEvent::focus(
                    EventId::generate_focus(),
                    format!("Focus: {}", goal.title),
                    start,
                    end,
                    goal_id.clone(),
                )?;
                occupied.push((start, end));
                added.push(block);
            }
            None => {
                debug!(
                    "event=reconcile_block module=policy status=skipped reason=no_available_slot goal_id={goal_id}"
                );
                skipped.push(SkippedBlock {
                    goal_id,
                    reason: SkipReason::NoAvailableSlot,
                });
            }
        }
    }

    let mut result: Vec<CalendarEvent> = kept.iter().map(|(event, _)| (*event).clone()).collect();
    result.extend(added.iter().cloned());
    result.sort_by_key(|event| event.start);

    info!(
        "event=reconcile module=policy status=ok input={} removed={} added={} skipped={}",
        events.len(),
        removed.len(),
        added.len(),
        skipped.len()
    );

    Ok(ReconcileOutcome {
        events: result,
        removed,
        added,
        skipped,
    })
}

/// First slot, scanning working days in order, that fits working hours and
/// overlaps nothing in `occupied`.
fn find_free_slot(
    occupied: &[(NaiveDateTime, NaiveDateTime)],
    week: &WorkWeek,
    config: &PlannerConfig,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let length = TimeDelta::minutes(i64::from(config.focus_block_minutes));
    let step = TimeDelta::minutes(i64::from(config.slot_step_minutes.max(1)));

    for date in week.working_days() {
        let (open, close) = week.working_hours(date);
        let mut start = open;
        while start + length <= close {
            let end = start + length;
            let collides = occupied
                .iter()
                .any(|(busy_start, busy_end)| intervals_overlap(start, end, *busy_start, *busy_end));
            if !collides {
                return Some((start, end));
            }
            start += step;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::find_free_slot;
    use crate::config::PlannerConfig;
    use crate::policy::week::WorkWeek;
    use chrono::NaiveDate;

    fn week() -> WorkWeek {
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        WorkWeek::containing(monday, &PlannerConfig::default())
    }

    #[test]
    fn free_slot_starts_at_opening_hour_on_empty_week() {
        let week = week();
        let slot = find_free_slot(&[], &week, &PlannerConfig::default()).unwrap();
        assert_eq!(slot.0, week.at(0, 8, 0).unwrap());
        assert_eq!(slot.1, week.at(0, 10, 0).unwrap());
    }

    #[test]
    fn free_slot_steps_past_busy_interval() {
        let week = week();
        let busy = vec![(week.at(0, 8, 0).unwrap(), week.at(0, 9, 15).unwrap())];
        let slot = find_free_slot(&busy, &week, &PlannerConfig::default()).unwrap();
        assert_eq!(slot.0, week.at(0, 9, 30).unwrap());
    }

    #[test]
    fn free_slot_moves_to_next_day_when_day_is_full() {
        let week = week();
        let busy = vec![(week.at(0, 8, 0).unwrap(), week.at(0, 17, 0).unwrap())];
        let slot = find_free_slot(&busy, &week, &PlannerConfig::default()).unwrap();
        assert_eq!(slot.0, week.at(1, 8, 0).unwrap());
    }

    #[test]
    fn free_slot_is_none_when_week_is_full() {
        let week = week();
        let busy: Vec<_> = (0..5)
            .map(|day| (week.at(day, 8, 0).unwrap(), week.at(day, 18, 0).unwrap()))
            .collect();
        assert!(find_free_slot(&busy, &week, &PlannerConfig::default()).is_none());
    }
}
