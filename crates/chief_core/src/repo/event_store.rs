//! Authoritative event collection for the visible week.
//!
//! # Responsibility
//! - Hold the current event snapshot.
//! - Accept whole-collection replacement only (import, reconciliation).
//!
//! # Invariants
//! - Every stored event passes `CalendarEvent::validate()`.
//! - Event ids are unique within one snapshot.
//! - Snapshot order is `start ASC`, ties keep input order.
//! - A rejected `replace` leaves the previous snapshot untouched.

use crate::model::event::{CalendarEvent, EventId, EventValidationError};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Event store write errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventStoreError {
    Invalid(EventValidationError),
    DuplicateEventId(EventId),
}

impl Display for EventStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::DuplicateEventId(id) => write!(f, "duplicate event id: {id}"),
        }
    }
}

impl Error for EventStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::DuplicateEventId(_) => None,
        }
    }
}

impl From<EventValidationError> for EventStoreError {
    fn from(value: EventValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Snapshot-swapping event store.
#[derive(Debug, Clone)]
pub struct EventStore {
    events: Arc<[CalendarEvent]>,
    revision: u64,
}

impl Default for EventStore {
    fn default() -> Self {
        Self {
            events: Arc::from(Vec::new()),
            revision: 0,
        }
    }
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current immutable snapshot.
    pub fn all(&self) -> Arc<[CalendarEvent]> {
        Arc::clone(&self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Monotonic counter bumped on every successful replace.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Atomically swaps in `events`, sorted by start time.
    pub fn replace(&mut self, mut events: Vec<CalendarEvent>) -> Result<u64, EventStoreError> {
        let mut seen = HashSet::with_capacity(events.len());
        for event in &events {
            if let Err(err) = event.validate() {
                warn!("event=store_replace module=store status=error reason=invalid_event");
                return Err(err.into());
            }
            if !seen.insert(event.id.clone()) {
                warn!("event=store_replace module=store status=error reason=duplicate_id");
                return Err(EventStoreError::DuplicateEventId(event.id.clone()));
            }
        }

        events.sort_by_key(|event| event.start);
        self.events = Arc::from(events);
        self.revision += 1;
        info!(
            "event=store_replace module=store status=ok revision={} count={}",
            self.revision,
            self.events.len()
        );
        Ok(self.revision)
    }
}
