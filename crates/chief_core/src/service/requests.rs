//! Last-request-wins tracking for simulated asynchronous work.
//!
//! # Responsibility
//! - Stamp each started request with a generation number.
//! - Tell completions apart: the latest request applies, older ones are
//!   discarded.
//!
//! # Invariants
//! - Generations increase monotonically across all channels.
//! - A ticket completes at most once.

use std::collections::HashMap;

/// Independent request streams; a new request only supersedes its own channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestChannel {
    CalendarConnect,
    AssistantReply,
    DocAnalysis,
}

/// Handle returned when a request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    channel: RequestChannel,
    generation: u64,
}

impl RequestTicket {
    pub fn channel(&self) -> RequestChannel {
        self.channel
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Completion result for a tracked request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome<T> {
    Applied(T),
    /// A newer request on the same channel started, or this ticket already
    /// completed. Nothing was changed.
    Superseded,
}

impl<T> RequestOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    next_generation: u64,
    active: HashMap<RequestChannel, u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request, superseding any pending one on `channel`.
    pub fn begin(&mut self, channel: RequestChannel) -> RequestTicket {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.active.insert(channel, generation);
        RequestTicket {
            channel,
            generation,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.active.get(&ticket.channel) == Some(&ticket.generation)
    }

    pub fn is_pending(&self, channel: RequestChannel) -> bool {
        self.active.contains_key(&channel)
    }

    /// Consumes the ticket; returns whether its result may be applied.
    pub fn finish(&mut self, ticket: &RequestTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.active.remove(&ticket.channel);
        true
    }

    /// Drops the pending request on `channel`, if any.
    pub fn cancel(&mut self, channel: RequestChannel) {
        self.active.remove(&channel);
    }
}
