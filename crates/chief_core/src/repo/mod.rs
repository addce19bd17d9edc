//! In-memory state holders owned by the command center.
//!
//! # Responsibility
//! - Keep goals, events and chat history behind narrow mutation APIs.
//! - Return semantic errors (`NotFound`, `DuplicateEventId`) to callers.
//!
//! # Invariants
//! - State lives for one session only; nothing is persisted.
//! - Event writes are whole-collection replacements.

pub mod chat_log;
pub mod event_store;
pub mod goal_registry;
