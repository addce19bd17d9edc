//! Domain model for goals, calendar events and chat messages.
//!
//! # Responsibility
//! - Define canonical data structures used by the alignment policy core.
//! - Keep wire field names aligned with the UI shell (`goalId`, `type`, ...).
//!
//! # Invariants
//! - Every event satisfies `start < end`.
//! - `Alignment::Green` events cite a goal; red/yellow events cite none.
//! - Focus events are always green and always cite a goal.

pub mod chat;
pub mod document;
pub mod event;
pub mod goal;
