//! Goal-alignment policy: classification, allocation and reconciliation.
//!
//! # Responsibility
//! - Decide each event's alignment tier against the goal registry.
//! - Rebalance a week toward under-served goals.
//!
//! # Invariants
//! - Everything in this module is a pure function of its inputs, except
//!   the id generation for synthesized focus blocks.

pub mod allocation;
pub mod classifier;
pub mod reconcile;
pub mod week;
