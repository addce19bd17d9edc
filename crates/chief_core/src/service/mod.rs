//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate registry, store and policy calls into command-level APIs.
//! - Keep UI/FFI layers decoupled from policy details.

pub mod assistant;
pub mod clock;
pub mod command_center;
pub mod insights;
pub mod requests;
