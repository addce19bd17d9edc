//! Core goal-alignment logic for the Chief of Staff assistant.
//! This crate is the single source of truth for alignment and schedule invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod seed;
pub mod service;

pub use config::{ConfigError, PlannerConfig};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError, LoggingStatus};
pub use model::chat::{ActionKind, ChatAction, ChatMessage, MessageId, MessageKind, Sender};
pub use model::document::DocAnalysis;
pub use model::event::{Alignment, CalendarEvent, EventId, EventKind, EventValidationError};
pub use model::goal::{Goal, GoalId};
pub use policy::allocation::{GoalAllocation, TimeAllocation, UnderServedGoal};
pub use policy::classifier::{
    AlignmentClassifier, AlignmentStrategy, Classification, ClassifyError, RecordedAlignment,
};
pub use policy::reconcile::{reconcile, ReconcileOutcome, SkipReason, SkippedBlock};
pub use policy::week::WorkWeek;
pub use repo::chat_log::ChatLog;
pub use repo::event_store::{EventStore, EventStoreError};
pub use repo::goal_registry::{GoalRegistry, GoalRegistryError};
pub use service::clock::{Clock, FixedClock, SystemClock};
pub use service::command_center::{
    ActionOutcome, AppSnapshot, CalendarConnection, CommandCenter, CommandError, CommandResult,
    ReplaceReason, StateChange, SubscriptionId,
};
pub use service::insights::ChartSlice;
pub use service::requests::{RequestChannel, RequestOutcome, RequestTicket};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
