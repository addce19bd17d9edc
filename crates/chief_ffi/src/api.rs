//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the command center to Dart via FRB as flat view structs.
//! - Own the process-wide demo session.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported as `ok=false` envelopes with a message.
//! - Event times cross the boundary as wall-clock epoch milliseconds.

use chief_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ActionKind, ActionOutcome, Alignment, CalendarEvent, ChartSlice, ChatMessage, CommandCenter,
    DocAnalysis, EventId, EventKind, Goal, GoalId, MessageKind, PlannerConfig, RequestOutcome,
    Sender, SystemClock,
};
use chrono::{DateTime, NaiveDateTime};
use log::warn;
use std::sync::{Mutex, MutexGuard, OnceLock};

static SESSION: OnceLock<Result<Mutex<CommandCenter>, String>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Goal row for the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalView {
    pub id: String,
    pub title: String,
    /// CSS hex color.
    pub color: String,
    /// Target share of scheduled time, `0..=100`.
    pub target_allocation: u8,
}

/// Calendar event as rendered by the week view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventView {
    pub id: String,
    pub title: String,
    pub start_epoch_ms: i64,
    pub end_epoch_ms: i64,
    /// `red|yellow|green`.
    pub alignment: String,
    /// `meeting|focus`.
    pub kind: String,
    pub goal_id: Option<String>,
    pub note: Option<String>,
}

/// Meeting supplied by the shell for bulk import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInput {
    pub id: String,
    pub title: String,
    pub start_epoch_ms: i64,
    pub end_epoch_ms: i64,
    pub alignment: String,
    pub goal_id: Option<String>,
    pub note: Option<String>,
}

/// Chat entry for the assistant panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessageView {
    pub id: String,
    /// `user|system`.
    pub sender: String,
    pub text: String,
    /// `text|action-card|report`.
    pub kind: String,
    /// Action-card action id, for example `fix-schedule`.
    pub action: Option<String>,
    pub action_label: Option<String>,
    pub timestamp_epoch_ms: i64,
}

/// One slice of the time-distribution chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSliceView {
    pub label: String,
    pub color: String,
    pub minutes: i64,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalListResponse {
    pub ok: bool,
    pub goals: Vec<GoalView>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalResponse {
    pub ok: bool,
    pub goal: Option<GoalView>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventListResponse {
    pub ok: bool,
    pub events: Vec<EventView>,
    pub message: String,
}

/// Auto-fix result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileResponse {
    pub ok: bool,
    pub removed_ids: Vec<String>,
    pub added: Vec<EventView>,
    /// Goals that got no focus block because the week is full.
    pub skipped_goal_ids: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub ok: bool,
    pub messages: Vec<ChatMessageView>,
    pub message: String,
}

/// Action-card dispatch envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// `reconciled|report-posted|open-document-upload`.
    pub outcome: String,
    pub message: String,
}

impl ActionResponse {
    fn success(outcome: &str, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            outcome: outcome.to_string(),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            outcome: String::new(),
            message: message.into(),
        }
    }
}

/// Strategic document review shown in the review panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocAnalysisView {
    pub alignment_score: u8,
    pub status: String,
    pub issues: Vec<String>,
    pub missing_data: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocAnalysisResponse {
    pub ok: bool,
    pub analysis: Option<DocAnalysisView>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightsResponse {
    pub ok: bool,
    pub slices: Vec<ChartSliceView>,
    pub report: String,
    pub message: String,
}

/// Lists goals in insertion order.
#[flutter_rust_bridge::frb(sync)]
pub fn list_goals() -> GoalListResponse {
    match with_session(|center| Ok(center.list_goals().iter().map(to_goal_view).collect())) {
        Ok(goals) => GoalListResponse {
            ok: true,
            goals,
            message: String::new(),
        },
        Err(message) => GoalListResponse {
            ok: false,
            goals: Vec::new(),
            message,
        },
    }
}

/// Adds a goal with the default color and zero target.
#[flutter_rust_bridge::frb(sync)]
pub fn add_goal(title: String) -> GoalResponse {
    to_goal_response(
        "add_goal",
        with_session(|center| center.add_goal(title).map_err(|err| err.to_string())),
    )
}

/// Renames an existing goal.
#[flutter_rust_bridge::frb(sync)]
pub fn rename_goal(goal_id: String, title: String) -> GoalResponse {
    to_goal_response(
        "rename_goal",
        with_session(|center| {
            center
                .rename_goal(&GoalId::new(goal_id), title)
                .map_err(|err| err.to_string())
        }),
    )
}

/// Lists events with tiers computed against the current goals.
#[flutter_rust_bridge::frb(sync)]
pub fn list_events() -> EventListResponse {
    let result = with_session(|center| center.list_events().map_err(|err| err.to_string()));
    to_event_list_response("list_events", result)
}

/// Replaces the visible week with `events`.
///
/// # FFI contract
/// - All-or-nothing: one invalid event, or one citing an unknown goal,
///   rejects the whole batch and keeps the current week.
#[flutter_rust_bridge::frb(sync)]
pub fn import_events(events: Vec<EventInput>) -> EventListResponse {
    let parsed: Result<Vec<CalendarEvent>, String> = events.into_iter().map(from_event_input).collect();
    let result = parsed.and_then(|events| {
        with_session(|center| {
            center.import_events(events).map_err(|err| err.to_string())?;
            center.list_events().map_err(|err| err.to_string())
        })
    });
    to_event_list_response("import_events", result)
}

/// Runs the auto-fix on the current week.
#[flutter_rust_bridge::frb(sync)]
pub fn trigger_reconciliation() -> ReconcileResponse {
    match with_session(|center| center.trigger_reconciliation().map_err(|err| err.to_string())) {
        Ok(outcome) => ReconcileResponse {
            ok: true,
            removed_ids: outcome
                .removed
                .iter()
                .map(|event| event.id.as_str().to_string())
                .collect(),
            added: outcome.added.iter().map(to_event_view).collect(),
            skipped_goal_ids: outcome
                .skipped
                .iter()
                .map(|skip| skip.goal_id.as_str().to_string())
                .collect(),
            message: format!(
                "Removed {} event(s), added {} focus block(s).",
                outcome.removed.len(),
                outcome.added.len()
            ),
        },
        Err(message) => {
            warn!("event=ffi_call module=ffi status=error call=trigger_reconciliation");
            ReconcileResponse {
                ok: false,
                removed_ids: Vec::new(),
                added: Vec::new(),
                skipped_goal_ids: Vec::new(),
                message,
            }
        }
    }
}

/// Connects the simulated calendar and imports the demo week.
///
/// # FFI contract
/// - Sync call; the connect flow begins and completes in one call.
#[flutter_rust_bridge::frb(sync)]
pub fn connect_demo_calendar() -> EventListResponse {
    let result = with_session(|center| {
        match center.connect_demo_calendar().map_err(|err| err.to_string())? {
            RequestOutcome::Applied(_) => center.list_events().map_err(|err| err.to_string()),
            RequestOutcome::Superseded => Err("calendar connect was superseded".to_string()),
        }
    });
    to_event_list_response("connect_demo_calendar", result)
}

/// Posts a user message, then the scripted reply.
///
/// Returns the full chat history on success.
#[flutter_rust_bridge::frb(sync)]
pub fn chat_send(text: String) -> ChatResponse {
    let result = with_session(|center| {
        let ticket = center.post_user_message(text).map_err(|err| err.to_string())?;
        center
            .complete_assistant_reply(ticket)
            .map_err(|err| err.to_string())?;
        Ok(center.chat().iter().map(to_chat_view).collect())
    });
    match result {
        Ok(messages) => ChatResponse {
            ok: true,
            messages,
            message: String::new(),
        },
        Err(message) => ChatResponse {
            ok: false,
            messages: Vec::new(),
            message,
        },
    }
}

/// Returns the chat history.
#[flutter_rust_bridge::frb(sync)]
pub fn chat_history() -> ChatResponse {
    match with_session(|center| Ok(center.chat().iter().map(to_chat_view).collect())) {
        Ok(messages) => ChatResponse {
            ok: true,
            messages,
            message: String::new(),
        },
        Err(message) => ChatResponse {
            ok: false,
            messages: Vec::new(),
            message,
        },
    }
}

/// Runs an action-card button by its action id.
#[flutter_rust_bridge::frb(sync)]
pub fn dispatch(action: String) -> ActionResponse {
    let Some(kind) = parse_action(&action) else {
        return ActionResponse::failure(format!("unknown action `{}`", action.trim()));
    };
    match with_session(|center| center.dispatch_action(kind).map_err(|err| err.to_string())) {
        Ok(ActionOutcome::Reconciled(outcome)) => ActionResponse::success(
            "reconciled",
            format!(
                "Removed {} event(s), added {} focus block(s).",
                outcome.removed.len(),
                outcome.added.len()
            ),
        ),
        Ok(ActionOutcome::ReportPosted(message_id)) => {
            ActionResponse::success("report-posted", message_id.to_string())
        }
        Ok(ActionOutcome::OpenDocumentUpload) => {
            ActionResponse::success("open-document-upload", String::new())
        }
        Err(message) => ActionResponse::failure(message),
    }
}

/// Runs the simulated review of an uploaded document.
///
/// # FFI contract
/// - Sync call; the review begins and completes in one call.
#[flutter_rust_bridge::frb(sync)]
pub fn analyze_doc() -> DocAnalysisResponse {
    let result = with_session(|center| {
        let ticket = center.begin_doc_analysis();
        match center.complete_doc_analysis(ticket) {
            RequestOutcome::Applied(analysis) => Ok(analysis),
            RequestOutcome::Superseded => Err("document review was superseded".to_string()),
        }
    });
    match result {
        Ok(analysis) => DocAnalysisResponse {
            ok: true,
            analysis: Some(to_doc_analysis_view(&analysis)),
            message: String::new(),
        },
        Err(message) => DocAnalysisResponse {
            ok: false,
            analysis: None,
            message: format!("analyze_doc failed: {message}"),
        },
    }
}

/// Dismisses the review panel, discarding any pending review.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn close_doc_review() -> String {
    match with_session(|center| {
        center.cancel_doc_analysis();
        Ok(())
    }) {
        Ok(()) => String::new(),
        Err(message) => message,
    }
}

/// Chart slices and the weekly report text.
#[flutter_rust_bridge::frb(sync)]
pub fn insights() -> InsightsResponse {
    let result = with_session(|center| {
        let slices = center.chart_slices().map_err(|err| err.to_string())?;
        let report = center.weekly_report().map_err(|err| err.to_string())?;
        Ok((slices, report))
    });
    match result {
        Ok((slices, report)) => InsightsResponse {
            ok: true,
            slices: slices.iter().map(to_chart_view).collect(),
            report,
            message: String::new(),
        },
        Err(message) => InsightsResponse {
            ok: false,
            slices: Vec::new(),
            report: String::new(),
            message,
        },
    }
}

fn with_session<T>(f: impl FnOnce(&mut CommandCenter) -> Result<T, String>) -> Result<T, String> {
    let mut guard = lock_session()?;
    f(&mut guard)
}

fn lock_session() -> Result<MutexGuard<'static, CommandCenter>, String> {
    let session = SESSION.get_or_init(|| {
        let mut config = PlannerConfig::default();
        config
            .apply_overrides(|key| std::env::var(key).ok())
            .map_err(|err| format!("config error: {err}"))?;
        CommandCenter::demo(config, Box::new(SystemClock))
            .map(Mutex::new)
            .map_err(|err| format!("session init failed: {err}"))
    });
    match session {
        Ok(mutex) => mutex
            .lock()
            .map_err(|_| "session state is poisoned".to_string()),
        Err(message) => Err(message.clone()),
    }
}

fn to_goal_response(call: &str, result: Result<Goal, String>) -> GoalResponse {
    match result {
        Ok(goal) => GoalResponse {
            ok: true,
            goal: Some(to_goal_view(&goal)),
            message: String::new(),
        },
        Err(message) => {
            warn!("event=ffi_call module=ffi status=error call={call}");
            GoalResponse {
                ok: false,
                goal: None,
                message: format!("{call} failed: {message}"),
            }
        }
    }
}

fn to_event_list_response(
    call: &str,
    result: Result<Vec<CalendarEvent>, String>,
) -> EventListResponse {
    match result {
        Ok(events) => EventListResponse {
            ok: true,
            events: events.iter().map(to_event_view).collect(),
            message: String::new(),
        },
        Err(message) => {
            warn!("event=ffi_call module=ffi status=error call={call}");
            EventListResponse {
                ok: false,
                events: Vec::new(),
                message: format!("{call} failed: {message}"),
            }
        }
    }
}

fn to_goal_view(goal: &Goal) -> GoalView {
    GoalView {
        id: goal.id.as_str().to_string(),
        title: goal.title.clone(),
        color: goal.color.clone(),
        target_allocation: goal.target_allocation,
    }
}

fn to_event_view(event: &CalendarEvent) -> EventView {
    EventView {
        id: event.id.as_str().to_string(),
        title: event.title.clone(),
        start_epoch_ms: to_epoch_ms(event.start),
        end_epoch_ms: to_epoch_ms(event.end),
        alignment: event.alignment.as_str().to_string(),
        kind: match event.kind {
            EventKind::Meeting => "meeting",
            EventKind::Focus => "focus",
        }
        .to_string(),
        goal_id: event.goal_id.as_ref().map(|id| id.as_str().to_string()),
        note: event.note.clone(),
    }
}

fn from_event_input(input: EventInput) -> Result<CalendarEvent, String> {
    let alignment = parse_alignment(&input.alignment)
        .ok_or_else(|| format!("unknown alignment `{}`", input.alignment))?;
    let event = CalendarEvent::meeting(
        EventId::new(input.id),
        input.title,
        from_epoch_ms(input.start_epoch_ms)?,
        from_epoch_ms(input.end_epoch_ms)?,
        alignment,
        input
            .goal_id
            .filter(|id| !id.trim().is_empty())
            .map(GoalId::new),
    )
    .map_err(|err| err.to_string())?;
    Ok(match input.note {
        Some(note) => event.with_note(note),
        None => event,
    })
}

fn to_chat_view(message: &ChatMessage) -> ChatMessageView {
    ChatMessageView {
        id: message.id.to_string(),
        sender: match message.sender {
            Sender::User => "user",
            Sender::System => "system",
        }
        .to_string(),
        text: message.text.clone(),
        kind: match message.kind {
            MessageKind::Text => "text",
            MessageKind::ActionCard => "action-card",
            MessageKind::Report => "report",
        }
        .to_string(),
        action: message
            .action
            .as_ref()
            .map(|action| action.kind.as_str().to_string()),
        action_label: message.action.as_ref().map(|action| action.label.clone()),
        timestamp_epoch_ms: message.timestamp.timestamp_millis(),
    }
}

fn to_chart_view(slice: &ChartSlice) -> ChartSliceView {
    ChartSliceView {
        label: slice.label.clone(),
        color: slice.color.clone(),
        minutes: slice.minutes,
        percent: slice.percent,
    }
}

fn to_doc_analysis_view(analysis: &DocAnalysis) -> DocAnalysisView {
    DocAnalysisView {
        alignment_score: analysis.alignment_score,
        status: analysis.status.clone(),
        issues: analysis.issues.clone(),
        missing_data: analysis.missing_data.clone(),
    }
}

fn to_epoch_ms(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp_millis()
}

fn from_epoch_ms(value: i64) -> Result<NaiveDateTime, String> {
    DateTime::from_timestamp_millis(value)
        .map(|instant| instant.naive_utc())
        .ok_or_else(|| format!("timestamp out of range: {value}"))
}

fn parse_alignment(value: &str) -> Option<Alignment> {
    match value.trim().to_ascii_lowercase().as_str() {
        "red" => Some(Alignment::Red),
        "yellow" => Some(Alignment::Yellow),
        "green" => Some(Alignment::Green),
        _ => None,
    }
}

fn parse_action(value: &str) -> Option<ActionKind> {
    [
        ActionKind::FixSchedule,
        ActionKind::GenerateReport,
        ActionKind::UploadDoc,
    ]
    .into_iter()
    .find(|kind| kind.as_str() == value.trim())
}
