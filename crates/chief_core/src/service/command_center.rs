//! Application-state controller.
//!
//! # Responsibility
//! - Own goals, events, chat history and calendar connection state.
//! - Expose command methods for the UI shell and notify subscribers.
//! - Model simulated asynchronous flows as begin/complete pairs with
//!   last-request-wins semantics.
//!
//! # Invariants
//! - Single writer: every command runs to completion before the next one.
//! - Listeners run after the state change is fully applied.
//! - A failed command leaves goals, events and chat unchanged. The only
//!   side effect of a failure is a failed calendar connect falling back to
//!   `Disconnected`, which is announced as `ConnectionChanged`.
//! - Stored events only cite registered goals.

use crate::config::{ConfigError, PlannerConfig};
use crate::model::chat::{ActionKind, ChatMessage, MessageId, Sender};
use crate::model::document::DocAnalysis;
use crate::model::event::CalendarEvent;
use crate::model::goal::{Goal, GoalId};
use crate::policy::allocation::TimeAllocation;
use crate::policy::classifier::{
    AlignmentClassifier, AlignmentStrategy, Classification, ClassifyError, RecordedAlignment,
};
use crate::policy::reconcile::{reconcile, ReconcileOutcome};
use crate::policy::week::WorkWeek;
use crate::repo::chat_log::ChatLog;
use crate::repo::event_store::{EventStore, EventStoreError};
use crate::repo::goal_registry::{GoalRegistry, GoalRegistryError};
use crate::seed;
use crate::service::assistant::{self, ReplyContext};
use crate::service::clock::Clock;
use crate::service::insights::{self, ChartSlice};
use crate::service::requests::{RequestChannel, RequestOutcome, RequestTicket, RequestTracker};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Command-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Config(ConfigError),
    Goal(GoalRegistryError),
    Classify(ClassifyError),
    Store(EventStoreError),
    /// Chat input is blank after trim.
    EmptyMessage,
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Goal(err) => write!(f, "{err}"),
            Self::Classify(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::EmptyMessage => write!(f, "message must not be blank"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Goal(err) => Some(err),
            Self::Classify(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::EmptyMessage => None,
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<GoalRegistryError> for CommandError {
    fn from(value: GoalRegistryError) -> Self {
        Self::Goal(value)
    }
}

impl From<ClassifyError> for CommandError {
    fn from(value: ClassifyError) -> Self {
        Self::Classify(value)
    }
}

impl From<EventStoreError> for CommandError {
    fn from(value: EventStoreError) -> Self {
        Self::Store(value)
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Calendar provider connection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarConnection {
    Disconnected,
    Connecting,
    Connected { account: String },
}

/// Why the event store was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceReason {
    Import,
    CalendarConnect,
    Reconcile,
}

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    GoalsChanged,
    EventsReplaced {
        revision: u64,
        reason: ReplaceReason,
    },
    ChatAppended(MessageId),
    ConnectionChanged,
    /// A document review started, finished or was dismissed.
    DocAnalysisChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StateChange) + Send>;

/// Result of pressing an action-card button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Reconciled(ReconcileOutcome),
    ReportPosted(MessageId),
    /// The shell should open its document upload dialog.
    OpenDocumentUpload,
}

/// Immutable view handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSnapshot {
    pub goals: Vec<Goal>,
    pub events: Arc<[CalendarEvent]>,
    pub chat: Vec<ChatMessage>,
    pub connection: CalendarConnection,
    pub events_revision: u64,
    pub doc_analysis: Option<DocAnalysis>,
}

pub struct CommandCenter {
    config: PlannerConfig,
    clock: Box<dyn Clock + Send>,
    strategy: Box<dyn AlignmentStrategy + Send>,
    week: WorkWeek,
    goals: GoalRegistry,
    events: EventStore,
    chat: ChatLog,
    connection: CalendarConnection,
    requests: RequestTracker,
    pending_prompt: Option<String>,
    doc_analysis: Option<DocAnalysis>,
    avoided_minutes: i64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl CommandCenter {
    /// Creates an empty command center for the week containing `clock.today()`.
    pub fn new(config: PlannerConfig, clock: Box<dyn Clock + Send>) -> CommandResult<Self> {
        config.validate()?;
        let week = WorkWeek::containing(clock.today(), &config);
        let goals = GoalRegistry::new(config.default_goal_color.clone());
        Ok(Self {
            config,
            clock,
            strategy: Box::new(RecordedAlignment),
            week,
            goals,
            events: EventStore::new(),
            chat: ChatLog::new(),
            connection: CalendarConnection::Disconnected,
            requests: RequestTracker::new(),
            pending_prompt: None,
            doc_analysis: None,
            avoided_minutes: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Creates a command center loaded with the demo goals and week, and the
    /// morning greeting.
    pub fn demo(config: PlannerConfig, clock: Box<dyn Clock + Send>) -> CommandResult<Self> {
        let mut center = Self::new(config, clock)?;
        center.goals =
            GoalRegistry::seeded(center.config.default_goal_color.clone(), seed::goals())?;
        center.events.replace(seed::initial_events(&center.week))?;

        let context = center.reply_context()?;
        let greeting = assistant::greeting(&context);
        let now = center.clock.now();
        let message = match greeting.action {
            Some(action) => ChatMessage::action_card(greeting.text, action, now),
            None => ChatMessage::text(Sender::System, greeting.text, now),
        };
        center.chat.append(message);
        info!(
            "event=command_center_init module=command_center status=ok mode=demo goals={} events={}",
            center.goals.len(),
            center.events.len()
        );
        Ok(center)
    }

    /// Replaces the meeting scoring strategy.
    pub fn with_strategy(mut self, strategy: Box<dyn AlignmentStrategy + Send>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn week(&self) -> &WorkWeek {
        &self.week
    }

    pub fn connection(&self) -> &CalendarConnection {
        &self.connection
    }

    pub fn chat(&self) -> &[ChatMessage] {
        self.chat.messages()
    }

    /// Minutes of red meetings removed by reconciliations this session.
    pub fn avoided_minutes(&self) -> i64 {
        self.avoided_minutes
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            goals: self.goals.list().to_vec(),
            events: self.events.all(),
            chat: self.chat.messages().to_vec(),
            connection: self.connection.clone(),
            events_revision: self.events.revision(),
            doc_analysis: self.doc_analysis.clone(),
        }
    }

    // Subscriptions

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&StateChange) + Send + 'static,
    ) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        let listener: Listener = Box::new(listener);
        self.listeners.push((id, listener));
        id
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        before != self.listeners.len()
    }

    // Goals

    pub fn list_goals(&self) -> &[Goal] {
        self.goals.list()
    }

    pub fn add_goal(&mut self, title: impl Into<String>) -> CommandResult<Goal> {
        let goal = self.goals.add(title)?;
        self.notify(StateChange::GoalsChanged);
        Ok(goal)
    }

    /// Renames a goal. On `NotFound` the registry is unchanged.
    pub fn rename_goal(&mut self, id: &GoalId, title: impl Into<String>) -> CommandResult<Goal> {
        let goal = self.goals.rename(id, title)?;
        self.notify(StateChange::GoalsChanged);
        Ok(goal)
    }

    // Events

    /// Classifies one event against the current registry.
    pub fn classify_event(&self, event: &CalendarEvent) -> CommandResult<Classification> {
        Ok(self.classifier().classify(event)?)
    }

    /// Returns events with tiers computed on read.
    pub fn list_events(&self) -> CommandResult<Vec<CalendarEvent>> {
        let classifier = self.classifier();
        self.events
            .all()
            .iter()
            .map(|event| {
                classifier
                    .classify(event)
                    .map(|classification| classification.apply_to(event))
                    .map_err(CommandError::from)
            })
            .collect()
    }

    /// Bulk-replaces the event store.
    ///
    /// # Errors
    /// - `Classify(DanglingGoalReference)` when an event cites an unknown goal.
    /// - `Store(..)` for invalid or duplicate events.
    ///
    /// On error the previous events stay in place.
    pub fn import_events(&mut self, events: Vec<CalendarEvent>) -> CommandResult<u64> {
        let revision = self.store_events(events)?;
        self.notify(StateChange::EventsReplaced {
            revision,
            reason: ReplaceReason::Import,
        });
        Ok(revision)
    }

    /// Runs the auto-fix, replaces the store and posts a confirmation.
    pub fn trigger_reconciliation(&mut self) -> CommandResult<ReconcileOutcome> {
        let current = self.events.all();
        let outcome = match reconcile(
            &current,
            &self.goals,
            &*self.strategy,
            &self.week,
            &self.config,
        ) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("event=reconcile module=command_center status=error reason={err}");
                return Err(err.into());
            }
        };

        let revision = self.events.replace(outcome.events.clone())?;
        self.avoided_minutes += outcome.removed_minutes();
        self.notify(StateChange::EventsReplaced {
            revision,
            reason: ReplaceReason::Reconcile,
        });

        let summary = assistant::reconcile_summary(&outcome, &self.goals);
        self.post_system_message(ChatMessage::text(Sender::System, summary, self.clock.now()));
        Ok(outcome)
    }

    // Calendar connect

    /// Starts a simulated calendar connection.
    pub fn begin_calendar_connect(&mut self) -> RequestTicket {
        let ticket = self.requests.begin(RequestChannel::CalendarConnect);
        self.connection = CalendarConnection::Connecting;
        self.notify(StateChange::ConnectionChanged);
        debug!(
            "event=calendar_connect module=command_center status=started generation={}",
            ticket.generation()
        );
        ticket
    }

    /// Applies a connect result if `ticket` is still the latest request.
    ///
    /// Returns the number of imported events, or `Superseded` when a newer
    /// connect started after this one.
    pub fn complete_calendar_connect(
        &mut self,
        ticket: RequestTicket,
        account: impl Into<String>,
        events: Vec<CalendarEvent>,
    ) -> CommandResult<RequestOutcome<usize>> {
        if !self.requests.finish(&ticket) {
            debug!(
                "event=calendar_connect module=command_center status=superseded generation={}",
                ticket.generation()
            );
            return Ok(RequestOutcome::Superseded);
        }

        let count = events.len();
        let revision = match self.store_events(events) {
            Ok(revision) => revision,
            Err(err) => {
                self.connection = CalendarConnection::Disconnected;
                self.notify(StateChange::ConnectionChanged);
                warn!("event=calendar_connect module=command_center status=error reason={err}");
                return Err(err);
            }
        };

        let account = account.into();
        self.connection = CalendarConnection::Connected {
            account: account.clone(),
        };
        self.notify(StateChange::EventsReplaced {
            revision,
            reason: ReplaceReason::CalendarConnect,
        });
        self.notify(StateChange::ConnectionChanged);

        let text = format!(
            "Successfully connected to your calendar ({account}). I've imported {count} events for this week and analyzed them against your goals."
        );
        self.post_system_message(ChatMessage::text(Sender::System, text, self.clock.now()));
        info!("event=calendar_connect module=command_center status=ok imported={count}");
        Ok(RequestOutcome::Applied(count))
    }

    /// Convenience for the demo shell: connects and imports the demo week.
    pub fn connect_demo_calendar(&mut self) -> CommandResult<RequestOutcome<usize>> {
        let ticket = self.begin_calendar_connect();
        let events = seed::imported_events(&self.week);
        self.complete_calendar_connect(ticket, seed::DEMO_ACCOUNT, events)
    }

    // Document review

    /// Starts a simulated document review, clearing the previous result.
    pub fn begin_doc_analysis(&mut self) -> RequestTicket {
        let ticket = self.requests.begin(RequestChannel::DocAnalysis);
        self.doc_analysis = None;
        self.notify(StateChange::DocAnalysisChanged);
        debug!(
            "event=doc_analysis module=command_center status=started generation={}",
            ticket.generation()
        );
        ticket
    }

    /// Stores the review result if `ticket` is still the latest review.
    pub fn complete_doc_analysis(&mut self, ticket: RequestTicket) -> RequestOutcome<DocAnalysis> {
        if !self.requests.finish(&ticket) {
            debug!(
                "event=doc_analysis module=command_center status=superseded generation={}",
                ticket.generation()
            );
            return RequestOutcome::Superseded;
        }

        let analysis = seed::doc_analysis();
        self.doc_analysis = Some(analysis.clone());
        self.notify(StateChange::DocAnalysisChanged);
        info!(
            "event=doc_analysis module=command_center status=ok score={} issues={}",
            analysis.alignment_score,
            analysis.issues.len()
        );
        RequestOutcome::Applied(analysis)
    }

    /// Dismisses the review panel. A pending review is discarded.
    pub fn cancel_doc_analysis(&mut self) {
        let was_pending = self.requests.is_pending(RequestChannel::DocAnalysis);
        self.requests.cancel(RequestChannel::DocAnalysis);
        if was_pending {
            debug!("event=doc_analysis module=command_center status=cancelled");
            self.notify(StateChange::DocAnalysisChanged);
        }
    }

    /// Latest completed review, if any.
    pub fn doc_analysis(&self) -> Option<&DocAnalysis> {
        self.doc_analysis.as_ref()
    }

    // Chat

    /// Appends a user message and starts the assistant reply.
    pub fn post_user_message(&mut self, text: impl Into<String>) -> CommandResult<RequestTicket> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CommandError::EmptyMessage);
        }

        let message = ChatMessage::text(Sender::User, trimmed, self.clock.now());
        let message_id = self.chat.append(message).id.clone();
        self.notify(StateChange::ChatAppended(message_id));

        self.pending_prompt = Some(trimmed.to_string());
        Ok(self.requests.begin(RequestChannel::AssistantReply))
    }

    /// Posts the scripted reply for the latest user message.
    pub fn complete_assistant_reply(
        &mut self,
        ticket: RequestTicket,
    ) -> CommandResult<RequestOutcome<MessageId>> {
        if !self.requests.is_current(&ticket) {
            debug!(
                "event=assistant_reply module=command_center status=superseded generation={}",
                ticket.generation()
            );
            return Ok(RequestOutcome::Superseded);
        }

        let context = self.reply_context()?;
        self.requests.finish(&ticket);
        let Some(prompt) = self.pending_prompt.take() else {
            return Ok(RequestOutcome::Superseded);
        };

        let reply = assistant::reply_for(&prompt, &context);
        let now = self.clock.now();
        let message = match reply.action {
            Some(action) => ChatMessage::action_card(reply.text, action, now),
            None => ChatMessage::text(Sender::System, reply.text, now),
        };
        Ok(RequestOutcome::Applied(self.post_system_message(message)))
    }

    /// Runs the action behind an action-card button.
    pub fn dispatch_action(&mut self, action: ActionKind) -> CommandResult<ActionOutcome> {
        debug!(
            "event=dispatch_action module=command_center status=started action={}",
            action.as_str()
        );
        match action {
            ActionKind::FixSchedule => Ok(ActionOutcome::Reconciled(self.trigger_reconciliation()?)),
            ActionKind::GenerateReport => {
                let report = self.weekly_report()?;
                let message_id =
                    self.post_system_message(ChatMessage::report(report, self.clock.now()));
                Ok(ActionOutcome::ReportPosted(message_id))
            }
            ActionKind::UploadDoc => Ok(ActionOutcome::OpenDocumentUpload),
        }
    }

    // Insights

    pub fn time_allocation(&self) -> CommandResult<TimeAllocation> {
        let events = self.events.all();
        let classifications = self.classifier().classify_all(&events)?;
        Ok(TimeAllocation::compute(
            events.iter().zip(&classifications),
            &self.goals,
            &self.week,
        ))
    }

    pub fn chart_slices(&self) -> CommandResult<Vec<ChartSlice>> {
        Ok(insights::chart_slices(&self.time_allocation()?, &self.goals))
    }

    pub fn weekly_report(&self) -> CommandResult<String> {
        let allocation = self.time_allocation()?;
        Ok(insights::weekly_report(
            &allocation,
            &self.goals,
            self.avoided_minutes,
        ))
    }

    /// Replaces the store after checking every goal link against the registry.
    fn store_events(&mut self, events: Vec<CalendarEvent>) -> CommandResult<u64> {
        for event in &events {
            let Some(goal_id) = &event.goal_id else {
                continue;
            };
            if !self.goals.contains(goal_id) {
                warn!(
                    "event=store_events module=command_center status=error reason=dangling_goal event_id={}",
                    event.id
                );
                return Err(ClassifyError::DanglingGoalReference {
                    event_id: event.id.clone(),
                    goal_id: goal_id.clone(),
                }
                .into());
            }
        }
        Ok(self.events.replace(events)?)
    }

    fn classifier(&self) -> AlignmentClassifier<'_> {
        AlignmentClassifier::new(&self.goals, &*self.strategy)
    }

    fn reply_context(&self) -> CommandResult<ReplyContext> {
        let events = self.events.all();
        let classifications = self.classifier().classify_all(&events)?;
        let conflicting_meetings = classifications
            .iter()
            .filter(|classification| **classification == Classification::Conflicting)
            .count();
        let allocation =
            TimeAllocation::compute(events.iter().zip(&classifications), &self.goals, &self.week);
        let most_behind_goal = allocation
            .under_served()
            .first()
            .and_then(|row| self.goals.get(&row.goal_id))
            .map(|goal| goal.title.clone());
        Ok(ReplyContext {
            conflicting_meetings,
            most_behind_goal,
        })
    }

    fn post_system_message(&mut self, message: ChatMessage) -> MessageId {
        let message_id = self.chat.append(message).id.clone();
        self.notify(StateChange::ChatAppended(message_id.clone()));
        message_id
    }

    fn notify(&mut self, change: StateChange) {
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }
}
