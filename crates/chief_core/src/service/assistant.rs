//! Scripted assistant replies.
//!
//! # Responsibility
//! - Route a user chat message to one canned intent by keyword.
//! - Render system messages that describe reconciliation results.
//!
//! # Invariants
//! - Routing is case-insensitive and first match wins, in the order
//!   fix/schedule, report/summary, analyze/doc.
//! - Replies are deterministic for a given prompt and context.

use crate::model::chat::{ActionKind, ChatAction};
use crate::policy::reconcile::ReconcileOutcome;
use crate::repo::goal_registry::GoalRegistry;
use once_cell::sync::Lazy;
use regex::Regex;

static FIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)fix|schedule").expect("valid fix intent regex"));
static REPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)report|summary").expect("valid report intent regex"));
static DOC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)analy[sz]e|doc").expect("valid doc intent regex"));

const HELP_TEXT: &str =
    "I'm listening. You can ask me to 'Fix my schedule', 'Analyze a doc', or 'Generate a report'.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    FixSchedule,
    Report,
    AnalyzeDoc,
    Help,
}

pub fn detect_intent(text: &str) -> Intent {
    if FIX_RE.is_match(text) {
        Intent::FixSchedule
    } else if REPORT_RE.is_match(text) {
        Intent::Report
    } else if DOC_RE.is_match(text) {
        Intent::AnalyzeDoc
    } else {
        Intent::Help
    }
}

/// Schedule facts a reply may mention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyContext {
    pub conflicting_meetings: usize,
    /// Title of the goal with the largest allocation deficit.
    pub most_behind_goal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub text: String,
    pub action: Option<ChatAction>,
}

pub fn reply_for(text: &str, context: &ReplyContext) -> AssistantReply {
    match detect_intent(text) {
        Intent::FixSchedule => AssistantReply {
            text: fix_offer_text(context),
            action: Some(ChatAction::new(ActionKind::FixSchedule)),
        },
        Intent::Report => AssistantReply {
            text: "I've generated your weekly status report based on your calendar activity."
                .to_string(),
            action: Some(ChatAction::new(ActionKind::GenerateReport)),
        },
        Intent::AnalyzeDoc => AssistantReply {
            text: "Please drag and drop the document you'd like me to analyze, or click below to upload."
                .to_string(),
            action: Some(ChatAction::new(ActionKind::UploadDoc)),
        },
        Intent::Help => AssistantReply {
            text: HELP_TEXT.to_string(),
            action: None,
        },
    }
}

/// Opening message for a freshly loaded week.
pub fn greeting(context: &ReplyContext) -> AssistantReply {
    let text = if context.conflicting_meetings == 0 {
        "Good morning! I've analyzed your calendar against your top goals. No conflicting meetings this week."
            .to_string()
    } else {
        format!(
            "Good morning! I've analyzed your calendar against your top goals. I found {} that don't align with any active goal.",
            count_noun(context.conflicting_meetings, "high-conflict meeting", "high-conflict meetings")
        )
    };
    AssistantReply {
        text,
        action: (context.conflicting_meetings > 0).then(|| ChatAction::new(ActionKind::FixSchedule)),
    }
}

/// Confirmation posted after an auto-fix.
pub fn reconcile_summary(outcome: &ReconcileOutcome, registry: &GoalRegistry) -> String {
    if outcome.is_noop() {
        return "Your schedule is already aligned with your goals. Nothing to change.".to_string();
    }

    let titles: Vec<String> = outcome
        .added
        .iter()
        .filter_map(|block| block.goal_id.as_ref())
        .filter_map(|goal_id| registry.get(goal_id))
        .map(|goal| format!("'{}'", goal.title))
        .collect();

    let mut text = format!(
        "I've optimized your schedule. Removed {} and added {}",
        count_noun(outcome.removed.len(), "conflicting meeting", "conflicting meetings"),
        count_noun(outcome.added.len(), "focus block", "focus blocks"),
    );
    if !titles.is_empty() {
        text.push_str(" aligned with ");
        text.push_str(&join_with_and(&titles));
    }
    text.push('.');
    if !outcome.skipped.is_empty() {
        text.push_str(&format!(
            " {} could not be placed because the week is full.",
            count_noun(outcome.skipped.len(), "block", "blocks")
        ));
    }
    text
}

fn fix_offer_text(context: &ReplyContext) -> String {
    match (context.conflicting_meetings, context.most_behind_goal.as_deref()) {
        (0, Some(goal)) => format!(
            "Your meetings look fine, but '{goal}' is behind its target. Shall I add focus time?"
        ),
        (0, None) => {
            "Your schedule has no conflicting meetings. Shall I double-check it anyway?".to_string()
        }
        (count, Some(goal)) => format!(
            "I can help with that. I've identified {} that conflict with your '{goal}' goal. Shall I optimize your schedule?",
            count_noun(count, "meeting", "meetings")
        ),
        (count, None) => format!(
            "I can help with that. I've identified {} that conflict with your goals. Shall I optimize your schedule?",
            count_noun(count, "meeting", "meetings")
        ),
    }
}

fn count_noun(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn join_with_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} and {last}", head.join(", ")),
    }
}
