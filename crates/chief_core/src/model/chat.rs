//! Chat message model for the assistant panel.
//!
//! # Invariants
//! - `MessageKind::ActionCard` messages always carry an action.
//! - Text and report messages never carry an action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque chat message identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn generate() -> Self {
        Self(format!("c-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    Text,
    ActionCard,
    Report,
}

/// Action a card button triggers when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    FixSchedule,
    GenerateReport,
    UploadDoc,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FixSchedule => "fix-schedule",
            Self::GenerateReport => "generate-report",
            Self::UploadDoc => "upload-doc",
        }
    }

    /// Button label shown on the action card.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::FixSchedule => "Auto-Fix Schedule",
            Self::GenerateReport => "View Report",
            Self::UploadDoc => "Upload Document",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAction {
    pub label: String,
    #[serde(rename = "action")]
    pub kind: ActionKind,
}

impl ChatAction {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            label: kind.default_label().to_string(),
            kind,
        }
    }
}

/// One entry in the append-only conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(rename = "actionData", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ChatAction>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn text(sender: Sender, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::generate(),
            sender,
            text: text.into(),
            kind: MessageKind::Text,
            action: None,
            timestamp,
        }
    }

    pub fn action_card(
        text: impl Into<String>,
        action: ChatAction,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            sender: Sender::System,
            text: text.into(),
            kind: MessageKind::ActionCard,
            action: Some(action),
            timestamp,
        }
    }

    pub fn report(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::generate(),
            sender: Sender::System,
            text: text.into(),
            kind: MessageKind::Report,
            action: None,
            timestamp,
        }
    }
}
