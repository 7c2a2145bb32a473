//! Course planning domain types.
//!
//! - [`Message`]: a single chat turn between the author and the assistant
//! - [`CourseData`]: the course outline shown next to the chat
//! - [`mock`]: hard-coded placeholder content used to seed new sessions

pub mod mock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Label shown in the message bubble header.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "YOU",
            Self::Assistant => "ASSISTANT",
        }
    }
}

/// A chat message.
///
/// Messages are immutable once created and kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped at `timestamp`, with an ID derived from it.
    pub fn new(role: MessageRole, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: timestamp.timestamp_millis().to_string(),
            role,
            content: content.into(),
            timestamp,
        }
    }

    /// Create a user message stamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content, Utc::now())
    }

    /// Create an assistant message stamped now.
    ///
    /// The ID is offset by one millisecond so a reply produced in the same
    /// millisecond as its prompt does not share its ID.
    pub fn assistant(content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: (now.timestamp_millis() + 1).to_string(),
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: now,
        }
    }

    /// Time of day the message was created, as `HH:MM` (24-hour).
    #[must_use]
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// One module of a course outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseOutlineItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
}

/// A course title with its ordered outline.
///
/// Always replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseData {
    pub title: String,
    pub outline: Vec<CourseOutlineItem>,
}
