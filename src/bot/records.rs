//! Records kept in the document store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bot::store::Collection;

/// Display format for every timestamp shown to users.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Shown when a submission carries no author name.
const UNKNOWN_AUTHOR: &str = "Unknown";

pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

/// A prompt put to participants. Current while `end_time` is unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub text: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Prompt {
    /// "start - end", or "start - now" while the prompt is open.
    pub fn period(&self) -> String {
        let end = self
            .end_time
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_else(|| "now".to_string());
        format!("{} - {}", format_timestamp(&self.start_time), end)
    }
}

/// The three kinds of participant submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Answer,
    FreeQuestion,
    Comment,
}

impl SubmissionKind {
    pub fn collection(self) -> Collection {
        match self {
            SubmissionKind::Answer => Collection::Answers,
            SubmissionKind::FreeQuestion => Collection::FreeQuestions,
            SubmissionKind::Comment => Collection::Comments,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SubmissionKind::Answer => "Answer",
            SubmissionKind::FreeQuestion => "Question",
            SubmissionKind::Comment => "Comment",
        }
    }
}

/// A participant answer, free question, or comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub author_id: i64,
    #[serde(default)]
    pub author_display_name: Option<String>,
    /// Chat the submission was sent from. Private chats share the author id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<i64>,
    /// Message id in that chat, used to forward the original.
    pub source_message_id: i64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Set on answers only. Never rewritten once stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_id: Option<String>,
}

impl Submission {
    pub fn author(&self) -> &str {
        self.author_display_name.as_deref().unwrap_or(UNKNOWN_AUTHOR)
    }

    /// Chat holding the original message.
    pub fn source_conversation(&self) -> i64 {
        self.conversation_id.unwrap_or(self.author_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoNote {
    pub text: String,
}

/// Key of the single admin registry document.
pub const ADMINS_KEY: &str = "admins";

/// Stored form of the admin registry: `{key: "admins", value: [ids]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminList {
    pub key: String,
    pub value: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_prompt_serializes_camel_case_without_end_time() {
        let prompt = Prompt {
            id: "u1".to_string(),
            text: "Q1".to_string(),
            start_time: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            end_time: None,
        };

        let json = serde_json::to_value(&prompt).unwrap();
        assert!(json.get("startTime").is_some());
        assert!(json.get("endTime").is_none());
        assert!(prompt.end_time.is_none());
    }

    #[test]
    fn test_period_formats_open_and_closed() {
        let mut prompt = Prompt {
            id: "u1".to_string(),
            text: "Q1".to_string(),
            start_time: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            end_time: None,
        };
        assert_eq!(prompt.period(), "2024-03-01 09:30:00 - now");

        prompt.end_time = Some(Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 5).unwrap());
        assert_eq!(prompt.period(), "2024-03-01 09:30:00 - 2024-03-01 18:00:05");
    }

    #[test]
    fn test_submission_author_falls_back() {
        let submission = Submission {
            author_id: 7,
            author_display_name: None,
            conversation_id: None,
            source_message_id: 11,
            text: "hi".to_string(),
            timestamp: Utc::now(),
            prompt_id: None,
        };
        assert_eq!(submission.author(), "Unknown");
        assert_eq!(submission.source_conversation(), 7);
    }
}
