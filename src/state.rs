//! UI-agnostic chat data types
//!
//! These are the values that get persisted to the history file and shown in
//! the transcript. They don't depend on the terminal layer.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(rename = "from")]
    pub origin: Origin,
    pub text: String,
    /// When the turn was created. Older history files carry no timestamp,
    /// those turns are stamped with the load time.
    #[serde(rename = "at", default = "Utc::now")]
    pub sent_at: DateTime<Utc>,
}

/// Who wrote a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "ai")]
    Assistant,
}

impl ChatTurn {
    pub fn new(origin: Origin, text: impl Into<String>) -> Self {
        Self {
            origin,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Origin::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Origin::Assistant, text)
    }

    pub fn is_user(&self) -> bool {
        self.origin == Origin::User
    }

    /// Local wall-clock time the turn was sent, as `HH:MM`
    pub fn time_label(&self) -> String {
        self.sent_at.with_timezone(&Local).format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_short_origin_tags() {
        let turn = ChatTurn::assistant("hello!");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["from"], "ai");
        assert_eq!(json["text"], "hello!");
        assert!(json["at"].is_string());

        let json = serde_json::to_value(ChatTurn::user("hi")).unwrap();
        assert_eq!(json["from"], "user");
    }

    #[test]
    fn test_deserializes_without_timestamp() {
        let turn: ChatTurn = serde_json::from_str(r#"{"from":"user","text":"hi"}"#).unwrap();
        assert_eq!(turn.origin, Origin::User);
        assert_eq!(turn.text, "hi");
    }

    #[test]
    fn test_rejects_unknown_origin() {
        let parsed = serde_json::from_str::<ChatTurn>(r#"{"from":"system","text":"x"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_time_label_format() {
        let label = ChatTurn::user("hi").time_label();
        assert_eq!(label.len(), 5);
        assert_eq!(label.as_bytes()[2], b':');
    }
}
