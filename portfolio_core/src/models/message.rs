//! Contact message records as they live in the message store.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Store-assigned key of a message. Never generated by the submitting side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid message id: {0:?}")]
pub struct InvalidMessageId(pub String);

impl MessageId {
    /// Accepts only keys the hosted store would accept: non-empty, without
    /// `. # $ [ ] /` or control characters.
    pub fn parse(raw: &str) -> Result<Self, InvalidMessageId> {
        let valid = !raw.is_empty()
            && raw.len() <= 768
            && !raw
                .chars()
                .any(|c| matches!(c, '.' | '#' | '$' | '[' | ']' | '/') || c.is_control());

        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidMessageId(raw.to_string()))
        }
    }

    pub(crate) fn from_store(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The record body stored under a message id. Every field is defaulted so a
/// malformed record still renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: String,
    pub read: bool,
}

impl Message {
    pub fn from_stored(id: MessageId, stored: StoredMessage) -> Self {
        Self {
            id,
            name: stored.name,
            email: stored.email,
            message: stored.message,
            timestamp: stored.timestamp,
            read: stored.read,
        }
    }

    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// What a contact-form submission pushes into the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: String,
    pub read: bool,
}

impl NewMessage {
    pub fn into_stored(self) -> StoredMessage {
        StoredMessage {
            name: self.name,
            email: self.email,
            message: self.message,
            timestamp: self.timestamp,
            read: self.read,
        }
    }
}

/// The only mutation the admin panel performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePatch {
    MarkRead,
}

impl MessagePatch {
    pub fn to_json(self) -> serde_json::Value {
        match self {
            MessagePatch::MarkRead => serde_json::json!({ "read": true }),
        }
    }

    pub fn apply(self, stored: &mut StoredMessage) {
        match self {
            MessagePatch::MarkRead => stored.read = true,
        }
    }
}

/// Raw contact-form payload, as posted by the public page or the JSON API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContactSubmission {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}

impl ContactSubmission {
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_id_rejects_store_forbidden_characters() {
        assert!(MessageId::parse("-NqX1abcDEF").is_ok());
        for bad in ["", "a.b", "a#b", "a$b", "a[b", "a]b", "a/b", "a\nb"] {
            assert!(MessageId::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn stored_message_tolerates_missing_fields() {
        let stored: StoredMessage = serde_json::from_value(serde_json::json!({
            "name": "Ana"
        }))
        .unwrap();
        assert_eq!(stored.name, "Ana");
        assert_eq!(stored.email, "");
        assert!(!stored.read);
    }

    #[test]
    fn timestamps_parse_with_or_without_offset() {
        assert!(parse_timestamp("2026-10-18T12:00:00.000Z").is_some());
        assert!(parse_timestamp("2026-10-18T12:00:00+02:00").is_some());
        assert!(parse_timestamp("2026-10-18T12:00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn mark_read_patch_only_sets_read() {
        let mut stored = StoredMessage {
            name: "Ana".into(),
            ..Default::default()
        };
        MessagePatch::MarkRead.apply(&mut stored);
        assert!(stored.read);
        assert_eq!(stored.name, "Ana");
        assert_eq!(MessagePatch::MarkRead.to_json(), serde_json::json!({ "read": true }));
    }
}
