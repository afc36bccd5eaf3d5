use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, stable identifier of a user (the principal of the caller).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A direct message between two users.
///
/// Messages never change after creation except for `read`, which is set once
/// when the recipient opens the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub sender: UserId,
    pub recipient: UserId,
    pub content: String,
    /// Inline image as a `data:` URL, passed through untouched.
    #[serde(default)]
    pub image: Option<String>,
    /// Nanoseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default)]
    pub read: bool,
}

/// Which side of a conversation a timeline entry came from, as seen by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Like,
    Pass,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Pass => "pass",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "like" => Some(Self::Like),
            "pass" => Some(Self::Pass),
            _ => None,
        }
    }
}

/// A swipe made by the viewer on another user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDecision {
    pub id: UserId,
    pub decision: Decision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub display_name: String,
    pub age: u32,
    pub bio: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPost {
    pub id: i64,
    pub owner: UserId,
    pub caption: String,
    /// Photo as a `data:` URL.
    pub photo: String,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_wire_format_is_lowercase() {
        let json = serde_json::to_string(&MatchDecision {
            id: UserId::from("bob"),
            decision: Decision::Like,
        })
        .unwrap();
        assert_eq!(json, r#"{"id":"bob","decision":"like"}"#);
        assert_eq!(Decision::parse("pass"), Some(Decision::Pass));
        assert_eq!(Decision::parse("maybe"), None);
    }

    #[test]
    fn message_defaults_optional_fields() {
        let msg: Message = serde_json::from_str(
            r#"{"sender":"a","recipient":"b","content":"hi","timestamp":5}"#,
        )
        .unwrap();
        assert_eq!(msg.image, None);
        assert!(!msg.read);
    }
}
