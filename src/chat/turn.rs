use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One recorded message in a mode's history. Timestamps are RFC 3339; the
/// user turn and the assistant turn of one exchange share the same one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    /// One line of the plain-text history export.
    pub fn export_line(&self) -> String {
        format!("{} [{}]: {}", self.role.as_str(), self.timestamp, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_use_canonical_labels() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");

        let json = serde_json::to_value(Role::Assistant).unwrap();
        assert_eq!(json, serde_json::json!("assistant"));
    }

    #[test]
    fn export_line_carries_role_timestamp_and_content() {
        let turn = ChatTurn::assistant("hello there", "2024-05-01T12:00:00+00:00");

        assert_eq!(
            turn.export_line(),
            "assistant [2024-05-01T12:00:00+00:00]: hello there"
        );
    }
}
