use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The pipeline variant a user turn runs through. Selected per turn by the
/// front-end; unknown strings fail at the serde boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    Echo,
    Stateless,
    SystemPrompt,
    HistoryAware,
    Rag,
}

#[derive(Debug, Error)]
#[error("unknown chat mode")]
pub struct UnknownMode;

impl ChatMode {
    pub const ALL: [ChatMode; 5] = [
        ChatMode::Echo,
        ChatMode::Stateless,
        ChatMode::SystemPrompt,
        ChatMode::HistoryAware,
        ChatMode::Rag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Echo => "echo",
            ChatMode::Stateless => "stateless",
            ChatMode::SystemPrompt => "system_prompt",
            ChatMode::HistoryAware => "history_aware",
            ChatMode::Rag => "rag",
        }
    }

    /// Display label for the mode picker.
    pub fn label(&self) -> &'static str {
        match self {
            ChatMode::Echo => "Echo",
            ChatMode::Stateless => "Stateless",
            ChatMode::SystemPrompt => "System prompt",
            ChatMode::HistoryAware => "History aware",
            ChatMode::Rag => "RAG",
        }
    }
}

impl std::str::FromStr for ChatMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "echo" => Ok(ChatMode::Echo),
            "stateless" => Ok(ChatMode::Stateless),
            "system_prompt" => Ok(ChatMode::SystemPrompt),
            "history_aware" => Ok(ChatMode::HistoryAware),
            "rag" => Ok(ChatMode::Rag),
            _ => Err(UnknownMode),
        }
    }
}

impl std::fmt::Display for ChatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_match_from_str() {
        for mode in ChatMode::ALL {
            let json = serde_json::to_value(mode).unwrap();
            let name = json.as_str().unwrap();

            assert_eq!(name, mode.as_str());
            assert_eq!(name.parse::<ChatMode>().unwrap(), mode);
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!("turbo".parse::<ChatMode>().is_err());
        assert!(serde_json::from_str::<ChatMode>("\"turbo\"").is_err());
    }
}
