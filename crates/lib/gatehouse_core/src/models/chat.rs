//! Chat transcript models.

use serde::{Deserialize, Serialize};

/// Who wrote a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSender {
    User,
    Bot,
}

/// One line of the local chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: ChatSender,
    pub text: String,
}

/// Role of a turn in the history sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatTurnRole {
    User,
    Model,
}

/// A turn of conversation history as the chat endpoint expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatTurnRole,
    pub text: String,
}

impl From<&ChatMessage> for ChatTurn {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: match msg.sender {
                ChatSender::User => ChatTurnRole::User,
                ChatSender::Bot => ChatTurnRole::Model,
            },
            text: msg.text.clone(),
        }
    }
}
