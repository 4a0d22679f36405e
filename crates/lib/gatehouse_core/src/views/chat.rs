//! Resident chat with the backend's assistant.

use std::sync::Arc;

use tracing::warn;

use crate::api::Backend;
use crate::models::{ChatMessage, ChatSender, ChatTurn};

/// Opening line of every transcript.
pub const GREETING: &str = "Hello! How can I help you manage visitors today? (e.g., \"approve Ramesh\", \"list my visitors\")";

/// Reply shown when the assistant cannot be reached.
pub const FALLBACK_REPLY: &str = "Sorry, an error occurred with the AI model.";

/// Number of most recent turns sent as context.
pub const HISTORY_LIMIT: usize = 5;

/// Local transcript plus the bounded history sent with each message.
pub struct ChatSession {
    backend: Arc<dyn Backend>,
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            messages: vec![ChatMessage {
                id: 1,
                sender: ChatSender::Bot,
                text: GREETING.to_string(),
            }],
            next_id: 2,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, sender: ChatSender, text: String) -> &ChatMessage {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage { id, sender, text });
        &self.messages[self.messages.len() - 1]
    }

    /// The last [`HISTORY_LIMIT`] turns, oldest first.
    pub fn history(&self) -> Vec<ChatTurn> {
        let start = self.messages.len().saturating_sub(HISTORY_LIMIT);
        self.messages[start..].iter().map(ChatTurn::from).collect()
    }

    /// Send a message and append the reply.
    ///
    /// Blank input is ignored and returns `None`. Backend failures become the
    /// fallback reply rather than an error.
    pub async fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.push(ChatSender::User, text.to_string());
        let history = self.history();

        let reply = match self.backend.chat(&history).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("chat request failed: {e}");
                FALLBACK_REPLY.to_string()
            }
        };
        Some(self.push(ChatSender::Bot, reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeBackend;
    use crate::models::ChatTurnRole;

    fn session(reply: Option<&str>) -> (ChatSession, Arc<FakeBackend>) {
        let backend = Arc::new(FakeBackend::default());
        *backend.chat_reply.lock().unwrap() = reply.map(str::to_string);
        (ChatSession::new(backend.clone()), backend)
    }

    #[test]
    fn starts_with_greeting() {
        let (chat, _) = session(None);
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].sender, ChatSender::Bot);
        assert_eq!(chat.messages()[0].text, GREETING);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let (mut chat, backend) = session(Some("hi"));
        assert!(chat.send("   ").await.is_none());
        assert_eq!(chat.messages().len(), 1);
        assert!(backend.chat_histories.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn reply_is_appended() {
        let (mut chat, backend) = session(Some("Approved Ramesh."));
        let reply = chat.send("  approve Ramesh ").await.expect("reply");
        assert_eq!(reply.text, "Approved Ramesh.");
        assert_eq!(chat.messages().len(), 3);
        assert_eq!(chat.messages()[1].text, "approve Ramesh");

        let sent = backend.chat_histories.lock().unwrap()[0].clone();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].role, ChatTurnRole::Model);
        assert_eq!(sent[1].role, ChatTurnRole::User);
    }

    #[tokio::test]
    async fn failure_uses_fallback_reply() {
        let (mut chat, _) = session(None);
        let reply = chat.send("hello").await.expect("reply");
        assert_eq!(reply.text, FALLBACK_REPLY);
        assert_eq!(reply.sender, ChatSender::Bot);
    }

    #[tokio::test]
    async fn history_is_bounded_to_last_five() {
        let (mut chat, backend) = session(Some("ok"));
        for i in 0..4 {
            chat.send(&format!("msg {i}")).await;
        }
        let sent = backend.chat_histories.lock().unwrap().last().cloned().unwrap();
        assert_eq!(sent.len(), HISTORY_LIMIT);
        assert_eq!(sent.last().unwrap().text, "msg 3");
        assert_eq!(sent[0].text, "msg 1");

        let ids: Vec<u64> = chat.messages().iter().map(|m| m.id).collect();
        let mut sorted = ids.clone();
        sorted.dedup();
        assert_eq!(ids.len(), sorted.len());
    }
}
