//! Outbound delivery boundary.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::TransportError;

/// Delivers text messages to chats.
///
/// Implemented by the chat platform client; the core only depends on this.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError>;
}

/// A message accepted by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
}

#[derive(Debug, Default)]
struct RecordingState {
    sent: Vec<SentMessage>,
    unreachable: HashSet<i64>,
}

/// In-memory transport for testing.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    state: Arc<RwLock<RecordingState>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every delivery to `chat_id` fail.
    pub fn set_unreachable(&self, chat_id: i64) {
        if let Ok(mut state) = self.state.write() {
            state.unreachable.insert(chat_id);
        }
    }

    /// Messages delivered so far, in delivery order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.state
            .read()
            .map(|state| state.sent.clone())
            .unwrap_or_default()
    }

    /// Messages delivered to one chat.
    pub fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text)
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| TransportError::Rejected(e.to_string()))?;
        if state.unreachable.contains(&chat_id) {
            return Err(TransportError::Unreachable { chat_id });
        }
        state.sent.push(SentMessage {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }
}
