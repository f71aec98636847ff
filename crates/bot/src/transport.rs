//! Delivery of notifications to the log.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dispatch::{Transport, TransportError};

/// Writes every delivery to the log instead of a chat.
///
/// Stands in for the chat platform client; a real client implements the
/// same [`Transport`] trait.
#[derive(Debug, Default)]
pub struct LogTransport {
    delivered: AtomicUsize,
}

impl LogTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far.
    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Transport for LogTransport {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        tracing::info!(chat_id, %text, "message delivered");
        self.delivered.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_deliveries() {
        let transport = LogTransport::new();
        transport.send_text(1, "hello").await.unwrap();
        transport.send_text(-100, "group").await.unwrap();
        assert_eq!(transport.delivered(), 2);
    }
}
