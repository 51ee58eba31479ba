//! Outbound notification seam
//!
//! Email delivery itself belongs to an external collaborator; agents only
//! depend on this trait. `LogNotifier` is the default when no delivery
//! backend is wired in; `MemoryNotifier` records deliveries for tests.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// A channel that can deliver a notification to a person
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()>;
}

/// Notifier that records deliveries in the log only
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        info!(
            "notification to {}: {} ({} chars)",
            recipient,
            subject,
            body.chars().count()
        );
        Ok(())
    }
}

/// In-memory notifier that keeps every delivery for later inspection
#[derive(Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<SentNotification>>,
}

/// One recorded delivery
#[derive(Debug, Clone)]
pub struct SentNotification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().expect("notifier lock poisoned").clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        self.sent
            .lock()
            .expect("notifier lock poisoned")
            .push(SentNotification {
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        let notifier = LogNotifier;
        assert!(
            notifier
                .send("curator@museum.example.com", "test", "body")
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_memory_notifier_records() {
        let notifier = MemoryNotifier::new();
        notifier.send("a@b.c", "subject", "body").await.unwrap();
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "a@b.c");
        assert_eq!(sent[0].subject, "subject");
    }
}
