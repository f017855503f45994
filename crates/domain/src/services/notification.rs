//! Notification contract for assignment emails.
//!
//! The assignment engine notifies the giver after an assignment is
//! committed. Delivery is best-effort: a failure is logged and reported
//! to the caller, but never rolls the assignment back. The SMTP
//! implementation lives in the api crate; tests use [`MockNotifier`].

use std::sync::Mutex;

use thiserror::Error;

/// Errors that can occur while dispatching a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Mail transport not configured")]
    NotConfigured,

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// Payload for an assignment notification.
///
/// Carries only what the email template needs; the receiver's email is
/// deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentNotification {
    pub giver_name: String,
    pub giver_email: String,
    pub receiver_name: String,
}

/// Dispatcher for assignment notifications.
#[async_trait::async_trait]
pub trait AssignmentNotifier: Send + Sync {
    async fn notify_assignment(&self, note: &AssignmentNotification) -> Result<(), NotifyError>;
}

/// Mock notifier for tests: records payloads, optionally fails.
#[derive(Debug, Default)]
pub struct MockNotifier {
    simulate_failure: bool,
    sent: Mutex<Vec<AssignmentNotification>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that fails every dispatch.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Payloads dispatched so far.
    pub fn sent(&self) -> Vec<AssignmentNotification> {
        self.sent.lock().expect("mock notifier lock").clone()
    }
}

#[async_trait::async_trait]
impl AssignmentNotifier for MockNotifier {
    async fn notify_assignment(&self, note: &AssignmentNotification) -> Result<(), NotifyError> {
        if self.simulate_failure {
            tracing::warn!(
                giver = %note.giver_email,
                "Mock notifier simulating dispatch failure"
            );
            return Err(NotifyError::SendFailed("simulated failure".to_string()));
        }

        tracing::info!(
            giver = %note.giver_email,
            receiver = %note.receiver_name,
            "Mock: would send assignment notification"
        );
        self.sent
            .lock()
            .expect("mock notifier lock")
            .push(note.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note() -> AssignmentNotification {
        AssignmentNotification {
            giver_name: "Alice".to_string(),
            giver_email: "a@x.com".to_string(),
            receiver_name: "Bob".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_notifier_records_sends() {
        let notifier = MockNotifier::new();
        notifier.notify_assignment(&note()).await.unwrap();

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].receiver_name, "Bob");
    }

    #[tokio::test]
    async fn test_mock_notifier_failure() {
        let notifier = MockNotifier::failing();
        let result = notifier.notify_assignment(&note()).await;
        assert!(matches!(result, Err(NotifyError::SendFailed(_))));
        assert!(notifier.sent().is_empty());
    }
}
