use std::sync::Mutex;

use async_trait::async_trait;

use super::transport::MailTransport;
use super::types::{OutgoingMail, TransportError, TransportReceipt};

/// A transport that records messages instead of delivering them.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub sent: Mutex<Vec<OutgoingMail>>,
    pub fail_send: bool,
}

impl MockTransport {
    /// A transport whose every send fails
    pub fn failing() -> Self {
        Self {
            fail_send: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or_default()
    }
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<TransportReceipt, TransportError> {
        if self.fail_send {
            return Err(TransportError::Smtp("mock failure".into()));
        }

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(mail.clone());
        }

        Ok(TransportReceipt {
            code: "250".to_string(),
            message: vec!["OK: queued".to_string()],
        })
    }
}
