use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::SmtpConfig;
use crate::error::SendError;
use crate::message::compose;
use crate::transport::SmtpTransport;

/// The email-sending capability consumed by the command handler.
///
/// Implementations are expected to be stateless across calls so independent
/// sends can run concurrently; [`SmtpSender`] is the production
/// implementation, tests substitute a recording mock.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Compose and deliver one email.
    async fn send(
        &self,
        from: &str,
        to: &[String],
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> Result<(), SendError>;
}

/// Sends email by composing a raw message and submitting it to the relay
/// fixed at construction time.
#[derive(Debug, Clone)]
pub struct SmtpSender {
    transport: SmtpTransport,
}

impl SmtpSender {
    /// Create a sender submitting to the relay in `config`.
    pub fn new(config: SmtpConfig) -> Self {
        Self {
            transport: SmtpTransport::new(config),
        }
    }
}

#[async_trait]
impl EmailSender for SmtpSender {
    async fn send(
        &self,
        from: &str,
        to: &[String],
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> Result<(), SendError> {
        // A transaction with zero recipients would dial the relay only to do
        // nothing useful; reject it before opening a connection.
        if to.is_empty() {
            return Err(SendError::NoRecipients);
        }

        let message = compose(from, to, subject, body, is_html);
        debug!(
            %from,
            recipients = to.len(),
            %subject,
            bytes = message.as_bytes().len(),
            "delivering composed message"
        );
        self.transport.deliver(from, to, &message).await?;
        info!(%from, recipients = to.len(), "message accepted by relay");
        Ok(())
    }
}
