//! Mail transport that records messages in the log instead of sending them.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{MailError, MailTransport, OutgoingMail};

/// Used when no relay is configured; every message "succeeds".
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMailTransport;

#[async_trait]
impl MailTransport for LoggingMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<String, MailError> {
        let message_id = format!("logged-{}", Uuid::new_v4());
        info!(
            to = %mail.to,
            subject = %mail.subject,
            reply_to = mail.reply_to.as_deref(),
            body_len = mail.html.len(),
            message_id = %message_id,
            "mail relay not configured; message logged only"
        );
        Ok(message_id)
    }
}
