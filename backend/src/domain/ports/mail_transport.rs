//! Port for outbound email delivery.

use async_trait::async_trait;
use serde::Serialize;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail transports.
    pub enum MailError {
        /// The relay refused the message.
        Rejected { message: String } => "mail relay rejected the message: {message}",
        /// The relay could not be reached.
        Unavailable { message: String } => "mail relay unavailable: {message}",
    }
}

/// One message handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Reply-to address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Port for sending email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send `mail`, returning the transport's message id.
    async fn send(&self, mail: &OutgoingMail) -> Result<String, MailError>;
}
