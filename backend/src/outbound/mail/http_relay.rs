//! Reqwest-backed mail relay adapter.
//!
//! The relay accepts one JSON message per POST and answers with the id it
//! assigned. Status codes are mapped onto [`MailError`] so the response
//! service can tell refusals from outages.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{MailError, MailTransport, OutgoingMail};
use crate::domain::{TRACE_ID_HEADER, TraceId};

const DEFAULT_FROM: &str = "no-reply@safetynett.local";
const DEFAULT_USER_AGENT: &str = "safety-backend-mailer/0.1";

/// Sender identity stamped on every relayed message.
pub struct MailRelayIdentity {
    /// `From` address.
    pub from: String,
    /// HTTP user-agent sent to the relay.
    pub user_agent: String,
}

impl Default for MailRelayIdentity {
    fn default() -> Self {
        Self {
            from: DEFAULT_FROM.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// Mail transport that POSTs JSON messages to one relay endpoint.
pub struct HttpMailRelay {
    client: Client,
    endpoint: Url,
    from: String,
    user_agent: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayRequest<'a> {
    from: &'a str,
    #[serde(flatten)]
    mail: &'a OutgoingMail,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayReply {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpMailRelay {
    /// Build a relay client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        timeout: Duration,
        identity: MailRelayIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            from: identity.from,
            user_agent: identity.user_agent,
        })
    }
}

impl HttpMailRelay {
    fn request(&self, mail: &OutgoingMail) -> RequestBuilder {
        let builder = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .json(&RelayRequest {
                from: &self.from,
                mail,
            });
        match TraceId::current() {
            Some(trace_id) => builder.header(TRACE_ID_HEADER, trace_id.to_string()),
            None => builder,
        }
    }
}

#[async_trait]
impl MailTransport for HttpMailRelay {
    async fn send(&self, mail: &OutgoingMail) -> Result<String, MailError> {
        let response = self
            .request(mail)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_reply(body.as_ref())
    }
}

fn parse_reply(body: &[u8]) -> Result<String, MailError> {
    let reply: RelayReply = serde_json::from_slice(body)
        .map_err(|err| MailError::rejected(format!("invalid relay reply: {err}")))?;
    if reply.success == Some(false) {
        return Err(MailError::rejected(
            reply.error.unwrap_or_else(|| "relay reported failure".to_owned()),
        ));
    }
    reply
        .message_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| MailError::rejected("relay reply carried no message id"))
}

fn map_transport_error(error: reqwest::Error) -> MailError {
    MailError::unavailable(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MailError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };
    if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
        MailError::rejected(message)
    } else {
        MailError::unavailable(message)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
