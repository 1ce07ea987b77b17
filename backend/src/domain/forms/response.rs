//! Form responses and the email outcome contract.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::answer::Answers;
use super::form::{FormId, FormWithOwner};
use crate::domain::accounts::{ClientId, UserId};

/// Stable response identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct ResponseId(Uuid);

impl ResponseId {
    /// Fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One submission against a form.
///
/// The form is referenced, not copied: labels are resolved from the current
/// definition when the response is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    /// Identifier.
    pub id: ResponseId,
    /// Form answered.
    pub form_id: FormId,
    /// Answers keyed by field id.
    #[schema(value_type = Object)]
    pub answers: Answers,
    /// Report category set from the page context.
    pub category: Option<String>,
    /// Submitting user; absent for legacy submissions.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub submitted_by: Option<UserId>,
    /// Submitter's organisation at submission time.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub client_id: Option<ClientId>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Last replacement time.
    pub updated_at: DateTime<Utc>,
}

/// List entry: a response with its form title resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    /// The response.
    #[serde(flatten)]
    pub response: FormResponse,
    /// Title of the form; `None` once the form is deleted.
    pub form_title: Option<String>,
}

/// A response opened for viewing or editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseView {
    /// The response; answers are always returned.
    pub response: FormResponse,
    /// Current form definition, absent when the form was deleted.
    pub form: Option<FormWithOwner>,
    /// Answer keys that match no current field.
    pub orphaned: Vec<String>,
}

/// Why an email could not be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmailFailureKind {
    /// No recipient was given.
    MissingRecipient,
    /// The response does not exist.
    ResponseNotFound,
    /// The response's form was deleted.
    FormNotFound,
    /// The caller may not access the response.
    Forbidden,
    /// The mail transport rejected the message.
    Upstream,
    /// A store or the transport could not be reached.
    Unavailable,
}

/// Structured result of emailing a response; never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmailOutcome {
    /// The transport accepted the message.
    Sent {
        /// Transport message id.
        #[serde(rename = "messageId")]
        message_id: String,
    },
    /// Nothing was sent.
    Failed {
        /// Failure category.
        kind: EmailFailureKind,
        /// User-facing message.
        message: String,
    },
}

impl EmailOutcome {
    /// Failure with the standard message for `kind`.
    pub fn failed(kind: EmailFailureKind) -> Self {
        let message = match kind {
            EmailFailureKind::MissingRecipient => "Recipient email is required",
            EmailFailureKind::ResponseNotFound => "Response not found",
            EmailFailureKind::FormNotFound => "Form definition not found",
            EmailFailureKind::Forbidden => "You do not have access to this response",
            EmailFailureKind::Upstream => "Failed to send email",
            EmailFailureKind::Unavailable => "Email service is temporarily unavailable",
        };
        Self::Failed {
            kind,
            message: message.to_owned(),
        }
    }

    /// Failure with a custom message.
    pub fn failed_with(kind: EmailFailureKind, message: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            message: message.into(),
        }
    }

    /// Whether the message was sent.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    /// User-facing message.
    pub fn message(&self) -> &str {
        match self {
            Self::Sent { .. } => "Email sent successfully",
            Self::Failed { message, .. } => message,
        }
    }
}
