//! Response services: submission, replacement, listing, reports and email.
//!
//! Answers are normalised against the current form definition on every
//! write. Keys that no longer match a field are kept and reported as
//! orphaned so legacy answers remain visible after a form is edited.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use super::map_response_repository_error;
use crate::domain::accounts::validate_email;
use crate::domain::forms::{
    Answers, EmailFailureKind, EmailOutcome, FormId, FormResponse, FormWithOwner, RenderMode,
    ResponseId, ResponseSummary, ResponseView, email_body, email_subject, normalize, render,
    render_html, validate,
};
use crate::domain::ports::{
    FormsQuery, MailError, MailTransport, OutgoingMail, ResponseFilter, ResponseRepository,
    ResponsesCommand, ResponsesQuery, SubmitResponse,
};
use crate::domain::{AccessPolicy, Caller, Error, ErrorCode};

const RESPONSE_NOT_FOUND: &str = "Response not found";
const RESPONSE_FORBIDDEN: &str = "You do not have access to this response";

/// Response service implementing the response command and query ports.
#[derive(Clone)]
pub struct ResponsesService<R, M: ?Sized> {
    responses: Arc<R>,
    forms: Arc<dyn FormsQuery>,
    mail: Arc<M>,
    policy: AccessPolicy,
    clock: Arc<dyn Clock>,
}

impl<R, M: ?Sized> ResponsesService<R, M> {
    /// Create a response service.
    pub fn new(
        responses: Arc<R>,
        forms: Arc<dyn FormsQuery>,
        mail: Arc<M>,
        policy: AccessPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            responses,
            forms,
            mail,
            policy,
            clock,
        }
    }
}

fn clean_category(category: Option<String>) -> Option<String> {
    category
        .map(|raw| raw.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl<R, M> ResponsesService<R, M>
where
    R: ResponseRepository,
    M: MailTransport + ?Sized,
{
    /// Current definition of `id`, or `None` once the form is deleted.
    async fn current_form(&self, id: FormId) -> Result<Option<FormWithOwner>, Error> {
        match self.forms.get_form(id).await {
            Ok(form) => Ok(Some(form)),
            Err(error) if error.code() == ErrorCode::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn find(&self, id: ResponseId) -> Result<Option<FormResponse>, Error> {
        self.responses
            .find_by_id(&id)
            .await
            .map_err(map_response_repository_error)
    }

    fn may_access(&self, caller: &Caller, response: &FormResponse) -> bool {
        self.policy
            .can_access_response(caller, response.submitted_by.as_ref(), response.client_id)
    }

    async fn accessible(&self, caller: &Caller, id: ResponseId) -> Result<FormResponse, Error> {
        let response = self
            .find(id)
            .await?
            .ok_or_else(|| Error::not_found(RESPONSE_NOT_FOUND))?;
        if !self.may_access(caller, &response) {
            return Err(Error::forbidden(RESPONSE_FORBIDDEN));
        }
        Ok(response)
    }

    fn normalized_for(form: Option<&FormWithOwner>, answers: Answers) -> Result<Answers, Error> {
        let Some(form) = form else {
            return Ok(answers);
        };
        let fields = form.form.definition.fields();
        let normalized = normalize(fields, answers);
        if !normalized.orphaned.is_empty() {
            debug!(orphaned = ?normalized.orphaned, "answers without a matching field kept");
        }
        validate(fields, &normalized.answers)?;
        Ok(normalized.answers)
    }

    async fn compose_email(
        &self,
        caller: &Caller,
        id: ResponseId,
        recipient: Option<String>,
    ) -> Result<OutgoingMail, EmailOutcome> {
        let recipient = recipient
            .map(|raw| raw.trim().to_owned())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| EmailOutcome::failed(EmailFailureKind::MissingRecipient))?;
        let to = validate_email(&recipient).map_err(|_| {
            EmailOutcome::failed_with(
                EmailFailureKind::MissingRecipient,
                "A valid recipient email is required",
            )
        })?;
        let response = self
            .find(id)
            .await
            .map_err(|_| EmailOutcome::failed(EmailFailureKind::Unavailable))?
            .ok_or_else(|| EmailOutcome::failed(EmailFailureKind::ResponseNotFound))?;
        if !self.may_access(caller, &response) {
            return Err(EmailOutcome::failed(EmailFailureKind::Forbidden));
        }
        let form = self
            .current_form(response.form_id)
            .await
            .map_err(|_| EmailOutcome::failed(EmailFailureKind::Unavailable))?
            .ok_or_else(|| EmailOutcome::failed(EmailFailureKind::FormNotFound))?;
        let rendered = render(
            &form.form.definition,
            form.owner_client.as_ref(),
            &response.answers,
            RenderMode::ReadOnly,
        );
        let html = email_body(&rendered, response.created_at, Some(&caller.email))
            .map_err(|error| EmailOutcome::failed_with(EmailFailureKind::Upstream, error.message()))?;
        Ok(OutgoingMail {
            to,
            subject: email_subject(&rendered.title),
            html,
            reply_to: Some(caller.email.clone()),
        })
    }
}

#[async_trait]
impl<R, M> ResponsesCommand for ResponsesService<R, M>
where
    R: ResponseRepository,
    M: MailTransport + ?Sized,
{
    async fn submit_response(
        &self,
        caller: &Caller,
        form_id: FormId,
        submission: SubmitResponse,
    ) -> Result<FormResponse, Error> {
        let form = self.forms.get_form(form_id).await?;
        let answers = Self::normalized_for(Some(&form), submission.answers)?;
        let now = self.clock.utc();
        let response = FormResponse {
            id: ResponseId::random(),
            form_id,
            answers,
            category: clean_category(submission.category),
            submitted_by: Some(caller.user_id.clone()),
            client_id: caller.client_id,
            created_at: now,
            updated_at: now,
        };
        self.responses
            .save(&response)
            .await
            .map_err(map_response_repository_error)?;
        info!(response_id = %response.id, form_id = %form_id, "response submitted");
        Ok(response)
    }

    async fn update_response(
        &self,
        caller: &Caller,
        id: ResponseId,
        answers: Answers,
    ) -> Result<FormResponse, Error> {
        let existing = self.accessible(caller, id).await?;
        let form = self.current_form(existing.form_id).await?;
        let answers = Self::normalized_for(form.as_ref(), answers)?;
        let response = FormResponse {
            answers,
            updated_at: self.clock.utc(),
            ..existing
        };
        self.responses
            .save(&response)
            .await
            .map_err(map_response_repository_error)?;
        info!(response_id = %id, "response replaced");
        Ok(response)
    }

    async fn delete_response(&self, caller: &Caller, id: ResponseId) -> Result<(), Error> {
        self.accessible(caller, id).await?;
        let removed = self
            .responses
            .delete(&id)
            .await
            .map_err(map_response_repository_error)?;
        if !removed {
            return Err(Error::not_found(RESPONSE_NOT_FOUND));
        }
        info!(response_id = %id, "response deleted");
        Ok(())
    }

    async fn email_response(
        &self,
        caller: &Caller,
        id: ResponseId,
        recipient: Option<String>,
    ) -> EmailOutcome {
        let mail = match self.compose_email(caller, id, recipient).await {
            Ok(mail) => mail,
            Err(outcome) => {
                info!(response_id = %id, reason = outcome.message(), "response email not sent");
                return outcome;
            }
        };
        match self.mail.send(&mail).await {
            Ok(message_id) => {
                info!(response_id = %id, %message_id, "response emailed");
                EmailOutcome::Sent { message_id }
            }
            Err(MailError::Rejected { message }) => {
                warn!(response_id = %id, %message, "mail relay rejected response email");
                EmailOutcome::failed_with(
                    EmailFailureKind::Upstream,
                    format!("Failed to send email: {message}"),
                )
            }
            Err(error @ MailError::Unavailable { .. }) => {
                warn!(response_id = %id, %error, "mail relay unavailable");
                EmailOutcome::failed(EmailFailureKind::Unavailable)
            }
        }
    }
}

#[async_trait]
impl<R, M> ResponsesQuery for ResponsesService<R, M>
where
    R: ResponseRepository,
    M: MailTransport + ?Sized,
{
    async fn list_responses(
        &self,
        caller: &Caller,
        category: Option<String>,
    ) -> Result<Vec<ResponseSummary>, Error> {
        let filter = ResponseFilter {
            submitted_by: caller.user_id.clone(),
            category: clean_category(category),
        };
        let mut responses = self
            .responses
            .list(&filter)
            .await
            .map_err(map_response_repository_error)?;
        responses.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut titles: HashMap<FormId, Option<String>> = HashMap::new();
        let mut summaries = Vec::with_capacity(responses.len());
        for response in responses {
            let form_title = match titles.get(&response.form_id) {
                Some(title) => title.clone(),
                None => {
                    let title = self
                        .current_form(response.form_id)
                        .await?
                        .map(|form| form.form.definition.title().to_owned());
                    titles.insert(response.form_id, title.clone());
                    title
                }
            };
            summaries.push(ResponseSummary {
                response,
                form_title,
            });
        }
        Ok(summaries)
    }

    async fn get_response(&self, caller: &Caller, id: ResponseId) -> Result<ResponseView, Error> {
        let response = self.accessible(caller, id).await?;
        let form = self.current_form(response.form_id).await?;
        let orphaned = response
            .answers
            .iter()
            .map(|(key, _)| key)
            .filter(|key| {
                form.as_ref()
                    .is_none_or(|form| form.form.field(key).is_none())
            })
            .cloned()
            .collect();
        Ok(ResponseView {
            response,
            form,
            orphaned,
        })
    }

    async fn response_report(&self, caller: &Caller, id: ResponseId) -> Result<String, Error> {
        let response = self.accessible(caller, id).await?;
        let form = self
            .current_form(response.form_id)
            .await?
            .ok_or_else(|| Error::not_found("Form definition not found"))?;
        let rendered = render(
            &form.form.definition,
            form.owner_client.as_ref(),
            &response.answers,
            RenderMode::ReadOnly,
        );
        render_html(&rendered, Some(response.created_at), self.policy.operator_org())
    }
}

#[cfg(test)]
#[path = "responses_tests.rs"]
mod tests;
