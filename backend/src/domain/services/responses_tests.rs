//! Tests for the response services.

use std::sync::Arc;

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::forms::AnswerValue;
use crate::domain::ports::{
    MockFormsQuery, MockMailTransport, MockResponseRepository, ResponseRepositoryError,
};
use crate::domain::services::test_helpers::{caller, fixture_clock, fixture_timestamp, form};
use crate::domain::{ClientId, Role, UserId};

type Service = ResponsesService<MockResponseRepository, MockMailTransport>;

fn service(
    responses: MockResponseRepository,
    forms: MockFormsQuery,
    mail: MockMailTransport,
) -> Service {
    ResponsesService::new(
        Arc::new(responses),
        Arc::new(forms),
        Arc::new(mail),
        AccessPolicy::default(),
        fixture_clock(),
    )
}

fn answers(value: serde_json::Value) -> Answers {
    serde_json::from_value(value).expect("valid answers")
}

fn owned_form(created_by: &UserId) -> FormWithOwner {
    FormWithOwner {
        form: form(created_by),
        owner_client: None,
    }
}

fn forms_returning(found: FormWithOwner) -> MockFormsQuery {
    let mut forms = MockFormsQuery::new();
    forms
        .expect_get_form()
        .returning(move |_| Ok(found.clone()));
    forms
}

fn forms_missing() -> MockFormsQuery {
    let mut forms = MockFormsQuery::new();
    forms
        .expect_get_form()
        .returning(|_| Err(Error::not_found("Form not found")));
    forms
}

fn stored(form_id: FormId, submitted_by: &UserId, client_id: Option<ClientId>) -> FormResponse {
    FormResponse {
        id: ResponseId::random(),
        form_id,
        answers: answers(json!({"f1": "Alice", "f2": ["a"], "legacy": "kept"})),
        category: Some("incident".into()),
        submitted_by: Some(submitted_by.clone()),
        client_id,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

fn repository_with(response: FormResponse) -> MockResponseRepository {
    let mut responses = MockResponseRepository::new();
    responses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(response.clone())));
    responses
}

#[tokio::test]
async fn submit_response_normalises_answers_and_stamps_the_submitter() {
    let acme = ClientId::random();
    let submitter = caller("Acme", Role::User, Some(acme));
    let target = owned_form(&submitter.user_id);
    let form_id = target.form.id;
    let mut responses = MockResponseRepository::new();
    responses.expect_save().times(1).return_once(|_| Ok(()));

    let response = service(responses, forms_returning(target), MockMailTransport::new())
        .submit_response(
            &submitter,
            form_id,
            SubmitResponse {
                answers: answers(json!({"f1": "Alice", "f2": "o1"})),
                category: Some("  incident ".into()),
            },
        )
        .await
        .expect("submitted");

    assert_eq!(
        response.answers.get("f2"),
        Some(&AnswerValue::MultiChoice(vec!["a".into()]))
    );
    assert_eq!(response.category.as_deref(), Some("incident"));
    assert_eq!(response.submitted_by.as_ref(), Some(&submitter.user_id));
    assert_eq!(response.client_id, Some(acme));
    assert_eq!(response.created_at, fixture_timestamp());
}

#[tokio::test]
async fn submit_response_rejects_missing_required_answers() {
    let submitter = caller("Acme", Role::User, None);
    let target = owned_form(&submitter.user_id);
    let form_id = target.form.id;
    let mut responses = MockResponseRepository::new();
    responses.expect_save().times(0);

    let error = service(responses, forms_returning(target), MockMailTransport::new())
        .submit_response(&submitter, form_id, SubmitResponse::default())
        .await
        .expect_err("required field missing");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("field details");
    assert_eq!(details["fields"]["f1"], json!("This field is required"));
}

#[tokio::test]
async fn submit_response_to_a_deleted_form_is_not_found() {
    let error = service(MockResponseRepository::new(), forms_missing(), MockMailTransport::new())
        .submit_response(
            &caller("Acme", Role::User, None),
            FormId::random(),
            SubmitResponse::default(),
        )
        .await
        .expect_err("missing form");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_response_keeps_answers_verbatim_when_the_form_is_gone() {
    let submitter = caller("Acme", Role::User, None);
    let existing = stored(FormId::random(), &submitter.user_id, None);
    let id = existing.id;
    let mut responses = repository_with(existing);
    responses.expect_save().times(1).return_once(|_| Ok(()));
    let replacement = answers(json!({"anything": "goes"}));

    let updated = service(responses, forms_missing(), MockMailTransport::new())
        .update_response(&submitter, id, replacement.clone())
        .await
        .expect("updated");

    assert_eq!(updated.answers, replacement);
    assert_eq!(updated.id, id);
}

#[rstest]
#[case(Role::User, false)]
#[case(Role::Admin, true)]
#[tokio::test]
async fn tenant_admins_may_read_colleagues_responses(#[case] role: Role, #[case] allowed: bool) {
    let acme = ClientId::random();
    let author = caller("Acme", Role::User, Some(acme));
    let colleague = caller("Acme", role, Some(acme));
    let existing = stored(FormId::random(), &author.user_id, Some(acme));
    let id = existing.id;

    let result = service(repository_with(existing), forms_missing(), MockMailTransport::new())
        .get_response(&colleague, id)
        .await;

    match result {
        Ok(_) => assert!(allowed),
        Err(error) => {
            assert!(!allowed);
            assert_eq!(error.code(), ErrorCode::Forbidden);
        }
    }
}

#[tokio::test]
async fn get_response_reports_orphaned_keys() {
    let submitter = caller("Acme", Role::User, None);
    let target = owned_form(&submitter.user_id);
    let existing = stored(target.form.id, &submitter.user_id, None);
    let id = existing.id;

    let view = service(repository_with(existing), forms_returning(target), MockMailTransport::new())
        .get_response(&submitter, id)
        .await
        .expect("view");

    assert_eq!(view.orphaned, vec!["legacy".to_owned()]);
    assert!(view.form.is_some());
}

#[tokio::test]
async fn list_responses_resolves_each_form_title_once() {
    let submitter = caller("Acme", Role::User, None);
    let target = owned_form(&submitter.user_id);
    let form_id = target.form.id;
    let first = stored(form_id, &submitter.user_id, None);
    let second = stored(form_id, &submitter.user_id, None);
    let mut responses = MockResponseRepository::new();
    responses
        .expect_list()
        .withf(|filter| filter.category.as_deref() == Some("incident"))
        .return_once(move |_| Ok(vec![first, second]));
    let mut forms = MockFormsQuery::new();
    forms
        .expect_get_form()
        .times(1)
        .return_once(move |_| Ok(target));

    let listed = service(responses, forms, MockMailTransport::new())
        .list_responses(&submitter, Some("incident".into()))
        .await
        .expect("listed");

    assert_eq!(listed.len(), 2);
    assert!(
        listed
            .iter()
            .all(|summary| summary.form_title.as_deref() == Some("Site audit"))
    );
}

#[tokio::test]
async fn list_responses_maps_repository_failures() {
    let mut responses = MockResponseRepository::new();
    responses
        .expect_list()
        .return_once(|_| Err(ResponseRepositoryError::connection("refused")));

    let error = service(responses, MockFormsQuery::new(), MockMailTransport::new())
        .list_responses(&caller("Acme", Role::User, None), None)
        .await
        .expect_err("unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case(None)]
#[case(Some("   ".to_owned()))]
#[tokio::test]
async fn email_without_recipient_fails_fast(#[case] recipient: Option<String>) {
    let mut responses = MockResponseRepository::new();
    responses.expect_find_by_id().times(0);

    let outcome = service(responses, MockFormsQuery::new(), MockMailTransport::new())
        .email_response(&caller("Acme", Role::User, None), ResponseId::random(), recipient)
        .await;

    assert_eq!(outcome, EmailOutcome::failed(EmailFailureKind::MissingRecipient));
}

#[tokio::test]
async fn email_for_a_deleted_form_reports_form_not_found() {
    let submitter = caller("Acme", Role::User, None);
    let existing = stored(FormId::random(), &submitter.user_id, None);
    let id = existing.id;

    let outcome = service(repository_with(existing), forms_missing(), MockMailTransport::new())
        .email_response(&submitter, id, Some("boss@example.com".into()))
        .await;

    assert_eq!(outcome, EmailOutcome::failed(EmailFailureKind::FormNotFound));
    assert_eq!(outcome.message(), "Form definition not found");
}

#[tokio::test]
async fn email_for_an_unknown_response_reports_not_found() {
    let mut responses = MockResponseRepository::new();
    responses.expect_find_by_id().return_once(|_| Ok(None));

    let outcome = service(responses, MockFormsQuery::new(), MockMailTransport::new())
        .email_response(
            &caller("Acme", Role::User, None),
            ResponseId::random(),
            Some("boss@example.com".into()),
        )
        .await;

    assert_eq!(outcome, EmailOutcome::failed(EmailFailureKind::ResponseNotFound));
}

#[tokio::test]
async fn email_sends_a_report_replying_to_the_sender() {
    let submitter = caller("Acme", Role::User, None);
    let target = owned_form(&submitter.user_id);
    let existing = stored(target.form.id, &submitter.user_id, None);
    let id = existing.id;
    let sender = submitter.email.clone();
    let mut mail = MockMailTransport::new();
    mail.expect_send()
        .withf(move |mail| {
            mail.to == "boss@example.com"
                && mail.subject == "Report: Site audit"
                && mail.reply_to.as_deref() == Some(sender.as_str())
                && mail.html.contains("Alice")
        })
        .times(1)
        .return_once(|_| Ok("msg-1".into()));

    let outcome = service(repository_with(existing), forms_returning(target), mail)
        .email_response(&submitter, id, Some(" Boss@Example.com ".into()))
        .await;

    assert_eq!(
        outcome,
        EmailOutcome::Sent {
            message_id: "msg-1".into()
        }
    );
    assert_eq!(outcome.message(), "Email sent successfully");
}

#[tokio::test]
async fn email_rejections_surface_as_upstream_failures() {
    let submitter = caller("Acme", Role::User, None);
    let target = owned_form(&submitter.user_id);
    let existing = stored(target.form.id, &submitter.user_id, None);
    let id = existing.id;
    let mut mail = MockMailTransport::new();
    mail.expect_send()
        .return_once(|_| Err(MailError::rejected("mailbox full")));

    let outcome = service(repository_with(existing), forms_returning(target), mail)
        .email_response(&submitter, id, Some("boss@example.com".into()))
        .await;

    assert_eq!(
        outcome,
        EmailOutcome::failed_with(EmailFailureKind::Upstream, "Failed to send email: mailbox full")
    );
}

#[tokio::test]
async fn email_by_a_stranger_is_forbidden() {
    let author = caller("Acme", Role::User, None);
    let existing = stored(FormId::random(), &author.user_id, None);
    let id = existing.id;
    let mut mail = MockMailTransport::new();
    mail.expect_send().times(0);

    let outcome = service(repository_with(existing), MockFormsQuery::new(), mail)
        .email_response(
            &caller("Globex", Role::User, None),
            id,
            Some("boss@example.com".into()),
        )
        .await;

    assert_eq!(outcome, EmailOutcome::failed(EmailFailureKind::Forbidden));
}

#[tokio::test]
async fn report_renders_read_only_html_with_the_operator_footer() {
    let submitter = caller("Acme", Role::User, None);
    let target = owned_form(&submitter.user_id);
    let existing = stored(target.form.id, &submitter.user_id, None);
    let id = existing.id;

    let html = service(repository_with(existing), forms_returning(target), MockMailTransport::new())
        .response_report(&submitter, id)
        .await
        .expect("report");

    assert!(html.contains("Site audit"));
    assert!(html.contains("Alice"));
    assert!(html.contains("Generated by Safetynett"));
}
