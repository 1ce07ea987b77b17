//! Response endpoint coverage, including the orphaned-form paths.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::EmailResult;
use crate::domain::forms::{EmailFailureKind, EmailOutcome};
use crate::domain::ports::MockResponsesCommand;
use crate::inbound::http::test_utils::{TestHarness, sign_up, test_app};

async fn post_json<S, B>(app: &S, uri: &str, cookie: &Cookie<'static>, body: Value) -> (StatusCode, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri(uri)
            .cookie(cookie.clone())
            .set_json(body)
            .to_request(),
    )
    .await;
    let status = response.status();
    (status, actix_test::read_body_json(response).await)
}

async fn get_json<S, B>(app: &S, uri: &str, cookie: &Cookie<'static>) -> (StatusCode, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::get()
            .uri(uri)
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let status = response.status();
    (status, actix_test::read_body_json(response).await)
}

fn audit_form() -> Value {
    json!({
        "title": "Site audit",
        "fields": [
            {"id": "f1", "type": "text", "label": "Name", "required": true},
            {"id": "f2", "type": "checkbox", "label": "Hazards", "options": [
                {"id": "o1", "label": "Slip", "value": "a"},
                {"id": "o2", "label": "Trip", "value": "b"}
            ]}
        ]
    })
}

#[actix_web::test]
async fn submitted_responses_are_listed_with_their_form_title() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;
    let (_, ada) = sign_up(&app, "ada", "Acme").await;
    let (_, form) = post_json(&app, "/api/v1/forms", &ada, audit_form()).await;
    let form_id = form["id"].as_str().expect("form id");

    let (status, response) = post_json(
        &app,
        &format!("/api/v1/forms/{form_id}/responses"),
        &ada,
        json!({"answers": {"f1": "Alice", "f2": ["b"]}, "category": "audit"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["answers"], json!({"f1": "Alice", "f2": ["b"]}));

    let (_, listed) = get_json(&app, "/api/v1/forms/responses", &ada).await;
    let listed = listed.as_array().expect("response array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["formTitle"], "Site audit");
    assert_eq!(listed[0]["answers"]["f1"], "Alice");

    let (_, filtered) = get_json(&app, "/api/v1/forms/responses?category=incident", &ada).await;
    assert_eq!(filtered.as_array().map(Vec::len), Some(0));
}

#[rstest]
#[case(json!({"answers": {"f2": ["a"]}}))]
#[case(json!({"answers": {"f1": "Alice", "f2": ["zzz"]}}))]
#[actix_web::test]
async fn invalid_answers_are_rejected(#[case] body: Value) {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;
    let (_, ada) = sign_up(&app, "ada", "Acme").await;
    let (_, form) = post_json(&app, "/api/v1/forms", &ada, audit_form()).await;
    let form_id = form["id"].as_str().expect("form id");

    let (status, payload) =
        post_json(&app, &format!("/api/v1/forms/{form_id}/responses"), &ada, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["code"], "invalid_request");
}

#[actix_web::test]
async fn updates_replace_answers_in_full() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;
    let (_, ada) = sign_up(&app, "ada", "Acme").await;
    let (_, form) = post_json(&app, "/api/v1/forms", &ada, audit_form()).await;
    let form_id = form["id"].as_str().expect("form id");
    let (_, submitted) = post_json(
        &app,
        &format!("/api/v1/forms/{form_id}/responses"),
        &ada,
        json!({"answers": {"f1": "Alice", "f2": ["a", "b"]}}),
    )
    .await;
    let id = submitted["id"].as_str().expect("response id");

    let replaced: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/forms/responses/{id}"))
            .cookie(ada.clone())
            .set_json(json!({"answers": {"f1": "Bob"}}))
            .to_request(),
    )
    .await;
    assert_eq!(replaced["answers"], json!({"f1": "Bob"}));

    let (_, view) = get_json(&app, &format!("/api/v1/forms/responses/{id}"), &ada).await;
    assert_eq!(view["response"]["answers"], json!({"f1": "Bob"}));
}

#[actix_web::test]
async fn deleting_the_form_orphans_its_responses() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;
    let (_, ada) = sign_up(&app, "ada", "Acme").await;
    let (_, form) = post_json(&app, "/api/v1/forms", &ada, audit_form()).await;
    let form_id = form["id"].as_str().expect("form id");
    let (_, submitted) = post_json(
        &app,
        &format!("/api/v1/forms/{form_id}/responses"),
        &ada,
        json!({"answers": {"f1": "Alice"}}),
    )
    .await;
    let id = submitted["id"].as_str().expect("response id");

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/forms/{form_id}"))
            .cookie(ada.clone())
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let (status, view) = get_json(&app, &format!("/api/v1/forms/responses/{id}"), &ada).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["response"]["answers"]["f1"], "Alice");
    assert!(view["form"].is_null());

    let (_, listed) = get_json(&app, "/api/v1/forms/responses", &ada).await;
    assert!(listed[0]["formTitle"].is_null());

    let (status, outcome) = post_json(
        &app,
        &format!("/api/v1/forms/responses/{id}/email"),
        &ada,
        json!({"recipient": "safety@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        outcome,
        json!({"success": false, "message": "Form definition not found"})
    );
}

#[actix_web::test]
async fn responses_can_be_emailed_and_reported() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;
    let (_, ada) = sign_up(&app, "ada", "Acme").await;
    let (_, form) = post_json(&app, "/api/v1/forms", &ada, audit_form()).await;
    let form_id = form["id"].as_str().expect("form id");
    let (_, submitted) = post_json(
        &app,
        &format!("/api/v1/forms/{form_id}/responses"),
        &ada,
        json!({"answers": {"f1": "Alice"}}),
    )
    .await;
    let id = submitted["id"].as_str().expect("response id");

    let (status, outcome) = post_json(
        &app,
        &format!("/api/v1/forms/responses/{id}/email"),
        &ada,
        json!({"to": "safety@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["success"], true);
    assert!(
        outcome["messageId"]
            .as_str()
            .is_some_and(|id| id.starts_with("logged-"))
    );

    let (status, missing) = post_json(
        &app,
        &format!("/api/v1/forms/responses/{id}/email"),
        &ada,
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(missing["message"], "Recipient email is required");

    let report = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/forms/responses/{id}/report"))
            .cookie(ada)
            .to_request(),
    )
    .await;
    assert_eq!(report.status(), StatusCode::OK);
    let content_type = report
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("text/html"));
    let body = actix_test::read_body(report).await;
    let html = String::from_utf8(body.to_vec()).expect("utf-8 report");
    assert!(html.contains("Alice"));
    assert!(html.contains("Generated by Safetynett"));
}

#[actix_web::test]
async fn other_tenants_cannot_open_a_response() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;
    let (_, ada) = sign_up(&app, "ada", "Acme").await;
    let (_, cyd) = sign_up(&app, "cyd", "Globex").await;
    let (_, form) = post_json(&app, "/api/v1/forms", &ada, audit_form()).await;
    let form_id = form["id"].as_str().expect("form id");
    let (_, submitted) = post_json(
        &app,
        &format!("/api/v1/forms/{form_id}/responses"),
        &ada,
        json!({"answers": {"f1": "Alice"}}),
    )
    .await;
    let id = submitted["id"].as_str().expect("response id");

    let (status, _) = get_json(&app, &format!("/api/v1/forms/responses/{id}"), &cyd).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, outcome) = post_json(
        &app,
        &format!("/api/v1/forms/responses/{id}/email"),
        &cyd,
        json!({"recipient": "leak@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(outcome["success"], false);
}

#[rstest]
#[case(EmailFailureKind::MissingRecipient, StatusCode::BAD_REQUEST)]
#[case(EmailFailureKind::ResponseNotFound, StatusCode::NOT_FOUND)]
#[case(EmailFailureKind::FormNotFound, StatusCode::NOT_FOUND)]
#[case(EmailFailureKind::Forbidden, StatusCode::FORBIDDEN)]
#[case(EmailFailureKind::Upstream, StatusCode::BAD_GATEWAY)]
#[case(EmailFailureKind::Unavailable, StatusCode::SERVICE_UNAVAILABLE)]
#[actix_web::test]
async fn email_failures_map_to_statuses(#[case] kind: EmailFailureKind, #[case] expected: StatusCode) {
    let harness = TestHarness::new();
    let mut state = harness.state.clone();
    let mut command = MockResponsesCommand::new();
    command
        .expect_email_response()
        .times(1)
        .returning(move |_, _, _| EmailOutcome::failed(kind));
    state.responses_command = Arc::new(command);
    let app = actix_test::init_service(test_app(state)).await;
    let (_, ada) = sign_up(&app, "ada", "Acme").await;

    let (status, body) = post_json(
        &app,
        "/api/v1/forms/responses/3fa85f64-5717-4562-b3fc-2c963f66afa6/email",
        &ada,
        json!({"recipient": "safety@example.com"}),
    )
    .await;
    assert_eq!(status, expected);
    let result: EmailResult = serde_json::from_value(body).expect("email result");
    assert!(!result.success);
    assert_eq!(result.message, EmailOutcome::failed(kind).message());
    assert_eq!(result.message_id, None);
}
