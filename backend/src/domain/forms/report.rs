//! Self-contained HTML documents built from read-only renders.

use askama::Template;
use chrono::{DateTime, Utc};

use super::render::RenderedForm;
use crate::domain::Error;

const TIMESTAMP_FORMAT: &str = "%d %b %Y %H:%M UTC";

#[derive(Template)]
#[template(path = "report.html")]
struct ReportPage<'a> {
    form: &'a RenderedForm,
    submitted_on: Option<String>,
    generated_by: &'a str,
}

struct EmailRow<'a> {
    label: &'a str,
    display: &'a str,
}

#[derive(Template)]
#[template(path = "response_email.html")]
struct ResponseEmail<'a> {
    title: &'a str,
    rows: Vec<EmailRow<'a>>,
    submitted_on: String,
    sender: &'a str,
}

fn template_error(err: &askama::Error) -> Error {
    Error::internal(format!("failed to render document: {err}"))
}

/// Render a read-only form as a standalone HTML report.
///
/// The footer names `operator`, the organisation running the platform.
pub fn render_html(
    form: &RenderedForm,
    submitted_on: Option<DateTime<Utc>>,
    operator: &str,
) -> Result<String, Error> {
    ReportPage {
        form,
        submitted_on: submitted_on.map(|at| at.format(TIMESTAMP_FORMAT).to_string()),
        generated_by: operator,
    }
    .render()
    .map_err(|err| template_error(&err))
}

/// Subject line for an emailed response.
pub fn email_subject(title: &str) -> String {
    format!("Report: {title}")
}

/// HTML body for an emailed response: a label to answer table in field order.
pub fn email_body(
    form: &RenderedForm,
    submitted_on: DateTime<Utc>,
    sender: Option<&str>,
) -> Result<String, Error> {
    ResponseEmail {
        title: &form.title,
        rows: form
            .fields
            .iter()
            .map(|field| EmailRow {
                label: &field.label,
                display: &field.display,
            })
            .collect(),
        submitted_on: submitted_on.format(TIMESTAMP_FORMAT).to_string(),
        sender: sender.filter(|name| !name.trim().is_empty()).unwrap_or("System"),
    }
    .render()
    .map_err(|err| template_error(&err))
}
