//! Answer values keyed by field identifier.
//!
//! On the wire an answer is a string or an array of strings. The variant of
//! [`AnswerValue`] is fixed by [`normalize`] from the field's declared type at
//! read time, never trusted from the stored shape.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use utoipa::ToSchema;

use super::field::{Field, FieldType};
use crate::domain::Error;

/// One stored answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireAnswer", into = "WireAnswer")]
pub enum AnswerValue {
    /// Free text and formatted date or time strings.
    Text(String),
    /// A single option value.
    Choice(String),
    /// A set of option values.
    MultiChoice(Vec<String>),
    /// Public path of an uploaded file.
    FileRef(String),
}

/// Untagged wire form of an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum WireAnswer {
    /// Single string.
    One(String),
    /// Array of strings.
    Many(Vec<String>),
}

impl From<WireAnswer> for AnswerValue {
    fn from(wire: WireAnswer) -> Self {
        match wire {
            WireAnswer::One(text) => Self::Text(text),
            WireAnswer::Many(items) => Self::MultiChoice(items),
        }
    }
}

impl From<AnswerValue> for WireAnswer {
    fn from(value: AnswerValue) -> Self {
        match value {
            AnswerValue::Text(text) | AnswerValue::Choice(text) | AnswerValue::FileRef(text) => {
                Self::One(text)
            }
            AnswerValue::MultiChoice(items) => Self::Many(items),
        }
    }
}

impl AnswerValue {
    /// Empty strings and empty sets count as missing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) | Self::Choice(text) | Self::FileRef(text) => text.trim().is_empty(),
            Self::MultiChoice(items) => items.iter().all(|item| item.trim().is_empty()),
        }
    }

    /// Every string carried by the answer.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Self::Text(text) | Self::Choice(text) | Self::FileRef(text) => vec![text.as_str()],
            Self::MultiChoice(items) => items.iter().map(String::as_str).collect(),
        }
    }

    fn first(self) -> String {
        match self {
            Self::Text(text) | Self::Choice(text) | Self::FileRef(text) => text,
            Self::MultiChoice(items) => items.into_iter().next().unwrap_or_default(),
        }
    }

    fn into_tokens(self) -> Vec<String> {
        match self {
            Self::Text(text) | Self::Choice(text) | Self::FileRef(text) => {
                if text.is_empty() {
                    Vec::new()
                } else {
                    vec![text]
                }
            }
            Self::MultiChoice(items) => items,
        }
    }
}

/// Ordered map from field id to answer.
///
/// Keys are kept as plain strings so answers for deleted fields survive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, AnswerValue>);

impl Answers {
    /// Empty answer map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer stored under `key`.
    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key)
    }

    /// Store `value` under `key`, replacing any previous answer.
    pub fn insert(&mut self, key: impl Into<String>, value: AnswerValue) {
        self.0.insert(key.into(), value);
    }

    /// Remove the answer stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<AnswerValue> {
        self.0.remove(key)
    }

    /// Iterate answers in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }

    /// Number of answers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no answers are stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read a stored JSON object, tolerating legacy scalar values.
    ///
    /// Numbers and booleans become text, `null` entries are dropped and
    /// non-object documents yield an empty map.
    pub fn from_json_lenient(value: &Value) -> Self {
        let Value::Object(entries) = value else {
            return Self::default();
        };
        entries
            .iter()
            .filter_map(|(key, raw)| lenient_value(raw).map(|value| (key.clone(), value)))
            .collect()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn lenient_value(raw: &Value) -> Option<AnswerValue> {
    match raw {
        Value::Array(items) => Some(AnswerValue::MultiChoice(
            items.iter().filter_map(scalar_text).collect(),
        )),
        other => scalar_text(other).map(AnswerValue::Text),
    }
}

impl FromIterator<(String, AnswerValue)> for Answers {
    fn from_iter<I: IntoIterator<Item = (String, AnswerValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Answers {
    type Item = (String, AnswerValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Result of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Answers with their shape fixed by field type.
    pub answers: Answers,
    /// Keys that match no field in the form.
    pub orphaned: Vec<String>,
}

/// Fix the shape of each answer from its field's declared type.
///
/// Checkbox answers become sets, single-valued answers keep their first
/// element, and choice tokens naming an option id or a legacy derived value
/// are rewritten to the option's value. Unknown keys are kept untouched and
/// reported in [`Normalized::orphaned`].
pub fn normalize(fields: &[Field], answers: Answers) -> Normalized {
    let mut orphaned = Vec::new();
    let answers = answers
        .into_iter()
        .map(|(key, value)| {
            let Some(field) = fields.iter().find(|field| field.id().as_str() == key) else {
                orphaned.push(key.clone());
                return (key, value);
            };
            (key, shape_for(field, value))
        })
        .collect();
    Normalized { answers, orphaned }
}

fn resolve_token(field: &Field, token: String) -> String {
    field
        .resolve_option(&token)
        .map_or(token, |option| option.value.clone())
}

fn shape_for(field: &Field, value: AnswerValue) -> AnswerValue {
    match field.field_type() {
        FieldType::Checkbox => {
            let mut set: Vec<String> = Vec::new();
            for token in value.into_tokens() {
                let resolved = resolve_token(field, token);
                if !set.contains(&resolved) {
                    set.push(resolved);
                }
            }
            AnswerValue::MultiChoice(set)
        }
        FieldType::Select | FieldType::Radio => {
            let token = value.first();
            if token.is_empty() {
                AnswerValue::Choice(token)
            } else {
                AnswerValue::Choice(resolve_token(field, token))
            }
        }
        FieldType::File | FieldType::ImageUpload => AnswerValue::FileRef(value.first()),
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Date
        | FieldType::Time
        | FieldType::Datetime
        | FieldType::Monthyear
        | FieldType::Multiple
        | FieldType::ImageChoices => AnswerValue::Text(value.first()),
    }
}

/// Why one answer was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    /// A required field had no answer.
    #[error("This field is required")]
    Required,
    /// A choice answer named no current option.
    #[error("'{value}' is not an option of this field")]
    UnknownOption {
        /// Offending token.
        value: String,
    },
    /// A formatted answer did not parse.
    #[error("expected {expected}")]
    BadFormat {
        /// Human readable format description.
        expected: &'static str,
    },
}

fn parse_datetime(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M%:z").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M").is_ok()
}

fn check_format(text: &str, field_type: FieldType) -> Result<(), AnswerError> {
    let (ok, expected) = match field_type {
        FieldType::Date => (
            text.len() == 10 && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok(),
            "a date formatted YYYY-MM-DD",
        ),
        FieldType::Time => (
            text.len() == 5 && NaiveTime::parse_from_str(text, "%H:%M").is_ok(),
            "a time formatted HH:MM",
        ),
        FieldType::Datetime => (parse_datetime(text), "a date and time formatted YYYY-MM-DDTHH:MM"),
        FieldType::Monthyear => (
            text.len() == 7 && NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d").is_ok(),
            "a month formatted YYYY-MM",
        ),
        _ => (true, ""),
    };
    if ok {
        Ok(())
    } else {
        Err(AnswerError::BadFormat { expected })
    }
}

/// Check one present answer against its field.
pub fn validate_answer(field: &Field, value: &AnswerValue) -> Result<(), AnswerError> {
    match field.field_type() {
        FieldType::Select | FieldType::Radio | FieldType::Checkbox => value
            .tokens()
            .into_iter()
            .filter(|token| !token.trim().is_empty())
            .find(|token| field.resolve_option(token).is_none())
            .map_or(Ok(()), |token| {
                Err(AnswerError::UnknownOption {
                    value: token.to_owned(),
                })
            }),
        kind @ (FieldType::Date | FieldType::Time | FieldType::Datetime | FieldType::Monthyear) => {
            value
                .tokens()
                .into_iter()
                .try_for_each(|token| check_format(token.trim(), kind))
        }
        FieldType::Text
        | FieldType::Textarea
        | FieldType::File
        | FieldType::ImageUpload
        | FieldType::Multiple
        | FieldType::ImageChoices => Ok(()),
    }
}

/// Per-field validation failures keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerErrors(BTreeMap<String, AnswerError>);

impl AnswerErrors {
    /// Failures keyed by field id.
    pub fn fields(&self) -> &BTreeMap<String, AnswerError> {
        &self.0
    }
}

impl From<AnswerErrors> for Error {
    fn from(errors: AnswerErrors) -> Self {
        let fields: Map<String, Value> = errors
            .0
            .iter()
            .map(|(id, err)| (id.clone(), Value::String(err.to_string())))
            .collect();
        Error::invalid_request("answers failed validation")
            .with_details(json!({ "fields": fields }))
    }
}

/// Validate known fields and enforce `required`.
///
/// Keys matching no field are ignored here; see [`normalize`].
pub fn validate(fields: &[Field], answers: &Answers) -> Result<(), AnswerErrors> {
    let errors: BTreeMap<String, AnswerError> = fields
        .iter()
        .filter_map(|field| {
            let key = field.id().as_str();
            let outcome = match answers.get(key).filter(|value| !value.is_empty()) {
                None if field.required() => Err(AnswerError::Required),
                None => Ok(()),
                Some(value) => validate_answer(field, value),
            };
            outcome.err().map(|err| (key.to_owned(), err))
        })
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AnswerErrors(errors))
    }
}

/// Human readable rendering of an answer for reports and email.
///
/// Choice tokens are shown by option label and sets are comma-joined.
pub fn display_answer(field: &Field, value: &AnswerValue) -> String {
    let labels: Vec<String> = value
        .tokens()
        .into_iter()
        .filter(|token| !token.is_empty())
        .map(|token| {
            if field.field_type().is_choice() {
                field
                    .resolve_option(token)
                    .map_or_else(|| token.to_owned(), |option| option.label.clone())
            } else {
                token.to_owned()
            }
        })
        .collect();
    labels.join(", ")
}

#[cfg(test)]
#[path = "answer_tests.rs"]
mod tests;
