//! Presentation model shared by the builder preview, live filling and the
//! read-only historical view.
//!
//! Rendering dispatches on [`FieldType`] only; it never looks at field ids.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::answer::{AnswerValue, Answers, display_answer, normalize};
use super::field::{Field, FieldError, FieldType, OptionId};
use super::form::{FormDefinition, TitleAlignment};
use crate::domain::Error;
use crate::domain::accounts::ClientBranding;

/// Placeholder shown for missing read-only values.
pub const MISSING_VALUE: &str = "-";
/// Placeholder shown for missing read-only uploads.
pub const MISSING_FILE: &str = "No file";

/// Whether the rendered form accepts input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum RenderMode {
    /// Inputs accept changes and the form can be submitted.
    #[default]
    Editable,
    /// Values are displayed without mutation.
    ReadOnly,
}

/// One option as presented by a choice control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceItem {
    /// Option id.
    pub option_id: String,
    /// Display label.
    pub label: String,
    /// Submitted value.
    pub value: String,
    /// Whether the option is currently selected.
    pub selected: bool,
}

/// Per-type control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    /// Single-line input.
    TextInput {
        /// Current value.
        value: Option<String>,
    },
    /// Multi-line input.
    TextArea {
        /// Current value.
        value: Option<String>,
    },
    /// Drop-down.
    Select {
        /// Options.
        options: Vec<ChoiceItem>,
        /// Selected value.
        selected: Option<String>,
    },
    /// Radio group.
    RadioGroup {
        /// Options.
        options: Vec<ChoiceItem>,
    },
    /// Checkbox group.
    CheckboxGroup {
        /// Options with their checked state.
        options: Vec<ChoiceItem>,
    },
    /// Date picker.
    DateInput {
        /// Current value.
        value: Option<String>,
    },
    /// Time picker.
    TimeInput {
        /// Current value.
        value: Option<String>,
    },
    /// Date and time picker.
    DateTimeInput {
        /// Current value.
        value: Option<String>,
    },
    /// Month picker.
    MonthInput {
        /// Current value.
        value: Option<String>,
    },
    /// Upload control.
    FileInput {
        /// Current upload path.
        current: Option<String>,
        /// Whether only images are accepted.
        images_only: bool,
    },
}

/// One rendered field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderedField {
    /// Field id the control reports changes for.
    pub field_id: String,
    /// Display label.
    pub label: String,
    /// Required marker; only shown while editable.
    pub required: bool,
    /// Control for the field type.
    pub control: Control,
    /// Text shown in read-only views.
    pub display: String,
}

/// An answer whose field no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedAnswer {
    /// Raw answer key.
    pub key: String,
    /// Raw answer text.
    pub display: String,
}

/// Presentation of a whole form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderedForm {
    /// Title text.
    pub title: String,
    /// Title colour.
    pub title_color: String,
    /// Title alignment.
    pub title_alignment: TitleAlignment,
    /// Organisation owning the form.
    pub organisation: Option<String>,
    /// Organisation logo path or URL.
    pub logo: Option<String>,
    /// Render mode.
    pub mode: RenderMode,
    /// Fields in render and tab order.
    pub fields: Vec<RenderedField>,
    /// Answers for deleted fields, listed after the fields in read-only mode.
    pub orphaned: Vec<OrphanedAnswer>,
    /// Whether a submit action is available.
    pub submit_enabled: bool,
}

fn choice_items(field: &Field, selected: &[String]) -> Vec<ChoiceItem> {
    field
        .options()
        .iter()
        .map(|option| ChoiceItem {
            option_id: option.id.to_string(),
            label: option.label.clone(),
            value: option.value.clone(),
            selected: selected.contains(&option.value),
        })
        .collect()
}

fn control_for(field: &Field, value: Option<&AnswerValue>) -> Control {
    let text = value
        .map(|value| value.tokens().join(", "))
        .filter(|text| !text.is_empty());
    let selected: Vec<String> = value
        .map(|value| value.tokens().into_iter().map(str::to_owned).collect())
        .unwrap_or_default();
    match field.field_type() {
        FieldType::Text | FieldType::Multiple | FieldType::ImageChoices => {
            Control::TextInput { value: text }
        }
        FieldType::Textarea => Control::TextArea { value: text },
        FieldType::Select => Control::Select {
            options: choice_items(field, &selected),
            selected: text,
        },
        FieldType::Radio => Control::RadioGroup {
            options: choice_items(field, &selected),
        },
        FieldType::Checkbox => Control::CheckboxGroup {
            options: choice_items(field, &selected),
        },
        FieldType::Date => Control::DateInput { value: text },
        FieldType::Time => Control::TimeInput { value: text },
        FieldType::Datetime => Control::DateTimeInput { value: text },
        FieldType::Monthyear => Control::MonthInput { value: text },
        FieldType::File => Control::FileInput {
            current: text,
            images_only: false,
        },
        FieldType::ImageUpload => Control::FileInput {
            current: text,
            images_only: true,
        },
    }
}

fn display_for(field: &Field, value: Option<&AnswerValue>) -> String {
    let shown = value
        .map(|value| display_answer(field, value))
        .filter(|text| !text.is_empty());
    match shown {
        Some(text) => text,
        None if field.field_type().is_file() => MISSING_FILE.to_owned(),
        None => MISSING_VALUE.to_owned(),
    }
}

/// Render `definition` with `values` in `mode`.
pub fn render(
    definition: &FormDefinition,
    owner: Option<&ClientBranding>,
    values: &Answers,
    mode: RenderMode,
) -> RenderedForm {
    let normalized = normalize(definition.fields(), values.clone());
    let editable = mode == RenderMode::Editable;
    let fields = definition
        .fields()
        .iter()
        .map(|field| {
            let value = normalized.answers.get(field.id().as_str());
            RenderedField {
                field_id: field.id().to_string(),
                label: field.label().to_owned(),
                required: editable && field.required(),
                control: control_for(field, value),
                display: display_for(field, value),
            }
        })
        .collect();
    let orphaned = if editable {
        Vec::new()
    } else {
        normalized
            .orphaned
            .iter()
            .filter_map(|key| {
                normalized.answers.get(key).map(|value| OrphanedAnswer {
                    key: key.clone(),
                    display: value.tokens().join(", "),
                })
            })
            .collect()
    };
    RenderedForm {
        title: definition.title().to_owned(),
        title_color: definition.title_color().as_str().to_owned(),
        title_alignment: definition.title_alignment(),
        organisation: owner.map(|owner| owner.name.clone()),
        logo: owner.and_then(|owner| owner.logo.clone()),
        mode,
        fields,
        orphaned,
        submit_enabled: editable,
    }
}

/// Raised when a submit is started while another is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a submission is already in progress")]
pub struct SubmitInFlight;

impl From<SubmitInFlight> for Error {
    fn from(err: SubmitInFlight) -> Self {
        Error::conflict(err.to_string())
    }
}

/// Editable filling state for one form.
///
/// # Examples
/// ```
/// use safety_backend::domain::forms::{AnswerValue, FormFill};
///
/// let mut fill = FormFill::default();
/// fill.set_value("f1", AnswerValue::Text("Alice".into()));
/// let answers = fill.begin_submit().unwrap();
/// assert!(fill.begin_submit().is_err());
/// fill.finish_submit();
/// assert_eq!(answers.get("f1"), Some(&AnswerValue::Text("Alice".into())));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFill {
    answers: Answers,
    in_flight: bool,
}

impl FormFill {
    /// Start from previously stored answers, as the edit flow does.
    pub fn from_answers(answers: Answers) -> Self {
        Self {
            answers,
            in_flight: false,
        }
    }

    /// Replace the value of one field.
    pub fn set_value(&mut self, field_id: &str, value: AnswerValue) {
        self.answers.insert(field_id, value);
    }

    /// Toggle one checkbox option by id.
    ///
    /// The field's answer is the symmetric difference of its current set and
    /// the option's value. The key is removed once the set is empty.
    pub fn toggle_option(&mut self, field: &Field, option_id: &OptionId) -> Result<(), FieldError> {
        let value = field
            .option(option_id)
            .map(|option| option.value.clone())
            .ok_or_else(|| FieldError::UnknownOption {
                option_id: option_id.to_string(),
            })?;
        let key = field.id().as_str();
        let mut current: Vec<String> = self
            .answers
            .get(key)
            .map(|answer| answer.tokens().into_iter().map(str::to_owned).collect())
            .unwrap_or_default();
        if let Some(index) = current.iter().position(|item| item == &value) {
            current.remove(index);
        } else {
            current.push(value);
        }
        if current.is_empty() {
            self.answers.remove(key);
        } else {
            self.answers.insert(key, AnswerValue::MultiChoice(current));
        }
        Ok(())
    }

    /// Current answers.
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Mark a submission as started and return the answers to send.
    pub fn begin_submit(&mut self) -> Result<Answers, SubmitInFlight> {
        if self.in_flight {
            return Err(SubmitInFlight);
        }
        self.in_flight = true;
        Ok(self.answers.clone())
    }

    /// Mark the in-flight submission as finished.
    pub fn finish_submit(&mut self) {
        self.in_flight = false;
    }

    /// Render the current state; submit is disabled while in flight.
    pub fn render(&self, definition: &FormDefinition, owner: Option<&ClientBranding>) -> RenderedForm {
        let mut rendered = render(definition, owner, &self.answers, RenderMode::Editable);
        rendered.submit_enabled = !self.in_flight;
        rendered
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
