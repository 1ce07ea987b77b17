//! Per-user builder drafts and the commands that edit them.
//!
//! A draft is an explicit value owned by one user. [`FormDraft::apply`] is
//! pure; persistence of drafts lives behind the `DraftStore` port.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::field::{Field, FieldDto, FieldError, FieldId, FieldTemplate, FieldType, OptionId, OptionPatch};
use super::form::{DEFAULT_TITLE, FormDefinition, FormValidationError, TitleAlignment, TitleColor};
use crate::domain::Error;
use crate::domain::ids::IdGenerator;

const FRESH_ID_ATTEMPTS: usize = 16;

/// One edit applied to a draft.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DraftCommand {
    /// Replace the title.
    SetTitle {
        /// New title.
        title: String,
    },
    /// Replace the title colour.
    SetTitleColor {
        /// Hex colour.
        color: String,
    },
    /// Replace the title alignment.
    SetTitleAlignment {
        /// New alignment.
        alignment: TitleAlignment,
    },
    /// Insert a new field.
    AddField {
        /// Field type.
        #[serde(rename = "type")]
        field_type: FieldType,
        /// Optional label.
        #[serde(default)]
        label: Option<String>,
        /// Insert position; appended when absent or out of range.
        #[serde(default)]
        position: Option<usize>,
    },
    /// Change a field's label or required flag.
    UpdateField {
        /// Target field.
        #[serde(rename = "fieldId")]
        #[schema(value_type = String)]
        field_id: FieldId,
        /// New label.
        #[serde(default)]
        label: Option<String>,
        /// New required flag.
        #[serde(default)]
        required: Option<bool>,
    },
    /// Move a field to a new index.
    MoveField {
        /// Target field.
        #[serde(rename = "fieldId")]
        #[schema(value_type = String)]
        field_id: FieldId,
        /// Destination index, clamped to the field count.
        #[serde(rename = "toIndex")]
        to_index: usize,
    },
    /// Drop a field.
    RemoveField {
        /// Target field.
        #[serde(rename = "fieldId")]
        #[schema(value_type = String)]
        field_id: FieldId,
    },
    /// Append an option to a choice field.
    AddOption {
        /// Target field.
        #[serde(rename = "fieldId")]
        #[schema(value_type = String)]
        field_id: FieldId,
    },
    /// Edit one option.
    UpdateOption {
        /// Target field.
        #[serde(rename = "fieldId")]
        #[schema(value_type = String)]
        field_id: FieldId,
        /// Target option.
        #[serde(rename = "optionId")]
        #[schema(value_type = String)]
        option_id: OptionId,
        /// Changes to apply.
        patch: OptionPatch,
    },
    /// Drop one option.
    RemoveOption {
        /// Target field.
        #[serde(rename = "fieldId")]
        #[schema(value_type = String)]
        field_id: FieldId,
        /// Target option.
        #[serde(rename = "optionId")]
        #[schema(value_type = String)]
        option_id: OptionId,
    },
}

/// Failures raised while applying draft commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// No field carries the given id.
    #[error("field {field_id} not found")]
    UnknownField {
        /// Requested field.
        field_id: String,
    },
    /// Field generation kept colliding with existing ids.
    #[error("could not allocate a fresh field id")]
    IdExhausted,
    /// A field or option edit failed.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// A form-level value was invalid.
    #[error(transparent)]
    Form(#[from] FormValidationError),
}

impl From<DraftError> for Error {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::UnknownField { .. } => Error::not_found(err.to_string()),
            DraftError::IdExhausted => Error::internal(err.to_string()),
            DraftError::Field(inner) => inner.into(),
            DraftError::Form(inner) => inner.into(),
        }
    }
}

/// In-progress form held for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDraft {
    /// Working title.
    pub title: String,
    /// Title colour.
    #[serde(default)]
    pub title_color: TitleColor,
    /// Title alignment.
    #[serde(default)]
    pub title_alignment: TitleAlignment,
    /// Ordered fields.
    #[serde(default)]
    #[schema(value_type = Vec<FieldDto>)]
    pub fields: Vec<Field>,
    /// Last modification time; absent for a fresh draft.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for FormDraft {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            title_color: TitleColor::default(),
            title_alignment: TitleAlignment::default(),
            fields: Vec::new(),
            updated_at: None,
        }
    }
}

impl FormDraft {
    /// Apply one command, returning the edited draft.
    ///
    /// # Examples
    /// ```
    /// use safety_backend::domain::forms::{DraftCommand, FieldType, FormDraft};
    /// use safety_backend::domain::ids::SequentialIdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new("f");
    /// let draft = FormDraft::default()
    ///     .apply(
    ///         &DraftCommand::AddField { field_type: FieldType::Text, label: None, position: None },
    ///         &ids,
    ///     )
    ///     .unwrap();
    /// assert_eq!(draft.fields.len(), 1);
    /// ```
    pub fn apply(&self, command: &DraftCommand, ids: &dyn IdGenerator) -> Result<Self, DraftError> {
        let mut next = self.clone();
        match command {
            DraftCommand::SetTitle { title } => next.title.clone_from(title),
            DraftCommand::SetTitleColor { color } => next.title_color = TitleColor::parse(color)?,
            DraftCommand::SetTitleAlignment { alignment } => next.title_alignment = *alignment,
            DraftCommand::AddField {
                field_type,
                label,
                position,
            } => {
                let template = FieldTemplate {
                    field_type: *field_type,
                    label: label.clone(),
                };
                let field = Field::create_with_id(self.fresh_field_id(ids)?, &template, ids);
                let index = position
                    .filter(|index| *index <= next.fields.len())
                    .unwrap_or(next.fields.len());
                next.fields.insert(index, field);
            }
            DraftCommand::UpdateField {
                field_id,
                label,
                required,
            } => {
                let field = next.field_mut(field_id)?;
                if let Some(label) = label {
                    *field = field.relabelled(label.clone());
                }
                if let Some(required) = required {
                    *field = field.with_required(*required);
                }
            }
            DraftCommand::MoveField { field_id, to_index } => {
                let from = next.position(field_id)?;
                let field = next.fields.remove(from);
                let to = (*to_index).min(next.fields.len());
                next.fields.insert(to, field);
            }
            DraftCommand::RemoveField { field_id } => {
                let index = next.position(field_id)?;
                next.fields.remove(index);
            }
            DraftCommand::AddOption { field_id } => {
                let field = next.field_mut(field_id)?;
                *field = field.add_option(ids)?;
            }
            DraftCommand::UpdateOption {
                field_id,
                option_id,
                patch,
            } => {
                let field = next.field_mut(field_id)?;
                *field = field.update_option(option_id, patch)?;
            }
            DraftCommand::RemoveOption {
                field_id,
                option_id,
            } => {
                let field = next.field_mut(field_id)?;
                *field = field.remove_option(option_id)?;
            }
        }
        Ok(next)
    }

    /// Apply every command in order; nothing is applied if one fails.
    pub fn apply_all(&self, commands: &[DraftCommand], ids: &dyn IdGenerator) -> Result<Self, DraftError> {
        commands
            .iter()
            .try_fold(self.clone(), |draft, command| draft.apply(command, ids))
    }

    /// Validate the draft as a form definition.
    pub fn to_definition(&self) -> Result<FormDefinition, FormValidationError> {
        FormDefinition::new(
            Some(&self.title),
            self.title_color.clone(),
            self.title_alignment,
            self.fields.clone(),
        )
    }

    fn position(&self, field_id: &FieldId) -> Result<usize, DraftError> {
        self.fields
            .iter()
            .position(|field| field.id() == field_id)
            .ok_or_else(|| DraftError::UnknownField {
                field_id: field_id.to_string(),
            })
    }

    fn field_mut(&mut self, field_id: &FieldId) -> Result<&mut Field, DraftError> {
        self.fields
            .iter_mut()
            .find(|field| field.id() == field_id)
            .ok_or_else(|| DraftError::UnknownField {
                field_id: field_id.to_string(),
            })
    }

    fn fresh_field_id(&self, ids: &dyn IdGenerator) -> Result<FieldId, DraftError> {
        (0..FRESH_ID_ATTEMPTS)
            .map(|_| FieldId::generate(ids))
            .find(|id| self.fields.iter().all(|field| field.id() != id))
            .ok_or(DraftError::IdExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::SequentialIdGenerator;
    use rstest::{fixture, rstest};

    #[fixture]
    fn ids() -> SequentialIdGenerator {
        SequentialIdGenerator::new("d")
    }

    fn add(kind: FieldType) -> DraftCommand {
        DraftCommand::AddField {
            field_type: kind,
            label: None,
            position: None,
        }
    }

    fn field_ids(draft: &FormDraft) -> Vec<String> {
        draft.fields.iter().map(|f| f.id().to_string()).collect()
    }

    #[rstest]
    fn commands_build_up_a_draft(ids: SequentialIdGenerator) {
        let draft = FormDraft::default()
            .apply_all(
                &[
                    DraftCommand::SetTitle {
                        title: "Site walk".into(),
                    },
                    DraftCommand::SetTitleColor {
                        color: "#c00".into(),
                    },
                    add(FieldType::Text),
                    add(FieldType::Radio),
                ],
                &ids,
            )
            .expect("valid commands");
        assert_eq!(draft.title, "Site walk");
        assert_eq!(draft.title_color.as_str(), "#c00");
        assert_eq!(draft.fields.len(), 2);
        let definition = draft.to_definition().expect("valid definition");
        assert_eq!(definition.fields().len(), 2);
    }

    #[rstest]
    fn moving_and_removing_fields_never_touches_ids(ids: SequentialIdGenerator) {
        let draft = FormDraft::default()
            .apply_all(&[add(FieldType::Text), add(FieldType::Date), add(FieldType::File)], &ids)
            .expect("fields added");
        let before = field_ids(&draft);
        let last = draft.fields.last().expect("field").id().clone();
        let moved = draft
            .apply(
                &DraftCommand::MoveField {
                    field_id: last.clone(),
                    to_index: 0,
                },
                &ids,
            )
            .expect("move");
        let mut expected = before.clone();
        expected.rotate_right(1);
        assert_eq!(field_ids(&moved), expected);

        let removed = moved
            .apply(&DraftCommand::RemoveField { field_id: last }, &ids)
            .expect("remove");
        assert_eq!(field_ids(&removed), before.get(..2).unwrap_or_default().to_vec());
    }

    #[rstest]
    fn failed_batches_leave_the_draft_untouched(ids: SequentialIdGenerator) {
        let draft = FormDraft::default();
        let err = draft
            .apply_all(
                &[
                    add(FieldType::Text),
                    DraftCommand::RemoveField {
                        field_id: FieldId::new("missing").expect("valid id"),
                    },
                ],
                &ids,
            )
            .expect_err("unknown field");
        assert!(matches!(err, DraftError::UnknownField { .. }));
        assert!(draft.fields.is_empty());
        assert_eq!(Error::from(err).code(), crate::domain::ErrorCode::NotFound);
    }

    #[rstest]
    fn option_commands_edit_choice_fields(ids: SequentialIdGenerator) {
        let draft = FormDraft::default()
            .apply(&add(FieldType::Checkbox), &ids)
            .expect("added");
        let field_id = draft.fields.first().expect("field").id().clone();
        let draft = draft
            .apply(
                &DraftCommand::AddOption {
                    field_id: field_id.clone(),
                },
                &ids,
            )
            .expect("option added");
        let field = draft.fields.first().expect("field");
        assert_eq!(field.options().len(), 3);
        let option_id = field.options().first().expect("option").id.clone();
        let draft = draft
            .apply(
                &DraftCommand::RemoveOption {
                    field_id: field_id.clone(),
                    option_id,
                },
                &ids,
            )
            .expect("option removed");
        assert_eq!(draft.fields.first().map(|f| f.options().len()), Some(2));
    }

    #[rstest]
    fn positions_and_required_flags_are_honoured(ids: SequentialIdGenerator) {
        let draft = FormDraft::default()
            .apply_all(&[add(FieldType::Text), add(FieldType::Text)], &ids)
            .expect("added");
        let draft = draft
            .apply(
                &DraftCommand::AddField {
                    field_type: FieldType::Time,
                    label: Some("Arrival".into()),
                    position: Some(0),
                },
                &ids,
            )
            .expect("inserted");
        let first = draft.fields.first().expect("field");
        assert_eq!(first.label(), "Arrival");
        let id = first.id().clone();
        let draft = draft
            .apply(
                &DraftCommand::UpdateField {
                    field_id: id,
                    label: None,
                    required: Some(true),
                },
                &ids,
            )
            .expect("updated");
        assert!(draft.fields.first().is_some_and(Field::required));
    }

    #[rstest]
    fn commands_deserialise_from_tagged_json() {
        let command: DraftCommand = serde_json::from_value(serde_json::json!({
            "kind": "update_option",
            "fieldId": "f1",
            "optionId": "o1",
            "patch": {"label": "Fire", "deriveValue": true}
        }))
        .expect("valid command");
        assert!(matches!(command, DraftCommand::UpdateOption { .. }));
    }

    #[rstest]
    fn empty_drafts_cannot_become_forms() {
        assert_eq!(
            FormDraft::default().to_definition(),
            Err(FormValidationError::MissingFields)
        );
    }
}
