//! Field schema model: the closed set of field types and their shape.
//!
//! Every operation here is pure and returns a new [`Field`]. Identifiers are
//! allocated once, when a field or option is created, and are never derived
//! from labels or regenerated on edit.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ids::{IdGenerator, define_identifier};
use crate::domain::slug::{field_name, underscore_slug};

define_identifier!(
    /// Stable identifier of a field within a form. Answers are keyed by it.
    FieldId
);

define_identifier!(
    /// Stable identifier of an option within a choice field.
    OptionId
);

const FRESH_ID_ATTEMPTS: usize = 16;

/// Closed set of field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Single-line text.
    Text,
    /// Multi-line text.
    Textarea,
    /// Drop-down with a single selection.
    Select,
    /// Radio group with a single selection.
    Radio,
    /// Checkbox group with any number of selections.
    Checkbox,
    /// ISO date (`YYYY-MM-DD`).
    Date,
    /// Time of day (`HH:MM`).
    Time,
    /// ISO date and time.
    Datetime,
    /// Month and year (`YYYY-MM`).
    Monthyear,
    /// Uploaded document.
    File,
    /// Uploaded image.
    ImageUpload,
    /// Reserved; rendered as text.
    Multiple,
    /// Reserved; rendered as text.
    ImageChoices,
}

impl FieldType {
    /// Every field type, in toolbox order.
    pub const ALL: [Self; 13] = [
        Self::Text,
        Self::Textarea,
        Self::Select,
        Self::Radio,
        Self::Checkbox,
        Self::Date,
        Self::Time,
        Self::Datetime,
        Self::Monthyear,
        Self::File,
        Self::ImageUpload,
        Self::Multiple,
        Self::ImageChoices,
    ];

    /// Wire tag of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
            Self::Time => "time",
            Self::Datetime => "datetime",
            Self::Monthyear => "monthyear",
            Self::File => "file",
            Self::ImageUpload => "image_upload",
            Self::Multiple => "multiple",
            Self::ImageChoices => "image_choices",
        }
    }

    /// Types that carry an options list.
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }

    /// Types whose answer is a set of option values.
    pub fn is_multi_valued(self) -> bool {
        matches!(self, Self::Checkbox)
    }

    /// Types whose answer references an uploaded file.
    pub fn is_file(self) -> bool {
        matches!(self, Self::File | Self::ImageUpload)
    }

    /// Types kept for stored definitions but not offered by the builder.
    pub fn is_reserved(self) -> bool {
        matches!(self, Self::Multiple | Self::ImageChoices)
    }

    /// Label given to freshly created fields of this type.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::Text => "Short answer",
            Self::Textarea => "Paragraph",
            Self::Select => "Dropdown",
            Self::Radio => "Multiple choice",
            Self::Checkbox => "Checkboxes",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Datetime => "Date and time",
            Self::Monthyear => "Month and year",
            Self::File => "File upload",
            Self::ImageUpload => "Image upload",
            Self::Multiple => "Multiple",
            Self::ImageChoices => "Image choices",
        }
    }
}

/// One selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldOption {
    /// Stable identifier used for option-level edits.
    #[schema(value_type = String)]
    pub id: OptionId,
    /// Display label.
    pub label: String,
    /// Export-facing value, unique within the field.
    pub value: String,
}

/// Template accepted by [`Field::create`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct FieldTemplate {
    /// Type of the new field.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Optional label; defaults to the type's label.
    #[serde(default)]
    pub label: Option<String>,
}

impl FieldTemplate {
    /// Template for `field_type` with the default label.
    pub fn of(field_type: FieldType) -> Self {
        Self {
            field_type,
            label: None,
        }
    }

    /// Template with an explicit label.
    pub fn labelled(field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            field_type,
            label: Some(label.into()),
        }
    }
}

/// Partial update applied to one option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionPatch {
    /// New display label. The stored value is left untouched.
    #[serde(default)]
    pub label: Option<String>,
    /// Explicit new value.
    #[serde(default)]
    pub value: Option<String>,
    /// Recompute the value as `{optionId}_{slug(label)}`.
    #[serde(default)]
    pub derive_value: bool,
}

/// Errors raised by field and option edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Option operations were attempted on a non-choice field.
    #[error("field {field_id} does not have options")]
    NotAChoiceField {
        /// Offending field.
        field_id: String,
    },
    /// No option carries the given id.
    #[error("option {option_id} not found")]
    UnknownOption {
        /// Requested option.
        option_id: String,
    },
    /// Two options would share a value.
    #[error("option value '{value}' is already used in this field")]
    DuplicateOptionValue {
        /// Colliding value.
        value: String,
    },
    /// Two options would share an id.
    #[error("option id {option_id} is already used in this field")]
    DuplicateOptionId {
        /// Colliding id.
        option_id: String,
    },
    /// An option value was blank.
    #[error("option values must not be empty")]
    EmptyOptionValue,
}

impl From<FieldError> for Error {
    fn from(err: FieldError) -> Self {
        let message = err.to_string();
        match err {
            FieldError::UnknownOption { .. } => Error::not_found(message),
            FieldError::DuplicateOptionValue { .. } | FieldError::DuplicateOptionId { .. } => {
                Error::conflict(message)
            }
            FieldError::NotAChoiceField { .. } | FieldError::EmptyOptionValue => {
                Error::invalid_request(message)
            }
        }
    }
}

/// One input unit in a form.
///
/// ## Invariants
/// - `name` is always derived from `type` and `id`.
/// - Only choice types carry options; option ids and values are unique.
///
/// # Examples
/// ```
/// use safety_backend::domain::forms::{Field, FieldTemplate, FieldType};
/// use safety_backend::domain::ids::SequentialIdGenerator;
///
/// let ids = SequentialIdGenerator::new("x");
/// let field = Field::create(&FieldTemplate::of(FieldType::Radio), &ids);
/// assert_eq!(field.name(), "radio_x1");
/// assert_eq!(field.options().len(), 2);
/// assert_eq!(field.options()[0].value, "option_1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldDto", into = "FieldDto")]
pub struct Field {
    id: FieldId,
    field_type: FieldType,
    label: String,
    name: String,
    required: bool,
    options: Vec<FieldOption>,
}

impl Field {
    /// Create a field from a template, allocating fresh identifiers.
    pub fn create(template: &FieldTemplate, ids: &dyn IdGenerator) -> Self {
        Self::create_with_id(FieldId::generate(ids), template, ids)
    }

    /// Create a field with a caller-chosen identifier.
    pub fn create_with_id(id: FieldId, template: &FieldTemplate, ids: &dyn IdGenerator) -> Self {
        let field_type = template.field_type;
        let label = template
            .label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .unwrap_or(field_type.default_label())
            .to_owned();
        let options = if field_type.is_choice() {
            (1..=2)
                .map(|n| FieldOption {
                    id: OptionId::generate(ids),
                    label: format!("Option {n}"),
                    value: format!("option_{n}"),
                })
                .collect()
        } else {
            Vec::new()
        };
        Self {
            name: field_name(field_type.as_str(), id.as_str()),
            id,
            field_type,
            label,
            required: false,
            options,
        }
    }

    /// Identifier.
    pub fn id(&self) -> &FieldId {
        &self.id
    }

    /// Declared type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Derived debug name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an answer is required.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Options, empty for non-choice fields.
    pub fn options(&self) -> &[FieldOption] {
        &self.options
    }

    /// Copy with a new label.
    #[must_use]
    pub fn relabelled(&self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..self.clone()
        }
    }

    /// Copy with a new required flag.
    #[must_use]
    pub fn with_required(&self, required: bool) -> Self {
        Self {
            required,
            ..self.clone()
        }
    }

    /// Look an option up by id.
    pub fn option(&self, option_id: &OptionId) -> Option<&FieldOption> {
        self.options.iter().find(|option| &option.id == option_id)
    }

    /// Resolve an answer token to an option.
    ///
    /// Tokens match an option's `value`, then its `id`, then a legacy derived
    /// value of the form `{id}_...`.
    pub fn resolve_option(&self, token: &str) -> Option<&FieldOption> {
        self.options
            .iter()
            .find(|option| option.value == token)
            .or_else(|| self.options.iter().find(|option| option.id.as_str() == token))
            .or_else(|| {
                self.options.iter().find(|option| {
                    token
                        .strip_prefix(option.id.as_str())
                        .is_some_and(|rest| rest.starts_with('_'))
                })
            })
    }

    /// Append an option with a fresh id and placeholder label.
    pub fn add_option(&self, ids: &dyn IdGenerator) -> Result<Self, FieldError> {
        self.ensure_choice()?;
        let option = (0..FRESH_ID_ATTEMPTS)
            .map(|_| OptionId::generate(ids))
            .find(|id| {
                let value = format!("option_{id}");
                self.option(id).is_none() && self.options.iter().all(|o| o.value != value)
            })
            .map(|id| FieldOption {
                value: format!("option_{id}"),
                label: "New option".to_owned(),
                id,
            })
            .ok_or_else(|| FieldError::DuplicateOptionId {
                option_id: "generated".to_owned(),
            })?;

        let mut next = self.clone();
        next.options.push(option);
        Ok(next)
    }

    /// Apply `patch` to the option `option_id`.
    pub fn update_option(&self, option_id: &OptionId, patch: &OptionPatch) -> Result<Self, FieldError> {
        self.ensure_choice()?;
        let current = self
            .option(option_id)
            .ok_or_else(|| FieldError::UnknownOption {
                option_id: option_id.to_string(),
            })?;

        let label = patch.label.clone().unwrap_or_else(|| current.label.clone());
        let value = if patch.derive_value {
            format!("{}_{}", option_id, underscore_slug(&label))
        } else if let Some(raw) = patch.value.as_deref() {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(FieldError::EmptyOptionValue);
            }
            trimmed.to_owned()
        } else {
            current.value.clone()
        };

        if self
            .options
            .iter()
            .any(|option| &option.id != option_id && option.value == value)
        {
            return Err(FieldError::DuplicateOptionValue { value });
        }

        let mut next = self.clone();
        for option in &mut next.options {
            if &option.id == option_id {
                option.label = label.clone();
                option.value = value.clone();
            }
        }
        Ok(next)
    }

    /// Drop the option `option_id`.
    pub fn remove_option(&self, option_id: &OptionId) -> Result<Self, FieldError> {
        self.ensure_choice()?;
        if self.option(option_id).is_none() {
            return Err(FieldError::UnknownOption {
                option_id: option_id.to_string(),
            });
        }
        let mut next = self.clone();
        next.options.retain(|option| &option.id != option_id);
        Ok(next)
    }

    fn ensure_choice(&self) -> Result<(), FieldError> {
        if self.field_type.is_choice() {
            Ok(())
        } else {
            Err(FieldError::NotAChoiceField {
                field_id: self.id.to_string(),
            })
        }
    }
}

/// Wire representation of a [`Field`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDto {
    /// Stable identifier.
    #[schema(value_type = String)]
    pub id: FieldId,
    /// Field type tag.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Derived debug name; recomputed on read.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether an answer is required.
    #[serde(default)]
    pub required: bool,
    /// Options for choice types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

impl From<Field> for FieldDto {
    fn from(field: Field) -> Self {
        let options = field.field_type.is_choice().then_some(field.options);
        Self {
            id: field.id,
            field_type: field.field_type,
            label: field.label,
            name: Some(field.name),
            required: field.required,
            options,
        }
    }
}

impl TryFrom<FieldDto> for Field {
    type Error = FieldError;

    fn try_from(dto: FieldDto) -> Result<Self, Self::Error> {
        let options = if dto.field_type.is_choice() {
            dto.options.unwrap_or_default()
        } else {
            Vec::new()
        };
        for (index, option) in options.iter().enumerate() {
            let earlier = options.get(..index).unwrap_or_default();
            if option.value.trim().is_empty() {
                return Err(FieldError::EmptyOptionValue);
            }
            if earlier.iter().any(|other| other.id == option.id) {
                return Err(FieldError::DuplicateOptionId {
                    option_id: option.id.to_string(),
                });
            }
            if earlier.iter().any(|other| other.value == option.value) {
                return Err(FieldError::DuplicateOptionValue {
                    value: option.value.clone(),
                });
            }
        }
        Ok(Self {
            name: field_name(dto.field_type.as_str(), dto.id.as_str()),
            id: dto.id,
            field_type: dto.field_type,
            label: dto.label,
            required: dto.required,
            options,
        })
    }
}

#[cfg(test)]
#[path = "field_tests.rs"]
mod tests;
