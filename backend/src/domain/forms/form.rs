//! Form definitions: an ordered list of fields plus title presentation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::field::{Field, FieldDto};
use crate::domain::accounts::{ClientBranding, UserId};
use crate::domain::Error;

/// Title used when a form is saved without one.
pub const DEFAULT_TITLE: &str = "Untitled Form";
/// Default title colour.
pub const DEFAULT_TITLE_COLOR: &str = "#000000";

/// Stable form identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct FormId(Uuid);

impl FormId {
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

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation failures for form definitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormValidationError {
    /// No fields were supplied.
    #[error("Fields array is required")]
    MissingFields,
    /// Two fields share an id.
    #[error("field id {id} is used more than once")]
    DuplicateFieldId {
        /// Repeated id.
        id: String,
    },
    /// Title colour was not `#rgb` or `#rrggbb`.
    #[error("title colour must be a hex colour like #000000")]
    InvalidColor,
    /// Title alignment was not one of left, center or right.
    #[error("title alignment must be left, center or right")]
    InvalidAlignment,
    /// An edit changed the type of a stored field.
    #[error("field {id} cannot change type once saved")]
    FieldTypeChanged {
        /// Offending field.
        id: String,
    },
}

impl From<FormValidationError> for Error {
    fn from(err: FormValidationError) -> Self {
        Error::invalid_request(err.to_string())
    }
}

/// Hex title colour.
///
/// # Examples
/// ```
/// use safety_backend::domain::forms::TitleColor;
///
/// assert!(TitleColor::parse("#0af").is_ok());
/// assert!(TitleColor::parse("red").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "#000000")]
pub struct TitleColor(String);

impl TitleColor {
    /// Validate a `#rgb` or `#rrggbb` colour.
    pub fn parse(raw: &str) -> Result<Self, FormValidationError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or(FormValidationError::InvalidColor)?;
        let well_formed =
            matches!(digits.len(), 3 | 6) && digits.chars().all(|ch| ch.is_ascii_hexdigit());
        if well_formed {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(FormValidationError::InvalidColor)
        }
    }

    /// Colour text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TitleColor {
    fn default() -> Self {
        Self(DEFAULT_TITLE_COLOR.to_owned())
    }
}

impl TryFrom<String> for TitleColor {
    type Error = FormValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TitleColor> for String {
    fn from(value: TitleColor) -> Self {
        value.0
    }
}

/// Horizontal alignment of the form title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TitleAlignment {
    /// Left aligned.
    #[default]
    Left,
    /// Centred.
    Center,
    /// Right aligned.
    Right,
}

impl TitleAlignment {
    /// Lowercase tag, also a valid CSS `text-align` value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl FromStr for TitleAlignment {
    type Err = FormValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(FormValidationError::InvalidAlignment),
        }
    }
}

/// Unvalidated form content as submitted by the builder.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormPayload {
    /// Title; blank becomes [`DEFAULT_TITLE`].
    #[serde(default)]
    pub title: Option<String>,
    /// Ordered fields.
    #[serde(default)]
    #[schema(value_type = Option<Vec<FieldDto>>)]
    pub fields: Option<Vec<Field>>,
    /// Hex colour.
    #[serde(default)]
    pub title_color: Option<String>,
    /// Alignment tag.
    #[serde(default)]
    pub title_alignment: Option<String>,
}

/// Validated title, presentation metadata and ordered fields.
///
/// ## Invariants
/// - At least one field; field ids are unique.
/// - Option values are unique per field (enforced by [`Field`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    title: String,
    title_color: TitleColor,
    title_alignment: TitleAlignment,
    #[schema(value_type = Vec<FieldDto>)]
    fields: Vec<Field>,
}

impl FormDefinition {
    /// Validate a payload.
    pub fn from_payload(payload: FormPayload) -> Result<Self, FormValidationError> {
        let title_color = payload
            .title_color
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(TitleColor::parse)
            .transpose()?
            .unwrap_or_default();
        let title_alignment = payload
            .title_alignment
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(TitleAlignment::from_str)
            .transpose()?
            .unwrap_or_default();
        Self::new(
            payload.title.as_deref(),
            title_color,
            title_alignment,
            payload.fields.unwrap_or_default(),
        )
    }

    /// Validate typed parts.
    pub fn new(
        title: Option<&str>,
        title_color: TitleColor,
        title_alignment: TitleAlignment,
        fields: Vec<Field>,
    ) -> Result<Self, FormValidationError> {
        if fields.is_empty() {
            return Err(FormValidationError::MissingFields);
        }
        for (index, field) in fields.iter().enumerate() {
            let earlier = fields.get(..index).unwrap_or_default();
            if earlier.iter().any(|other| other.id() == field.id()) {
                return Err(FormValidationError::DuplicateFieldId {
                    id: field.id().to_string(),
                });
            }
        }
        let title = title
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(DEFAULT_TITLE)
            .to_owned();
        Ok(Self {
            title,
            title_color,
            title_alignment,
            fields,
        })
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Title colour.
    pub fn title_color(&self) -> &TitleColor {
        &self.title_color
    }

    /// Title alignment.
    pub fn title_alignment(&self) -> TitleAlignment {
        self.title_alignment
    }

    /// Ordered fields.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Reject edits that change the type of a field present in `previous`.
    pub fn ensure_types_stable(&self, previous: &Self) -> Result<(), FormValidationError> {
        let changed = self.fields.iter().find(|field| {
            previous
                .fields
                .iter()
                .any(|old| old.id() == field.id() && old.field_type() != field.field_type())
        });
        match changed {
            Some(field) => Err(FormValidationError::FieldTypeChanged {
                id: field.id().to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// A stored form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    /// Identifier.
    pub id: FormId,
    /// Title, presentation and fields.
    #[serde(flatten)]
    pub definition: FormDefinition,
    /// Creating user.
    #[schema(value_type = String, format = Uuid)]
    pub created_by: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last replacement time.
    pub updated_at: DateTime<Utc>,
}

impl Form {
    /// Look a field up by id.
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.definition
            .fields()
            .iter()
            .find(|field| field.id().as_str() == id)
    }
}

/// A form together with its creator's organisation branding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormWithOwner {
    /// The form.
    #[serde(flatten)]
    pub form: Form,
    /// Organisation of the creator, when resolvable.
    pub owner_client: Option<ClientBranding>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forms::{FieldTemplate, FieldType};
    use crate::domain::ids::SequentialIdGenerator;
    use rstest::rstest;

    fn text_field(ids: &SequentialIdGenerator) -> Field {
        Field::create(&FieldTemplate::of(FieldType::Text), ids)
    }

    #[rstest]
    fn blank_title_defaults_and_metadata_defaults_apply() {
        let ids = SequentialIdGenerator::new("f");
        let payload = FormPayload {
            title: Some("   ".into()),
            fields: Some(vec![text_field(&ids)]),
            ..FormPayload::default()
        };
        let definition = FormDefinition::from_payload(payload).expect("valid form");
        assert_eq!(definition.title(), DEFAULT_TITLE);
        assert_eq!(definition.title_color().as_str(), "#000000");
        assert_eq!(definition.title_alignment(), TitleAlignment::Left);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(Vec::new()))]
    fn fields_are_required(#[case] fields: Option<Vec<Field>>) {
        let payload = FormPayload {
            fields,
            ..FormPayload::default()
        };
        let err = FormDefinition::from_payload(payload).expect_err("no fields");
        assert_eq!(err, FormValidationError::MissingFields);
        assert_eq!(Error::from(err).message(), "Fields array is required");
    }

    #[rstest]
    #[case("#fff", true)]
    #[case("#A1b2C3", true)]
    #[case("#abcd", false)]
    #[case("000000", false)]
    #[case("#ggg", false)]
    fn colours_are_validated(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(TitleColor::parse(raw).is_ok(), ok);
    }

    #[rstest]
    fn alignment_and_colour_are_parsed_from_payload() {
        let ids = SequentialIdGenerator::new("f");
        let payload = FormPayload {
            title: Some("Site inspection".into()),
            fields: Some(vec![text_field(&ids)]),
            title_color: Some("#336699".into()),
            title_alignment: Some("Center".into()),
        };
        let definition = FormDefinition::from_payload(payload).expect("valid form");
        assert_eq!(definition.title_alignment(), TitleAlignment::Center);
        assert_eq!(definition.title_color().as_str(), "#336699");

        let bad = FormPayload {
            fields: Some(vec![text_field(&ids)]),
            title_alignment: Some("justify".into()),
            ..FormPayload::default()
        };
        assert_eq!(
            FormDefinition::from_payload(bad),
            Err(FormValidationError::InvalidAlignment)
        );
    }

    #[rstest]
    fn duplicate_field_ids_are_rejected() {
        let ids = SequentialIdGenerator::new("f");
        let field = text_field(&ids);
        let err = FormDefinition::new(
            None,
            TitleColor::default(),
            TitleAlignment::Left,
            vec![field.clone(), field],
        )
        .expect_err("duplicate ids");
        assert!(matches!(err, FormValidationError::DuplicateFieldId { .. }));
    }

    #[rstest]
    fn stored_fields_cannot_change_type() {
        let ids = SequentialIdGenerator::new("f");
        let field = text_field(&ids);
        let id = field.id().clone();
        let before = FormDefinition::new(None, TitleColor::default(), TitleAlignment::Left, vec![field])
            .expect("valid");
        let replacement = Field::create_with_id(id, &FieldTemplate::of(FieldType::Date), &ids);
        let after = FormDefinition::new(
            None,
            TitleColor::default(),
            TitleAlignment::Left,
            vec![replacement],
        )
        .expect("valid");
        assert!(matches!(
            after.ensure_types_stable(&before),
            Err(FormValidationError::FieldTypeChanged { .. })
        ));
        assert!(before.ensure_types_stable(&before).is_ok());
    }

    #[rstest]
    fn forms_serialise_flat_in_camel_case() {
        let ids = SequentialIdGenerator::new("f");
        let definition = FormDefinition::new(
            Some("Audit"),
            TitleColor::default(),
            TitleAlignment::Right,
            vec![text_field(&ids)],
        )
        .expect("valid");
        let form = Form {
            id: FormId::random(),
            definition,
            created_by: UserId::random(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&form).expect("serialise");
        assert_eq!(json.get("title"), Some(&serde_json::json!("Audit")));
        assert_eq!(json.get("titleAlignment"), Some(&serde_json::json!("right")));
        assert!(json.get("createdBy").is_some());
        assert!(form.field("f1").is_some());
    }
}
