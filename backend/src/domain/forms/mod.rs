//! Dynamic form model: fields, answers, definitions, drafts, rendering and
//! responses.

pub mod answer;
pub mod draft;
pub mod field;
pub mod form;
pub mod render;
pub mod report;
pub mod response;

pub use answer::{
    AnswerError, AnswerErrors, AnswerValue, Answers, Normalized, WireAnswer, display_answer,
    normalize, validate, validate_answer,
};
pub use draft::{DraftCommand, DraftError, FormDraft};
pub use field::{
    Field, FieldDto, FieldError, FieldId, FieldOption, FieldTemplate, FieldType, OptionId,
    OptionPatch,
};
pub use form::{
    DEFAULT_TITLE, DEFAULT_TITLE_COLOR, Form, FormDefinition, FormId, FormPayload,
    FormValidationError, FormWithOwner, TitleAlignment, TitleColor,
};
pub use render::{
    ChoiceItem, Control, FormFill, MISSING_FILE, MISSING_VALUE, OrphanedAnswer, RenderMode,
    RenderedField, RenderedForm, SubmitInFlight, render,
};
pub use report::{email_body, email_subject, render_html};
pub use response::{
    EmailFailureKind, EmailOutcome, FormResponse, ResponseId, ResponseSummary, ResponseView,
};
