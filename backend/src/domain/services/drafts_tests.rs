//! Tests for the draft service.

use std::sync::Arc;

use super::*;
use crate::domain::forms::{FieldId, FieldType};
use crate::domain::ids::SequentialIdGenerator;
use crate::domain::ports::{MockDraftStore, MockFormsCommand};
use crate::domain::services::test_helpers::{caller, fixture_clock, fixture_timestamp, form};
use crate::domain::{ErrorCode, Role};

fn service(drafts: MockDraftStore, forms: MockFormsCommand) -> DraftsService<MockDraftStore> {
    DraftsService::new(
        Arc::new(drafts),
        Arc::new(forms),
        Arc::new(SequentialIdGenerator::new("d")),
        fixture_clock(),
    )
}

fn add(kind: FieldType) -> DraftCommand {
    DraftCommand::AddField {
        field_type: kind,
        label: None,
        position: None,
    }
}

#[tokio::test]
async fn load_draft_defaults_to_an_empty_untitled_draft() {
    let mut drafts = MockDraftStore::new();
    drafts.expect_load().return_once(|_| Ok(None));

    let draft = service(drafts, MockFormsCommand::new())
        .load_draft(&caller("Acme", Role::User, None))
        .await
        .expect("draft loads");

    assert_eq!(draft, FormDraft::default());
}

#[tokio::test]
async fn apply_commands_persists_the_edited_draft() {
    let mut drafts = MockDraftStore::new();
    drafts.expect_load().return_once(|_| Ok(None));
    drafts
        .expect_save()
        .withf(|_, draft| draft.fields.len() == 2 && draft.title == "Audit")
        .times(1)
        .return_once(|_, _| Ok(()));

    let draft = service(drafts, MockFormsCommand::new())
        .apply_commands(
            &caller("Acme", Role::User, None),
            vec![
                DraftCommand::SetTitle {
                    title: "Audit".into(),
                },
                add(FieldType::Text),
                add(FieldType::Radio),
            ],
        )
        .await
        .expect("commands apply");

    assert_eq!(draft.updated_at, Some(fixture_timestamp()));
    assert_eq!(
        draft.fields.get(1).map(|field| field.options().len()),
        Some(2)
    );
}

#[tokio::test]
async fn a_failing_batch_leaves_the_stored_draft_untouched() {
    let mut drafts = MockDraftStore::new();
    drafts.expect_load().return_once(|_| Ok(None));
    drafts.expect_save().times(0);

    let error = service(drafts, MockFormsCommand::new())
        .apply_commands(
            &caller("Acme", Role::User, None),
            vec![
                add(FieldType::Text),
                DraftCommand::RemoveField {
                    field_id: FieldId::new("missing").expect("valid id"),
                },
            ],
        )
        .await
        .expect_err("unknown field");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn save_draft_publishes_and_clears() {
    let author = caller("Acme", Role::User, None);
    let published = form(&author.user_id);
    let published_id = published.id;
    let stored = FormDraft::default()
        .apply(&add(FieldType::Date), &SequentialIdGenerator::new("s"))
        .expect("field added");

    let mut drafts = MockDraftStore::new();
    drafts.expect_load().return_once(move |_| Ok(Some(stored)));
    drafts.expect_clear().times(1).return_once(|_| Ok(()));
    let mut forms = MockFormsCommand::new();
    forms
        .expect_save_form()
        .withf(|_, payload| {
            payload.fields.as_ref().map(Vec::len) == Some(1)
                && payload.title_alignment.as_deref() == Some("left")
        })
        .times(1)
        .return_once(move |_, _| Ok(published));

    let saved = service(drafts, forms)
        .save_draft(&author)
        .await
        .expect("draft published");

    assert_eq!(saved.id, published_id);
}

#[tokio::test]
async fn save_draft_keeps_the_draft_when_publishing_fails() {
    let mut drafts = MockDraftStore::new();
    drafts.expect_load().return_once(|_| Ok(None));
    drafts.expect_clear().times(0);
    let mut forms = MockFormsCommand::new();
    forms
        .expect_save_form()
        .return_once(|_, _| Err(Error::invalid_request("Fields array is required")));

    let error = service(drafts, forms)
        .save_draft(&caller("Acme", Role::User, None))
        .await
        .expect_err("empty draft");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn replace_draft_stamps_the_update_time() {
    let mut drafts = MockDraftStore::new();
    drafts.expect_save().times(1).return_once(|_, _| Ok(()));

    let draft = service(drafts, MockFormsCommand::new())
        .replace_draft(&caller("Acme", Role::User, None), FormDraft::default())
        .await
        .expect("replaced");

    assert_eq!(draft.updated_at, Some(fixture_timestamp()));
}
