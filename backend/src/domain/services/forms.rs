//! Form definition services.
//!
//! Saving validates the whole definition; updates replace it wholesale and
//! refuse to change the type of an existing field so stored answers keep
//! their meaning.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::{map_client_repository_error, map_form_repository_error, map_user_repository_error};
use crate::domain::forms::{
    Form, FormDefinition, FormId, FormPayload, FormWithOwner, RenderedForm, render,
};
use crate::domain::ports::{
    ClientRepository, FormRepository, FormsCommand, FormsQuery, RenderRequest, UserRepository,
};
use crate::domain::{AccessPolicy, Caller, Client, ClientBranding, Error, UserId};

pub(crate) const FORM_NOT_FOUND: &str = "Form not found";

/// Form service implementing the form command and query ports.
#[derive(Clone)]
pub struct FormsService<F, U, C> {
    forms: Arc<F>,
    users: Arc<U>,
    clients: Arc<C>,
    policy: AccessPolicy,
    clock: Arc<dyn Clock>,
}

impl<F, U, C> FormsService<F, U, C> {
    /// Create a service over the form, user and client repositories.
    pub fn new(
        forms: Arc<F>,
        users: Arc<U>,
        clients: Arc<C>,
        policy: AccessPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            forms,
            users,
            clients,
            policy,
            clock,
        }
    }
}

impl<F, U, C> FormsService<F, U, C>
where
    F: FormRepository,
    U: UserRepository,
    C: ClientRepository,
{
    async fn existing(&self, id: FormId) -> Result<Form, Error> {
        self.forms
            .find_by_id(&id)
            .await
            .map_err(map_form_repository_error)?
            .ok_or_else(|| Error::not_found(FORM_NOT_FOUND))
    }

    /// Resolve the creator's organisation: by client id, else by company name.
    async fn owner_client(&self, created_by: &UserId) -> Result<Option<Client>, Error> {
        let Some(creator) = self
            .users
            .find_by_id(created_by)
            .await
            .map_err(map_user_repository_error)?
        else {
            return Ok(None);
        };
        if let Some(client_id) = creator.client_id {
            let client = self
                .clients
                .find_by_id(client_id)
                .await
                .map_err(map_client_repository_error)?;
            if client.is_some() {
                return Ok(client);
            }
        }
        self.clients
            .find_by_name(&creator.companyname)
            .await
            .map_err(map_client_repository_error)
    }
}

#[async_trait]
impl<F, U, C> FormsCommand for FormsService<F, U, C>
where
    F: FormRepository,
    U: UserRepository,
    C: ClientRepository,
{
    async fn save_form(&self, caller: &Caller, payload: FormPayload) -> Result<Form, Error> {
        let definition = FormDefinition::from_payload(payload)?;
        let now = self.clock.utc();
        let form = Form {
            id: FormId::random(),
            definition,
            created_by: caller.user_id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.forms
            .save(&form)
            .await
            .map_err(map_form_repository_error)?;
        info!(
            form_id = %form.id,
            fields = form.definition.fields().len(),
            "form saved"
        );
        Ok(form)
    }

    async fn update_form(
        &self,
        caller: &Caller,
        id: FormId,
        payload: FormPayload,
    ) -> Result<Form, Error> {
        let existing = self.existing(id).await?;
        if !self.policy.can_edit_form(caller, &existing.created_by) {
            return Err(Error::forbidden("You can only edit your own forms"));
        }
        let definition = FormDefinition::from_payload(payload)?;
        definition.ensure_types_stable(&existing.definition)?;
        let form = Form {
            definition,
            updated_at: self.clock.utc(),
            ..existing
        };
        self.forms
            .save(&form)
            .await
            .map_err(map_form_repository_error)?;
        info!(form_id = %form.id, "form replaced");
        Ok(form)
    }

    async fn delete_form(&self, caller: &Caller, id: FormId) -> Result<(), Error> {
        let existing = self.existing(id).await?;
        let owner_client = self
            .owner_client(&existing.created_by)
            .await?
            .map(|client| client.id);
        if !self
            .policy
            .can_delete_form(caller, &existing.created_by, owner_client)
        {
            return Err(Error::forbidden("You cannot delete this form"));
        }
        let removed = self
            .forms
            .delete(&id)
            .await
            .map_err(map_form_repository_error)?;
        if !removed {
            return Err(Error::not_found(FORM_NOT_FOUND));
        }
        info!(form_id = %id, "form deleted");
        Ok(())
    }
}

#[async_trait]
impl<F, U, C> FormsQuery for FormsService<F, U, C>
where
    F: FormRepository,
    U: UserRepository,
    C: ClientRepository,
{
    async fn list_forms(&self, caller: &Caller) -> Result<Vec<Form>, Error> {
        let mut forms = self
            .forms
            .list_by_creator(&caller.user_id)
            .await
            .map_err(map_form_repository_error)?;
        forms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(forms)
    }

    async fn get_form(&self, id: FormId) -> Result<FormWithOwner, Error> {
        let form = self.existing(id).await?;
        let owner_client = self
            .owner_client(&form.created_by)
            .await?
            .as_ref()
            .map(ClientBranding::from);
        Ok(FormWithOwner { form, owner_client })
    }

    async fn render_form(&self, id: FormId, request: RenderRequest) -> Result<RenderedForm, Error> {
        let FormWithOwner { form, owner_client } = self.get_form(id).await?;
        Ok(render(
            &form.definition,
            owner_client.as_ref(),
            &request.values,
            request.mode,
        ))
    }
}

#[cfg(test)]
#[path = "forms_tests.rs"]
mod tests;
