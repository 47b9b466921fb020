//! UI-facing contact session.
//!
//! # Responsibility
//! - Map front-end intents (submit, patch, edit, cancel, delete, clear, search) onto
//!   store operations one to one.
//! - Track edit mode and the active search term between intents.
//!
//! # Invariants
//! - Input is validated before it reaches the store.
//! - Edit mode always refers to a contact id, never to a copied record.
//! - Clearing all contacts also leaves edit mode and resets the search term.

use crate::model::contact::{Contact, ContactId, CreateContactDto, UpdateContactDto};
use crate::model::validation::ContactValidationError;
use crate::storage::KeyValueStorage;
use crate::store::ContactStore;
use log::{info, warn};

/// Result of a successful form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Contact),
    Updated(Contact),
    /// The contact being edited no longer exists; edit mode is kept so the
    /// caller can decide what to do with the form.
    EditTargetMissing(ContactId),
}

/// Contact session for one front end.
pub struct ContactsSession<S: KeyValueStorage> {
    store: ContactStore<S>,
    editing: Option<ContactId>,
    search_term: String,
}

impl<S: KeyValueStorage> ContactsSession<S> {
    pub fn new(store: ContactStore<S>) -> Self {
        Self {
            store,
            editing: None,
            search_term: String::new(),
        }
    }

    pub fn store(&self) -> &ContactStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ContactStore<S> {
        &mut self.store
    }

    pub fn into_store(self) -> ContactStore<S> {
        self.store
    }

    /// Creates a contact, or updates the one in edit mode.
    ///
    /// # Errors
    /// Returns the first failing field; the store is not touched then.
    pub fn submit(
        &mut self,
        dto: CreateContactDto,
    ) -> Result<SubmitOutcome, ContactValidationError> {
        if let Err(err) = dto.validate() {
            info!(
                "event=contact_submit module=session status=rejected field={}",
                err.field().as_str()
            );
            return Err(err);
        }

        let Some(editing_id) = self.editing.clone() else {
            let created = self.store.add(dto);
            return Ok(SubmitOutcome::Created(created));
        };

        match self.store.update(&editing_id, dto.into()) {
            Some(updated) => {
                self.editing = None;
                Ok(SubmitOutcome::Updated(updated))
            }
            None => {
                warn!("event=contact_submit module=session status=edit_target_missing");
                Ok(SubmitOutcome::EditTargetMissing(editing_id))
            }
        }
    }

    /// Overwrites the supplied fields of `id` without entering edit mode.
    ///
    /// The patch is merged onto the stored record and the result is validated
    /// like a submitted form. `Ok(None)` means `id` is unknown.
    ///
    /// # Errors
    /// Returns the first failing field of the merged record; the store is not
    /// touched then.
    pub fn patch(
        &mut self,
        id: &str,
        patch: UpdateContactDto,
    ) -> Result<Option<Contact>, ContactValidationError> {
        let Some(mut merged) = self.store.get(id).cloned() else {
            return Ok(None);
        };
        merged.apply(patch);
        let dto = merged.to_dto();
        if let Err(err) = dto.validate() {
            info!(
                "event=contact_patch module=session status=rejected field={}",
                err.field().as_str()
            );
            return Err(err);
        }
        Ok(self.store.update(id, dto.into()))
    }

    /// Enters edit mode for `id` and returns the form prefill.
    ///
    /// Unknown ids leave the session unchanged.
    pub fn begin_edit(&mut self, id: &str) -> Option<CreateContactDto> {
        let prefill = self.store.get(id)?.to_dto();
        self.editing = Some(id.to_string());
        Some(prefill)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Deletes `id`, leaving edit mode if it was the edited contact.
    pub fn delete(&mut self, id: &str) -> bool {
        let deleted = self.store.delete(id);
        if deleted && self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        deleted
    }

    /// Removes every contact and resets edit/search state.
    ///
    /// Confirmation is the caller's job.
    pub fn clear_all(&mut self) {
        self.store.clear_all();
        self.editing = None;
        self.search_term.clear();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Contacts visible under the current search term.
    pub fn visible_contacts(&self) -> Vec<&Contact> {
        self.store.search(&self.search_term)
    }

    /// Number of search hits, or `None` while no term is entered.
    pub fn result_count(&self) -> Option<usize> {
        if self.search_term.is_empty() {
            return None;
        }
        Some(self.visible_contacts().len())
    }

    /// Placeholder text for an empty contact view.
    pub fn empty_message(&self) -> String {
        if self.search_term.is_empty() {
            return "No contacts yet. Add your first contact to get started.".to_string();
        }
        format!(
            "No contacts match \"{}\". Try a different search term.",
            self.search_term
        )
    }
}
