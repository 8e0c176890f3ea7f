//! Tenant-scoped item store.
//!
//! Binds field validation to the item repository for one validated
//! tenant key. Constructed per request, after the key has passed the
//! session service.

use serde_json::Value;
use taskbin_core::error::{TaskbinError, TaskbinResult};
use taskbin_core::models::item::{DeleteOutcome, Item};
use taskbin_core::repository::{ItemRepository, PaginatedResult, Pagination};
use taskbin_core::validate::{CREATE_FIELDS, UPDATE_FIELDS, validate};
use uuid::Uuid;

/// CRUD over one tenant's items, with validation in front of every
/// write.
#[derive(Clone)]
pub struct ItemStore<R: ItemRepository> {
    repo: R,
    api_key: String,
}

impl<R: ItemRepository> ItemStore<R> {
    pub fn new(repo: R, api_key: impl Into<String>) -> Self {
        Self {
            repo,
            api_key: api_key.into(),
        }
    }

    /// All items for the tenant, paginated in stable id order.
    pub async fn list(&self, pagination: Pagination) -> TaskbinResult<PaginatedResult<Item>> {
        self.repo.list(&self.api_key, pagination).await
    }

    /// Validate a raw attribute bag and insert the result.
    ///
    /// Accepted fields: `description`, `due_before`. The persisted row
    /// comes back with its generated id and defaults (`done = false`).
    pub async fn create(&self, raw: &Value) -> TaskbinResult<Item> {
        let draft = validate(raw, CREATE_FIELDS)?;
        self.repo.create(&self.api_key, draft).await
    }

    pub async fn retrieve(&self, id: Uuid) -> TaskbinResult<Item> {
        self.repo.get_by_id(&self.api_key, id).await
    }

    /// Partial update over the supplied fields only.
    ///
    /// Accepted fields: `description`, `done`, `due_before`. A bag
    /// that supplies none of them is rejected as a validation error.
    pub async fn update(&self, id: Uuid, raw: &Value) -> TaskbinResult<Item> {
        let draft = validate(raw, UPDATE_FIELDS)?;
        if draft.is_empty() {
            return Err(TaskbinError::validation(
                "update must supply at least one field",
            ));
        }
        self.repo.update(&self.api_key, id, draft).await
    }

    pub async fn delete(&self, id: Uuid) -> TaskbinResult<DeleteOutcome> {
        let rows_deleted = self.repo.delete(&self.api_key, id).await?;
        Ok(DeleteOutcome { rows_deleted })
    }
}
