//! To-do item domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted to-do item, always scoped to the owning tenant key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    /// Owning tenant.
    pub api_key: String,
    pub description: String,
    pub done: bool,
    /// Optional non-negative deadline hint (unix seconds). Zero is valid.
    pub due_before: Option<i64>,
}

/// Validated, partially specified item attributes.
///
/// Produced by [`crate::validate::validate`]; a field is `Some` only
/// when it was both allowed for the operation and present in the raw
/// attribute bag, so partial updates fall out naturally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub description: Option<String>,
    pub done: Option<bool>,
    pub due_before: Option<i64>,
}

impl ItemDraft {
    /// True when no field survived validation.
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.done.is_none() && self.due_before.is_none()
    }
}

/// Result of a delete operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub rows_deleted: u64,
}
