//! SurrealDB implementation of [`ItemRepository`].
//!
//! Every statement filters on `api_key` in addition to the record id,
//! so one tenant can never reach another tenant's rows.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use taskbin_core::error::{TaskbinError, TaskbinResult};
use taskbin_core::models::item::{Item, ItemDraft};
use taskbin_core::repository::{ItemRepository, PaginatedResult, Pagination};
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ItemRow {
    api_key: String,
    description: String,
    done: bool,
    due_before: Option<i64>,
}

#[derive(Debug, SurrealValue)]
struct ItemRowWithId {
    record_id: String,
    api_key: String,
    description: String,
    done: bool,
    due_before: Option<i64>,
}

fn row_to_item(row: ItemRow, id: Uuid) -> Item {
    Item {
        id,
        api_key: row.api_key,
        description: row.description,
        done: row.done,
        due_before: row.due_before,
    }
}

impl ItemRowWithId {
    fn try_into_item(self) -> Result<Item, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid item UUID: {e}")))?;
        Ok(Item {
            id,
            api_key: self.api_key,
            description: self.description,
            done: self.done,
            due_before: self.due_before,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the item repository.
#[derive(Clone)]
pub struct SurrealItemRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealItemRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ItemRepository for SurrealItemRepository<C> {
    async fn list(
        &self,
        api_key: &str,
        pagination: Pagination,
    ) -> TaskbinResult<PaginatedResult<Item>> {
        let api_key_owned = api_key.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM item \
                 WHERE api_key = $api_key GROUP ALL",
            )
            .bind(("api_key", api_key_owned.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM item \
                 WHERE api_key = $api_key \
                 ORDER BY record_id ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("api_key", api_key_owned))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ItemRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_item())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn create(&self, api_key: &str, draft: ItemDraft) -> TaskbinResult<Item> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // Only the fields that survived validation are written; the
        // schema fills in defaults for the rest.
        let mut sets = vec!["api_key = $api_key"];
        if draft.description.is_some() {
            sets.push("description = $description");
        }
        if draft.done.is_some() {
            sets.push("done = $done");
        }
        if draft.due_before.is_some() {
            sets.push("due_before = $due_before");
        }

        let query = format!(
            "CREATE type::record('item', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("api_key", api_key.to_string()));

        if let Some(description) = draft.description {
            builder = builder.bind(("description", description));
        }
        if let Some(done) = draft.done {
            builder = builder.bind(("done", done));
        }
        if let Some(due_before) = draft.due_before {
            builder = builder.bind(("due_before", due_before));
        }

        let result = builder.await.map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ItemRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "item".into(),
            id: id_str,
        })?;

        Ok(row_to_item(row, id))
    }

    async fn get_by_id(&self, api_key: &str, id: Uuid) -> TaskbinResult<Item> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('item', $id) \
                 WHERE api_key = $api_key",
            )
            .bind(("id", id_str.clone()))
            .bind(("api_key", api_key.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ItemRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "item".into(),
            id: id_str,
        })?;

        Ok(row_to_item(row, id))
    }

    async fn update(&self, api_key: &str, id: Uuid, draft: ItemDraft) -> TaskbinResult<Item> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if draft.description.is_some() {
            sets.push("description = $description");
        }
        if draft.done.is_some() {
            sets.push("done = $done");
        }
        if draft.due_before.is_some() {
            sets.push("due_before = $due_before");
        }
        // A zero-field SET is not a valid statement; the store façade
        // rejects empty drafts before reaching this point.
        if sets.is_empty() {
            return Err(TaskbinError::validation(
                "update must supply at least one field",
            ));
        }

        let query = format!(
            "UPDATE type::record('item', $id) SET {} \
             WHERE api_key = $api_key",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("api_key", api_key.to_string()));

        if let Some(description) = draft.description {
            builder = builder.bind(("description", description));
        }
        if let Some(done) = draft.done {
            builder = builder.bind(("done", done));
        }
        if let Some(due_before) = draft.due_before {
            builder = builder.bind(("due_before", due_before));
        }

        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<ItemRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "item".into(),
            id: id_str,
        })?;

        Ok(row_to_item(row, id))
    }

    async fn delete(&self, api_key: &str, id: Uuid) -> TaskbinResult<u64> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "DELETE type::record('item', $id) \
                 WHERE api_key = $api_key RETURN BEFORE",
            )
            .bind(("id", id_str.clone()))
            .bind(("api_key", api_key.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ItemRow> = result.take(0).map_err(DbError::from)?;
        let deleted = rows.len() as u64;
        if deleted == 0 {
            return Err(DbError::NotFound {
                entity: "item".into(),
                id: id_str,
            }
            .into());
        }

        Ok(deleted)
    }
}
