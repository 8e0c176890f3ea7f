//! SurrealDB implementation of [`SessionRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use taskbin_core::error::TaskbinResult;
use taskbin_core::models::session::TenantSession;
use taskbin_core::repository::SessionRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SessionRow {
    api_key: String,
    created_at: DateTime<Utc>,
    last_used_at: DateTime<Utc>,
}

impl From<SessionRow> for TenantSession {
    fn from(row: SessionRow) -> Self {
        TenantSession {
            api_key: row.api_key,
            created_at: row.created_at,
            last_used_at: row.last_used_at,
        }
    }
}

/// SurrealDB implementation of the session repository.
///
/// The api key doubles as the record id, so the engine's record
/// uniqueness enforces exactly one session row per key.
#[derive(Clone)]
pub struct SurrealSessionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSessionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SessionRepository for SurrealSessionRepository<C> {
    async fn find(&self, api_key: &str) -> TaskbinResult<Option<TenantSession>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('user_session', $api_key)")
            .bind(("api_key", api_key.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SessionRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next().map(Into::into))
    }

    async fn create(&self, api_key: &str) -> TaskbinResult<TenantSession> {
        let api_key_owned = api_key.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('user_session', $api_key) SET \
                 api_key = $api_key",
            )
            .bind(("api_key", api_key_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<SessionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_session".into(),
            id: api_key_owned,
        })?;

        Ok(row.into())
    }

    async fn touch(&self, api_key: &str) -> TaskbinResult<TenantSession> {
        let api_key_owned = api_key.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('user_session', $api_key) SET \
                 last_used_at = time::now()",
            )
            .bind(("api_key", api_key_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SessionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_session".into(),
            id: api_key_owned,
        })?;

        Ok(row.into())
    }
}
