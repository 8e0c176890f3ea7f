//! SurrealDB implementation of [`AuditLogRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use taskbin_core::error::TaskbinResult;
use taskbin_core::models::audit::AuditEntry;
use taskbin_core::repository::AuditLogRepository;
use tracing::debug;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct LogRow {
    kind: String,
    message: String,
    timestamp: DateTime<Utc>,
}

impl From<LogRow> for AuditEntry {
    fn from(row: LogRow) -> Self {
        AuditEntry {
            kind: row.kind,
            message: row.message,
            timestamp: row.timestamp,
        }
    }
}

/// Append-only audit log writer.
#[derive(Clone)]
pub struct SurrealAuditLogRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAuditLogRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AuditLogRepository for SurrealAuditLogRepository<C> {
    async fn record(&self, kind: &str, message: &str) -> TaskbinResult<AuditEntry> {
        let mut result = self
            .db
            .query("CREATE log SET kind = $kind, message = $message")
            .bind(("kind", kind.to_string()))
            .bind(("message", message.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LogRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "log".into(),
            id: kind.to_string(),
        })?;

        debug!(kind, message, "audit entry recorded");
        Ok(row.into())
    }
}
