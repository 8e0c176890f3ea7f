//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! Session records use the api key as their record id, so record
//! uniqueness enforces one session row per key. Item records use the
//! item UUID (stored as a string) as their record id.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenant sessions (record id = api key)
-- =======================================================================
DEFINE TABLE user_session SCHEMAFULL;
DEFINE FIELD api_key ON TABLE user_session TYPE string;
DEFINE FIELD created_at ON TABLE user_session TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD last_used_at ON TABLE user_session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_session_api_key ON TABLE user_session \
    COLUMNS api_key UNIQUE;

-- =======================================================================
-- Items (record id = item uuid, scoped to owning key)
-- =======================================================================
DEFINE TABLE item SCHEMAFULL;
DEFINE FIELD api_key ON TABLE item TYPE string;
DEFINE FIELD description ON TABLE item TYPE string DEFAULT '';
DEFINE FIELD done ON TABLE item TYPE bool DEFAULT false;
DEFINE FIELD due_before ON TABLE item TYPE option<int> \
    ASSERT $value = NONE OR $value >= 0;
DEFINE INDEX idx_item_api_key ON TABLE item COLUMNS api_key;

-- =======================================================================
-- Audit log (append-only)
-- =======================================================================
DEFINE TABLE log SCHEMAFULL;
DEFINE FIELD kind ON TABLE log TYPE string;
DEFINE FIELD message ON TABLE log TYPE string;
DEFINE FIELD timestamp ON TABLE log TYPE datetime DEFAULT time::now();
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(version = migration.version, "Migration applied");
        }
    }

    Ok(())
}
