//! Shared server state and environment-driven configuration.

use taskbin_db::repository::{
    SurrealAuditLogRepository, SurrealItemRepository, SurrealSessionRepository,
};
use taskbin_db::{DbConfig, DbManager};
use taskbin_tenant::config::{SessionConfig, SessionPolicy};
use taskbin_tenant::service::SessionService;

/// The remote engine every repository handle runs on.
pub type Db = surrealdb::engine::remote::ws::Client;

pub type Sessions = SurrealSessionRepository<Db>;
pub type Items = SurrealItemRepository<Db>;
pub type Audit = SurrealAuditLogRepository<Db>;
pub type Service = SessionService<Sessions, Items, Audit>;

/// State shared across handlers. Repository handles clone the
/// multiplexed connection, which stands in for per-request pool
/// acquisition; release is implicit in drop on every exit path.
pub struct AppState {
    pub items: Items,
    pub audit: Audit,
    pub service: Service,
}

impl AppState {
    pub fn new(manager: &DbManager, session_config: SessionConfig) -> Self {
        let db = manager.client().clone();
        let service = SessionService::new(
            SurrealSessionRepository::new(db.clone()),
            SurrealItemRepository::new(db.clone()),
            SurrealAuditLogRepository::new(db.clone()),
            session_config,
        );
        Self {
            items: SurrealItemRepository::new(db.clone()),
            audit: SurrealAuditLogRepository::new(db),
            service,
        }
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address, e.g. `127.0.0.1:3000`.
    pub bind: String,
    pub db: DbConfig,
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Read configuration from `TASKBIN_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.is_empty())
        }

        let mut db = DbConfig::default();
        if let Some(url) = var("TASKBIN_DB_URL") {
            db.url = url;
        }
        if let Some(namespace) = var("TASKBIN_DB_NS") {
            db.namespace = namespace;
        }
        if let Some(database) = var("TASKBIN_DB_NAME") {
            db.database = database;
        }
        if let Some(username) = var("TASKBIN_DB_USER") {
            db.username = username;
        }
        if let Some(password) = var("TASKBIN_DB_PASS") {
            db.password = password;
        }

        let policy = match var("TASKBIN_SESSION_POLICY").as_deref() {
            Some("issued") => SessionPolicy::AdministrativeIssuance,
            _ => SessionPolicy::SelfService,
        };

        let mut session = SessionConfig {
            policy,
            admin_secret_hash: var("TASKBIN_ADMIN_SECRET_HASH"),
            ..Default::default()
        };
        if let Some(iterations) = var("TASKBIN_KDF_ITERATIONS").and_then(|v| v.parse().ok()) {
            session.kdf_iterations = iterations;
        }
        if let Some(output_len) = var("TASKBIN_KDF_OUTPUT_LEN").and_then(|v| v.parse().ok()) {
            session.kdf_output_len = output_len;
        }

        Self {
            bind: var("TASKBIN_BIND").unwrap_or_else(|| "127.0.0.1:3000".into()),
            db,
            session,
        }
    }
}
