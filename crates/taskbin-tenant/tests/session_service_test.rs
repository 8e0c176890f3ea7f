//! Integration tests for the session lifecycle service, both policies,
//! using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use surrealdb_types::SurrealValue;
use taskbin_core::error::TaskbinError;
use taskbin_core::repository::{ItemRepository, Pagination, SessionRepository};
use taskbin_db::repository::{
    SurrealAuditLogRepository, SurrealItemRepository, SurrealSessionRepository,
};
use taskbin_tenant::config::{SessionConfig, SessionPolicy};
use taskbin_tenant::secret::derive_secret_hash;
use taskbin_tenant::seed::seed_items;
use taskbin_tenant::service::SessionService;

type Db = surrealdb::engine::local::Db;
type Service = SessionService<
    SurrealSessionRepository<Db>,
    SurrealItemRepository<Db>,
    SurrealAuditLogRepository<Db>,
>;

const TEST_SECRET: &str = "correct horse battery staple";
const TEST_ITERATIONS: u32 = 1_000; // keep the test suite fast
const TEST_OUTPUT_LEN: usize = 32;

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Helper: spin up in-memory DB, run migrations, build the service.
async fn setup(config: SessionConfig) -> (Service, Surreal<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    taskbin_db::run_migrations(&db).await.unwrap();

    let service = SessionService::new(
        SurrealSessionRepository::new(db.clone()),
        SurrealItemRepository::new(db.clone()),
        SurrealAuditLogRepository::new(db.clone()),
        config,
    );
    (service, db)
}

fn self_service_config() -> SessionConfig {
    SessionConfig {
        policy: SessionPolicy::SelfService,
        ..Default::default()
    }
}

fn issuance_config() -> SessionConfig {
    SessionConfig {
        policy: SessionPolicy::AdministrativeIssuance,
        admin_secret_hash: Some(hex::encode(derive_secret_hash(
            TEST_SECRET,
            TEST_ITERATIONS,
            TEST_OUTPUT_LEN,
        ))),
        kdf_iterations: TEST_ITERATIONS,
        kdf_output_len: TEST_OUTPUT_LEN,
    }
}

async fn count(db: &Surreal<Db>, table: &str) -> u64 {
    let mut result = db
        .query(format!("SELECT count() AS total FROM {table} GROUP ALL"))
        .await
        .unwrap();
    let rows: Vec<CountRow> = result.take(0).unwrap();
    rows.first().map(|r| r.total).unwrap_or(0)
}

// -----------------------------------------------------------------------
// Self-service policy
// -----------------------------------------------------------------------

#[tokio::test]
async fn first_sight_provisions_session_and_seed_items() {
    let (service, db) = setup(self_service_config()).await;

    let session = service.authorize("first-timer-key").await.unwrap();
    assert_eq!(session.api_key, "first-timer-key");

    assert_eq!(count(&db, "user_session").await, 1);
    assert_eq!(count(&db, "item").await, seed_items().len() as u64);

    // Every seeded item belongs to the new tenant.
    let items = SurrealItemRepository::new(db.clone())
        .list("first-timer-key", Pagination::default())
        .await
        .unwrap();
    assert_eq!(items.total, seed_items().len() as u64);
}

#[tokio::test]
async fn second_sight_only_touches_the_session() {
    let (service, db) = setup(self_service_config()).await;

    let first = service.authorize("repeat-key").await.unwrap();
    let second = service.authorize("repeat-key").await.unwrap();

    assert_eq!(second.created_at, first.created_at);
    assert!(second.last_used_at >= first.last_used_at);

    // No extra rows from the second call.
    assert_eq!(count(&db, "user_session").await, 1);
    assert_eq!(count(&db, "item").await, seed_items().len() as u64);
}

#[tokio::test]
async fn distinct_keys_provision_independently() {
    let (service, db) = setup(self_service_config()).await;

    service.authorize("tenant-one").await.unwrap();
    service.authorize("tenant-two").await.unwrap();

    assert_eq!(count(&db, "user_session").await, 2);
    assert_eq!(count(&db, "item").await, 2 * seed_items().len() as u64);
}

#[tokio::test]
async fn provisioning_is_recorded_in_the_audit_log() {
    let (service, db) = setup(self_service_config()).await;

    service.authorize("audited-key").await.unwrap();
    assert!(count(&db, "log").await >= 1);
}

// -----------------------------------------------------------------------
// Administrative-issuance policy
// -----------------------------------------------------------------------

#[tokio::test]
async fn unknown_key_is_rejected_under_issuance_policy() {
    let (service, db) = setup(issuance_config()).await;

    let result = service.authorize("fabricated-key").await;
    assert!(matches!(result, Err(TaskbinError::InvalidKey)));

    // Rejection provisions nothing.
    assert_eq!(count(&db, "user_session").await, 0);
}

#[tokio::test]
async fn issued_key_validates_and_touches() {
    let (service, db) = setup(issuance_config()).await;

    let keys = service.issue_sessions(TEST_SECRET, 1).await.unwrap();
    let key = keys.first().unwrap();

    let first = service.authorize(key).await.unwrap();
    let second = service.authorize(key).await.unwrap();
    assert_eq!(second.created_at, first.created_at);
    assert!(second.last_used_at >= first.last_used_at);

    assert_eq!(count(&db, "user_session").await, 1);
}

#[tokio::test]
async fn issuance_mints_distinct_provisioned_keys() {
    let (service, db) = setup(issuance_config()).await;

    let keys = service.issue_sessions(TEST_SECRET, 3).await.unwrap();
    assert_eq!(keys.len(), 3);

    let mut unique = keys.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 3, "issued keys must be distinct");

    let sessions = SurrealSessionRepository::new(db.clone());
    for key in &keys {
        assert!(sessions.find(key).await.unwrap().is_some());
        let items = SurrealItemRepository::new(db.clone())
            .list(key, Pagination::default())
            .await
            .unwrap();
        assert_eq!(items.total, seed_items().len() as u64);
    }

    assert_eq!(count(&db, "user_session").await, 3);
    assert_eq!(count(&db, "item").await, 3 * seed_items().len() as u64);
}

#[tokio::test]
async fn wrong_secret_is_unauthorized_and_mints_nothing() {
    let (service, db) = setup(issuance_config()).await;

    let result = service.issue_sessions("not the secret", 3).await;
    assert!(matches!(result, Err(TaskbinError::Unauthorized { .. })));

    assert_eq!(count(&db, "user_session").await, 0);
    assert_eq!(count(&db, "item").await, 0);
}

#[tokio::test]
async fn unconfigured_issuance_is_unauthorized() {
    let (service, _db) = setup(SessionConfig {
        policy: SessionPolicy::AdministrativeIssuance,
        admin_secret_hash: None,
        ..Default::default()
    })
    .await;

    let result = service.issue_sessions(TEST_SECRET, 1).await;
    assert!(matches!(result, Err(TaskbinError::Unauthorized { .. })));
}

#[tokio::test]
async fn zero_count_issuance_is_an_empty_success() {
    let (service, db) = setup(issuance_config()).await;

    let keys = service.issue_sessions(TEST_SECRET, 0).await.unwrap();
    assert!(keys.is_empty());
    assert_eq!(count(&db, "user_session").await, 0);
}
