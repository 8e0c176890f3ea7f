//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Item and session repositories
//! take the tenant's `api_key` on every call to enforce data isolation.

use uuid::Uuid;

use crate::error::TaskbinResult;
use crate::models::audit::AuditEntry;
use crate::models::item::{Item, ItemDraft};
use crate::models::session::TenantSession;

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Tenant session rows keyed by api key.
pub trait SessionRepository: Send + Sync {
    /// Look up a session; `None` means the key has never been
    /// provisioned.
    fn find(
        &self,
        api_key: &str,
    ) -> impl Future<Output = TaskbinResult<Option<TenantSession>>> + Send;
    /// Insert the session row for a new key. Fails if the key already
    /// has a row.
    fn create(&self, api_key: &str) -> impl Future<Output = TaskbinResult<TenantSession>> + Send;
    /// Refresh `last_used_at` on an existing session.
    fn touch(&self, api_key: &str) -> impl Future<Output = TaskbinResult<TenantSession>> + Send;
}

/// Tenant-scoped item rows.
pub trait ItemRepository: Send + Sync {
    fn list(
        &self,
        api_key: &str,
        pagination: Pagination,
    ) -> impl Future<Output = TaskbinResult<PaginatedResult<Item>>> + Send;
    /// Insert a validated draft, augmented with a fresh id and the
    /// tenant key. Returns the persisted row including defaults.
    fn create(
        &self,
        api_key: &str,
        draft: ItemDraft,
    ) -> impl Future<Output = TaskbinResult<Item>> + Send;
    fn get_by_id(
        &self,
        api_key: &str,
        id: Uuid,
    ) -> impl Future<Output = TaskbinResult<Item>> + Send;
    /// Partial update over only the supplied draft fields. Fails
    /// `NotFound` when no row matched `(id, api_key)`.
    fn update(
        &self,
        api_key: &str,
        id: Uuid,
        draft: ItemDraft,
    ) -> impl Future<Output = TaskbinResult<Item>> + Send;
    /// Returns the affected-row count. Fails `NotFound` when zero rows
    /// were deleted.
    fn delete(&self, api_key: &str, id: Uuid) -> impl Future<Output = TaskbinResult<u64>> + Send;
}

/// Append-only audit log.
///
/// Failures surface to the caller; callers decide whether to escalate
/// (in this system they never do).
pub trait AuditLogRepository: Send + Sync {
    /// Append one timestamped entry and return it as stored.
    fn record(
        &self,
        kind: &str,
        message: &str,
    ) -> impl Future<Output = TaskbinResult<AuditEntry>> + Send;
}
