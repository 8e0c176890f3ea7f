//! Tenant session domain model.
//!
//! The API key is both the tenant's identity and its session token.
//! Exactly one session row exists per provisioned key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A provisioned tenant session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantSession {
    /// Opaque identity token; unique across the deployment.
    pub api_key: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful validation.
    pub last_used_at: DateTime<Utc>,
}
