//! Audit log domain model.
//!
//! Append-only; entries are never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Event class, e.g. `"info"` or an HTTP status code.
    pub kind: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
