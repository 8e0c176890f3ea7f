//! Per-request tenant context.
//!
//! Enforces the API-key precondition before the core is reached, then
//! runs the configured session lifecycle. Handlers that take a
//! [`TenantContext`] can only execute for a validated tenant.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// A validated tenant identity for the current request.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub api_key: String,
}

impl FromRequestParts<Arc<AppState>> for TenantContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get("api-key") else {
            return Err(ApiError::bad_request("API key must be specified"));
        };
        let Ok(api_key) = value.to_str() else {
            return Err(ApiError::bad_request("API key must be a string"));
        };
        if api_key.len() < 8 {
            return Err(ApiError::bad_request(
                "API key must be at least 8 characters in length",
            ));
        }

        debug!(api_key, "user connected");
        let session = state.service.authorize(api_key).await?;

        Ok(TenantContext {
            api_key: session.api_key,
        })
    }
}
