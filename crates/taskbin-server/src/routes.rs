//! HTTP routes for the item CRUD surface and administrative key
//! issuance.

use std::sync::Arc;

use axum::extract::{Path, Query, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskbin_core::models::item::{DeleteOutcome, Item};
use taskbin_core::repository::{AuditLogRepository, Pagination};
use taskbin_tenant::store::ItemStore;
use tracing::warn;
use uuid::Uuid;

use crate::context::TenantContext;
use crate::error::{ApiError, ErrorDetail};
use crate::state::{AppState, Items};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/item", get(list_items).post(create_item))
        .route(
            "/api/item/{id}",
            get(retrieve_item).put(update_item).delete(delete_item),
        )
        .route("/api/admin/keys", post(issue_keys))
        .layer(middleware::from_fn_with_state(state.clone(), audit_errors))
        .with_state(state)
}

/// Record every terminal error response in the audit log,
/// best-effort: a failed write is itself only warned about.
async fn audit_errors(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        if let Some(detail) = response.extensions().get::<ErrorDetail>().cloned() {
            if let Err(err) = state.audit.record(status.as_str(), &detail.0).await {
                warn!(error = %err, "audit log write failed");
            }
        }
    }

    response
}

fn store_for(state: &AppState, ctx: &TenantContext) -> ItemStore<Items> {
    ItemStore::new(state.items.clone(), ctx.api_key.clone())
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::bad_request("ID must be a valid UUID"))
}

#[derive(Debug, Deserialize)]
struct PageParams {
    offset: Option<u64>,
    limit: Option<u64>,
}

async fn list_items(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let defaults = Pagination::default();
    let page = Pagination {
        offset: params.offset.unwrap_or(defaults.offset),
        limit: params.limit.unwrap_or(defaults.limit),
    };

    let result = store_for(&state, &ctx).list(page).await?;
    Ok(Json(result.items))
}

async fn create_item(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Json(body): Json<Value>,
) -> Result<Json<Item>, ApiError> {
    let item = store_for(&state, &ctx).create(&body).await?;
    Ok(Json(item))
}

async fn retrieve_item(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&id)?;
    let item = store_for(&state, &ctx).retrieve(id).await?;
    Ok(Json(item))
}

async fn update_item(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&id)?;
    let item = store_for(&state, &ctx).update(id, &body).await?;
    Ok(Json(item))
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = parse_id(&id)?;
    let outcome = store_for(&state, &ctx).delete(id).await?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
struct IssueRequest {
    secret: String,
    count: u32,
}

#[derive(Debug, Serialize)]
struct IssueResponse {
    keys: Vec<String>,
}

/// Bulk key issuance. Gated by the administrative secret, not by an
/// API key, so this route takes no [`TenantContext`].
async fn issue_keys(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IssueRequest>,
) -> Result<Json<IssueResponse>, ApiError> {
    let keys = state
        .service
        .issue_sessions(&request.secret, request.count)
        .await?;
    Ok(Json(IssueResponse { keys }))
}
