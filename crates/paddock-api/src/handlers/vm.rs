//! VM checkout handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;

use paddock_core::error::AppError;
use paddock_core::types::checkout::CheckoutPlan;
use paddock_engine::request;

use crate::dto::{CheckoutRequest, CheckoutResponse, PoolListResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the caller's auth token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// GET /api/v1/vm — list configured pool names.
pub async fn list_pools(State(state): State<AppState>) -> Json<PoolListResponse> {
    Json(PoolListResponse {
        ok: true,
        pools: state.catalog.pool_names(),
    })
}

/// POST /api/v1/vm — check out machines, pools named in the JSON body.
///
/// The extractor rejection is folded into the regular error shape so a
/// body that is not a JSON object gets the same `ok:false` envelope as
/// every other failure.
pub async fn checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let Json(body) = body.map_err(|r| AppError::validation(r.body_text()))?;
    let plan = request::build_plan(&state.catalog, &body)?;
    run_checkout(&state, &headers, &plan).await
}

/// POST /api/v1/vm/{pools} — check out one machine per `+`-joined token.
pub async fn checkout_path(
    State(state): State<AppState>,
    Path(pools): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let plan = request::build_plan_from_path(&state.catalog, &pools)?;
    run_checkout(&state, &headers, &plan).await
}

async fn run_checkout(
    state: &AppState,
    headers: &HeaderMap,
    plan: &CheckoutPlan,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let presented = headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    let outcome = state.engine.checkout(plan, presented).await?;
    Ok(Json(CheckoutResponse::from(outcome)))
}
