//! Claim lifecycle endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use domains::Claim;
use uuid::Uuid;

use crate::http::dto::{ClaimerAction, CreateClaimRequest, FinderAction, ThreadCreated};
use crate::http::error::ApiResult;
use crate::http::extract::{JsonBody, PathParam};
use crate::http::state::AppState;

pub async fn create_claim(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateClaimRequest>,
) -> ApiResult<(StatusCode, Json<Claim>)> {
    let claim = state.claims.create_claim(body.item_id, body.claimer_id).await?;
    state.metrics.record_transition("submitted");
    Ok((StatusCode::CREATED, Json(claim)))
}

pub async fn get_claim(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<Claim>> {
    Ok(Json(state.claims.get_claim(id).await?))
}

pub async fn list_user_claims(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<Uuid>,
) -> ApiResult<Json<Vec<Claim>>> {
    Ok(Json(state.claims.list_claims_for_user(user_id).await?))
}

pub async fn approve_claim(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(body): JsonBody<FinderAction>,
) -> ApiResult<Json<Claim>> {
    let claim = state.claims.approve_claim(id, body.finder_id).await?;
    state.metrics.record_transition("approved");
    Ok(Json(claim))
}

pub async fn deny_claim(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(body): JsonBody<FinderAction>,
) -> ApiResult<Json<Claim>> {
    let claim = state.claims.deny_claim(id, body.finder_id).await?;
    state.metrics.record_transition("denied");
    Ok(Json(claim))
}

pub async fn handoff(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(body): JsonBody<FinderAction>,
) -> ApiResult<Json<Claim>> {
    let claim = state.claims.mark_handed_off(id, body.finder_id).await?;
    state.metrics.record_transition("handed_off");
    Ok(Json(claim))
}

pub async fn confirm_receipt(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(body): JsonBody<ClaimerAction>,
) -> ApiResult<Json<Claim>> {
    let claim = state.claims.confirm_receipt(id, body.claimer_id).await?;
    state.metrics.record_transition("received");
    Ok(Json(claim))
}

pub async fn ensure_thread(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<ThreadCreated>> {
    let thread_id = state.gate.ensure_thread(id).await?;
    Ok(Json(ThreadCreated { thread_id }))
}
