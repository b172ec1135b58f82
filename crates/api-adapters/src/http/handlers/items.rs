use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use domains::{Item, NewItem};
use uuid::Uuid;

use crate::http::error::ApiResult;
use crate::http::extract::{JsonBody, PathParam};
use crate::http::state::AppState;

pub async fn report_item(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewItem>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let item = state.items.report_item(body).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_item(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<Item>> {
    Ok(Json(state.items.get_item(id).await?))
}
