//! Conversation endpoints. Every call goes through the access gate.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use domains::{Message, MessagePage};
use uuid::Uuid;

use crate::http::dto::{ConversationList, ListMessagesQuery, PostMessageRequest};
use crate::http::error::ApiResult;
use crate::http::extract::{JsonBody, PathParam, QueryParams};
use crate::http::state::AppState;

pub async fn post_message(
    State(state): State<AppState>,
    PathParam(thread_id): PathParam<Uuid>,
    JsonBody(body): JsonBody<PostMessageRequest>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let message = state.gate.post_message(thread_id, body.user_id, &body.text).await?;
    state.metrics.record_message();
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_messages(
    State(state): State<AppState>,
    PathParam(thread_id): PathParam<Uuid>,
    QueryParams(query): QueryParams<ListMessagesQuery>,
) -> ApiResult<Json<MessagePage>> {
    let page = state
        .history
        .list_messages(thread_id, query.user_id, query.cursor, query.limit)
        .await?;
    Ok(Json(page))
}

pub async fn list_conversations(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<Uuid>,
) -> ApiResult<Json<ConversationList>> {
    let conversations = state.gate.list_conversations_for_user(user_id).await?;
    Ok(Json(ConversationList { conversations }))
}
