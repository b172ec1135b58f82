//! # axum adapter
//!
//! Routes are mounted under `/api/v1`; `/health` and `/metrics` sit at the
//! root for probes and scrapers.

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

use axum::routing::{get, patch, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use handlers::{claims, conversations, items, system};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/items", post(items::report_item))
        .route("/items/{id}", get(items::get_item))
        .route("/claims", post(claims::create_claim))
        .route("/claims/{id}", get(claims::get_claim))
        .route("/claims/{id}/approve", patch(claims::approve_claim))
        .route("/claims/{id}/deny", patch(claims::deny_claim))
        .route("/claims/{id}/handoff", patch(claims::handoff))
        .route("/claims/{id}/confirm-receipt", patch(claims::confirm_receipt))
        .route("/claims/{id}/thread", post(claims::ensure_thread))
        .route(
            "/threads/{id}/messages",
            post(conversations::post_message).get(conversations::list_messages),
        )
        .route("/users/{user_id}/claims", get(claims::list_user_claims))
        .route("/users/{user_id}/conversations", get(conversations::list_conversations))
}

/// The full application router with tracing, request ids, and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        .route("/health", get(system::health))
        .route("/metrics", get(system::metrics))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
