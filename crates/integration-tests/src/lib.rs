//! Shared fixtures for the integration suites.
//!
//! Everything runs against `InMemoryStore`; notifications are captured by
//! `RecordingNotifier` so tests can assert who was told what.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domains::{Claim, DispatchError, Item, ItemStatus, NewItem, Notification, Notifier};
use services::{ClaimService, ConversationGate, ItemService, MessageHistory, MessageLimits};
use storage_adapters::InMemoryStore;
use uuid::Uuid;

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(Uuid, Notification)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(Uuid, Notification)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, recipient: Uuid, notification: Notification) -> Result<(), DispatchError> {
        self.sent
            .lock()
            .map_err(|e| DispatchError(e.to_string()))?
            .push((recipient, notification));
        Ok(())
    }
}

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub limits: MessageLimits,
    pub items: ItemService,
    pub claims: ClaimService,
    pub gate: Arc<ConversationGate>,
    pub history: MessageHistory,
}

/// An accepted claim with its conversation already open.
pub struct OpenConversation {
    pub item: Item,
    pub claim: Claim,
    pub thread_id: Uuid,
    pub finder: Uuid,
    pub claimer: Uuid,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_limits(MessageLimits::default())
    }

    pub fn with_limits(limits: MessageLimits) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let gate = Arc::new(ConversationGate::new(
            store.clone(),
            store.clone(),
            store.clone(),
            notifier.clone(),
            limits,
        ));
        Self {
            items: ItemService::new(store.clone()),
            claims: ClaimService::new(store.clone(), store.clone(), gate.clone(), notifier.clone()),
            history: MessageHistory::new(gate.clone(), store.clone()),
            gate,
            store,
            notifier,
            limits,
        }
    }

    pub async fn found_item(&self, finder: Uuid) -> Item {
        self.items
            .report_item(NewItem {
                title: "Student ID card".into(),
                description: "Found near the cafeteria".into(),
                status: ItemStatus::Found,
                owner_id: finder,
            })
            .await
            .expect("report item")
    }

    pub async fn open_conversation(&self) -> OpenConversation {
        let finder = Uuid::now_v7();
        let claimer = Uuid::now_v7();
        let item = self.found_item(finder).await;
        let claim = self.claims.create_claim(item.id, claimer).await.expect("create claim");
        let claim = self.claims.approve_claim(claim.id, finder).await.expect("approve");
        let thread_id = self.gate.ensure_thread(claim.id).await.expect("ensure thread");
        OpenConversation { item, claim, thread_id, finder, claimer }
    }

    /// A router over the same store, for HTTP-level tests.
    #[cfg(feature = "web-axum")]
    pub fn router(&self) -> axum::Router {
        let state = api_adapters::http::AppState::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.notifier.clone(),
            self.limits,
        );
        api_adapters::http::router(state)
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "web-axum")]
pub mod http {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    /// Sends one request and decodes the JSON body (`Value::Null` when empty).
    pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = app.clone().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
