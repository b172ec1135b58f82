use std::sync::Arc;

use domains::{ClaimRepository, ItemRepository, MessageRepository, Notifier, ThreadRepository};
use services::{ClaimService, ConversationGate, ItemService, MessageHistory, MessageLimits};

use crate::metrics::Metrics;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub items: Arc<ItemService>,
    pub claims: Arc<ClaimService>,
    pub gate: Arc<ConversationGate>,
    pub history: Arc<MessageHistory>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wires the services over the given adapters.
    pub fn new(
        items: Arc<dyn ItemRepository>,
        claims: Arc<dyn ClaimRepository>,
        threads: Arc<dyn ThreadRepository>,
        messages: Arc<dyn MessageRepository>,
        notifier: Arc<dyn Notifier>,
        limits: MessageLimits,
    ) -> Self {
        let gate = Arc::new(ConversationGate::new(
            claims.clone(),
            threads,
            messages.clone(),
            notifier.clone(),
            limits,
        ));
        Self {
            items: Arc::new(ItemService::new(items.clone())),
            claims: Arc::new(ClaimService::new(items, claims, gate.clone(), notifier)),
            history: Arc::new(MessageHistory::new(gate.clone(), messages)),
            gate,
            metrics: Arc::new(Metrics::new()),
        }
    }
}
