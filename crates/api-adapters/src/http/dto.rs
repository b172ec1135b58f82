//! Request and response bodies.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateClaimRequest {
    pub item_id: Uuid,
    pub claimer_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct FinderAction {
    pub finder_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ClaimerAction {
    pub claimer_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThreadCreated {
    pub thread_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub user_id: Uuid,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    pub user_id: Uuid,
    pub cursor: Option<Uuid>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ConversationList {
    pub conversations: Vec<domains::Conversation>,
}
