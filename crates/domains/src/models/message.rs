use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::thread::Thread;

/// An immutable chat line inside a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// UUID v7; doubles as the pagination cursor.
    pub id: Uuid,
    pub thread_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(thread_id: Uuid, user_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            thread_id,
            user_id,
            text,
            created_at: Utc::now(),
        }
    }
}

/// One page of history, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    /// Id of the oldest message in this page when older ones remain.
    pub next_cursor: Option<Uuid>,
}

/// A thread as shown in a user's inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(flatten)]
    pub thread: Thread,
    pub last_message: Option<Message>,
}
