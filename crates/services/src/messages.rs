//! Message history pagination.
//!
//! Pages are fetched newest-first and returned oldest-first. The cursor is the
//! id of the oldest message in the page, taken before the page is reversed.

use std::sync::Arc;

use domains::{DomainError, Message, MessagePage, MessageRepository, Result};
use tracing::instrument;
use uuid::Uuid;

use crate::conversations::ConversationGate;

pub struct MessageHistory {
    gate: Arc<ConversationGate>,
    messages: Arc<dyn MessageRepository>,
}

impl MessageHistory {
    pub fn new(gate: Arc<ConversationGate>, messages: Arc<dyn MessageRepository>) -> Self {
        Self { gate, messages }
    }

    /// One page of `thread_id`'s history older than `cursor`.
    ///
    /// `limit` defaults to the configured page size and is capped at the
    /// configured maximum; zero is rejected.
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        thread_id: Uuid,
        user_id: Uuid,
        cursor: Option<Uuid>,
        limit: Option<usize>,
    ) -> Result<MessagePage> {
        self.gate.verify_access(thread_id, user_id).await?;

        let limits = self.gate.limits();
        let limit = match limit {
            Some(0) => return Err(DomainError::Validation("limit must be at least 1".into())),
            Some(n) => n.min(limits.max_page_size),
            None => limits.default_page_size,
        };

        let rows = self.messages.list_before(thread_id, cursor, limit + 1).await?;
        Ok(split_page(rows, limit))
    }
}

/// Turns up to `limit + 1` newest-first rows into a chronological page.
pub fn split_page(mut rows: Vec<Message>, limit: usize) -> MessagePage {
    let next_cursor = if rows.len() > limit {
        rows.truncate(limit);
        rows.last().map(|m| m.id)
    } else {
        None
    };
    rows.reverse();
    MessagePage { messages: rows, next_cursor }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: usize) -> Vec<Message> {
        let thread = Uuid::now_v7();
        let user = Uuid::now_v7();
        (1..=n).map(|i| Message::new(thread, user, format!("M{i}"))).collect()
    }

    fn newest_first(all: &[Message], before: Option<Uuid>, take: usize) -> Vec<Message> {
        all.iter()
            .rev()
            .filter(|m| before.map_or(true, |c| m.id < c))
            .take(take)
            .cloned()
            .collect()
    }

    fn texts(page: &MessagePage) -> Vec<&str> {
        page.messages.iter().map(|m| m.text.as_str()).collect()
    }

    #[test]
    fn walks_backwards_through_ten_messages() {
        let all = history(10);
        let limit = 3;

        let first = split_page(newest_first(&all, None, limit + 1), limit);
        assert_eq!(texts(&first), ["M8", "M9", "M10"]);
        assert_eq!(first.next_cursor, Some(all[7].id));

        let second = split_page(newest_first(&all, first.next_cursor, limit + 1), limit);
        assert_eq!(texts(&second), ["M5", "M6", "M7"]);
        assert_eq!(second.next_cursor, Some(all[4].id));

        let third = split_page(newest_first(&all, second.next_cursor, limit + 1), limit);
        assert_eq!(texts(&third), ["M2", "M3", "M4"]);
        assert_eq!(third.next_cursor, Some(all[1].id));

        let last = split_page(newest_first(&all, third.next_cursor, limit + 1), limit);
        assert_eq!(texts(&last), ["M1"]);
        assert_eq!(last.next_cursor, None);
    }

    #[test]
    fn exact_fit_has_no_cursor() {
        let all = history(3);
        let page = split_page(newest_first(&all, None, 4), 3);
        assert_eq!(texts(&page), ["M1", "M2", "M3"]);
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn empty_thread() {
        let page = split_page(Vec::new(), 50);
        assert!(page.messages.is_empty());
        assert_eq!(page.next_cursor, None);
    }
}
