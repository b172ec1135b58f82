//! Thread access gate.
//!
//! Every read or write on a conversation goes through [`ConversationGate`].
//! Accessibility is derived from the stored claim and thread rows and the
//! caller's user id, never from anything the caller asserts.

use std::sync::Arc;

use domains::{
    check_claim_allows_conversation, ClaimRepository, ClaimStatus, Conversation, DomainError,
    Entity, Message, MessageRepository, Notification, Notifier, Result, Thread, ThreadRepository,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::notify::dispatch;

/// Size limits for message traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageLimits {
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub max_text_len: usize,
}

impl Default for MessageLimits {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 100,
            max_text_len: 2000,
        }
    }
}

pub struct ConversationGate {
    claims: Arc<dyn ClaimRepository>,
    threads: Arc<dyn ThreadRepository>,
    messages: Arc<dyn MessageRepository>,
    notifier: Arc<dyn Notifier>,
    limits: MessageLimits,
}

impl ConversationGate {
    pub fn new(
        claims: Arc<dyn ClaimRepository>,
        threads: Arc<dyn ThreadRepository>,
        messages: Arc<dyn MessageRepository>,
        notifier: Arc<dyn Notifier>,
        limits: MessageLimits,
    ) -> Self {
        Self { claims, threads, messages, notifier, limits }
    }

    pub fn limits(&self) -> MessageLimits {
        self.limits
    }

    /// Returns the claim's thread id, creating the thread on first call.
    ///
    /// Check-then-create is not atomic. Two concurrent callers can both miss
    /// the lookup; the repository's claim-id uniqueness rejects the second
    /// insert and that `Conflict` is returned as-is.
    #[instrument(skip(self))]
    pub async fn ensure_thread(&self, claim_id: Uuid) -> Result<Uuid> {
        let claim = self
            .claims
            .find_by_id(claim_id)
            .await?
            .ok_or(DomainError::not_found(Entity::Claim, claim_id))?;

        if claim.status != ClaimStatus::Accepted {
            return Err(DomainError::InvalidState(format!(
                "claim is {}, a conversation needs an ACCEPTED claim",
                claim.status
            )));
        }

        if let Some(existing) = self.threads.find_by_claim(claim_id).await? {
            return Ok(existing.id);
        }

        let thread = Thread::open(&claim);
        self.threads.create(&thread).await?;
        info!(thread_id = %thread.id, "conversation opened");
        Ok(thread.id)
    }

    /// Returns the thread when `user_id` may read and post in it.
    ///
    /// Check order: thread exists, not archived, not hidden, user is a
    /// participant, claim exists, claim not declined, claim accepted.
    #[instrument(skip(self))]
    pub async fn verify_access(&self, thread_id: Uuid, user_id: Uuid) -> Result<Thread> {
        let thread = self
            .threads
            .find_by_id(thread_id)
            .await?
            .ok_or(DomainError::not_found(Entity::Thread, thread_id))?;

        if let Err(err) = thread.check_visible_to(user_id) {
            debug!(error = %err, "conversation access denied");
            return Err(err);
        }

        let claim = self
            .claims
            .find_by_id(thread.claim_id)
            .await?
            .ok_or(DomainError::not_found(Entity::Claim, thread.claim_id))?;

        if let Err(err) = check_claim_allows_conversation(&claim) {
            debug!(error = %err, "conversation access denied");
            return Err(err);
        }

        Ok(thread)
    }

    /// Marks the claim's thread archived. Declining before any thread exists
    /// is the common case and succeeds without doing anything.
    #[instrument(skip(self))]
    pub async fn archive_conversation(&self, claim_id: Uuid) -> Result<()> {
        match self.threads.find_by_claim(claim_id).await? {
            Some(thread) => {
                self.threads.set_archived(thread.id).await?;
                info!(thread_id = %thread.id, "conversation archived");
            }
            None => debug!("no conversation to archive"),
        }
        Ok(())
    }

    /// The claim's thread. `NotFound` carries the claim id.
    pub async fn thread_for_claim(&self, claim_id: Uuid) -> Result<Thread> {
        self.threads
            .find_by_claim(claim_id)
            .await?
            .ok_or(DomainError::not_found(Entity::Thread, claim_id))
    }

    /// Marks the claim's thread hidden. A completed lifecycle always had a
    /// thread, so a missing one is reported as `NotFound`.
    #[instrument(skip(self))]
    pub async fn hide_conversation(&self, claim_id: Uuid) -> Result<()> {
        let thread = self.thread_for_claim(claim_id).await?;
        self.hide_thread(&thread).await
    }

    pub(crate) async fn hide_thread(&self, thread: &Thread) -> Result<()> {
        self.threads.set_hidden(thread.id).await?;
        info!(thread_id = %thread.id, "conversation hidden");
        Ok(())
    }

    #[instrument(skip(self, text))]
    pub async fn post_message(&self, thread_id: Uuid, user_id: Uuid, text: &str) -> Result<Message> {
        let thread = self.verify_access(thread_id, user_id).await?;

        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::Validation("message text is empty".into()));
        }
        if text.chars().count() > self.limits.max_text_len {
            return Err(DomainError::Validation(format!(
                "message text exceeds {} characters",
                self.limits.max_text_len
            )));
        }

        let message = Message::new(thread.id, user_id, text.to_string());
        self.messages.create(&message).await?;

        let recipient = if user_id == thread.claimer_id {
            thread.finder_id
        } else {
            thread.claimer_id
        };
        dispatch(
            self.notifier.as_ref(),
            recipient,
            Notification::MessagePosted { thread_id: thread.id, message_id: message.id },
        )
        .await;

        Ok(message)
    }

    /// The user's live conversations with their latest message, newest thread
    /// first.
    #[instrument(skip(self))]
    pub async fn list_conversations_for_user(&self, user_id: Uuid) -> Result<Vec<Conversation>> {
        let threads = self.threads.list_active_for_user(user_id).await?;
        let mut conversations = Vec::with_capacity(threads.len());
        for thread in threads {
            let last_message = self.messages.latest(thread.id).await?;
            conversations.push(Conversation { thread, last_message });
        }
        Ok(conversations)
    }
}
