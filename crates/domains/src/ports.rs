//! # Ports
//!
//! Any adapter must implement these traits to be wired into the binary.
//! Repositories report absence through `Option` on reads and
//! `RepoError::NotFound` on updates.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::errors::RepoError;
use crate::models::{Claim, Item, ItemStatus, Message, Thread};

pub type RepoResult<T> = std::result::Result<T, RepoError>;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn create(&self, item: &Item) -> RepoResult<()>;
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Item>>;
    async fn update_status(&self, id: Uuid, status: ItemStatus) -> RepoResult<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ClaimRepository: Send + Sync {
    async fn create(&self, claim: &Claim) -> RepoResult<()>;
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Claim>>;
    /// Persists `status` and `handed_off` only if the stored row still matches
    /// `read` on those columns; otherwise `RepoError::Conflict`. The other
    /// columns are immutable.
    async fn update(&self, claim: &Claim, read: &Claim) -> RepoResult<()>;
    /// Claims where the user is claimer or finder, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Claim>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    /// Must fail with `RepoError::Conflict` when a thread for the same claim
    /// already exists.
    async fn create(&self, thread: &Thread) -> RepoResult<()>;
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Thread>>;
    async fn find_by_claim(&self, claim_id: Uuid) -> RepoResult<Option<Thread>>;
    async fn set_archived(&self, id: Uuid) -> RepoResult<()>;
    async fn set_hidden(&self, id: Uuid) -> RepoResult<()>;
    /// Non-archived, non-hidden threads the user takes part in, newest first.
    async fn list_active_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Thread>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &Message) -> RepoResult<()>;
    /// Up to `limit` messages of the thread ordered by `(created_at, id)`
    /// descending, restricted to ids strictly below `before` when given.
    async fn list_before(
        &self,
        thread_id: Uuid,
        before: Option<Uuid>,
        limit: usize,
    ) -> RepoResult<Vec<Message>>;
    async fn latest(&self, thread_id: Uuid) -> RepoResult<Option<Message>>;
}

/// Lifecycle events pushed to the counter-party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    ClaimSubmitted { claim_id: Uuid, item_id: Uuid },
    ClaimApproved { claim_id: Uuid },
    ClaimDenied { claim_id: Uuid },
    ItemHandedOff { claim_id: Uuid },
    ReceiptConfirmed { claim_id: Uuid, item_id: Uuid },
    MessagePosted { thread_id: Uuid, message_id: Uuid },
}

#[derive(Error, Debug)]
#[error("notification dispatch failed: {0}")]
pub struct DispatchError(pub String);

/// Push gateway. Delivery is best-effort; callers log and move on.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        recipient: Uuid,
        notification: Notification,
    ) -> std::result::Result<(), DispatchError>;
}
