//! # In-memory store
//!
//! DashMap-backed implementation of every repository port. Used by the test
//! suites and by binaries built without a database feature. Enforces the same
//! one-thread-per-claim uniqueness the Postgres schema does.

use std::cmp::Reverse;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{
    Claim, ClaimRepository, Entity, Item, ItemRepository, ItemStatus, Message, MessageRepository,
    RepoError, RepoResult, Thread, ThreadRepository,
};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryStore {
    items: DashMap<Uuid, Item>,
    claims: DashMap<Uuid, Claim>,
    threads: DashMap<Uuid, Thread>,
    /// claim_id -> thread_id
    threads_by_claim: DashMap<Uuid, Uuid>,
    /// thread_id -> messages in insertion order
    messages: DashMap<Uuid, Vec<Message>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for InMemoryStore {
    async fn create(&self, item: &Item) -> RepoResult<()> {
        match self.items.entry(item.id) {
            Entry::Occupied(_) => Err(RepoError::Conflict(format!("item {} exists", item.id))),
            Entry::Vacant(slot) => {
                slot.insert(item.clone());
                Ok(())
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Item>> {
        Ok(self.items.get(&id).map(|r| r.value().clone()))
    }

    async fn update_status(&self, id: Uuid, status: ItemStatus) -> RepoResult<()> {
        let mut item = self
            .items
            .get_mut(&id)
            .ok_or(RepoError::NotFound { entity: Entity::Item, id })?;
        item.status = status;
        Ok(())
    }
}

#[async_trait]
impl ClaimRepository for InMemoryStore {
    async fn create(&self, claim: &Claim) -> RepoResult<()> {
        match self.claims.entry(claim.id) {
            Entry::Occupied(_) => Err(RepoError::Conflict(format!("claim {} exists", claim.id))),
            Entry::Vacant(slot) => {
                slot.insert(claim.clone());
                Ok(())
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Claim>> {
        Ok(self.claims.get(&id).map(|r| r.value().clone()))
    }

    async fn update(&self, claim: &Claim, read: &Claim) -> RepoResult<()> {
        let mut stored = self
            .claims
            .get_mut(&claim.id)
            .ok_or(RepoError::NotFound { entity: Entity::Claim, id: claim.id })?;
        if stored.status != read.status || stored.handed_off != read.handed_off {
            return Err(RepoError::Conflict(format!("claim {} changed concurrently", claim.id)));
        }
        stored.status = claim.status;
        stored.handed_off = claim.handed_off;
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Claim>> {
        let mut claims: Vec<Claim> = self
            .claims
            .iter()
            .filter(|r| r.claimer_id == user_id || r.finder_id == user_id)
            .map(|r| r.value().clone())
            .collect();
        claims.sort_by_key(|c| Reverse((c.created_at, c.id)));
        Ok(claims)
    }
}

#[async_trait]
impl ThreadRepository for InMemoryStore {
    async fn create(&self, thread: &Thread) -> RepoResult<()> {
        match self.threads_by_claim.entry(thread.claim_id) {
            Entry::Occupied(_) => Err(RepoError::Conflict(format!(
                "thread for claim {} exists",
                thread.claim_id
            ))),
            Entry::Vacant(slot) => {
                self.threads.insert(thread.id, thread.clone());
                slot.insert(thread.id);
                Ok(())
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Thread>> {
        Ok(self.threads.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_claim(&self, claim_id: Uuid) -> RepoResult<Option<Thread>> {
        let thread_id = match self.threads_by_claim.get(&claim_id) {
            Some(r) => *r.value(),
            None => return Ok(None),
        };
        Ok(self.threads.get(&thread_id).map(|r| r.value().clone()))
    }

    async fn set_archived(&self, id: Uuid) -> RepoResult<()> {
        let mut thread = self
            .threads
            .get_mut(&id)
            .ok_or(RepoError::NotFound { entity: Entity::Thread, id })?;
        thread.archived = true;
        Ok(())
    }

    async fn set_hidden(&self, id: Uuid) -> RepoResult<()> {
        let mut thread = self
            .threads
            .get_mut(&id)
            .ok_or(RepoError::NotFound { entity: Entity::Thread, id })?;
        thread.hidden = true;
        Ok(())
    }

    async fn list_active_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Thread>> {
        let mut threads: Vec<Thread> = self
            .threads
            .iter()
            .filter(|r| r.is_active() && r.is_participant(user_id))
            .map(|r| r.value().clone())
            .collect();
        threads.sort_by_key(|t| Reverse((t.created_at, t.id)));
        Ok(threads)
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.messages
            .entry(message.thread_id)
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn list_before(
        &self,
        thread_id: Uuid,
        before: Option<Uuid>,
        limit: usize,
    ) -> RepoResult<Vec<Message>> {
        let mut rows: Vec<Message> = match self.messages.get(&thread_id) {
            Some(r) => r
                .iter()
                .filter(|m| before.map_or(true, |cursor| m.id < cursor))
                .cloned()
                .collect(),
            None => return Ok(Vec::new()),
        };
        rows.sort_by_key(|m| Reverse((m.created_at, m.id)));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn latest(&self, thread_id: Uuid) -> RepoResult<Option<Message>> {
        Ok(self.messages.get(&thread_id).and_then(|r| {
            r.iter().max_by_key(|m| (m.created_at, m.id)).cloned()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::ClaimStatus;

    fn accepted_claim() -> Claim {
        Claim {
            id: Uuid::now_v7(),
            item_id: Uuid::now_v7(),
            claimer_id: Uuid::now_v7(),
            finder_id: Uuid::now_v7(),
            status: ClaimStatus::Accepted,
            handed_off: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn second_thread_for_claim_conflicts() {
        let store = InMemoryStore::new();
        let claim = accepted_claim();
        let first = Thread::open(&claim);
        let second = Thread::open(&claim);

        ThreadRepository::create(&store, &first).await.unwrap();
        let err = ThreadRepository::create(&store, &second).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));

        let found = store.find_by_claim(claim.id).await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn update_of_unknown_claim_is_not_found() {
        let store = InMemoryStore::new();
        let claim = accepted_claim();
        let err = store.update(&claim, &claim).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound { entity: Entity::Claim, .. }));
    }

    #[tokio::test]
    async fn update_from_stale_read_conflicts() {
        let store = InMemoryStore::new();
        let read = Claim { status: ClaimStatus::Open, ..accepted_claim() };
        ClaimRepository::create(&store, &read).await.unwrap();

        let approved = Claim { status: ClaimStatus::Accepted, ..read.clone() };
        store.update(&approved, &read).await.unwrap();

        let declined = Claim { status: ClaimStatus::Declined, ..read.clone() };
        let err = store.update(&declined, &read).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));

        let stored = ClaimRepository::find_by_id(&store, read.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ClaimStatus::Accepted);
    }

    #[tokio::test]
    async fn inactive_threads_are_not_listed() {
        let store = InMemoryStore::new();
        let live = accepted_claim();
        let mut retired = accepted_claim();
        retired.claimer_id = live.claimer_id;

        let live_thread = Thread::open(&live);
        let retired_thread = Thread::open(&retired);
        ThreadRepository::create(&store, &live_thread).await.unwrap();
        ThreadRepository::create(&store, &retired_thread).await.unwrap();
        store.set_hidden(retired_thread.id).await.unwrap();

        let listed = store.list_active_for_user(live.claimer_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, live_thread.id);
    }

    #[tokio::test]
    async fn list_before_is_newest_first_and_bounded() {
        let store = InMemoryStore::new();
        let thread_id = Uuid::now_v7();
        let user = Uuid::now_v7();
        let sent: Vec<Message> = (0..5)
            .map(|i| Message::new(thread_id, user, format!("m{i}")))
            .collect();
        for m in &sent {
            MessageRepository::create(&store, m).await.unwrap();
        }

        let page = store.list_before(thread_id, Some(sent[3].id), 2).await.unwrap();
        let ids: Vec<Uuid> = page.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![sent[2].id, sent[1].id]);

        let latest = store.latest(thread_id).await.unwrap().unwrap();
        assert_eq!(latest.id, sent[4].id);
    }
}
