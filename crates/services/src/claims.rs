//! Claim lifecycle manager.
//!
//! Loads the claim, lets the domain model decide whether the transition is
//! legal for this actor, persists it, then applies the conversation and item
//! side effects.

use std::sync::Arc;

use domains::{
    Claim, ClaimRepository, DomainError, Entity, ItemRepository, ItemStatus, Notification,
    Notifier, Result,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::conversations::ConversationGate;
use crate::notify::dispatch;

pub struct ClaimService {
    items: Arc<dyn ItemRepository>,
    claims: Arc<dyn ClaimRepository>,
    gate: Arc<ConversationGate>,
    notifier: Arc<dyn Notifier>,
}

impl ClaimService {
    pub fn new(
        items: Arc<dyn ItemRepository>,
        claims: Arc<dyn ClaimRepository>,
        gate: Arc<ConversationGate>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { items, claims, gate, notifier }
    }

    async fn load(&self, claim_id: Uuid) -> Result<Claim> {
        self.claims
            .find_by_id(claim_id)
            .await?
            .ok_or(DomainError::not_found(Entity::Claim, claim_id))
    }

    pub async fn get_claim(&self, claim_id: Uuid) -> Result<Claim> {
        self.load(claim_id).await
    }

    pub async fn list_claims_for_user(&self, user_id: Uuid) -> Result<Vec<Claim>> {
        Ok(self.claims.list_for_user(user_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn create_claim(&self, item_id: Uuid, claimer_id: Uuid) -> Result<Claim> {
        let item = self
            .items
            .find_by_id(item_id)
            .await?
            .ok_or(DomainError::not_found(Entity::Item, item_id))?;

        let claim = Claim::new(&item, claimer_id)?;
        self.claims.create(&claim).await?;
        info!(claim_id = %claim.id, finder_id = %claim.finder_id, "claim submitted");

        dispatch(
            self.notifier.as_ref(),
            claim.finder_id,
            Notification::ClaimSubmitted { claim_id: claim.id, item_id },
        )
        .await;
        Ok(claim)
    }

    #[instrument(skip(self))]
    pub async fn approve_claim(&self, claim_id: Uuid, actor: Uuid) -> Result<Claim> {
        let read = self.load(claim_id).await?;
        let mut claim = read.clone();
        claim.approve(actor)?;
        self.claims.update(&claim, &read).await?;
        info!("claim approved");

        dispatch(
            self.notifier.as_ref(),
            claim.claimer_id,
            Notification::ClaimApproved { claim_id },
        )
        .await;
        Ok(claim)
    }

    #[instrument(skip(self))]
    pub async fn deny_claim(&self, claim_id: Uuid, actor: Uuid) -> Result<Claim> {
        let read = self.load(claim_id).await?;
        let mut claim = read.clone();
        claim.deny(actor)?;
        self.claims.update(&claim, &read).await?;
        self.gate.archive_conversation(claim_id).await?;
        info!("claim denied");

        dispatch(
            self.notifier.as_ref(),
            claim.claimer_id,
            Notification::ClaimDenied { claim_id },
        )
        .await;
        Ok(claim)
    }

    #[instrument(skip(self))]
    pub async fn mark_handed_off(&self, claim_id: Uuid, actor: Uuid) -> Result<Claim> {
        let read = self.load(claim_id).await?;
        let mut claim = read.clone();
        claim.mark_handed_off(actor)?;
        self.claims.update(&claim, &read).await?;
        info!("item handed off");

        dispatch(
            self.notifier.as_ref(),
            claim.claimer_id,
            Notification::ItemHandedOff { claim_id },
        )
        .await;
        Ok(claim)
    }

    /// Completes the lifecycle: the conversation is hidden and the item is
    /// marked CLAIMED. The thread is hidden first so a claim that never had a
    /// conversation fails before the item changes. A hidden thread means the
    /// receipt was already confirmed.
    #[instrument(skip(self))]
    pub async fn confirm_receipt(&self, claim_id: Uuid, actor: Uuid) -> Result<Claim> {
        let claim = self.load(claim_id).await?;
        claim.check_receipt(actor)?;

        let thread = self.gate.thread_for_claim(claim_id).await?;
        if thread.hidden {
            return Err(DomainError::InvalidState("receipt already confirmed".into()));
        }
        self.gate.hide_thread(&thread).await?;
        self.items.update_status(claim.item_id, ItemStatus::Claimed).await?;
        info!(item_id = %claim.item_id, "receipt confirmed");

        dispatch(
            self.notifier.as_ref(),
            claim.finder_id,
            Notification::ReceiptConfirmed { claim_id, item_id: claim.item_id },
        )
        .await;
        Ok(claim)
    }
}
