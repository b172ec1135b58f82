//! Claim state machine.
//!
//! ```text
//! OPEN ──approve──▶ ACCEPTED ──handoff──▶ ACCEPTED+handed_off ──confirm──▶ (item CLAIMED)
//!   └───deny────▶ DECLINED
//! ```
//!
//! Every transition checks the actor before the state, so a stranger poking at
//! a finished claim learns "forbidden" rather than the claim's status.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, ForbiddenReason, Result};
use crate::models::item::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Open,
    Accepted,
    Declined,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Open => "OPEN",
            ClaimStatus::Accepted => "ACCEPTED",
            ClaimStatus::Declined => "DECLINED",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(ClaimStatus::Open),
            "ACCEPTED" => Ok(ClaimStatus::Accepted),
            "DECLINED" => Ok(ClaimStatus::Declined),
            other => Err(format!("unknown claim status '{other}'")),
        }
    }
}

/// A user's assertion that a found item belongs to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: Uuid,
    pub item_id: Uuid,
    pub claimer_id: Uuid,
    /// Copied from the item owner at creation; never changes.
    pub finder_id: Uuid,
    pub status: ClaimStatus,
    pub handed_off: bool,
    pub created_at: DateTime<Utc>,
}

impl Claim {
    /// Opens a claim on `item` for `claimer_id`.
    pub fn new(item: &Item, claimer_id: Uuid) -> Result<Self> {
        if item.owner_id == claimer_id {
            return Err(DomainError::InvalidOperation(
                "cannot claim an item you reported".into(),
            ));
        }
        Ok(Self {
            id: Uuid::now_v7(),
            item_id: item.id,
            claimer_id,
            finder_id: item.owner_id,
            status: ClaimStatus::Open,
            handed_off: false,
            created_at: Utc::now(),
        })
    }

    fn require_finder(&self, actor: Uuid) -> Result<()> {
        if actor != self.finder_id {
            return Err(DomainError::Forbidden(ForbiddenReason::NotFinder));
        }
        Ok(())
    }

    fn require_claimer(&self, actor: Uuid) -> Result<()> {
        if actor != self.claimer_id {
            return Err(DomainError::Forbidden(ForbiddenReason::NotClaimer));
        }
        Ok(())
    }

    fn require_open(&self) -> Result<()> {
        if self.status != ClaimStatus::Open {
            return Err(DomainError::InvalidState(format!(
                "claim is {}, expected OPEN",
                self.status
            )));
        }
        Ok(())
    }

    fn require_accepted(&self) -> Result<()> {
        if self.status != ClaimStatus::Accepted {
            return Err(DomainError::InvalidState(format!(
                "claim is {}, expected ACCEPTED",
                self.status
            )));
        }
        Ok(())
    }

    /// OPEN → ACCEPTED, finder only.
    pub fn approve(&mut self, actor: Uuid) -> Result<()> {
        self.require_finder(actor)?;
        self.require_open()?;
        self.status = ClaimStatus::Accepted;
        Ok(())
    }

    /// OPEN → DECLINED, finder only.
    pub fn deny(&mut self, actor: Uuid) -> Result<()> {
        self.require_finder(actor)?;
        self.require_open()?;
        self.status = ClaimStatus::Declined;
        Ok(())
    }

    /// Sets `handed_off`, finder only, while ACCEPTED. A second handoff is
    /// rejected so the flag flips exactly once.
    pub fn mark_handed_off(&mut self, actor: Uuid) -> Result<()> {
        self.require_finder(actor)?;
        self.require_accepted()?;
        if self.handed_off {
            return Err(DomainError::InvalidState(
                "item has already been handed off".into(),
            ));
        }
        self.handed_off = true;
        Ok(())
    }

    /// Checks that the claimer may confirm receipt. The claim row itself does
    /// not change; the side effects land on the item and the thread.
    pub fn check_receipt(&self, actor: Uuid) -> Result<()> {
        self.require_claimer(actor)?;
        self.require_accepted()?;
        if !self.handed_off {
            return Err(DomainError::InvalidState(
                "item has not been handed off yet".into(),
            ));
        }
        Ok(())
    }

    pub fn is_participant(&self, user_id: Uuid) -> bool {
        user_id == self.claimer_id || user_id == self.finder_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::item::ItemStatus;

    fn found_item(owner: Uuid) -> Item {
        Item {
            id: Uuid::now_v7(),
            title: "Blue umbrella".into(),
            description: "Left in lecture hall B".into(),
            status: ItemStatus::Found,
            owner_id: owner,
            created_at: Utc::now(),
        }
    }

    fn open_claim() -> (Claim, Uuid, Uuid) {
        let finder = Uuid::now_v7();
        let claimer = Uuid::now_v7();
        let claim = Claim::new(&found_item(finder), claimer).unwrap();
        (claim, finder, claimer)
    }

    #[test]
    fn new_claim_copies_finder_from_item() {
        let (claim, finder, claimer) = open_claim();
        assert_eq!(claim.finder_id, finder);
        assert_eq!(claim.claimer_id, claimer);
        assert_eq!(claim.status, ClaimStatus::Open);
        assert!(!claim.handed_off);
    }

    #[test]
    fn self_claim_is_invalid_operation() {
        let owner = Uuid::now_v7();
        let err = Claim::new(&found_item(owner), owner).unwrap_err();
        assert!(matches!(err, DomainError::InvalidOperation(_)));
    }

    #[test]
    fn only_finder_may_approve() {
        let (mut claim, _, claimer) = open_claim();
        assert_eq!(
            claim.approve(claimer),
            Err(DomainError::Forbidden(ForbiddenReason::NotFinder))
        );
        assert_eq!(claim.status, ClaimStatus::Open);
    }

    #[test]
    fn terminal_states_never_revert() {
        let (mut claim, finder, _) = open_claim();
        claim.approve(finder).unwrap();
        assert!(matches!(claim.deny(finder), Err(DomainError::InvalidState(_))));
        assert!(matches!(claim.approve(finder), Err(DomainError::InvalidState(_))));
        assert_eq!(claim.status, ClaimStatus::Accepted);

        let (mut declined, finder, _) = open_claim();
        declined.deny(finder).unwrap();
        assert!(matches!(declined.approve(finder), Err(DomainError::InvalidState(_))));
        assert_eq!(declined.status, ClaimStatus::Declined);
    }

    #[test]
    fn handoff_requires_acceptance_and_happens_once() {
        let (mut claim, finder, _) = open_claim();
        assert!(matches!(
            claim.mark_handed_off(finder),
            Err(DomainError::InvalidState(_))
        ));
        claim.approve(finder).unwrap();
        claim.mark_handed_off(finder).unwrap();
        assert!(claim.handed_off);
        assert!(matches!(
            claim.mark_handed_off(finder),
            Err(DomainError::InvalidState(_))
        ));
        assert!(claim.handed_off);
    }

    #[test]
    fn actor_is_checked_before_state() {
        let (mut claim, finder, claimer) = open_claim();
        claim.deny(finder).unwrap();
        let stranger = Uuid::now_v7();
        assert_eq!(
            claim.approve(stranger),
            Err(DomainError::Forbidden(ForbiddenReason::NotFinder))
        );
        assert_eq!(
            claim.check_receipt(finder),
            Err(DomainError::Forbidden(ForbiddenReason::NotClaimer))
        );
        assert!(matches!(
            claim.check_receipt(claimer),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn receipt_needs_handoff() {
        let (mut claim, finder, claimer) = open_claim();
        claim.approve(finder).unwrap();
        assert!(matches!(
            claim.check_receipt(claimer),
            Err(DomainError::InvalidState(_))
        ));
        claim.mark_handed_off(finder).unwrap();
        assert!(claim.check_receipt(claimer).is_ok());
    }

    #[test]
    fn status_serializes_upper_case() {
        let json = serde_json::to_string(&ClaimStatus::Accepted).unwrap();
        assert_eq!(json, "\"ACCEPTED\"");
        assert_eq!("DECLINED".parse::<ClaimStatus>(), Ok(ClaimStatus::Declined));
    }
}
