//! Conversation threads and the access rules derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, ForbiddenReason, Result};
use crate::models::claim::{Claim, ClaimStatus};

/// The private channel tied 1:1 to an accepted claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: Uuid,
    /// Unique: at most one thread per claim.
    pub claim_id: Uuid,
    pub claimer_id: Uuid,
    pub finder_id: Uuid,
    /// Set when the claim is declined. Never cleared.
    pub archived: bool,
    /// Set when receipt is confirmed. Never cleared.
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
}

impl Thread {
    /// Opens a fresh thread for `claim`, copying its participants.
    pub fn open(claim: &Claim) -> Self {
        Self {
            id: Uuid::now_v7(),
            claim_id: claim.id,
            claimer_id: claim.claimer_id,
            finder_id: claim.finder_id,
            archived: false,
            hidden: false,
            created_at: Utc::now(),
        }
    }

    pub fn is_participant(&self, user_id: Uuid) -> bool {
        user_id == self.claimer_id || user_id == self.finder_id
    }

    pub fn is_active(&self) -> bool {
        !self.archived && !self.hidden
    }

    /// Thread-local half of the access check.
    ///
    /// Structural flags are reported before participation so an outsider
    /// cannot tell from the error whether they guessed a participant.
    pub fn check_visible_to(&self, user_id: Uuid) -> Result<()> {
        if self.archived {
            return Err(DomainError::Forbidden(ForbiddenReason::Archived));
        }
        if self.hidden {
            return Err(DomainError::Forbidden(ForbiddenReason::Hidden));
        }
        if !self.is_participant(user_id) {
            return Err(DomainError::Forbidden(ForbiddenReason::NotParticipant));
        }
        Ok(())
    }
}

/// Claim-side half of the access check: the conversation is only live while
/// the claim is ACCEPTED.
pub fn check_claim_allows_conversation(claim: &Claim) -> Result<()> {
    match claim.status {
        ClaimStatus::Accepted => Ok(()),
        ClaimStatus::Declined => Err(DomainError::Forbidden(ForbiddenReason::Declined)),
        ClaimStatus::Open => Err(DomainError::Forbidden(ForbiddenReason::NotAccepted)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thread() -> Thread {
        Thread {
            id: Uuid::now_v7(),
            claim_id: Uuid::now_v7(),
            claimer_id: Uuid::now_v7(),
            finder_id: Uuid::now_v7(),
            archived: false,
            hidden: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn participants_pass() {
        let t = thread();
        assert!(t.check_visible_to(t.claimer_id).is_ok());
        assert!(t.check_visible_to(t.finder_id).is_ok());
    }

    #[test]
    fn outsider_is_refused_in_every_state() {
        let outsider = Uuid::now_v7();
        for (archived, hidden) in [(false, false), (true, false), (false, true), (true, true)] {
            let t = Thread { archived, hidden, ..thread() };
            assert!(matches!(
                t.check_visible_to(outsider),
                Err(DomainError::Forbidden(_))
            ));
        }
    }

    #[test]
    fn archived_is_reported_before_participation() {
        let t = Thread { archived: true, hidden: true, ..thread() };
        assert_eq!(
            t.check_visible_to(Uuid::now_v7()),
            Err(DomainError::Forbidden(ForbiddenReason::Archived))
        );
        let t = Thread { hidden: true, ..thread() };
        assert_eq!(
            t.check_visible_to(Uuid::now_v7()),
            Err(DomainError::Forbidden(ForbiddenReason::Hidden))
        );
    }
}
