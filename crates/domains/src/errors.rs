//! # Domain errors
//!
//! Centralized error handling for Reclaim.
//! Every failure the core can produce is a variant here, so the request layer
//! switches on the kind instead of inspecting message text.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// The entity a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Item,
    Claim,
    Thread,
    Message,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Item => "item",
            Entity::Claim => "claim",
            Entity::Thread => "thread",
            Entity::Message => "message",
        };
        f.write_str(name)
    }
}

/// Why an actor was refused.
///
/// The first two come from the claim lifecycle (wrong actor for the
/// transition); the rest come from the thread access gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    /// Only the finder may approve, deny, or hand off.
    NotFinder,
    /// Only the claimer may confirm receipt.
    NotClaimer,
    Archived,
    Hidden,
    NotParticipant,
    Declined,
    NotAccepted,
}

impl ForbiddenReason {
    /// `true` for reasons produced by the conversation gate rather than by a
    /// claim transition.
    pub fn is_conversation_gate(&self) -> bool {
        !matches!(self, ForbiddenReason::NotFinder | ForbiddenReason::NotClaimer)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ForbiddenReason::NotFinder => "not_finder",
            ForbiddenReason::NotClaimer => "not_claimer",
            ForbiddenReason::Archived => "archived",
            ForbiddenReason::Hidden => "hidden",
            ForbiddenReason::NotParticipant => "not_participant",
            ForbiddenReason::Declined => "declined",
            ForbiddenReason::NotAccepted => "not_accepted",
        }
    }
}

impl fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ForbiddenReason::NotFinder => "only the finder may perform this action",
            ForbiddenReason::NotClaimer => "only the claimer may perform this action",
            ForbiddenReason::Archived => "conversation is archived",
            ForbiddenReason::Hidden => "conversation is hidden",
            ForbiddenReason::NotParticipant => "user is not a participant in this conversation",
            ForbiddenReason::Declined => "claim was declined",
            ForbiddenReason::NotAccepted => "claim has not been accepted",
        };
        f.write_str(msg)
    }
}

/// The primary error type for all core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Entity absent.
    #[error("{entity} not found with ID {id}")]
    NotFound { entity: Entity, id: Uuid },

    /// Operation illegal for the current lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Actor lacks the required relationship to the entity.
    #[error("forbidden: {0}")]
    Forbidden(ForbiddenReason),

    /// Structurally disallowed request (e.g. claiming your own item).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Malformed input (empty message text, out-of-range page size).
    #[error("validation error: {0}")]
    Validation(String),

    /// Uniqueness constraint rejected a write (concurrent thread creation).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Persistence backend failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: Entity, id: Uuid) -> Self {
        DomainError::NotFound { entity, id }
    }
}

/// Failures reported by repository adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// An update targeted a row that does not exist.
    #[error("{entity} not found with ID {id}")]
    NotFound { entity: Entity, id: Uuid },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("backend: {0}")]
    Backend(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity, id } => DomainError::NotFound { entity, id },
            RepoError::Conflict(msg) => DomainError::Conflict(msg),
            RepoError::Backend(msg) => DomainError::Storage(msg),
        }
    }
}

/// A specialized Result type for Reclaim logic.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_errors_keep_their_kind() {
        let id = Uuid::now_v7();
        assert_eq!(
            DomainError::from(RepoError::NotFound { entity: Entity::Thread, id }),
            DomainError::NotFound { entity: Entity::Thread, id }
        );
        assert!(matches!(
            DomainError::from(RepoError::Conflict("dup".into())),
            DomainError::Conflict(_)
        ));
        assert!(matches!(
            DomainError::from(RepoError::Backend("down".into())),
            DomainError::Storage(_)
        ));
    }

    #[test]
    fn gate_reasons_are_distinguished_from_actor_reasons() {
        assert!(!ForbiddenReason::NotFinder.is_conversation_gate());
        assert!(!ForbiddenReason::NotClaimer.is_conversation_gate());
        assert!(ForbiddenReason::Archived.is_conversation_gate());
        assert!(ForbiddenReason::NotParticipant.is_conversation_gate());
    }

    #[test]
    fn not_found_message_names_entity() {
        let id = Uuid::nil();
        let err = DomainError::not_found(Entity::Claim, id);
        assert_eq!(err.to_string(), format!("claim not found with ID {id}"));
    }
}
