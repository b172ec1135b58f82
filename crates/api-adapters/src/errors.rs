//! Domain error → HTTP status mapping.
//!
//! Kept framework-free so every web adapter maps errors the same way.

use domains::DomainError;

/// Status code for `err`.
///
/// Wrong-actor refusals on claim transitions are reported as 400 like the
/// other rejected claim operations; refusals from the conversation gate are
/// 403.
pub fn status_code(err: &DomainError) -> u16 {
    match err {
        DomainError::NotFound { .. } => 404,
        DomainError::InvalidState(_)
        | DomainError::InvalidOperation(_)
        | DomainError::Validation(_) => 400,
        DomainError::Forbidden(reason) if reason.is_conversation_gate() => 403,
        DomainError::Forbidden(_) => 400,
        DomainError::Conflict(_) => 409,
        DomainError::Storage(_) => 500,
    }
}

/// Stable machine-readable kind for the error body.
pub fn error_kind(err: &DomainError) -> &'static str {
    match err {
        DomainError::NotFound { .. } => "not_found",
        DomainError::InvalidState(_) => "invalid_state",
        DomainError::Forbidden(_) => "forbidden",
        DomainError::InvalidOperation(_) => "invalid_operation",
        DomainError::Validation(_) => "validation",
        DomainError::Conflict(_) => "conflict",
        DomainError::Storage(_) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{Entity, ForbiddenReason};
    use uuid::Uuid;

    #[test]
    fn claim_actor_refusal_is_bad_request() {
        let err = DomainError::Forbidden(ForbiddenReason::NotFinder);
        assert_eq!(status_code(&err), 400);
        assert_eq!(error_kind(&err), "forbidden");
    }

    #[test]
    fn gate_refusal_is_forbidden() {
        for reason in [
            ForbiddenReason::Archived,
            ForbiddenReason::Hidden,
            ForbiddenReason::NotParticipant,
            ForbiddenReason::Declined,
            ForbiddenReason::NotAccepted,
        ] {
            assert_eq!(status_code(&DomainError::Forbidden(reason)), 403);
        }
    }

    #[test]
    fn remaining_kinds() {
        let id = Uuid::nil();
        assert_eq!(status_code(&DomainError::not_found(Entity::Thread, id)), 404);
        assert_eq!(status_code(&DomainError::InvalidState("x".into())), 400);
        assert_eq!(status_code(&DomainError::InvalidOperation("x".into())), 400);
        assert_eq!(status_code(&DomainError::Conflict("x".into())), 409);
        assert_eq!(status_code(&DomainError::Storage("x".into())), 500);
    }
}
