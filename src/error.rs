//! Errors raised by states and the state machine.

use crate::core::ItemRejected;
use thiserror::Error;

/// Errors that can occur while registering states or running transitions.
///
/// Every variant except [`TrackingError::TransitionFatal`] guarantees that no
/// state store was mutated.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TrackingError {
    /// A state is malformed or missing at registration time.
    #[error("State validation failed: {0}")]
    StateValidation(String),

    #[error("Unknown transition: {name}")]
    UnknownTransition { name: String },

    /// An attribute mapping or validation step failed. Fix the input and retry.
    #[error("{0}")]
    TransitionValidation(String),

    /// An action is unknown or undefined on its target state.
    #[error("{0}")]
    TransitionAction(String),

    /// A commit pass failed after the gates passed. The transition may be
    /// half-committed and must be reconciled by the host.
    #[error("Fatal transition error: {0}")]
    TransitionFatal(String),
}

/// Coarse classification of a [`TrackingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StateValidation,
    TransitionValidation,
    TransitionAction,
    TransitionFatal,
}

impl TrackingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StateValidation(_) => ErrorKind::StateValidation,
            Self::UnknownTransition { .. } | Self::TransitionValidation(_) => {
                ErrorKind::TransitionValidation
            }
            Self::TransitionAction(_) => ErrorKind::TransitionAction,
            Self::TransitionFatal(_) => ErrorKind::TransitionFatal,
        }
    }

    /// Whether the error may have left a state store inconsistent.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TransitionFatal(_))
    }
}

impl From<ItemRejected> for TrackingError {
    fn from(rejected: ItemRejected) -> Self {
        Self::TransitionValidation(rejected.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_transition_is_a_validation_error() {
        let err = TrackingError::UnknownTransition {
            name: "teleport".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::TransitionValidation);
        assert_eq!(err.to_string(), "Unknown transition: teleport");
    }

    #[test]
    fn only_fatal_errors_are_fatal() {
        assert!(TrackingError::TransitionFatal("boom".into()).is_fatal());
        assert!(!TrackingError::TransitionValidation("bad".into()).is_fatal());
        assert!(!TrackingError::StateValidation("bad".into()).is_fatal());
        assert!(!TrackingError::TransitionAction("bad".into()).is_fatal());
    }

    #[test]
    fn rejected_item_converts_to_validation_error() {
        let rejected = ItemRejected {
            item_type: "Order".to_string(),
            failures: vec!["total is positive".to_string()],
        };
        let err: TrackingError = rejected.into();
        assert_eq!(err.kind(), ErrorKind::TransitionValidation);
        assert!(err.to_string().contains("total is positive"));
    }
}
