//! Two-phase validation: a gating result plus a deferred commit.

use crate::core::{Parameters, ValidationResult};
use std::fmt;
use thiserror::Error;

/// A commit pass failed after its gate had already passed.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{0}")]
pub struct CommitError(pub String);

impl CommitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

type Commit<'a> = Box<dyn FnOnce() -> Result<(), CommitError> + 'a>;

/// Outcome of the validation phase of a track or transition, holding the
/// side effect that applies it.
///
/// The gating [`ValidationResult`] decides whether the operation may go
/// ahead. The commit closure performs the store mutation and only runs when
/// [`commit`](Self::commit) is called. Dropping a `Staged` without committing
/// discards the operation, which is how dry runs leave stores untouched.
///
/// # Example
///
/// ```rust
/// use tracking_state_machine::core::ValidationResult;
/// use tracking_state_machine::state::Staged;
/// use std::cell::Cell;
///
/// let applied = Cell::new(false);
/// let staged = Staged::new(ValidationResult::success()).on_commit(|| {
///     applied.set(true);
///     Ok(())
/// });
///
/// assert!(staged.succeeded());
/// assert!(!applied.get());
/// staged.commit().unwrap();
/// assert!(applied.get());
/// ```
pub struct Staged<'a> {
    result: ValidationResult,
    commit: Option<Commit<'a>>,
}

impl<'a> Staged<'a> {
    /// Staged operation with no side effect yet attached.
    pub fn new(result: ValidationResult) -> Self {
        Self {
            result,
            commit: None,
        }
    }

    /// A rejected operation. It can never commit.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(ValidationResult::failure(message))
    }

    /// Attach the side effect applied on commit.
    ///
    /// Ignored when the gating result failed, so a rejected operation never
    /// carries an effect.
    pub fn on_commit<F>(mut self, commit: F) -> Self
    where
        F: FnOnce() -> Result<(), CommitError> + 'a,
    {
        if self.result.succeeded() {
            self.commit = Some(Box::new(commit));
        }
        self
    }

    pub fn result(&self) -> &ValidationResult {
        &self.result
    }

    pub fn succeeded(&self) -> bool {
        self.result.succeeded()
    }

    pub fn parameters(&self) -> &Parameters {
        self.result.parameters()
    }

    /// Failure message of the gate, with a fallback for results built
    /// without one.
    pub fn failure_message(&self) -> Option<String> {
        if self.succeeded() {
            None
        } else {
            Some(
                self.result
                    .message()
                    .unwrap_or("validation failed")
                    .to_string(),
            )
        }
    }

    /// Apply the side effect.
    ///
    /// Refuses to run when the gate failed.
    pub fn commit(self) -> Result<(), CommitError> {
        if let Some(message) = self.failure_message() {
            return Err(CommitError(format!(
                "cannot commit a failed validation: {message}"
            )));
        }
        match self.commit {
            Some(commit) => commit(),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Staged<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Staged")
            .field("result", &self.result)
            .field("has_commit", &self.commit.is_some())
            .finish()
    }
}
