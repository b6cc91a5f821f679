//! Named transition and action handlers registered on a state.

use super::staged::Staged;
use crate::core::{Item, Parameters};
use crate::error::TrackingError;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Source-side logic of a transition. Validates the item leaving the state
/// and stages its removal.
pub type TransitionHandler<S> = for<'a> fn(&'a S, Item) -> Staged<'a>;

/// Operation scoped to one state, run outside of any transition.
pub type ActionHandler<S> = fn(&S, Parameters) -> Result<Value, TrackingError>;

/// Table of the transitions and actions a state defines, keyed by name.
///
/// Built once when the state is constructed; the machine checks it when
/// transitions and actions are registered.
///
/// # Example
///
/// ```rust
/// use tracking_state_machine::core::{Item, Parameters, ValidationResult};
/// use tracking_state_machine::state::{Handlers, Staged};
/// use tracking_state_machine::TrackingError;
/// use serde_json::{json, Value};
///
/// struct Queue;
///
/// fn start(_queue: &Queue, _item: Item) -> Staged<'_> {
///     Staged::new(ValidationResult::success())
/// }
///
/// fn size(_queue: &Queue, _args: Parameters) -> Result<Value, TrackingError> {
///     Ok(json!(0))
/// }
///
/// let handlers = Handlers::<Queue>::new()
///     .transition("start", start)
///     .action("size", size);
///
/// assert!(handlers.has_transition("start"));
/// assert!(handlers.has_action("size"));
/// assert!(!handlers.has_action("start"));
/// ```
pub struct Handlers<S> {
    transitions: HashMap<String, TransitionHandler<S>>,
    actions: HashMap<String, ActionHandler<S>>,
}

impl<S> Handlers<S> {
    pub fn new() -> Self {
        Self {
            transitions: HashMap::new(),
            actions: HashMap::new(),
        }
    }

    pub fn transition(mut self, name: impl Into<String>, handler: TransitionHandler<S>) -> Self {
        self.transitions.insert(name.into(), handler);
        self
    }

    pub fn action(mut self, name: impl Into<String>, handler: ActionHandler<S>) -> Self {
        self.actions.insert(name.into(), handler);
        self
    }

    pub fn has_transition(&self, name: &str) -> bool {
        self.transitions.contains_key(name)
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Run the named transition handler against `state`.
    pub fn stage<'a>(&self, state: &'a S, name: &str, item: Item) -> Option<Staged<'a>> {
        self.transitions
            .get(name)
            .map(|handler| handler(state, item))
    }

    /// Run the named action handler against `state`.
    pub fn invoke(
        &self,
        state: &S,
        name: &str,
        args: Parameters,
    ) -> Option<Result<Value, TrackingError>> {
        self.actions.get(name).map(|handler| handler(state, args))
    }

    pub fn transition_names(&self) -> impl Iterator<Item = &str> {
        self.transitions.keys().map(String::as_str)
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

impl<S> Default for Handlers<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for Handlers<S> {
    fn clone(&self) -> Self {
        Self {
            transitions: self.transitions.clone(),
            actions: self.actions.clone(),
        }
    }
}

impl<S> fmt::Debug for Handlers<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("transitions", &self.transitions.keys().collect::<Vec<_>>())
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}
