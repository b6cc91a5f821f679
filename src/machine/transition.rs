//! Transition bindings and deferred actions.

use crate::core::Parameters;
use crate::error::TrackingError;
use crate::state::TrackingState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Directed pair of states a transition name is bound to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionBinding {
    pub from: String,
    pub to: String,
}

impl TransitionBinding {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn is_self_transition(&self) -> bool {
        self.from == self.to
    }
}

/// An action resolved to its state with its arguments bound, ready to run.
///
/// Nothing happens until [`call`](Self::call) is invoked.
pub struct DeferredAction<'a> {
    state: &'a dyn TrackingState,
    name: String,
    args: Parameters,
}

impl<'a> DeferredAction<'a> {
    pub(crate) fn new(state: &'a dyn TrackingState, name: impl Into<String>, args: Parameters) -> Self {
        Self {
            state,
            name: name.into(),
            args,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state_name(&self) -> &str {
        self.state.name()
    }

    pub fn args(&self) -> &Parameters {
        &self.args
    }

    /// Run the action on its state.
    pub fn call(self) -> Result<Value, TrackingError> {
        tracing::debug!(action = %self.name, state = %self.state.name(), "Invoking action");
        match self.state.invoke_action(&self.name, self.args) {
            Some(result) => result,
            None => Err(TrackingError::TransitionAction(format!(
                "State {} does not define action {}",
                self.state.name(),
                self.name
            ))),
        }
    }
}

impl fmt::Debug for DeferredAction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredAction")
            .field("name", &self.name)
            .field("state", &self.state.name())
            .field("args", &self.args)
            .finish()
    }
}
