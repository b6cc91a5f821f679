//! Builder for constructing state machines.

use crate::error::TrackingError;
use crate::machine::StateMachine;
use crate::state::TrackingState;

/// Builder for constructing state machines with a fluent API.
///
/// States are registered first, then transitions, then actions, so the
/// order of calls on the builder does not matter.
///
/// # Example
///
/// ```rust
/// use tracking_state_machine::builder::StateMachineBuilder;
/// use tracking_state_machine::core::{Item, ItemType};
/// use tracking_state_machine::state::{MemoryState, Staged};
///
/// fn ship(pending: &MemoryState, order: Item) -> Staged<'_> {
///     pending.stage_removal(&order)
/// }
///
/// let machine = StateMachineBuilder::new()
///     .transition("ship", "pending", "shipped")
///     .state(MemoryState::new("pending", ItemType::new("Order"), "id").with_transition("ship", ship))
///     .state(MemoryState::new("shipped", ItemType::new("Order"), "id"))
///     .history_limit(100)
///     .build()
///     .unwrap();
///
/// assert!(machine.binding("ship").is_some());
/// ```
#[derive(Default)]
pub struct StateMachineBuilder {
    states: Vec<Box<dyn TrackingState>>,
    transitions: Vec<(String, String, String)>,
    actions: Vec<(String, String)>,
    history_limit: Option<usize>,
}

impl StateMachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a state.
    pub fn state<S: TrackingState + 'static>(mut self, state: S) -> Self {
        self.states.push(Box::new(state));
        self
    }

    /// Bind a transition name to a source and destination state.
    pub fn transition(
        mut self,
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.transitions.push((name.into(), from.into(), to.into()));
        self
    }

    /// Bind an action name to the state defining it.
    pub fn action(mut self, name: impl Into<String>, state: impl Into<String>) -> Self {
        self.actions.push((name.into(), state.into()));
        self
    }

    /// Retain at most `limit` committed transitions in the history.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Build the state machine.
    ///
    /// Fails with the first registration error encountered.
    pub fn build(self) -> Result<StateMachine, TrackingError> {
        let mut machine = match self.history_limit {
            Some(limit) => StateMachine::with_history_limit(limit),
            None => StateMachine::new(),
        };

        for state in self.states {
            machine.add_boxed_state(state)?;
        }
        for (name, from, to) in &self.transitions {
            machine.add_transition(name, from, to)?;
        }
        for (name, state) in &self.actions {
            machine.add_action(name, state)?;
        }

        Ok(machine)
    }
}
