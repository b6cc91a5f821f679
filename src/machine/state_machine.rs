//! State machine that resolves and executes transitions between states.

use super::transition::{DeferredAction, TransitionBinding};
use crate::core::{Attributes, Parameters, TransitionHistory, TransitionRecord};
use crate::error::TrackingError;
use crate::state::{Staged, TrackingState};
use std::collections::HashMap;
use std::fmt;

/// Registry of states, transitions, and actions.
///
/// Registration (`add_*`) needs `&mut self` and is meant to happen once,
/// before the machine is used. Execution then runs synchronously on the
/// calling thread.
pub struct StateMachine {
    states: HashMap<String, Box<dyn TrackingState>>,
    transitions: HashMap<String, TransitionBinding>,
    actions: HashMap<String, String>,
    history: TransitionHistory,
}

impl StateMachine {
    /// Create an empty machine with an unbounded history.
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            transitions: HashMap::new(),
            actions: HashMap::new(),
            history: TransitionHistory::new(),
        }
    }

    /// Create an empty machine retaining at most `limit` history records.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            history: TransitionHistory::with_limit(limit),
            ..Self::new()
        }
    }

    /// Register a state under its name.
    pub fn add_state<S: TrackingState + 'static>(&mut self, state: S) -> Result<(), TrackingError> {
        self.add_boxed_state(Box::new(state))
    }

    pub fn add_boxed_state(&mut self, state: Box<dyn TrackingState>) -> Result<(), TrackingError> {
        let name = state.name().to_string();
        if name.is_empty() {
            return Err(TrackingError::StateValidation(
                "State name must not be empty".to_string(),
            ));
        }
        if self.states.contains_key(&name) {
            return Err(TrackingError::StateValidation(format!(
                "State {name} is already registered"
            )));
        }

        tracing::debug!(state = %name, item_type = %state.item_type().name(), "Registered state");
        self.states.insert(name, state);
        Ok(())
    }

    pub fn state(&self, name: &str) -> Option<&dyn TrackingState> {
        self.states.get(name).map(|state| state.as_ref())
    }

    /// Bind transition `name` to the pair `from -> to`.
    ///
    /// Both states must be registered and `from` must define the transition.
    pub fn add_transition(&mut self, name: &str, from: &str, to: &str) -> Result<(), TrackingError> {
        let from_state = registered(&self.states, from)?;
        registered(&self.states, to)?;

        if !from_state.has_transition(name) {
            return Err(TrackingError::TransitionValidation(format!(
                "State {from} does not define transition {name}"
            )));
        }

        tracing::debug!(transition = %name, from = %from, to = %to, "Registered transition");
        self.transitions
            .insert(name.to_string(), TransitionBinding::new(from, to));
        Ok(())
    }

    /// Bind action `name` to the state that defines it.
    pub fn add_action(&mut self, name: &str, state: &str) -> Result<(), TrackingError> {
        let target = registered(&self.states, state)?;
        if !target.has_action(name) {
            return Err(TrackingError::TransitionAction(format!(
                "State {state} does not define action {name}"
            )));
        }

        tracing::debug!(action = %name, state = %state, "Registered action");
        self.actions.insert(name.to_string(), state.to_string());
        Ok(())
    }

    pub fn binding(&self, name: &str) -> Option<&TransitionBinding> {
        self.transitions.get(name)
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn transition_names(&self) -> impl Iterator<Item = &str> {
        self.transitions.keys().map(String::as_str)
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Committed transitions, oldest first.
    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    /// Run transition `name`, moving an item from its source state to its
    /// destination state.
    ///
    /// Every gate runs before anything is committed:
    /// 1. the transition name must be registered
    /// 2. `from_attrs` must validate into the source state's item type; no
    ///    parameters are emitted yet, so its placeholders only take defaults
    /// 3. the source state's transition handler must pass; its parameters
    ///    are captured
    /// 4. `to_attrs`, with placeholders filled from those parameters, must
    ///    validate into the destination state's item type
    /// 5. the destination state must accept tracking the new item
    ///
    /// With `dry_run` the machine stops there and nothing is mutated.
    /// Otherwise the source side commits, then the destination side. A
    /// commit failure is [`TrackingError::TransitionFatal`]: the transition
    /// may be half-applied and is not retried.
    pub fn transition(
        &mut self,
        name: &str,
        from_attrs: Attributes,
        to_attrs: Attributes,
        dry_run: bool,
    ) -> Result<bool, TrackingError> {
        let binding = self
            .transitions
            .get(name)
            .cloned()
            .ok_or_else(|| TrackingError::UnknownTransition {
                name: name.to_string(),
            })?;
        let from_state = registered(&self.states, &binding.from)?;
        let to_state = registered(&self.states, &binding.to)?;

        let span = tracing::debug_span!(
            "transition",
            transition = %name,
            from = %binding.from,
            to = %binding.to,
            dry_run
        );
        let _guard = span.enter();

        let from_item = from_state
            .validated_item(from_attrs, &Parameters::new())
            .map_err(|rejected| {
                tracing::warn!(error = %rejected, "Source item rejected");
                TrackingError::from(rejected)
            })?;

        let outbound = from_state
            .stage_transition(name, from_item)
            .ok_or_else(|| {
                TrackingError::TransitionValidation(format!(
                    "State {} does not define transition {name}",
                    binding.from
                ))
            })?;
        gate(&outbound, "source")?;
        let parameters = outbound.parameters().clone();

        let to_item = to_state
            .validated_item(to_attrs, &parameters)
            .map_err(|rejected| {
                tracing::warn!(error = %rejected, "Destination item rejected");
                TrackingError::from(rejected)
            })?;

        let inbound = to_state.stage_track(to_item);
        gate(&inbound, "destination")?;

        if dry_run {
            tracing::debug!("Dry run passed every gate");
            return Ok(true);
        }

        outbound.commit().map_err(|e| {
            tracing::error!(error = %e, "Source commit failed");
            TrackingError::TransitionFatal(format!(
                "Transition {name} from-state {} encountered fatal error: {e}",
                binding.from
            ))
        })?;
        inbound.commit().map_err(|e| {
            tracing::error!(error = %e, "Destination commit failed after source committed");
            TrackingError::TransitionFatal(format!(
                "Transition {name} to-state {} encountered fatal error: {e}",
                binding.to
            ))
        })?;

        self.history.record(TransitionRecord::new(
            name,
            &binding.from,
            &binding.to,
            parameters,
        ));
        tracing::info!("Transition committed");
        Ok(true)
    }

    /// Resolve action `name` and bind `args`, deferring the call.
    ///
    /// Validation of `args` is left to the action itself.
    pub fn action(&self, name: &str, args: Parameters) -> Result<DeferredAction<'_>, TrackingError> {
        let state_name = self
            .actions
            .get(name)
            .ok_or_else(|| TrackingError::TransitionAction(format!("Unknown action: {name}")))?;
        let state = self.states.get(state_name).ok_or_else(|| {
            TrackingError::TransitionAction(format!(
                "Action {name} is bound to missing state {state_name}"
            ))
        })?;

        Ok(DeferredAction::new(state.as_ref(), name, args))
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("transitions", &self.transitions)
            .field("actions", &self.actions)
            .field("history", &self.history.len())
            .finish()
    }
}

fn registered<'a>(
    states: &'a HashMap<String, Box<dyn TrackingState>>,
    name: &str,
) -> Result<&'a dyn TrackingState, TrackingError> {
    states
        .get(name)
        .map(|state| state.as_ref())
        .ok_or_else(|| TrackingError::StateValidation(format!("State {name} does not exist.")))
}

fn gate(staged: &Staged<'_>, side: &str) -> Result<(), TrackingError> {
    match staged.failure_message() {
        Some(message) => {
            tracing::debug!(side, reason = %message, "Transition gate rejected");
            Err(TrackingError::TransitionValidation(message))
        }
        None => Ok(()),
    }
}
