//! In-memory state keyed by a single attribute.

use super::handlers::{ActionHandler, Handlers, TransitionHandler};
use super::staged::{CommitError, Staged};
use super::{Lookup, TrackingState};
use crate::core::{Item, ItemType, Parameters, ValidationResult};
use crate::error::TrackingError;
use serde_json::Value;
use std::cell::RefCell;

/// State that keeps its items in a list, unique by one key attribute.
///
/// Transitions and actions are plain functions registered at construction.
/// A transition handler usually validates the leaving item and returns
/// [`stage_removal`](Self::stage_removal), optionally emitting parameters
/// for the destination state.
///
/// # Example
///
/// ```rust
/// use tracking_state_machine::core::{Attributes, Item, ItemType};
/// use tracking_state_machine::state::{MemoryState, Staged, TrackingState};
/// use serde_json::json;
///
/// fn ship(pending: &MemoryState, order: Item) -> Staged<'_> {
///     pending.stage_removal(&order)
/// }
///
/// let pending = MemoryState::new("pending", ItemType::new("Order").required("id"), "id")
///     .with_transition("ship", ship);
///
/// pending.track(Attributes::from_json(json!({"id": 1})), false).unwrap();
/// assert_eq!(pending.quantity(None), 1);
/// assert!(pending.has_transition("ship"));
/// ```
#[derive(Debug)]
pub struct MemoryState {
    name: String,
    item_type: ItemType,
    key_attribute: String,
    items: RefCell<Vec<Item>>,
    handlers: Handlers<MemoryState>,
}

impl MemoryState {
    pub fn new(
        name: impl Into<String>,
        item_type: ItemType,
        key_attribute: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            item_type,
            key_attribute: key_attribute.into(),
            items: RefCell::new(Vec::new()),
            handlers: Handlers::new(),
        }
    }

    pub fn with_transition(
        mut self,
        name: impl Into<String>,
        handler: TransitionHandler<MemoryState>,
    ) -> Self {
        self.handlers = self.handlers.transition(name, handler);
        self
    }

    pub fn with_action(mut self, name: impl Into<String>, handler: ActionHandler<MemoryState>) -> Self {
        self.handlers = self.handlers.action(name, handler);
        self
    }

    pub fn key_attribute(&self) -> &str {
        &self.key_attribute
    }

    pub fn contains(&self, key: &Value) -> bool {
        self.items
            .borrow()
            .iter()
            .any(|item| item.get(&self.key_attribute) == Some(key))
    }

    /// Snapshot of the tracked items.
    pub fn items(&self) -> Vec<Item> {
        self.items.borrow().clone()
    }

    /// Stage removing the tracked item with the same key as `item`.
    ///
    /// Fails if the item has no key or is not tracked here.
    pub fn stage_removal(&self, item: &Item) -> Staged<'_> {
        let key = match self.key_of(item) {
            Ok(key) => key,
            Err(staged) => return staged,
        };
        if !self.contains(&key) {
            return Staged::failed(format!("Item {key} is not tracked in {}", self.name));
        }

        Staged::new(ValidationResult::success()).on_commit(move || {
            let mut items = self.items.borrow_mut();
            let before = items.len();
            items.retain(|tracked| tracked.get(&self.key_attribute) != Some(&key));
            if items.len() == before {
                Err(CommitError::new(format!(
                    "Item {key} left {} before its removal committed",
                    self.name
                )))
            } else {
                Ok(())
            }
        })
    }

    fn key_of(&self, item: &Item) -> Result<Value, Staged<'_>> {
        item.get(&self.key_attribute).cloned().ok_or_else(|| {
            Staged::failed(format!(
                "{} item has no {} attribute",
                item.item_type(),
                self.key_attribute
            ))
        })
    }
}

impl TrackingState for MemoryState {
    fn name(&self) -> &str {
        &self.name
    }

    fn item_type(&self) -> &ItemType {
        &self.item_type
    }

    fn stage_track(&self, item: Item) -> Staged<'_> {
        let key = match self.key_of(&item) {
            Ok(key) => key,
            Err(staged) => return staged,
        };
        if self.contains(&key) {
            return Staged::failed(format!("Item {key} is already tracked in {}", self.name));
        }

        Staged::new(ValidationResult::success()).on_commit(move || {
            let mut items = self.items.borrow_mut();
            if items
                .iter()
                .any(|tracked| tracked.get(&self.key_attribute) == Some(&key))
            {
                return Err(CommitError::new(format!(
                    "Item {key} was tracked in {} before its insertion committed",
                    self.name
                )));
            }
            items.push(item);
            Ok(())
        })
    }

    fn lookup(&self, key: &Value) -> Lookup {
        Lookup::from_items(
            self.items
                .borrow()
                .iter()
                .filter(|item| item.get(&self.key_attribute) == Some(key))
                .cloned()
                .collect(),
        )
    }

    fn quantity(&self, key: Option<&Value>) -> usize {
        let items = self.items.borrow();
        match key {
            Some(key) => items
                .iter()
                .filter(|item| item.get(&self.key_attribute) == Some(key))
                .count(),
            None => items.len(),
        }
    }

    fn has_transition(&self, name: &str) -> bool {
        self.handlers.has_transition(name)
    }

    fn stage_transition(&self, name: &str, item: Item) -> Option<Staged<'_>> {
        self.handlers.stage(self, name, item)
    }

    fn has_action(&self, name: &str) -> bool {
        self.handlers.has_action(name)
    }

    fn invoke_action(&self, name: &str, args: Parameters) -> Option<Result<Value, TrackingError>> {
        self.handlers.invoke(self, name, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Attributes;
    use serde_json::json;

    fn orders() -> MemoryState {
        MemoryState::new("pending", ItemType::new("Order").required("id"), "id")
    }

    fn order(id: u64) -> Attributes {
        Attributes::from_json(json!({"id": id}))
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let state = orders();
        state.track(order(1), false).unwrap();

        let err = state.track(order(1), false).unwrap_err();
        assert!(err.to_string().contains("already tracked"));
        assert_eq!(state.quantity(None), 1);
    }

    #[test]
    fn quantity_filters_by_key() {
        let state = orders();
        state.track(order(1), false).unwrap();
        state.track(order(2), false).unwrap();

        assert_eq!(state.quantity(None), 2);
        assert_eq!(state.quantity(Some(&json!(2))), 1);
        assert_eq!(state.quantity(Some(&json!(9))), 0);
    }

    #[test]
    fn removal_is_staged_until_commit() {
        let state = orders();
        state.track(order(1), false).unwrap();
        let item = state.items().remove(0);

        let staged = state.stage_removal(&item);
        assert!(staged.succeeded());
        assert!(state.contains(&json!(1)));

        staged.commit().unwrap();
        assert!(!state.contains(&json!(1)));
    }

    #[test]
    fn removal_of_untracked_item_fails() {
        let state = orders();
        let item = state.validated_item(order(5), &Parameters::new()).unwrap();

        let staged = state.stage_removal(&item);
        assert_eq!(
            staged.failure_message().as_deref(),
            Some("Item 5 is not tracked in pending")
        );
    }

    #[test]
    fn stale_removal_commit_is_an_error() {
        let state = orders();
        state.track(order(1), false).unwrap();
        let item = state.items().remove(0);

        let first = state.stage_removal(&item);
        let second = state.stage_removal(&item);
        first.commit().unwrap();

        assert!(second.commit().is_err());
    }

    #[test]
    fn item_without_key_cannot_be_tracked() {
        let state = MemoryState::new("loose", ItemType::new("Note"), "id");
        let err = state.track(Attributes::new(), false).unwrap_err();
        assert_eq!(err.to_string(), "Note item has no id attribute");
    }

    #[test]
    fn get_returns_exported_copy() {
        let state = orders();
        state
            .track(Attributes::from_json(json!({"id": 1, "total": 3})), false)
            .unwrap();

        let exported = state.get(&json!(1)).unwrap();
        assert_eq!(exported.as_one().unwrap()["total"], json!(3));
    }
}
