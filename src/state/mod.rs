//! States: named pools of items of one type.
//!
//! A state decides how its items are stored, counted, and looked up. The
//! engine only relies on the [`TrackingState`] contract:
//! - validating a raw attribute mapping into an item
//! - staging the insertion of a validated item
//! - staging the source side of each named transition
//! - lookup and counting
//!
//! Every store mutation is staged first and applied on commit, so the same
//! validation path serves dry runs and real runs.

mod handlers;
mod memory;
mod staged;

pub use handlers::{ActionHandler, Handlers, TransitionHandler};
pub use memory::MemoryState;
pub use staged::{CommitError, Staged};

use crate::core::{Attributes, Item, ItemRejected, ItemType, Parameters};
use crate::error::TrackingError;
use serde_json::{Map, Value};

/// Result of looking items up by key inside a state.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup {
    Missing,
    One(Item),
    Many(Vec<Item>),
}

impl Lookup {
    /// Zero items is `Missing`, one is `One`, more is `Many`.
    pub fn from_items(mut items: Vec<Item>) -> Self {
        match items.len() {
            0 => Self::Missing,
            1 => Self::One(items.remove(0)),
            _ => Self::Many(items),
        }
    }
}

/// Exported attributes of looked-up items, detached from the store.
#[derive(Clone, Debug, PartialEq)]
pub enum Exported {
    One(Map<String, Value>),
    Many(Vec<Map<String, Value>>),
}

impl Exported {
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The single exported item, if exactly one matched.
    pub fn as_one(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::One(item) => Some(item),
            Self::Many(_) => None,
        }
    }
}

/// Contract every state implementation fulfils.
///
/// Implementors provide storage through [`stage_track`](Self::stage_track),
/// [`lookup`](Self::lookup), and [`quantity`](Self::quantity), and expose
/// their named transitions and actions. The provided [`track`](Self::track)
/// and [`get`](Self::get) should not be overridden.
///
/// States are driven from a single thread. Implementations that mutate
/// their store through `&self` use interior mutability and own any locking
/// they need.
pub trait TrackingState {
    /// Unique key of the state within a machine.
    fn name(&self) -> &str;

    /// Construction policy for items held in this state.
    fn item_type(&self) -> &ItemType;

    /// Validate a raw mapping into an item of this state's type.
    ///
    /// Placeholders are resolved against `parameters` before the item
    /// type's rules run.
    fn validated_item(
        &self,
        attributes: Attributes,
        parameters: &Parameters,
    ) -> Result<Item, ItemRejected> {
        self.item_type().validate(attributes.resolve(parameters))
    }

    /// Validate tracking `item` and stage its insertion into the store.
    fn stage_track(&self, item: Item) -> Staged<'_>;

    /// Tracked items matching `key`.
    fn lookup(&self, key: &Value) -> Lookup;

    /// Number of tracked items, optionally filtered by `key`.
    fn quantity(&self, key: Option<&Value>) -> usize;

    fn has_transition(&self, name: &str) -> bool;

    /// Stage the source side of the named transition for `item`.
    ///
    /// Returns `None` if this state defines no such transition.
    fn stage_transition(&self, name: &str, item: Item) -> Option<Staged<'_>>;

    fn has_action(&self, _name: &str) -> bool {
        false
    }

    /// Run the named action. Returns `None` if this state defines no such
    /// action; validating `args` is up to the action.
    fn invoke_action(&self, _name: &str, _args: Parameters) -> Option<Result<Value, TrackingError>> {
        None
    }

    /// Track a raw attribute mapping in this state.
    ///
    /// The mapping is validated first; a rejected mapping fails with no
    /// side effects. With `dry_run` the staged insertion is checked but not
    /// applied.
    fn track(&self, attributes: Attributes, dry_run: bool) -> Result<bool, TrackingError> {
        let item = self
            .validated_item(attributes, &Parameters::new())
            .map_err(|rejected| {
                tracing::warn!(state = %self.name(), error = %rejected, "Rejected item for tracking");
                TrackingError::from(rejected)
            })?;
        self.track_item(item, dry_run)
    }

    /// Track an already validated item.
    ///
    /// The item is revalidated against this state's item type, whatever type
    /// built it. Calling this twice without `dry_run` stages the insertion
    /// twice; only states that guard against duplicates reject the second
    /// call.
    fn track_item(&self, item: Item, dry_run: bool) -> Result<bool, TrackingError> {
        let item = self.item_type().validate(item.into_attributes()).map_err(|rejected| {
            tracing::warn!(state = %self.name(), error = %rejected, "Rejected item for tracking");
            TrackingError::from(rejected)
        })?;

        let staged = self.stage_track(item);
        if let Some(message) = staged.failure_message() {
            tracing::debug!(state = %self.name(), reason = %message, "Track gate rejected item");
            return Err(TrackingError::TransitionValidation(message));
        }
        if dry_run {
            return Ok(true);
        }

        staged.commit().map_err(|e| {
            tracing::error!(state = %self.name(), error = %e, "Track commit failed");
            TrackingError::TransitionFatal(format!(
                "State {} failed to commit tracked item: {e}",
                self.name()
            ))
        })?;
        tracing::info!(state = %self.name(), "Item tracked");
        Ok(true)
    }

    /// Exported attributes of the items matching `key`, or `None`.
    fn get(&self, key: &Value) -> Option<Exported> {
        match self.lookup(key) {
            Lookup::Missing => None,
            Lookup::One(item) => Some(Exported::One(item.export())),
            Lookup::Many(items) if items.is_empty() => None,
            Lookup::Many(items) => Some(Exported::Many(items.iter().map(Item::export).collect())),
        }
    }
}
