//! Tracking State Machine: track items in every state and move them through
//! validated transitions.
//!
//! Each item belongs to exactly one named state. Items enter a state by
//! being validated against the state's item type and tracked, and move
//! between states through named transitions that run paired validation
//! gates on the source and destination before anything is committed.
//!
//! # Core Concepts
//!
//! - **Item types and items**: rules an attribute mapping must satisfy, and
//!   the validated records they produce
//! - **States**: named pools of items implementing [`TrackingState`]
//! - **Transitions**: a name bound to a source and destination state; the
//!   source state emits parameters that fill the destination item's
//!   [`TransitionParameter`] placeholders
//! - **Two phases**: validation is staged, so a dry run runs exactly the
//!   same checks as a real transition without committing
//!
//! # Example
//!
//! ```rust
//! use tracking_state_machine::core::{Attributes, Item, ItemType, TransitionParameter, ValidationResult};
//! use tracking_state_machine::state::{MemoryState, Staged, TrackingState};
//! use tracking_state_machine::StateMachineBuilder;
//! use serde_json::json;
//!
//! fn ship(pending: &MemoryState, order: Item) -> Staged<'_> {
//!     let carrier = if order.get_as::<f64>("weight").unwrap_or(0.0) > 20.0 {
//!         "freight"
//!     } else {
//!         "post"
//!     };
//!     let removal = pending.stage_removal(&order);
//!     if !removal.succeeded() {
//!         return removal;
//!     }
//!     Staged::new(ValidationResult::success().with_parameter("carrier", json!(carrier)))
//!         .on_commit(move || removal.commit())
//! }
//!
//! let mut machine = StateMachineBuilder::new()
//!     .state(
//!         MemoryState::new("pending", ItemType::new("Order").required("id"), "id")
//!             .with_transition("ship", ship),
//!     )
//!     .state(MemoryState::new(
//!         "shipped",
//!         ItemType::new("Shipment").required("id").required("carrier"),
//!         "id",
//!     ))
//!     .transition("ship", "pending", "shipped")
//!     .build()
//!     .unwrap();
//!
//! let order = Attributes::from_json(json!({"id": 1, "weight": 3.5}));
//! machine.state("pending").unwrap().track(order.clone(), false).unwrap();
//!
//! let shipment = Attributes::new()
//!     .with("id", json!(1))
//!     .with_parameter("carrier", TransitionParameter::new("carrier"));
//!
//! // Preview first, then commit.
//! assert!(machine.transition("ship", order.clone(), shipment.clone(), true).unwrap());
//! assert_eq!(machine.state("pending").unwrap().quantity(None), 1);
//!
//! assert!(machine.transition("ship", order, shipment, false).unwrap());
//! assert_eq!(machine.state("pending").unwrap().quantity(None), 0);
//! assert_eq!(machine.state("shipped").unwrap().quantity(None), 1);
//! ```

pub mod builder;
pub mod core;
pub mod error;
pub mod machine;
pub mod state;

// Re-export commonly used types
pub use builder::StateMachineBuilder;
pub use crate::core::{
    Attributes, Item, ItemType, Parameters, TransitionParameter, ValidationResult,
};
pub use error::{ErrorKind, TrackingError};
pub use machine::{DeferredAction, StateMachine};
pub use state::{MemoryState, Staged, TrackingState};
