//! The state machine: registry and transition protocol.
//!
//! # Key Concepts
//!
//! - **Transitions**: a name bound to a source and destination state; the
//!   source state defines the handler of the same name
//! - **Actions**: named operations scoped to one state, resolved by the
//!   machine and called later
//! - **Two phases**: every gate of a transition passes before any state
//!   commits, and a dry run stops after the gates

mod state_machine;
mod transition;

pub use state_machine::StateMachine;
pub use transition::{DeferredAction, TransitionBinding};
