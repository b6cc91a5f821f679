//! Builder API for ergonomic state machine construction.
//!
//! Registration happens here, once, before the machine runs: the builder
//! collects states, transitions, and actions and checks them all in
//! [`StateMachineBuilder::build`].

pub mod machine;
pub mod macros;

pub use machine::StateMachineBuilder;
