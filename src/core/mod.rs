//! Core data types of the tracking engine.
//!
//! This module contains the pure building blocks the engine moves around:
//! - Attribute bags with transition parameter placeholders
//! - Item types, their rules, and validated items
//! - Validation results passed between transition phases
//! - The journal of committed transitions
//!
//! Nothing in this module mutates a state store.

mod history;
mod item;
mod parameter;
mod rule;
mod validation;
mod value;

pub use history::{TransitionHistory, TransitionRecord};
pub use item::{Item, ItemRejected, ItemType};
pub use parameter::TransitionParameter;
pub use rule::Rule;
pub use validation::ValidationResult;
pub use value::{AttributeValue, Attributes, Parameters};
