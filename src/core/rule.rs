//! Validation rules attached to item types.
//!
//! Rules are pure boolean functions over an item. An item is valid only
//! when every rule of its type holds.

use super::item::Item;
use std::fmt;
use std::sync::Arc;

/// Named predicate that an item must satisfy to be tracked.
///
/// The description is reported back to the caller when the rule fails, so
/// it should read as the condition that holds for a valid item.
///
/// # Example
///
/// ```rust
/// use tracking_state_machine::core::{Attributes, ItemType, Rule};
/// use serde_json::json;
///
/// let positive = Rule::new("total is positive", |item| {
///     item.get_as::<f64>("total").is_some_and(|t| t > 0.0)
/// });
///
/// let order = ItemType::new("Order")
///     .validate(Attributes::new().with("total", json!(12.5)))
///     .unwrap();
///
/// assert!(positive.check(&order));
/// assert_eq!(positive.description(), "total is positive");
/// ```
#[derive(Clone)]
pub struct Rule {
    description: String,
    predicate: Arc<dyn Fn(&Item) -> bool + Send + Sync>,
}

impl Rule {
    /// Create a rule from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Item) -> bool + Send + Sync + 'static,
    {
        Rule {
            description: description.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Rule requiring `name` to be present and resolved.
    pub fn required(name: impl Into<String>) -> Self {
        let name = name.into();
        let description = format!("{name} is required");
        Rule::new(description, move |item| item.get(&name).is_some())
    }

    pub fn check(&self, item: &Item) -> bool {
        (self.predicate)(item)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Attributes, ItemType, TransitionParameter};
    use serde_json::json;

    fn widget(attrs: Attributes) -> Item {
        ItemType::new("Widget").validate(attrs).unwrap()
    }

    #[test]
    fn rule_checks_item_attributes() {
        let rule = Rule::new("qty below ten", |item| {
            item.get_as::<u32>("qty").is_some_and(|q| q < 10)
        });

        assert!(rule.check(&widget(Attributes::new().with("qty", json!(3)))));
        assert!(!rule.check(&widget(Attributes::new().with("qty", json!(30)))));
    }

    #[test]
    fn required_rejects_missing_and_pending() {
        let rule = Rule::required("owner");

        assert!(rule.check(&widget(Attributes::new().with("owner", json!("ana")))));
        assert!(!rule.check(&widget(Attributes::new())));
        assert!(!rule.check(&widget(
            Attributes::new().with_parameter("owner", TransitionParameter::new("owner"))
        )));
        assert_eq!(rule.description(), "owner is required");
    }

    #[test]
    fn rule_is_deterministic() {
        let item = widget(Attributes::new().with("qty", json!(5)));
        let rule = Rule::new("has qty", |item| item.get("qty").is_some());

        assert_eq!(rule.check(&item), rule.check(&item));
    }
}
