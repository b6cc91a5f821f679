//! Item types and the validated items they produce.

use super::parameter::TransitionParameter;
use super::rule::Rule;
use super::value::{AttributeValue, Attributes};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Attribute mapping rejected by an item type, with every failed rule.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Could not validate {item_type} item: {}", .failures.join("; "))]
pub struct ItemRejected {
    pub item_type: String,
    pub failures: Vec<String>,
}

/// Construction policy for the items a state holds.
///
/// An item type names the kind of item and lists the rules every item of
/// that kind must satisfy. Validation evaluates all rules and reports every
/// failure at once rather than stopping at the first.
///
/// # Example
///
/// ```rust
/// use tracking_state_machine::core::{Attributes, ItemType};
/// use serde_json::json;
///
/// let account = ItemType::new("Account")
///     .required("id")
///     .rule("balance is not negative", |item| {
///         item.get_as::<i64>("balance").is_some_and(|b| b >= 0)
///     });
///
/// let ok = account.validate(Attributes::from_json(json!({"id": 1, "balance": 10})));
/// assert!(ok.is_ok());
///
/// let rejected = account
///     .validate(Attributes::from_json(json!({"balance": -5})))
///     .unwrap_err();
/// assert_eq!(rejected.failures.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct ItemType {
    name: String,
    rules: Vec<Rule>,
}

impl ItemType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Add a named rule.
    pub fn rule<F>(mut self, description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Item) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule::new(description, predicate));
        self
    }

    /// Require `name` to be present and resolved.
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.rules.push(Rule::required(name));
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Validate a raw mapping into an item of this type.
    ///
    /// Returns the item only if every rule holds. Placeholders are not
    /// resolved here; see [`Attributes::resolve`].
    pub fn validate(&self, attributes: Attributes) -> Result<Item, ItemRejected> {
        let item = Item {
            item_type: self.name.clone(),
            attributes,
        };
        self.check(&item)?;
        Ok(item)
    }

    /// Run this type's rules against an existing item.
    ///
    /// The item's own type label is ignored: two item types sharing a name
    /// may still carry different rules.
    pub fn check(&self, item: &Item) -> Result<(), ItemRejected> {
        if self.rules.is_empty() {
            return Ok(());
        }

        let checks: Vec<Validation<(), NonEmptyVec<String>>> = self
            .rules
            .iter()
            .map(|rule| {
                if rule.check(item) {
                    Validation::success(())
                } else {
                    Validation::fail(rule.description().to_string())
                }
            })
            .collect();

        match Validation::all_vec(checks) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => Err(ItemRejected {
                item_type: self.name.clone(),
                failures: errors.iter().cloned().collect(),
            }),
        }
    }
}

/// A validated item.
///
/// Items can only be built through [`ItemType::validate`], so every item
/// satisfies the rules of the item type that built it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Item {
    item_type: String,
    attributes: Attributes,
}

impl Item {
    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    /// Resolved value of an attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.resolved(name)
    }

    /// Resolved value of an attribute, deserialized into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.get(name)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// The placeholder an attribute is still waiting on, if any.
    pub fn parameter(&self, name: &str) -> Option<&TransitionParameter> {
        match self.attributes.get(name) {
            Some(AttributeValue::Pending(param)) => Some(param),
            _ => None,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }

    /// Read-only copy of the attributes for consumers outside the engine.
    ///
    /// Unresolved placeholders export as `null`.
    pub fn export(&self) -> Map<String, Value> {
        self.attributes
            .iter()
            .map(|(name, value)| {
                let value = value.as_resolved().cloned().unwrap_or(Value::Null);
                (name.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_type() -> ItemType {
        ItemType::new("Order")
            .required("id")
            .rule("total is positive", |item| {
                item.get_as::<f64>("total").is_some_and(|t| t > 0.0)
            })
    }

    #[test]
    fn check_applies_rules_of_a_same_named_type() {
        let loose = ItemType::new("Order")
            .validate(Attributes::from_json(json!({"id": 1})))
            .unwrap();

        let rejected = order_type().check(&loose).unwrap_err();
        assert_eq!(rejected.failures, vec!["total is positive".to_string()]);
        assert!(ItemType::new("Order").required("id").check(&loose).is_ok());
    }

    #[test]
    fn valid_mapping_produces_item() {
        let item = order_type()
            .validate(Attributes::from_json(json!({"id": 1, "total": 9.5})))
            .unwrap();

        assert_eq!(item.item_type(), "Order");
        assert_eq!(item.get_as::<u64>("id"), Some(1));
    }

    #[test]
    fn every_failed_rule_is_reported() {
        let rejected = order_type()
            .validate(Attributes::from_json(json!({"total": 0})))
            .unwrap_err();

        assert_eq!(rejected.item_type, "Order");
        assert_eq!(
            rejected.failures,
            vec!["id is required".to_string(), "total is positive".to_string()]
        );
    }

    #[test]
    fn type_without_rules_accepts_anything() {
        assert!(ItemType::new("Note").validate(Attributes::new()).is_ok());
    }

    #[test]
    fn export_excludes_metadata_and_nulls_placeholders() {
        let item = ItemType::new("Order")
            .validate(
                Attributes::new()
                    .with("id", json!(4))
                    .with_parameter("balance", TransitionParameter::new("balance")),
            )
            .unwrap();

        let exported = item.export();
        assert_eq!(exported.len(), 2);
        assert_eq!(exported["id"], json!(4));
        assert_eq!(exported["balance"], Value::Null);
        assert!(!exported.contains_key("item_type"));
    }

    #[test]
    fn parameter_exposes_unresolved_placeholder() {
        let item = ItemType::new("Order")
            .validate(
                Attributes::new().with_parameter("balance", TransitionParameter::new("funds")),
            )
            .unwrap();

        assert_eq!(item.parameter("balance").map(|p| p.name()), Some("funds"));
        assert!(item.get("balance").is_none());
    }

    #[test]
    fn get_as_rejects_mismatched_type() {
        let item = ItemType::new("Order")
            .validate(Attributes::new().with("id", json!("abc")))
            .unwrap();
        assert_eq!(item.get_as::<u64>("id"), None);
    }

    #[test]
    fn rejection_message_lists_failures() {
        let rejected = ItemRejected {
            item_type: "Order".to_string(),
            failures: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(rejected.to_string(), "Could not validate Order item: a; b");
    }
}
