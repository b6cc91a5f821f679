//! Attribute values and the open attribute bag items are built from.

use super::parameter::TransitionParameter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Named output values of a validation step, forwarded to the next phase.
pub type Parameters = BTreeMap<String, Value>;

/// A single attribute: either a concrete value or a placeholder still
/// waiting on a transition parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    Resolved(Value),
    Pending(TransitionParameter),
}

impl AttributeValue {
    pub fn as_resolved(&self) -> Option<&Value> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Pending(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        Self::Resolved(value)
    }
}

impl From<TransitionParameter> for AttributeValue {
    fn from(param: TransitionParameter) -> Self {
        Self::Pending(param)
    }
}

/// Raw attribute mapping supplied by the host, validated into an item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    values: BTreeMap<String, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build attributes from a JSON object. Any other JSON value yields an
    /// empty mapping.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => Self::default(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_parameter(self, name: impl Into<String>, param: TransitionParameter) -> Self {
        self.with(name, AttributeValue::Pending(param))
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    /// The concrete value of `name`, if present and not pending.
    pub fn resolved(&self, name: &str) -> Option<&Value> {
        self.values.get(name).and_then(AttributeValue::as_resolved)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AttributeValue> {
        self.values.iter()
    }

    /// Names of attributes still waiting on a transition parameter.
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .filter(|(_, value)| value.is_pending())
            .map(|(name, _)| name.as_str())
    }

    /// Substitute placeholders with supplied parameter values.
    ///
    /// A placeholder takes the value emitted under its parameter name. If
    /// none was emitted it falls back to its default, and with no default it
    /// stays pending for the item type's rules to judge.
    pub fn resolve(self, parameters: &Parameters) -> Self {
        self.values
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    AttributeValue::Pending(param) => {
                        match parameters
                            .get(param.name())
                            .or_else(|| param.default_value())
                        {
                            Some(supplied) => AttributeValue::Resolved(supplied.clone()),
                            None => AttributeValue::Pending(param),
                        }
                    }
                    resolved => resolved,
                };
                (name, value)
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Attributes {
    type Item = (String, AttributeValue);
    type IntoIter = btree_map::IntoIter<String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a AttributeValue);
    type IntoIter = btree_map::Iter<'a, String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_reads_object_fields() {
        let attrs = Attributes::from_json(json!({"id": 1, "name": "widget"}));
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.resolved("name"), Some(&json!("widget")));
    }

    #[test]
    fn from_json_ignores_non_objects() {
        assert!(Attributes::from_json(json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn resolve_substitutes_supplied_parameter() {
        let attrs = Attributes::new()
            .with_parameter("amount", TransitionParameter::new("balance"));
        let mut params = Parameters::new();
        params.insert("balance".into(), json!(40));

        let resolved = attrs.resolve(&params);
        assert_eq!(resolved.resolved("amount"), Some(&json!(40)));
        assert_eq!(resolved.pending().count(), 0);
    }

    #[test]
    fn resolve_falls_back_to_default() {
        let attrs = Attributes::new().with_parameter(
            "carrier",
            TransitionParameter::with_default("carrier", json!("post")),
        );

        let resolved = attrs.resolve(&Parameters::new());
        assert_eq!(resolved.resolved("carrier"), Some(&json!("post")));
    }

    #[test]
    fn supplied_value_wins_over_default() {
        let attrs = Attributes::new().with_parameter(
            "carrier",
            TransitionParameter::with_default("carrier", json!("post")),
        );
        let mut params = Parameters::new();
        params.insert("carrier".into(), json!("courier"));

        let resolved = attrs.resolve(&params);
        assert_eq!(resolved.resolved("carrier"), Some(&json!("courier")));
    }

    #[test]
    fn unresolved_placeholder_stays_pending() {
        let attrs = Attributes::new()
            .with("id", json!(3))
            .with_parameter("balance", TransitionParameter::new("balance"));

        let resolved = attrs.resolve(&Parameters::new());
        assert!(resolved.resolved("balance").is_none());
        assert_eq!(resolved.pending().collect::<Vec<_>>(), vec!["balance"]);
    }

    #[test]
    fn unrelated_parameters_are_ignored() {
        let attrs = Attributes::new().with("id", json!(3));
        let mut params = Parameters::new();
        params.insert("other".into(), json!(true));

        assert_eq!(attrs.clone().resolve(&params), attrs);
    }
}
