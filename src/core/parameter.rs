//! Transition parameters: placeholders filled in by the source state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named placeholder in a destination item's attributes.
///
/// The destination state declares the attributes it cannot know ahead of a
/// transition as parameters. The source state's transition handler emits
/// values under the same names in its [`ValidationResult`], and the machine
/// substitutes them before the destination item is validated. When nothing
/// is emitted, the placeholder's default (if any) is used instead.
///
/// # Example
///
/// ```rust
/// use tracking_state_machine::core::{Attributes, Parameters, TransitionParameter};
/// use serde_json::json;
///
/// let attrs = Attributes::new()
///     .with("id", json!(7))
///     .with_parameter("balance", TransitionParameter::new("balance"));
///
/// let mut params = Parameters::new();
/// params.insert("balance".to_string(), json!(120));
///
/// let resolved = attrs.resolve(&params);
/// assert_eq!(resolved.resolved("balance"), Some(&json!(120)));
/// ```
///
/// [`ValidationResult`]: crate::core::ValidationResult
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionParameter {
    name: String,
    default: Option<Value>,
}

impl TransitionParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// Placeholder that falls back to `default` when the source state emits
    /// no value for it.
    pub fn with_default(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_parameter_has_no_default() {
        let param = TransitionParameter::new("balance");
        assert_eq!(param.name(), "balance");
        assert!(param.default_value().is_none());
    }

    #[test]
    fn default_is_retained() {
        let param = TransitionParameter::with_default("carrier", json!("post"));
        assert_eq!(param.default_value(), Some(&json!("post")));
    }
}
