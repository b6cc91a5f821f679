//! Outcome of a single validation step.

use super::value::Parameters;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The result of one validation step in a transition or track.
///
/// If unsuccessful, [`message`](Self::message) carries the reason. A
/// successful result may carry named parameters which the machine forwards
/// to the destination state of a transition.
///
/// Results are immutable once built: [`with_parameter`](Self::with_parameter)
/// consumes the result and returns an extended one.
///
/// # Example
///
/// ```rust
/// use tracking_state_machine::core::ValidationResult;
/// use serde_json::json;
///
/// let ok = ValidationResult::success().with_parameter("balance", json!(25));
/// assert!(ok.succeeded());
/// assert_eq!(ok.parameters().get("balance"), Some(&json!(25)));
///
/// let denied = ValidationResult::failure("insufficient funds");
/// assert!(!denied.succeeded());
/// assert_eq!(denied.message(), Some("insufficient funds"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    success: bool,
    message: Option<String>,
    parameters: Parameters,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
            parameters: Parameters::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            parameters: Parameters::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    pub fn succeeded(&self) -> bool {
        self.success
    }

    /// Failure reason. Always `None` for a successful result.
    pub fn message(&self) -> Option<&str> {
        if self.success {
            None
        } else {
            self.message.as_deref()
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn into_parameters(self) -> Parameters {
        self.parameters
    }
}
