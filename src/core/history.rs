//! Journal of committed transitions.
//!
//! Only transitions that ran their commit pass are recorded; dry runs and
//! rejected transitions leave no trace.

use super::value::Parameters;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use uuid::Uuid;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use tracking_state_machine::core::{Parameters, TransitionRecord};
///
/// let record = TransitionRecord::new("ship", "pending", "shipped", Parameters::new());
/// assert_eq!(record.transition, "ship");
/// assert_eq!(record.from, "pending");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub id: Uuid,
    /// Name the transition was registered under
    pub transition: String,
    pub from: String,
    pub to: String,
    /// Parameters forwarded from the source state
    pub parameters: Parameters,
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    pub fn new(
        transition: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        parameters: Parameters,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transition: transition.into(),
            from: from.into(),
            to: to.into(),
            parameters,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered history of committed transitions, optionally bounded.
///
/// When a limit is set, recording past it drops the oldest record.
///
/// # Example
///
/// ```rust
/// use tracking_state_machine::core::{Parameters, TransitionHistory, TransitionRecord};
///
/// let mut history = TransitionHistory::with_limit(2);
/// for _ in 0..3 {
///     history.record(TransitionRecord::new("ship", "pending", "shipped", Parameters::new()));
/// }
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.count_for("ship"), 2);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitionHistory {
    records: VecDeque<TransitionRecord>,
    limit: Option<usize>,
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn record(&mut self, record: TransitionRecord) {
        if self.limit == Some(0) {
            return;
        }
        self.records.push_back(record);
        if let Some(limit) = self.limit {
            while self.records.len() > limit {
                self.records.pop_front();
            }
        }
    }

    /// Records in commit order, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of retained records for the named transition.
    pub fn count_for(&self, transition: &str) -> usize {
        self.records
            .iter()
            .filter(|r| r.transition == transition)
            .count()
    }

    /// Time between the first and last retained record.
    ///
    /// Returns `None` if there are no records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}
