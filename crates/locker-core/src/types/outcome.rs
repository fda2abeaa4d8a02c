//! Results of operations with best-effort side effects.

use serde::{Deserialize, Serialize};

/// A non-fatal problem encountered while completing an operation.
///
/// Produced when a secondary step (removing an object after its marker is
/// gone, bumping an access counter) fails but the primary state change
/// already succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    /// Short name of the step that failed, e.g. `"storage.delete"`.
    pub step: String,
    /// What went wrong.
    pub message: String,
}

impl Advisory {
    /// Create a new advisory.
    pub fn new(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            message: message.into(),
        }
    }
}

/// A value together with the advisories raised while producing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// The operation result.
    pub value: T,
    /// Non-fatal problems. Empty when every step succeeded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<Advisory>,
}

impl<T> Outcome<T> {
    /// Wrap a value with no advisories.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            advisories: Vec::new(),
        }
    }

    /// Record an advisory and log it at `warn`.
    pub fn advise(&mut self, step: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(step, %message, "Best-effort step failed");
        self.advisories.push(Advisory::new(step, message));
    }

    /// Whether every step succeeded.
    pub fn is_clean(&self) -> bool {
        self.advisories.is_empty()
    }

    /// Transform the value, keeping advisories.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            advisories: self.advisories,
        }
    }
}
