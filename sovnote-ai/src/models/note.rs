//! Inbound study note

use serde::{Deserialize, Serialize};

/// Study note submitted to `POST /analyze`
///
/// Input only; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Free-form note text written by the student
    pub text: String,
    /// Topic to look up as the reference (e.g. "Kubernetes")
    pub topic: String,
}

impl Note {
    pub fn new(text: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            topic: topic.into(),
        }
    }

    /// Check that both fields carry non-whitespace content
    ///
    /// Returns the name of the first offending field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.text.trim().is_empty() {
            return Err("text");
        }
        if self.topic.trim().is_empty() {
            return Err("topic");
        }
        Ok(())
    }
}
