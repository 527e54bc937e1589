//! A single calculation found in a note.

use serde::{Deserialize, Serialize};

use crate::calculator::ERROR_RESULT;

/// One detected expression and its evaluated result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// The expression as it appeared in the note, trimmed.
    pub expression: String,
    /// The formatted result, or `"Error"`.
    pub result: String,
    /// When the note was scanned (RFC 3339, UTC, millisecond precision).
    /// Informational only; never used for ordering.
    pub timestamp: String,
}

impl CalculationResult {
    pub fn new(
        expression: impl Into<String>,
        result: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Check if the expression failed to evaluate.
    pub fn is_error(&self) -> bool {
        self.result == ERROR_RESULT
    }

    /// Get the text to copy to clipboard.
    pub fn text_for_clipboard(&self) -> &str {
        &self.result
    }
}
