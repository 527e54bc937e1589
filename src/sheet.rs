//! The note being edited and the calculations currently shown beside it.
//!
//! Every text change triggers one full scan-and-evaluate pass. The
//! resulting list replaces the previous one wholesale; nothing is merged
//! or carried over between edits.

use chrono::{SecondsFormat, Utc};

use crate::calculator::{Calculator, candidates};
use crate::items::CalculationResult;

/// Current time as an RFC 3339 UTC string with millisecond precision,
/// e.g. `2024-05-01T12:00:00.000Z`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Scan a note and evaluate every candidate expression, in source order.
pub fn calculate(text: &str, calculator: &Calculator) -> Vec<CalculationResult> {
    let timestamp = timestamp_now();

    candidates(text)
        .map(|candidate| {
            CalculationResult::new(candidate, calculator.evaluate(candidate), timestamp.clone())
        })
        .collect()
}

/// Snapshot of a note and its calculations.
#[derive(Clone, Debug, Default)]
pub struct NoteSheet {
    calculator: Calculator,
    note: String,
    calculations: Vec<CalculationResult>,
}

impl NoteSheet {
    pub fn new(calculator: Calculator) -> Self {
        Self {
            calculator,
            note: String::new(),
            calculations: Vec::new(),
        }
    }

    /// Replace the note text and recompute all calculations.
    pub fn update(&mut self, text: &str) -> &[CalculationResult] {
        self.note.clear();
        self.note.push_str(text);
        self.calculations = calculate(text, &self.calculator);

        tracing::debug!(
            "Note changed ({} bytes), {} calculation(s)",
            text.len(),
            self.calculations.len()
        );

        &self.calculations
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn calculations(&self) -> &[CalculationResult] {
        &self.calculations
    }

    /// The calculation furthest down the note, if any.
    pub fn last(&self) -> Option<&CalculationResult> {
        self.calculations.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn pairs(calcs: &[CalculationResult]) -> Vec<(&str, &str)> {
        calcs
            .iter()
            .map(|c| (c.expression.as_str(), c.result.as_str()))
            .collect()
    }

    #[test]
    fn test_prose_and_expression_in_order() {
        let calcs = calculate("price is 2024 and total is 5+5", &Calculator::default());
        assert_eq!(pairs(&calcs), vec![("2024", "2024"), ("5+5", "10")]);
    }

    #[test]
    fn test_no_candidates() {
        assert!(calculate("just some words", &Calculator::default()).is_empty());
    }

    #[test]
    fn test_failed_candidates_stay_in_list() {
        let calcs = calculate("split 1/0 evenly, then sqrt(16)", &Calculator::default());
        assert_eq!(pairs(&calcs), vec![("1/0", "Error"), ("sqrt(16)", "4")]);
        assert!(calcs[0].is_error());
    }

    #[test]
    fn test_timestamps_are_iso8601() {
        let calcs = calculate("1+1 and 2+2", &Calculator::default());
        assert_eq!(calcs.len(), 2);
        assert_eq!(calcs[0].timestamp, calcs[1].timestamp);
        assert!(calcs[0].timestamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&calcs[0].timestamp).is_ok());
    }

    #[test]
    fn test_update_replaces_list() {
        let mut sheet = NoteSheet::default();

        sheet.update("a 1+1 b 2*3 c 4^2");
        assert_eq!(sheet.calculations().len(), 3);

        sheet.update("only 7-2 now");
        assert_eq!(pairs(sheet.calculations()), vec![("7-2", "5")]);
        assert_eq!(sheet.note(), "only 7-2 now");

        sheet.update("");
        assert!(sheet.calculations().is_empty());
        assert!(sheet.last().is_none());
    }

    #[test]
    fn test_list_length_matches_scan() {
        let text = "sin(0) then 3.5 * 2 and 0.25 + pi";
        let mut sheet = NoteSheet::default();
        sheet.update(text);
        assert_eq!(sheet.calculations().len(), crate::calculator::scan(text).len());
        assert_eq!(sheet.last().map(|c| c.expression.as_str()), Some("0.25 + pi"));
    }
}
