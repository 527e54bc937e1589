//! Expression detection inside free-form note text.
//!
//! A single pattern is run over the whole note. It picks up either a call
//! to one of the known functions with a parenthesized argument, or a number
//! optionally chained to further numbers, parenthesized groups or the
//! constants `pi`/`e` through `+ - * / ^`.
//!
//! The pattern favors recall: any digit run in prose ("the year 2024") is
//! a candidate too. Parentheses inside a function argument are not
//! balanced, so `sqrt(sin(pi))` is cut at the first `)`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches one candidate expression.
    ///
    /// Digits and word boundaries are ASCII-only so that other scripts'
    /// numerals are never picked up.
    static ref EXPRESSION: Regex = Regex::new(concat!(
        r"(?-u:\b)(?:",
        r"(?:sin|cos|tan|sqrt|log)\s*\([^)]+\)",
        r"|",
        r"[0-9]*\.?[0-9]+",
        r"(?:\s*[-+*/^]\s*(?:[0-9]*\.?[0-9]+|\([^)]+\)|(?-u:\b)(?:pi|e)(?-u:\b)))*",
        r")",
    ))
    .unwrap();
}

/// Iterate over trimmed candidate expressions in left-to-right order,
/// borrowing from the note.
///
/// Empty and whitespace-only matches are skipped.
pub fn candidates(text: &str) -> impl Iterator<Item = &str> {
    EXPRESSION
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|c| !c.is_empty())
}

/// Extract every candidate expression from a note.
pub fn scan(text: &str) -> Vec<String> {
    candidates(text).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prose_without_numbers() {
        assert!(scan("").is_empty());
        assert!(scan("hello world").is_empty());
        assert!(scan("pi and e are constants, sine is a word").is_empty());
    }

    #[test]
    fn test_simple_expressions() {
        assert_eq!(scan("5+5"), vec!["5+5"]);
        assert_eq!(scan("2 + 2"), vec!["2 + 2"]);
        assert_eq!(scan("2^3"), vec!["2^3"]);
        assert_eq!(scan("3.14 * 2"), vec!["3.14 * 2"]);
    }

    #[test]
    fn test_function_calls() {
        assert_eq!(scan("sqrt(16)"), vec!["sqrt(16)"]);
        assert_eq!(scan("take sin (pi/2) now"), vec!["sin (pi/2)"]);
        assert_eq!(scan("log(100)"), vec!["log(100)"]);
    }

    #[test]
    fn test_function_without_argument_is_ignored() {
        assert!(scan("log()").is_empty());
    }

    #[test]
    fn test_constants_after_operator() {
        assert_eq!(scan("2*pi"), vec!["2*pi"]);
        assert_eq!(scan("3 + e"), vec!["3 + e"]);
        // `pie` is not the constant, so the chain stops before the operator.
        assert_eq!(scan("2*pie"), vec!["2"]);
    }

    #[test]
    fn test_parenthesized_operand() {
        assert_eq!(scan("10 / (2 + 3) done"), vec!["10 / (2 + 3)"]);
    }

    #[test]
    fn test_prose_numbers_are_candidates() {
        assert_eq!(
            scan("price is 2024 and total is 5+5"),
            vec!["2024", "5+5"]
        );
    }

    #[test]
    fn test_nested_parentheses_are_cut() {
        assert_eq!(scan("sqrt(sin(pi))"), vec!["sqrt(sin(pi)"]);
    }

    #[test]
    fn test_digits_glued_to_letters() {
        // No word boundary between `x` and `2`.
        assert!(scan("x2").is_empty());
        // The boundary after `1` lets the fraction start there.
        assert_eq!(scan("v1.5"), vec![".5"]);
    }

    #[test]
    fn test_candidates_borrow_from_note() {
        let text = "a 12 b 3*4";
        let found: Vec<&str> = candidates(text).collect();
        assert_eq!(found, vec!["12", "3*4"]);
    }

    #[test]
    fn test_scan_is_idempotent() {
        let text = "cost 3*4 plus sqrt(9) and 1.5";
        assert_eq!(scan(text), scan(text));
        assert_eq!(scan(text), vec!["3*4", "sqrt(9)", "1.5"]);
    }
}
