//! Turning evaluated values into display strings.
//!
//! Scalars are rounded to a fixed number of significant digits and then
//! printed either in plain decimal form or, when the value falls outside
//! `[lower_exp, upper_exp]`, in exponential form (`2e+6`). The comparison
//! is signed, so every negative scalar prints in exponential form.
//! Trailing zeros are always dropped. Matrices print every element in
//! plain decimal form without rounding.

use serde::{Deserialize, Serialize};

use super::value::{Matrix, Value};

/// Largest useful number of significant digits for an `f64`.
pub const MAX_PRECISION: usize = 17;

/// Formatting knobs for scalar results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Significant digits kept when rounding.
    pub precision: usize,
    /// Values strictly below this use exponential notation.
    pub lower_exp: f64,
    /// Values strictly above this use exponential notation.
    pub upper_exp: f64,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            precision: 14,
            lower_exp: 1e-6,
            upper_exp: 1e6,
        }
    }
}

impl FormatOptions {
    fn digits(&self) -> usize {
        self.precision.clamp(1, MAX_PRECISION)
    }
}

/// Format any evaluated value for display.
pub fn format_value(value: &Value, options: &FormatOptions) -> String {
    match value {
        Value::Number(n) => format_number(*n, options),
        Value::Matrix(m) => format_matrix(m),
        Value::Complex(c) => c.to_string(),
    }
}

/// Format a scalar, choosing between fixed and exponential notation.
pub fn format_number(value: f64, options: &FormatOptions) -> String {
    let value = without_negative_zero(value);

    if value > options.upper_exp || value < options.lower_exp {
        format_exponential(value, options.digits())
    } else {
        format_fixed(value, options.digits())
    }
}

fn format_exponential(value: f64, digits: usize) -> String {
    let (mantissa, exponent) = scientific(value, digits);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{}{}", trim_fraction(&mantissa), sign, exponent.abs())
}

fn format_fixed(value: f64, digits: usize) -> String {
    // Rounding may carry into a new leading digit (999.99... -> 1000), so
    // the decimal count comes from the already rounded exponent.
    let (_, exponent) = scientific(value, digits);
    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{:.*}", decimals, value)).to_string()
}

/// Round to `digits` significant digits, returning mantissa text and exponent.
fn scientific(value: f64, digits: usize) -> (String, i32) {
    let text = format!("{:.*e}", digits - 1, value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => (mantissa.to_string(), exponent.parse().unwrap_or(0)),
        None => (text, 0),
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

fn without_negative_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

fn format_matrix(matrix: &Matrix) -> String {
    match matrix {
        Matrix::Vector(v) => format_row(v),
        Matrix::Grid(rows) => {
            let rows: Vec<String> = rows.iter().map(|r| format_row(r)).collect();
            format!("[{}]", rows.join(", "))
        }
    }
}

fn format_row(row: &[f64]) -> String {
    let cells: Vec<String> = row
        .iter()
        .map(|n| without_negative_zero(*n).to_string())
        .collect();
    format!("[{}]", cells.join(", "))
}
