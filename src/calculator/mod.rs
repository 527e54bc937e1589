//! Calculator module for finding and evaluating expressions in notes.
//!
//! This module provides functionality to:
//! - Detect candidate expressions inside free-form text
//! - Evaluate expressions and format their results
//! - Copy results to the clipboard

mod clipboard;
mod detection;
mod error;
mod evaluation;
mod format;
mod lexer;
mod parser;
mod value;

pub use clipboard::{ClipboardError, copy_to_clipboard};
pub use detection::{candidates, scan};
pub use error::EvalError;
pub use evaluation::{Calculator, ERROR_RESULT, evaluate_expression, try_evaluate};
pub use format::{FormatOptions, MAX_PRECISION, format_number, format_value};
pub use value::{Complex, Matrix, Value};
