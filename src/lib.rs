//! textcalc - arithmetic detection for free-form notes
//!
//! Scans note text for inline expressions (`5+5`, `sqrt(16)`, `2*pi`),
//! evaluates each one and keeps the list of results that a note view
//! shows beside the text.

pub mod calculator;
pub mod config;
pub mod items;
pub mod logging;
pub mod sheet;
pub mod ui;
pub mod watch;

// Re-export commonly used types
pub use calculator::{Calculator, EvalError, evaluate_expression, scan};
pub use config::Config;
pub use items::CalculationResult;
pub use sheet::{NoteSheet, calculate};
