//! Command-line argument parsing
//!
//! Supports:
//! - Evaluating every expression in a note file or stdin
//! - Evaluating a single expression
//! - Re-running on every save of the note file
//! - Copying the last result to the clipboard

use clap::Parser;
use std::path::PathBuf;

/// Find and evaluate the arithmetic in a note
#[derive(Parser, Debug)]
#[command(name = "textcalc", version, about = "Find and evaluate the arithmetic in a note")]
pub struct CliArgs {
    /// Note file to read (stdin when omitted)
    #[arg(value_name = "FILE", conflicts_with = "expr")]
    pub file: Option<PathBuf>,

    /// Evaluate a single expression instead of scanning a note
    #[arg(short, long, value_name = "EXPR")]
    pub expr: Option<String>,

    /// Re-evaluate every time FILE changes
    #[arg(short, long, requires = "file")]
    pub watch: bool,

    /// Print results as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Copy the last result to the clipboard
    #[arg(short, long)]
    pub copy: bool,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// What the invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Evaluate one expression.
    Expression(String),
    /// Scan a note read once from a file, or from stdin when `None`.
    Note(Option<PathBuf>),
    /// Scan a note file and keep rescanning it on change.
    Watch(PathBuf),
}

impl CliArgs {
    pub fn mode(&self) -> RunMode {
        if let Some(expr) = &self.expr {
            return RunMode::Expression(expr.clone());
        }
        match (&self.file, self.watch) {
            (Some(file), true) => RunMode::Watch(file.clone()),
            (file, _) => RunMode::Note(file.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("textcalc").chain(args.iter().copied()))
    }

    #[test]
    fn test_stdin_by_default() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.mode(), RunMode::Note(None));
    }

    #[test]
    fn test_file_and_watch() {
        let args = parse(&["notes.md"]).unwrap();
        assert_eq!(args.mode(), RunMode::Note(Some(PathBuf::from("notes.md"))));

        let args = parse(&["-w", "notes.md"]).unwrap();
        assert_eq!(args.mode(), RunMode::Watch(PathBuf::from("notes.md")));
    }

    #[test]
    fn test_expression() {
        let args = parse(&["-e", "2 + 2", "--json"]).unwrap();
        assert_eq!(args.mode(), RunMode::Expression("2 + 2".to_string()));
        assert!(args.json);
    }

    #[test]
    fn test_watch_requires_file() {
        assert!(parse(&["--watch"]).is_err());
    }

    #[test]
    fn test_file_conflicts_with_expression() {
        assert!(parse(&["notes.md", "-e", "1+1"]).is_err());
    }
}
