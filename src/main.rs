mod cli;

use std::io::{IsTerminal, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use textcalc::calculator::{Calculator, copy_to_clipboard};
use textcalc::config::Config;
use textcalc::items::CalculationResult;
use textcalc::sheet::{NoteSheet, timestamp_now};
use textcalc::ui::{render_json, render_list};
use textcalc::watch::{NoteWatcher, WatchEvent};

use cli::{CliArgs, RunMode};

/// Clear the screen and move the cursor home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

fn main() -> Result<()> {
    textcalc::logging::init();

    let args = CliArgs::parse();
    let config = Config::load(args.config.as_deref())?;
    let calculator = Calculator::new(config.format.clone());
    let json = args.json || config.output.json;

    match args.mode() {
        RunMode::Expression(expr) => run_expression(&calculator, &expr, json, args.copy),
        RunMode::Note(file) => {
            let text = read_note(file.as_deref())?;
            let mut sheet = NoteSheet::new(calculator);
            sheet.update(&text);
            print_calculations(sheet.calculations(), json, false)?;
            if args.copy {
                copy_last(&sheet);
            }
            Ok(())
        }
        RunMode::Watch(file) => watch_note(calculator, &file, json, args.copy),
    }
}

fn run_expression(calculator: &Calculator, expr: &str, json: bool, copy: bool) -> Result<()> {
    let result = calculator.evaluate(expr);

    if json {
        let calc = CalculationResult::new(expr.trim(), result.clone(), timestamp_now());
        println!("{}", serde_json::to_string(&calc)?);
    } else {
        println!("{}", result);
    }

    if copy && let Err(e) = copy_to_clipboard(&result) {
        tracing::warn!("{}", e);
    }
    Ok(())
}

fn watch_note(calculator: Calculator, file: &Path, json: bool, copy: bool) -> Result<()> {
    let watcher = NoteWatcher::new(file)
        .with_context(|| format!("Failed to watch {}", file.display()))?;
    let mut sheet = NoteSheet::new(calculator);
    let clear = std::io::stdout().is_terminal() && !json;

    loop {
        match read_note(Some(watcher.path())) {
            Ok(text) => {
                sheet.update(&text);
                print_calculations(sheet.calculations(), json, clear)?;
                if copy {
                    copy_last(&sheet);
                }
            }
            // Editors may briefly remove the file while saving.
            Err(e) => tracing::warn!("{:#}", e),
        }

        if watcher.wait(None) == WatchEvent::Closed {
            tracing::info!("File watcher closed, exiting");
            return Ok(());
        }
    }
}

fn read_note(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read note {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read note from stdin")?;
            Ok(text)
        }
    }
}

fn print_calculations(calcs: &[CalculationResult], json: bool, clear: bool) -> Result<()> {
    let rendered = if json {
        render_json(calcs)?
    } else {
        render_list(calcs)
    };

    let mut stdout = std::io::stdout().lock();
    if clear {
        stdout.write_all(CLEAR_SCREEN.as_bytes())?;
    }
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn copy_last(sheet: &NoteSheet) {
    let Some(last) = sheet.last() else {
        tracing::debug!("Nothing to copy");
        return;
    };
    if let Err(e) = copy_to_clipboard(last.text_for_clipboard()) {
        tracing::warn!("{}", e);
    }
}
