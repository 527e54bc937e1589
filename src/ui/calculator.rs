//! Calculation rendering.
//!
//! Renders each calculation as `expression = result`, one per line, in
//! the order they appear in the note. A JSON-lines form is available for
//! scripts and editor integrations.

use crate::items::CalculationResult;

/// Render a single calculation as `expression = result`.
pub fn render_calculation(calc: &CalculationResult) -> String {
    format!("{} = {}", calc.expression, calc.result)
}

/// Render the whole list, one calculation per line.
pub fn render_list(calcs: &[CalculationResult]) -> String {
    let mut out = String::new();
    for calc in calcs {
        out.push_str(&render_calculation(calc));
        out.push('\n');
    }
    out
}

/// Render the list as JSON lines, one object per calculation.
pub fn render_json(calcs: &[CalculationResult]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for calc in calcs {
        out.push_str(&serde_json::to_string(calc)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<CalculationResult> {
        vec![
            CalculationResult::new("2024", "2024", "2024-05-01T12:00:00.000Z"),
            CalculationResult::new("5+5", "10", "2024-05-01T12:00:00.000Z"),
        ]
    }

    #[test]
    fn test_render_list() {
        assert_eq!(render_list(&sample()), "2024 = 2024\n5+5 = 10\n");
        assert_eq!(render_list(&[]), "");
    }

    #[test]
    fn test_render_json_lines() {
        let out = render_json(&sample()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: CalculationResult = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.expression, "5+5");
        assert_eq!(parsed.result, "10");
    }
}
