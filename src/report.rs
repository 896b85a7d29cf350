use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{AggregateResult, Assignment};

const BAR_WIDTH: usize = 20;

pub fn percent_text(percent: Option<f64>) -> String {
    match percent {
        Some(p) => format!("{:.2}%", p * 100.0),
        None => "--".to_string(),
    }
}

pub fn weight_text(weight: f64) -> String {
    format!("{:.0}%", weight * 100.0)
}

pub fn letter_text(letter: Option<&str>) -> &str {
    letter.unwrap_or("–")
}

/// Fraction of the category bar to fill; 0 when there is no data. Like the
/// percent itself, this is not capped at 1.
pub fn bar_fraction(percent: Option<f64>) -> f64 {
    percent.unwrap_or(0.0)
}

fn bar_text(percent: Option<f64>) -> String {
    let filled = (bar_fraction(percent) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("|{}{}|", "#".repeat(filled), " ".repeat(BAR_WIDTH - filled))
}

/// Empty when every category has data; otherwise names each missing
/// category and says how its absence affects the weighting.
pub fn advisory_note(result: &AggregateResult, renormalize: bool) -> String {
    if result.missing.is_empty() {
        return String::new();
    }
    let missing: Vec<&str> = result.missing.iter().map(|c| c.label()).collect();
    let effect = if renormalize {
        "Weights re-normalized across present categories."
    } else {
        "Missing categories contribute 0 under fixed 10/30/60 weights."
    };
    format!("Note: No assignments in {}. {}", missing.join(", "), effect)
}

pub fn render_summary(result: &AggregateResult, renormalize: bool) -> String {
    let mut output = String::new();

    for line in &result.categories {
        let _ = writeln!(
            output,
            "{:<17} {:>8}  weight {:>4}  {}",
            line.category.label(),
            percent_text(line.percent),
            weight_text(line.weight),
            bar_text(line.percent)
        );
    }

    let _ = writeln!(
        output,
        "Final grade: {} ({})",
        percent_text(result.final_percent),
        letter_text(result.letter)
    );

    let note = advisory_note(result, renormalize);
    if !note.is_empty() {
        let _ = writeln!(output, "{note}");
    }

    output
}

pub fn build_report(
    assignments: &[Assignment],
    result: &AggregateResult,
    renormalize: bool,
    generated_on: NaiveDate,
) -> String {
    let mut output = String::new();
    let scheme = if renormalize {
        "re-normalized weights"
    } else {
        "fixed 10/30/60 weights"
    };

    let _ = writeln!(output, "# Grade Summary");
    let _ = writeln!(output, "Generated on {generated_on} using {scheme}.");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Categories");

    for line in &result.categories {
        let _ = writeln!(
            output,
            "- {}: {} at weight {}",
            line.category.label(),
            percent_text(line.percent),
            weight_text(line.weight)
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Final Grade");
    let _ = writeln!(
        output,
        "{} ({})",
        percent_text(result.final_percent),
        letter_text(result.letter)
    );

    let note = advisory_note(result, renormalize);
    if !note.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "{note}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Assignments");

    if assignments.is_empty() {
        let _ = writeln!(output, "No assignments recorded.");
    } else {
        for assignment in assignments {
            let _ = writeln!(
                output,
                "- {} ({}): {}/{} ({})",
                if assignment.name.is_empty() {
                    "(unnamed)"
                } else {
                    &assignment.name
                },
                assignment.category.label(),
                assignment.earned,
                assignment.possible,
                percent_text(assignment.percent())
            );
        }
    }

    output
}
