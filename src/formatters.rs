//! Output formatters for records and scoring results.
//!
//! Formatters transform records into colored terminal text. They are pure
//! string builders; printing is the command layer's job.

use colored::Colorize;

use crate::blueprint::{BlueprintRecord, StoryRecord};
use crate::scoring::{deductions_to_warnings, GateThresholds, QualityTier, ScoringResult, Severity};
use crate::style::{StyleRecord, StyleValidationResult};

/// Render a score in its tier color.
pub fn colored_score(score: u32, gate: &GateThresholds) -> String {
    let text = format!("{:>3}", score);
    match gate.tier(score) {
        QualityTier::Priority => text.green().to_string(),
        QualityTier::Normal => text.yellow().to_string(),
        QualityTier::Low => text.red().to_string(),
    }
}

/// Format a scoring result with its full deduction list.
pub fn format_score_report(result: &ScoringResult, gate: &GateThresholds) -> String {
    let mut output = vec![format!(
        "Score: {} ({} tier, {} points deducted)",
        colored_score(result.score, gate),
        gate.tier(result.score),
        result.total_deduction
    )];

    if result.deductions.is_empty() {
        output.push(format!("  {} no deductions", "✓".green()));
    } else {
        for warning in deductions_to_warnings(&result.deductions) {
            let symbol = match warning.severity {
                Severity::Error => "✗".red(),
                Severity::Warning => "•".yellow(),
            };
            output.push(format!(
                "  {} {}  {} (-{})",
                symbol,
                warning.field.cyan(),
                warning.message,
                warning.deduction
            ));
        }
    }

    output.join("\n")
}

/// Format a blueprint listing, one row per record.
pub fn format_blueprint_list(records: &[BlueprintRecord], gate: &GateThresholds) -> String {
    if records.is_empty() {
        return "  (no blueprints)".dimmed().to_string();
    }

    records
        .iter()
        .map(|record| {
            let tags = if record.tags.is_empty() {
                String::new()
            } else {
                format!("  [{}]", record.tags.join(", ")).dimmed().to_string()
            };
            format!(
                "  {} {}  {}{}",
                colored_score(record.quality_score, gate),
                record.id.cyan(),
                truncate(&record.title, 48),
                tags
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a style archetype listing.
pub fn format_style_list(records: &[StyleRecord]) -> String {
    if records.is_empty() {
        return "  (no style archetypes)".dimmed().to_string();
    }

    records
        .iter()
        .map(|record| {
            let state = if record.is_active {
                format!("used {}", record.usage_count).normal()
            } else {
                "retired".dimmed()
            };
            let rating = match record.quality_score {
                Some(score) => format!("  rated {}", score).dimmed().to_string(),
                None => String::new(),
            };
            format!(
                "  {}  {} ({}){}",
                record.id.cyan(),
                truncate(&record.archetype_name, 32),
                state,
                rating
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a story listing.
pub fn format_story_list(records: &[StoryRecord], gate: &GateThresholds) -> String {
    if records.is_empty() {
        return "  (no stories yet)".dimmed().to_string();
    }

    records
        .iter()
        .map(|record| {
            format!(
                "  {} {}  {}  {}",
                colored_score(record.quality_score, gate),
                record.id.cyan(),
                truncate(&record.title, 40),
                format!("({})", record.word).dimmed()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format validator output: violations first, then advisory warnings.
pub fn format_style_validation(result: &StyleValidationResult) -> String {
    let mut output = Vec::new();

    for violation in &result.violations {
        output.push(format!(
            "  {} {}  {}",
            "✗".red(),
            violation.field.cyan(),
            violation.detail
        ));
    }
    for warning in &result.warnings {
        output.push(format!(
            "  {} {}  {}",
            "•".yellow(),
            warning.field.cyan(),
            warning.detail
        ));
    }

    if output.is_empty() {
        format!("  {} no violations", "✓".green())
    } else {
        output.join("\n")
    }
}

/// Truncate a title to fit terminal width, on a character boundary.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::StructuralBlueprint;
    use crate::scoring::score_blueprint;

    fn record(id: &str, score: u32, title: &str) -> BlueprintRecord {
        BlueprintRecord {
            id: id.to_string(),
            title: title.to_string(),
            tags: vec!["tag".to_string()],
            blueprint: StructuralBlueprint::default(),
            quality_score: score,
            created_at: "2026-08-05T00:00:00Z".to_string(),
            updated_at: "2026-08-05T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long blueprint title", 10), "a very ...");
        // Character boundaries, not byte boundaries.
        assert_eq!(truncate("鏡の中に誰かいるという話", 10), "鏡の中に誰かい...");
    }

    #[test]
    fn test_format_score_report_lists_every_deduction() {
        let result = score_blueprint(&StructuralBlueprint::default());
        let report = format_score_report(&result, &GateThresholds::default());

        assert!(report.contains("135 points deducted"));
        assert!(report.contains("anomaly"));
        assert!(report.contains("allowed_subgenres"));
        assert!(report.contains("-30"));
    }

    #[test]
    fn test_format_score_report_clean() {
        let result = crate::scoring::ScoringResult {
            score: 100,
            deductions: vec![],
            total_deduction: 0,
        };
        let report = format_score_report(&result, &GateThresholds::default());
        assert!(report.contains("no deductions"));
    }

    #[test]
    fn test_format_blueprint_list_empty() {
        let out = format_blueprint_list(&[], &GateThresholds::default());
        assert!(out.contains("no blueprints"));
    }

    #[test]
    fn test_format_blueprint_list_rows() {
        let records = vec![record("bp-1", 97, "mirror"), record("bp-2", 12, "thin one")];
        let out = format_blueprint_list(&records, &GateThresholds::default());
        assert!(out.contains("bp-1"));
        assert!(out.contains("mirror"));
        assert!(out.contains("bp-2"));
    }
}
