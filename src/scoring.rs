//! Blueprint quality scoring.
//!
//! A fixed, ordered deduction rubric maps a structural blueprint to a 0-100
//! score plus the full list of deductions that fired. This is the single
//! source of truth for scoring: interactive preview and the persistence
//! boundary call the same function and get bit-identical results. No I/O, no
//! randomness, no hidden state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::blueprint::StructuralBlueprint;

/// How serious a fired rule is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A named, fixed-point penalty against the 100-point baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    /// Field path the rule fired on, e.g. `constraints.single_anomaly_only`
    pub field: String,
    pub message: String,
    pub points: u32,
    pub severity: Severity,
}

/// Result of scoring one blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Final score, clamped to 0-100
    pub score: u32,
    /// Every rule that fired, in rubric order
    pub deductions: Vec<Deduction>,
    /// Unclamped deduction sum, so callers can tell "barely failed" from
    /// "catastrophically failed" below the clamp
    pub total_deduction: u32,
}

/// Display-oriented reshape of a deduction for preview consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWarning {
    pub field: String,
    pub message: String,
    pub severity: Severity,
    pub deduction: u32,
}

/// Trimmed length of a text field. Lengths throughout the rubric are UTF-8
/// byte lengths of the trimmed string.
fn field_len(s: &str) -> usize {
    s.trim().len()
}

/// Score a blueprint against the deduction rubric.
///
/// Rules are checked independently and cumulatively - each fires or not
/// regardless of the others, and no rule short-circuits the rest, so a caller
/// always receives the complete list of problems in one call.
///
/// The four error rules alone can deduct 105 points against a 100-point
/// baseline; multiple severe defects all clamp to 0. The rubric is a
/// lower-bound quality gate, not a weighted average, and the redundancy is
/// intentional. `total_deduction` carries the unclamped sum.
pub fn score_blueprint(blueprint: &StructuralBlueprint) -> ScoringResult {
    let mut deductions = Vec::new();

    if field_len(&blueprint.anomaly) < 5 {
        deductions.push(Deduction {
            field: "anomaly".to_string(),
            message: "anomaly is missing or too thin to carry a story".to_string(),
            points: 30,
            severity: Severity::Error,
        });
    }

    if field_len(&blueprint.normal_rule) < 5 {
        deductions.push(Deduction {
            field: "normal_rule".to_string(),
            message: "normal_rule is missing; there is no baseline for the anomaly to break"
                .to_string(),
            points: 20,
            severity: Severity::Error,
        });
    }

    if field_len(&blueprint.irreversible_point) < 5 {
        deductions.push(Deduction {
            field: "irreversible_point".to_string(),
            message: "irreversible_point is missing or too thin".to_string(),
            points: 25,
            severity: Severity::Error,
        });
    }

    if !blueprint.constraints.single_anomaly_only {
        deductions.push(Deduction {
            field: "constraints.single_anomaly_only".to_string(),
            message: "more than one anomaly is allowed; the story loses its focus".to_string(),
            points: 30,
            severity: Severity::Error,
        });
    }

    if !blueprint.constraints.no_explanations {
        deductions.push(Deduction {
            field: "constraints.no_explanations".to_string(),
            message: "explanations are allowed; the horror will be reasoned away".to_string(),
            points: 10,
            severity: Severity::Warning,
        });
    }

    if field_len(&blueprint.reader_understands) < 3 {
        deductions.push(Deduction {
            field: "reader_understands".to_string(),
            message: "reader_understands is missing".to_string(),
            points: 5,
            severity: Severity::Warning,
        });
    }

    if field_len(&blueprint.reader_cannot_understand) < 3 {
        deductions.push(Deduction {
            field: "reader_cannot_understand".to_string(),
            message: "reader_cannot_understand is missing".to_string(),
            points: 5,
            severity: Severity::Warning,
        });
    }

    if field_len(&blueprint.ending_style) < 3 {
        deductions.push(Deduction {
            field: "ending_style".to_string(),
            message: "ending_style is missing".to_string(),
            points: 5,
            severity: Severity::Warning,
        });
    }

    if blueprint.detail_bank.len() < 3 {
        deductions.push(Deduction {
            field: "detail_bank".to_string(),
            message: "fewer than 3 detail seeds".to_string(),
            points: 3,
            severity: Severity::Warning,
        });
    }

    if blueprint.allowed_subgenres.is_empty() {
        deductions.push(Deduction {
            field: "allowed_subgenres".to_string(),
            message: "no subgenre tags".to_string(),
            points: 2,
            severity: Severity::Warning,
        });
    }

    let total_deduction: u32 = deductions.iter().map(|d| d.points).sum();

    ScoringResult {
        score: 100u32.saturating_sub(total_deduction),
        deductions,
        total_deduction,
    }
}

/// Reshape deductions for display consumers. Carries no new logic.
pub fn deductions_to_warnings(deductions: &[Deduction]) -> Vec<ScoreWarning> {
    deductions
        .iter()
        .map(|d| ScoreWarning {
            field: d.field.clone(),
            message: d.message.clone(),
            severity: d.severity,
            deduction: d.points,
        })
        .collect()
}

/// Quality gate tier a score lands in. The scorer itself does not enforce
/// these; they are downstream selection policy with thresholds from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Preferred for generation selection
    Priority,
    /// Usable
    Normal,
    /// Excluded from generation selection
    Low,
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Priority => write!(f, "priority"),
            Self::Normal => write!(f, "normal"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Score thresholds for the quality gate. Both bounds are inclusive minimums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateThresholds {
    /// Minimum score for priority use (default: 70)
    #[serde(default = "default_priority_min")]
    pub priority_min: u32,
    /// Minimum score for normal use (default: 50)
    #[serde(default = "default_normal_min")]
    pub normal_min: u32,
}

fn default_priority_min() -> u32 {
    70
}

fn default_normal_min() -> u32 {
    50
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            priority_min: default_priority_min(),
            normal_min: default_normal_min(),
        }
    }
}

impl GateThresholds {
    /// Classify a score. 70 is priority, 69 is normal, 49 is low with the
    /// default thresholds.
    pub fn tier(&self, score: u32) -> QualityTier {
        if score >= self.priority_min {
            QualityTier::Priority
        } else if score >= self.normal_min {
            QualityTier::Normal
        } else {
            QualityTier::Low
        }
    }
}
