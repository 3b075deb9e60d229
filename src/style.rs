//! Style archetype data model and prohibition validator.
//!
//! A style archetype is a reusable narrative voice, independent of plot. The
//! validator gatekeeps archetype creation and update: hard rule violations
//! reject the record outright, while style concerns that are survivable
//! surface as warnings. Like the blueprint scorer it is a pure, total
//! function - it never errors, and warnings never affect validity.

use serde::{Deserialize, Serialize};

/// A reusable narrative-voice template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleBlueprint {
    /// Display name, unique among active archetypes (uniqueness is the
    /// caller's job, not the validator's)
    #[serde(default)]
    pub archetype_name: String,
    /// e.g. "detached first person", "unreliable witness"
    #[serde(default)]
    pub narrator_stance: String,
    /// e.g. "flat", "restrained", "high"
    #[serde(default)]
    pub emotion_level: String,
    /// e.g. "short declarative", "long breathless"
    #[serde(default)]
    pub sentence_style: String,
    /// e.g. "none", "sparse", "frequent"
    #[serde(default)]
    pub onomatopoeia_usage: String,
    /// e.g. "none", "fragmentary", "overheard"
    #[serde(default)]
    pub dialogue_style: String,
    #[serde(default)]
    pub tone_features: Vec<String>,
    /// Stylistic devices the generator must avoid, e.g. "exclamation"
    #[serde(default)]
    pub style_prohibitions: Vec<String>,
    /// Example fragments in this voice
    #[serde(default)]
    pub sample_phrases: Vec<String>,
}

/// A stored style archetype row. `is_active`, `usage_count`, and
/// `quality_score` are owned by the persistence layer, not by the style data.
///
/// Unlike blueprint scores, a style score has no computing authority - the
/// validator only gates validity - so it is an operator-assigned rating and
/// stays `None` until someone rates the archetype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleRecord {
    pub id: String,
    pub archetype_name: String,
    pub style_data: StyleBlueprint,
    pub quality_score: Option<u32>,
    pub is_active: bool,
    pub usage_count: u32,
    pub created_at: String,
    pub updated_at: String,
}

/// One failed check. Callers join `detail` strings for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleViolation {
    pub field: String,
    pub detail: String,
}

/// Validation outcome. `is_valid` is true iff `violations` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleValidationResult {
    pub is_valid: bool,
    pub violations: Vec<StyleViolation>,
    pub warnings: Vec<StyleViolation>,
}

/// Prohibition tags the validator can enforce against sample phrases and
/// declared usage. Tags outside this set demote to warnings.
const KNOWN_DEVICES: &[&str] = &[
    "exclamation",
    "question",
    "ellipsis",
    "emotion_words",
    "direct_address",
    "onomatopoeia",
];

/// Named emotions, both languages the corpus uses. Substring match,
/// lowercased; matching "fearsome" on "fear" is accepted looseness.
const EMOTION_WORDS: &[&str] = &[
    "怖い",
    "恐ろしい",
    "恐怖",
    "悲しい",
    "不安",
    "絶望",
    "scared",
    "terrified",
    "horrified",
    "dread",
    "fear",
    "afraid",
];

fn contains_emotion_word(phrase: &str) -> bool {
    let lower = phrase.to_lowercase();
    EMOTION_WORDS.iter().any(|w| lower.contains(w))
}

fn contains_direct_address(phrase: &str) -> bool {
    if phrase.contains("あなた") {
        return true;
    }
    // "you" must stand alone; a bare substring check would match "your".
    phrase
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word.eq_ignore_ascii_case("you"))
}

/// Probe for a prohibited device in a sample phrase. `None` means the tag is
/// known but has no phrase-level detector (onomatopoeia is checked against
/// declared usage instead).
fn device_probe(tag: &str) -> Option<fn(&str) -> bool> {
    match tag {
        "exclamation" => Some(|p| p.contains('!') || p.contains('！')),
        "question" => Some(|p| p.contains('?') || p.contains('？')),
        "ellipsis" => Some(|p| p.contains("...") || p.contains('…')),
        "emotion_words" => Some(contains_emotion_word),
        "direct_address" => Some(contains_direct_address),
        _ => None,
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Whether `onomatopoeia_usage` declares active use.
fn declares_onomatopoeia(usage: &str) -> bool {
    let usage = usage.trim().to_lowercase();
    !(usage.is_empty() || usage == "none" || usage == "なし")
}

/// Whether `emotion_level` declares a high level.
fn declares_high_emotion(level: &str) -> bool {
    matches!(
        level.trim().to_lowercase().as_str(),
        "high" | "strong" | "強" | "強い" | "激しい"
    )
}

/// Validate a style archetype against the prohibition rule set.
///
/// Hard rules produce violations and reject the save; advisory rules produce
/// warnings and never affect `is_valid`. Total over any well-typed input,
/// including one with all-empty list fields. Must be re-run on every create
/// and every update - the persistence boundary never trusts a validation
/// performed earlier in the pipeline.
pub fn validate_style_blueprint(style: &StyleBlueprint) -> StyleValidationResult {
    let mut violations = Vec::new();
    let mut warnings = Vec::new();

    if style.archetype_name.trim().chars().count() < 2 {
        violations.push(StyleViolation {
            field: "archetype_name".to_string(),
            detail: "archetype_name must be at least 2 characters".to_string(),
        });
    }

    if is_blank(&style.narrator_stance) {
        violations.push(StyleViolation {
            field: "narrator_stance".to_string(),
            detail: "narrator_stance is required".to_string(),
        });
    }

    if is_blank(&style.emotion_level) {
        violations.push(StyleViolation {
            field: "emotion_level".to_string(),
            detail: "emotion_level is required".to_string(),
        });
    }

    if is_blank(&style.sentence_style) {
        violations.push(StyleViolation {
            field: "sentence_style".to_string(),
            detail: "sentence_style is required".to_string(),
        });
    }

    let prohibitions: Vec<String> = style
        .style_prohibitions
        .iter()
        .map(|t| normalize_tag(t))
        .filter(|t| !t.is_empty())
        .collect();

    // Internal contradictions: a prohibited device also declared as used.
    if prohibitions.iter().any(|t| t == "onomatopoeia")
        && declares_onomatopoeia(&style.onomatopoeia_usage)
    {
        violations.push(StyleViolation {
            field: "onomatopoeia_usage".to_string(),
            detail: format!(
                "onomatopoeia is prohibited but usage is '{}'",
                style.onomatopoeia_usage.trim()
            ),
        });
    }

    if prohibitions.iter().any(|t| t == "emotion_words")
        && declares_high_emotion(&style.emotion_level)
    {
        violations.push(StyleViolation {
            field: "emotion_level".to_string(),
            detail: format!(
                "emotion words are prohibited but emotion_level is '{}'",
                style.emotion_level.trim()
            ),
        });
    }

    // Sample phrases must not exhibit a prohibited device.
    for tag in &prohibitions {
        if let Some(probe) = device_probe(tag) {
            for (idx, phrase) in style.sample_phrases.iter().enumerate() {
                if probe(phrase) {
                    violations.push(StyleViolation {
                        field: "sample_phrases".to_string(),
                        detail: format!(
                            "sample phrase {} uses prohibited device '{}'",
                            idx + 1,
                            tag
                        ),
                    });
                }
            }
        }
    }

    // Advisory checks.
    for tag in &prohibitions {
        if !KNOWN_DEVICES.contains(&tag.as_str()) {
            warnings.push(StyleViolation {
                field: "style_prohibitions".to_string(),
                detail: format!("unrecognized prohibition tag '{}' cannot be enforced", tag),
            });
        }
    }

    let mut seen = std::collections::HashSet::new();
    for tag in &prohibitions {
        if !seen.insert(tag.clone()) {
            warnings.push(StyleViolation {
                field: "style_prohibitions".to_string(),
                detail: format!("duplicate prohibition tag '{}'", tag),
            });
        }
    }

    if style.tone_features.iter().all(|t| is_blank(t)) {
        warnings.push(StyleViolation {
            field: "tone_features".to_string(),
            detail: "no tone features listed".to_string(),
        });
    }

    if style.sample_phrases.len() < 2 {
        warnings.push(StyleViolation {
            field: "sample_phrases".to_string(),
            detail: "fewer than 2 sample phrases".to_string(),
        });
    }

    if is_blank(&style.dialogue_style) {
        warnings.push(StyleViolation {
            field: "dialogue_style".to_string(),
            detail: "dialogue_style is empty".to_string(),
        });
    }

    StyleValidationResult {
        is_valid: violations.is_empty(),
        violations,
        warnings,
    }
}

/// Decode a raw candidate into typed style data.
pub fn decode_style(candidate: serde_json::Value) -> anyhow::Result<StyleBlueprint> {
    use anyhow::Context;
    serde_json::from_value(candidate).context("Failed to decode style candidate")
}
