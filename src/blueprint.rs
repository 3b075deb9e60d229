//! Structural blueprint data model and shape checks.
//!
//! A structural blueprint is the reusable plot shape of a horror story: the
//! single anomaly, the baseline reality it intrudes on, and the point after
//! which the premise cannot be recovered. Blueprints are extracted from prose
//! by a model or hand-authored, then scored by [`crate::scoring`].

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level keys a blueprint candidate must carry before it is worth scoring.
///
/// This is a shape check, not a quality check: a candidate can pass here and
/// still score 0. The persistence boundary rejects candidates with gaps before
/// the scorer ever sees them, with messaging distinct from a low score.
pub const REQUIRED_FIELDS: &[&str] = &[
    "anomaly",
    "normal_rule",
    "irreversible_point",
    "constraints",
];

/// Boolean/numeric constraints the generated story must obey.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintConstraints {
    /// The story never explains the anomaly
    #[serde(default)]
    pub no_explanations: bool,
    /// Exactly one anomaly; a second one is a hard quality failure
    #[serde(default)]
    pub single_anomaly_only: bool,
    /// No named emotions in the narration
    #[serde(default)]
    pub no_emotion_words: bool,
    /// No tidy ending that restores the normal rule
    #[serde(default)]
    pub no_clean_resolution: bool,
    /// Minimum count of mundane daily details before the anomaly appears
    #[serde(default)]
    pub daily_details_min: u32,
}

/// How the narrative is allowed to terminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndingMode {
    /// Nothing is resolved; the anomaly remains
    Open,
    /// A fragment of explanation surfaces, never the whole
    PartialExplanation,
    /// The ending loops back into the normal rule
    Loop,
    /// The story stops mid-beat
    Silence,
}

impl EndingMode {
    /// Parse a tag, returning `None` for anything unrecognized.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim() {
            "open" => Some(Self::Open),
            "partial_explanation" => Some(Self::PartialExplanation),
            "loop" => Some(Self::Loop),
            "silence" => Some(Self::Silence),
            _ => None,
        }
    }
}

/// Lenient decoder: unknown or non-string ending modes map to `None` rather
/// than failing the whole blueprint decode. Model output is not trusted to
/// stay inside the enum.
fn lenient_ending_mode<'de, D>(deserializer: D) -> Result<Option<EndingMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(EndingMode::parse))
}

/// The narrative shape of a horror story, reusable across many generations.
///
/// All fields default so that decoding partial model output always succeeds;
/// quality problems are the scorer's concern, not the decoder's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralBlueprint {
    /// The single supernatural/uncanny phenomenon at the story's core
    #[serde(default)]
    pub anomaly: String,
    /// The baseline reality established before the anomaly intrudes
    #[serde(default)]
    pub normal_rule: String,
    /// The moment the premise becomes unrecoverable
    #[serde(default)]
    pub irreversible_point: String,
    /// What the reader is allowed to understand
    #[serde(default)]
    pub reader_understands: String,
    /// What must stay beyond the reader's understanding
    #[serde(default)]
    pub reader_cannot_understand: String,
    #[serde(default)]
    pub constraints: BlueprintConstraints,
    /// Category tags generation may match against
    #[serde(default)]
    pub allowed_subgenres: Vec<String>,
    /// Concrete sensory-detail seeds
    #[serde(default)]
    pub detail_bank: Vec<String>,
    /// How the narrative must terminate
    #[serde(default)]
    pub ending_style: String,
    #[serde(default, deserialize_with = "lenient_ending_mode")]
    pub ending_mode: Option<EndingMode>,
}

/// A stored structural blueprint row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueprintRecord {
    pub id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub blueprint: StructuralBlueprint,
    /// Authoritative score, always recomputed at save time
    pub quality_score: u32,
    pub created_at: String,
    pub updated_at: String,
}

/// A stored generated story row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryRecord {
    pub id: String,
    /// The seed word the story was generated from
    pub word: String,
    pub title: String,
    pub body: String,
    pub blueprint_id: String,
    /// Style archetype used, if one was co-selected
    pub style_id: Option<String>,
    /// Quality score of the blueprint at generation time
    pub quality_score: u32,
    pub created_at: String,
}

/// Report which required top-level keys are absent from a raw candidate.
///
/// Returns an empty list when the candidate is an object carrying every key in
/// [`REQUIRED_FIELDS`]. A non-object candidate is missing all of them.
pub fn required_field_gaps(candidate: &serde_json::Value) -> Vec<String> {
    match candidate.as_object() {
        Some(map) => REQUIRED_FIELDS
            .iter()
            .filter(|key| !map.contains_key(**key))
            .map(|key| key.to_string())
            .collect(),
        None => REQUIRED_FIELDS.iter().map(|key| key.to_string()).collect(),
    }
}

/// Decode a raw candidate into a typed blueprint.
///
/// Unknown keys are ignored; missing keys default. Callers that care about
/// missing keys run [`required_field_gaps`] first.
pub fn decode_blueprint(candidate: serde_json::Value) -> anyhow::Result<StructuralBlueprint> {
    use anyhow::Context;
    serde_json::from_value(candidate).context("Failed to decode blueprint candidate")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_blueprint() {
        let candidate = json!({
            "anomaly": "鏡の中に誰かいる",
            "normal_rule": "普通の家",
            "irreversible_point": "鏡を割った",
            "reader_understands": "怖いと感じること",
            "reader_cannot_understand": "正体",
            "constraints": {
                "no_explanations": true,
                "single_anomaly_only": true,
                "no_emotion_words": false,
                "no_clean_resolution": true,
                "daily_details_min": 3
            },
            "allowed_subgenres": ["心霊"],
            "detail_bank": ["蛇口の水音", "消し忘れた廊下の灯り"],
            "ending_style": "未解決",
            "ending_mode": "open"
        });

        let bp = decode_blueprint(candidate).unwrap();
        assert_eq!(bp.anomaly, "鏡の中に誰かいる");
        assert!(bp.constraints.single_anomaly_only);
        assert_eq!(bp.constraints.daily_details_min, 3);
        assert_eq!(bp.ending_mode, Some(EndingMode::Open));
    }

    #[test]
    fn test_decode_partial_blueprint_defaults() {
        let candidate = json!({"anomaly": "the light hums at night"});
        let bp = decode_blueprint(candidate).unwrap();
        assert_eq!(bp.normal_rule, "");
        assert!(!bp.constraints.single_anomaly_only);
        assert!(bp.detail_bank.is_empty());
        assert_eq!(bp.ending_mode, None);
    }

    #[test]
    fn test_unknown_ending_mode_maps_to_none() {
        let candidate = json!({"anomaly": "x", "ending_mode": "triumphant_finale"});
        let bp = decode_blueprint(candidate).unwrap();
        assert_eq!(bp.ending_mode, None);
    }

    #[test]
    fn test_non_string_ending_mode_maps_to_none() {
        let candidate = json!({"anomaly": "x", "ending_mode": 7});
        let bp = decode_blueprint(candidate).unwrap();
        assert_eq!(bp.ending_mode, None);
    }

    #[test]
    fn test_ending_mode_roundtrip() {
        let bp = StructuralBlueprint {
            ending_mode: Some(EndingMode::PartialExplanation),
            ..Default::default()
        };
        let json = serde_json::to_value(&bp).unwrap();
        assert_eq!(json["ending_mode"], "partial_explanation");

        let back: StructuralBlueprint = serde_json::from_value(json).unwrap();
        assert_eq!(back.ending_mode, Some(EndingMode::PartialExplanation));
    }

    #[test]
    fn test_required_field_gaps_complete() {
        let candidate = json!({
            "anomaly": "a",
            "normal_rule": "b",
            "irreversible_point": "c",
            "constraints": {}
        });
        assert!(required_field_gaps(&candidate).is_empty());
    }

    #[test]
    fn test_required_field_gaps_reports_missing_keys() {
        let candidate = json!({"anomaly": "a", "constraints": {}});
        let gaps = required_field_gaps(&candidate);
        assert_eq!(gaps, vec!["normal_rule", "irreversible_point"]);
    }

    #[test]
    fn test_required_field_gaps_non_object() {
        let gaps = required_field_gaps(&json!("just a string"));
        assert_eq!(gaps.len(), REQUIRED_FIELDS.len());
    }

    #[test]
    fn test_gap_check_is_not_a_quality_check() {
        // Present-but-empty fields pass the shape check; the scorer is the
        // one that complains about them.
        let candidate = json!({
            "anomaly": "",
            "normal_rule": "",
            "irreversible_point": "",
            "constraints": {}
        });
        assert!(required_field_gaps(&candidate).is_empty());
    }
}
