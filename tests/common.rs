//! Common test helpers for integration tests

use anyhow::Result;
use kaidan::provider::ModelProvider;
use serde_json::json;

/// A complete, rule-clean blueprint candidate.
pub fn valid_blueprint_candidate() -> serde_json::Value {
    json!({
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
            "daily_details_min": 2
        },
        "allowed_subgenres": ["心霊"],
        "detail_bank": ["蛇口の水音", "消し忘れた灯り", "新聞受けの影"],
        "ending_style": "未解決",
        "ending_mode": "open"
    })
}

/// A rule-clean style archetype candidate.
pub fn valid_style_candidate() -> serde_json::Value {
    json!({
        "archetype_name": "乾いた観察者",
        "narrator_stance": "detached first person",
        "emotion_level": "flat",
        "sentence_style": "short declarative",
        "onomatopoeia_usage": "none",
        "dialogue_style": "fragmentary",
        "tone_features": ["dry", "clinical"],
        "style_prohibitions": ["exclamation", "emotion_words"],
        "sample_phrases": ["台所の電気は消したはずだった。", "三日目も同じ場所にあった。"]
    })
}

/// Provider stub returning a fixed completion.
pub struct StubProvider {
    pub output: String,
}

impl StubProvider {
    pub fn returning(output: &str) -> Self {
        Self {
            output: output.to_string(),
        }
    }
}

impl ModelProvider for StubProvider {
    fn generate(&self, _prompt: &str, _model: &str) -> Result<String> {
        Ok(self.output.clone())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
