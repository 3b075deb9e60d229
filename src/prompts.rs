//! # Bundled Prompt Management
//!
//! This module manages the standard prompts bundled into the kaidan binary.
//! All prompts are embedded at compile time using `include_str!` and can be
//! written to the `.kaidan/prompts/` directory during project initialization,
//! where a project may edit them; an edited copy takes precedence over the
//! bundled one.

use anyhow::{Context as AnyhowContext, Result};
use std::path::Path;
use tera::{Context, Tera};

use crate::blueprint::StructuralBlueprint;
use crate::style::StyleBlueprint;

/// Story generation prompt - turns a word plus a blueprint into a story
pub const STORY: &str = include_str!("../prompts/story.md");

/// Blueprint extraction prompt - distills a plot shape from source prose
pub const EXTRACT_BLUEPRINT: &str = include_str!("../prompts/extract-blueprint.md");

/// Style extraction prompt - distills a narrative voice from source prose
pub const EXTRACT_STYLE: &str = include_str!("../prompts/extract-style.md");

/// Metadata about a bundled prompt
#[derive(Debug, Clone)]
pub struct PromptMetadata {
    /// The name of the prompt (used as filename without .md extension)
    pub name: &'static str,
    /// The purpose/description of the prompt
    pub purpose: &'static str,
    /// The content of the prompt
    pub content: &'static str,
}

/// Returns all bundled prompts with their metadata
pub fn all_bundled_prompts() -> Vec<PromptMetadata> {
    vec![
        PromptMetadata {
            name: "story",
            purpose: "Generate a story from a seed word and a blueprint",
            content: STORY,
        },
        PromptMetadata {
            name: "extract-blueprint",
            purpose: "Extract a structural blueprint from source prose",
            content: EXTRACT_BLUEPRINT,
        },
        PromptMetadata {
            name: "extract-style",
            purpose: "Extract a style archetype from source prose",
            content: EXTRACT_STYLE,
        },
    ]
}

/// Get a bundled prompt by name
pub fn get_prompt(name: &str) -> Option<PromptMetadata> {
    all_bundled_prompts().into_iter().find(|p| p.name == name)
}

/// Load a prompt template, preferring a project override in
/// `.kaidan/prompts/<name>.md` over the bundled copy.
pub fn load_prompt(name: &str) -> Result<String> {
    let override_path = Path::new(crate::paths::PROMPTS_DIR).join(format!("{}.md", name));
    if override_path.exists() {
        return std::fs::read_to_string(&override_path)
            .with_context(|| format!("Failed to read prompt override {}", override_path.display()));
    }

    get_prompt(name)
        .map(|p| p.content.to_string())
        .ok_or_else(|| anyhow::anyhow!("Unknown prompt: {}", name))
}

/// Render the story prompt for a word, a blueprint, and an optional voice.
pub fn render_story_prompt(
    template: &str,
    word: &str,
    blueprint: &StructuralBlueprint,
    style: Option<&StyleBlueprint>,
) -> Result<String> {
    let mut context = Context::new();
    context.insert("word", word);
    context.insert("blueprint", blueprint);
    match style {
        Some(style) => context.insert("style", style),
        // Always defined so templates can test it with a plain `if`.
        None => context.insert("style", &serde_json::Value::Null),
    }

    Tera::one_off(template, &context, false).context("Failed to render story prompt")
}

/// Render an extraction prompt over source prose, appending the output-format
/// section derived from the embedded schema.
pub fn render_extraction_prompt(
    template: &str,
    source_text: &str,
    schema_section: &str,
) -> Result<String> {
    let mut context = Context::new();
    context.insert("source_text", source_text);

    let rendered =
        Tera::one_off(template, &context, false).context("Failed to render extraction prompt")?;
    Ok(format!("{}{}", rendered, schema_section))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::BlueprintConstraints;

    fn sample_blueprint() -> StructuralBlueprint {
        StructuralBlueprint {
            anomaly: "the elevator stops on a floor that does not exist".to_string(),
            normal_rule: "an office building after hours".to_string(),
            irreversible_point: "he stepped out".to_string(),
            reader_understands: "the floor is wrong".to_string(),
            reader_cannot_understand: "what the floor is".to_string(),
            constraints: BlueprintConstraints {
                no_explanations: true,
                single_anomaly_only: true,
                no_emotion_words: false,
                no_clean_resolution: true,
                daily_details_min: 2,
            },
            allowed_subgenres: vec!["liminal".to_string()],
            detail_bank: vec![
                "the hum of vending machines".to_string(),
                "a coat left on a chair".to_string(),
                "carpet seams".to_string(),
            ],
            ending_style: "unresolved".to_string(),
            ending_mode: None,
        }
    }

    #[test]
    fn test_all_bundled_prompts_not_empty() {
        let prompts = all_bundled_prompts();
        assert!(!prompts.is_empty());
        for prompt in prompts {
            assert!(
                !prompt.content.is_empty(),
                "Prompt {} has no content",
                prompt.name
            );
        }
    }

    #[test]
    fn test_get_prompt_nonexistent() {
        assert!(get_prompt("nonexistent").is_none());
    }

    #[test]
    fn test_render_story_prompt_without_style() {
        let rendered = render_story_prompt(STORY, "elevator", &sample_blueprint(), None).unwrap();

        assert!(rendered.contains("elevator"));
        assert!(rendered.contains("a floor that does not exist"));
        assert!(rendered.contains("Never explain the anomaly"));
        assert!(rendered.contains("at least 2 mundane daily details"));
        // No style was given, so the voice section is absent.
        assert!(!rendered.contains("## Voice"));
    }

    #[test]
    fn test_render_story_prompt_with_style() {
        let style = StyleBlueprint {
            archetype_name: "deadpan clerk".to_string(),
            narrator_stance: "first person, bored".to_string(),
            emotion_level: "flat".to_string(),
            sentence_style: "short".to_string(),
            onomatopoeia_usage: "none".to_string(),
            dialogue_style: "none".to_string(),
            tone_features: vec![],
            style_prohibitions: vec!["exclamation".to_string(), "ellipsis".to_string()],
            sample_phrases: vec![],
        };

        let rendered =
            render_story_prompt(STORY, "elevator", &sample_blueprint(), Some(&style)).unwrap();

        assert!(rendered.contains("## Voice"));
        assert!(rendered.contains("first person, bored"));
        assert!(rendered.contains("exclamation, ellipsis"));
    }

    #[test]
    fn test_render_extraction_prompt_appends_schema_section() {
        let section = crate::extract::schema_prompt_section(crate::extract::BLUEPRINT_SCHEMA)
            .unwrap();
        let rendered =
            render_extraction_prompt(EXTRACT_BLUEPRINT, "the house was ordinary", &section)
                .unwrap();

        assert!(rendered.contains("the house was ordinary"));
        assert!(rendered.contains("## Output Format"));
    }
}
