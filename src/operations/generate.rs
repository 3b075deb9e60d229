//! Story generation.
//!
//! Turns one word into a stored story: pick a blueprint the quality gate
//! allows, optionally co-select a style archetype, render the prompt, call
//! the provider, persist the result.

use anyhow::{Context, Result};

use crate::blueprint::{BlueprintRecord, StoryRecord};
use crate::id::{generate_id, RecordKind};
use crate::prompts;
use crate::provider::ModelProvider;
use crate::repository::Store;
use crate::scoring::{GateThresholds, QualityTier};
use crate::style::StyleRecord;
use crate::utc_now_iso;

/// Inputs for one generation run.
#[derive(Debug)]
pub struct GenerateOptions {
    pub word: String,
    /// Explicit blueprint choice; otherwise the gate picks
    pub blueprint_id: Option<String>,
    /// Explicit archetype choice; otherwise see `auto_style`
    pub style_id: Option<String>,
    /// Co-select the least-used active archetype when none is named
    pub auto_style: bool,
    pub model: String,
}

/// Generate and store one story.
pub fn generate_story(
    store: &dyn Store,
    provider: &dyn ModelProvider,
    gate: &GateThresholds,
    options: GenerateOptions,
) -> Result<StoryRecord> {
    let word = options.word.trim();
    anyhow::ensure!(!word.is_empty(), "Seed word must not be empty");

    let blueprint = match &options.blueprint_id {
        Some(id) => store
            .get_blueprint(id)?
            .with_context(|| format!("Blueprint not found: {}", id))?,
        None => select_blueprint(store, gate)?,
    };

    let style = match &options.style_id {
        Some(id) => {
            let record = store
                .get_style(id)?
                .with_context(|| format!("Style archetype not found: {}", id))?;
            anyhow::ensure!(
                record.is_active,
                "Style archetype {} is retired",
                record.archetype_name
            );
            Some(record)
        }
        None if options.auto_style => select_style(store)?,
        None => None,
    };

    let template = prompts::load_prompt("story")?;
    let rendered = prompts::render_story_prompt(
        &template,
        word,
        &blueprint.blueprint,
        style.as_ref().map(|s| &s.style_data),
    )?;

    let output = provider.generate(&rendered, &options.model)?;
    let (title, body) = split_story_output(&output, word);

    let record = StoryRecord {
        id: generate_id(RecordKind::Story),
        word: word.to_string(),
        title,
        body,
        blueprint_id: blueprint.id.clone(),
        style_id: style.as_ref().map(|s| s.id.clone()),
        quality_score: blueprint.quality_score,
        created_at: utc_now_iso(),
    };

    store.insert_story(&record)?;

    if let Some(style) = &style {
        super::style::increment_usage(store, &style.id)?;
    }

    Ok(record)
}

/// Highest-scoring blueprint the gate allows. Listing is score-descending, so
/// priority-tier blueprints are naturally preferred over normal-tier ones;
/// low-tier blueprints are excluded outright.
fn select_blueprint(store: &dyn Store, gate: &GateThresholds) -> Result<BlueprintRecord> {
    let candidate = store
        .list_blueprints()?
        .into_iter()
        .find(|record| gate.tier(record.quality_score) != QualityTier::Low);

    candidate.context(
        "No blueprint above the quality gate. Add one with `kaidan blueprint add` or `kaidan blueprint extract`.",
    )
}

/// Least-used active archetype, ties broken by name for determinism. No
/// archetypes at all is fine - stories can be voice-less.
fn select_style(store: &dyn Store) -> Result<Option<StyleRecord>> {
    let mut candidates: Vec<StyleRecord> = store
        .list_styles()?
        .into_iter()
        .filter(|record| record.is_active)
        .collect();

    candidates.sort_by(|a, b| {
        a.usage_count
            .cmp(&b.usage_count)
            .then_with(|| a.archetype_name.cmp(&b.archetype_name))
    });

    Ok(candidates.into_iter().next())
}

/// First non-empty line is the title (markdown heading markers stripped), the
/// rest is the body. A single-line output becomes a body titled by the word.
fn split_story_output(output: &str, word: &str) -> (String, String) {
    let mut lines = output.lines();
    let title = lines
        .by_ref()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim().trim_start_matches('#').trim().to_string())
        .unwrap_or_default();

    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();

    if title.is_empty() || body.is_empty() {
        (word.to_string(), output.trim().to_string())
    } else {
        (title, body)
    }
}
