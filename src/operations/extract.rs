//! Ingestion: distill blueprints and archetypes from source prose.
//!
//! The model is handed the prose and an output-format section derived from
//! the embedded schema; its reply is mined for JSON, schema-checked, and then
//! pushed through the same save operations every other caller uses. The
//! source prose itself is never persisted.

use anyhow::{Context, Result};

use crate::extract::{
    blueprint_schema_errors, extract_json_from_output, schema_prompt_section, style_schema_errors,
    BLUEPRINT_SCHEMA, STYLE_SCHEMA,
};
use crate::prompts;
use crate::provider::ModelProvider;
use crate::repository::Store;

use super::blueprint::{create_blueprint, BlueprintSaveOutcome};
use super::style::{create_style, StyleSaveOutcome};

/// Extract a structural blueprint from prose and store it.
pub fn extract_blueprint_from_text(
    store: &dyn Store,
    provider: &dyn ModelProvider,
    model: &str,
    source_text: &str,
    title: Option<String>,
) -> Result<BlueprintSaveOutcome> {
    anyhow::ensure!(
        !source_text.trim().is_empty(),
        "Source text must not be empty"
    );

    let candidate = run_extraction(
        provider,
        model,
        "extract-blueprint",
        BLUEPRINT_SCHEMA,
        source_text,
    )?;

    let errors = blueprint_schema_errors(&candidate)?;
    if !errors.is_empty() {
        anyhow::bail!(
            "Extracted blueprint failed schema validation: {}",
            errors.join("; ")
        );
    }

    create_blueprint(store, title, vec![], candidate, None)
}

/// Extract a style archetype from prose and store it.
pub fn extract_style_from_text(
    store: &dyn Store,
    provider: &dyn ModelProvider,
    model: &str,
    source_text: &str,
) -> Result<StyleSaveOutcome> {
    anyhow::ensure!(
        !source_text.trim().is_empty(),
        "Source text must not be empty"
    );

    let candidate = run_extraction(provider, model, "extract-style", STYLE_SCHEMA, source_text)?;

    let errors = style_schema_errors(&candidate)?;
    if !errors.is_empty() {
        anyhow::bail!(
            "Extracted style failed schema validation: {}",
            errors.join("; ")
        );
    }

    create_style(store, candidate)
}

fn run_extraction(
    provider: &dyn ModelProvider,
    model: &str,
    prompt_name: &str,
    schema: &str,
    source_text: &str,
) -> Result<serde_json::Value> {
    let template = prompts::load_prompt(prompt_name)?;
    let schema_section = schema_prompt_section(schema)?;
    let rendered = prompts::render_extraction_prompt(&template, source_text, &schema_section)?;

    let output = provider
        .generate(&rendered, model)
        .context("Extraction call failed")?;

    extract_json_from_output(&output)
        .with_context(|| format!("No JSON found in {} output", provider.name()))
}
