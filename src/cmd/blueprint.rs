//! Blueprint commands: add, extract, score, list, show, update, rescore.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use kaidan::blueprint::{decode_blueprint, required_field_gaps};
use kaidan::formatters::{format_blueprint_list, format_score_report};
use kaidan::operations::{
    self, extract_blueprint_from_text, rescore_all, update_blueprint, BlueprintUpdate,
};
use kaidan::provider::provider_for;
use kaidan::repository::Store;
use kaidan::scoring::score_blueprint;

use super::{load_config, open_store};

fn read_candidate(file: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", file.display()))
}

/// `kaidan blueprint add` - store a hand-authored blueprint file.
pub fn add(
    file: &Path,
    title: Option<String>,
    tags: Vec<String>,
    advisory_score: Option<u32>,
) -> Result<()> {
    let config = load_config()?;
    let store = open_store()?;
    let candidate = read_candidate(file)?;

    let outcome = operations::create_blueprint(&store, title, tags, candidate, advisory_score)?;

    println!(
        "{} stored blueprint {} ({})",
        "✓".green(),
        outcome.record.id.cyan(),
        outcome.record.title
    );
    if let Some(advisory) = outcome.advisory_ignored {
        println!(
            "  {} supplied score {} ignored; recomputed authoritative score is {}",
            "•".yellow(),
            advisory,
            outcome.scoring.score
        );
    }
    println!("{}", format_score_report(&outcome.scoring, &config.gate));
    Ok(())
}

/// `kaidan blueprint score` - preview a blueprint file without storing it.
///
/// Shows the same result a save would persist; this is the interactive "why
/// is my score low" view over the identical scoring function.
pub fn score(file: &Path) -> Result<()> {
    let config = load_config()?;
    let candidate = read_candidate(file)?;

    let gaps = required_field_gaps(&candidate);
    if !gaps.is_empty() {
        println!(
            "{} save would be rejected: missing required fields: {}",
            "✗".red(),
            gaps.join(", ")
        );
        return Ok(());
    }

    let blueprint = decode_blueprint(candidate)?;
    let result = score_blueprint(&blueprint);
    println!("{}", format_score_report(&result, &config.gate));

    if !blueprint.constraints.single_anomaly_only {
        println!(
            "{} save would be rejected: constraints.single_anomaly_only must be true",
            "✗".red()
        );
    }
    Ok(())
}

/// `kaidan blueprint extract` - distill a blueprint from source prose.
pub fn extract(from: &Path, title: Option<String>) -> Result<()> {
    let config = load_config()?;
    let store = open_store()?;
    let source_text = std::fs::read_to_string(from)
        .with_context(|| format!("Failed to read {}", from.display()))?;

    let provider = provider_for(config.defaults.provider, &config.providers);
    let model = config.resolve_extract_model();

    let spinner = super::generate::spinner(&format!("Extracting blueprint via {}...", provider.name()));
    let result = extract_blueprint_from_text(&store, provider.as_ref(), &model, &source_text, title);
    spinner.finish_and_clear();
    let outcome = result?;

    println!(
        "{} extracted blueprint {} ({})",
        "✓".green(),
        outcome.record.id.cyan(),
        outcome.record.title
    );
    println!("{}", format_score_report(&outcome.scoring, &config.gate));
    Ok(())
}

/// `kaidan blueprint list`
pub fn list() -> Result<()> {
    let config = load_config()?;
    let store = open_store()?;
    let records = store.list_blueprints()?;

    println!("{}", "Blueprints".bold());
    println!("{}", format_blueprint_list(&records, &config.gate));
    Ok(())
}

/// `kaidan blueprint show`
pub fn show(id: &str) -> Result<()> {
    let config = load_config()?;
    let store = open_store()?;
    let record = store
        .get_blueprint(id)?
        .with_context(|| format!("Blueprint not found: {}", id))?;

    println!("{} {}", record.id.cyan(), record.title.bold());
    if !record.tags.is_empty() {
        println!("tags: {}", record.tags.join(", "));
    }
    println!("created: {}  updated: {}", record.created_at, record.updated_at);
    println!();
    println!("{}", serde_json::to_string_pretty(&record.blueprint)?);
    println!();
    println!(
        "{}",
        format_score_report(&score_blueprint(&record.blueprint), &config.gate)
    );
    Ok(())
}

/// `kaidan blueprint update`
pub fn update(
    id: &str,
    title: Option<String>,
    tags: Option<Vec<String>>,
    file: Option<&Path>,
    advisory_score: Option<u32>,
) -> Result<()> {
    let config = load_config()?;
    let store = open_store()?;

    let candidate = file.map(read_candidate).transpose()?;
    let outcome = update_blueprint(
        &store,
        id,
        BlueprintUpdate {
            title,
            tags,
            candidate,
            advisory_score,
        },
    )?;

    println!("{} updated {}", "✓".green(), outcome.record.id.cyan());
    if let Some(advisory) = outcome.advisory_ignored {
        println!(
            "  {} supplied score {} ignored; recomputed authoritative score is {}",
            "•".yellow(),
            advisory,
            outcome.scoring.score
        );
    }
    println!("{}", format_score_report(&outcome.scoring, &config.gate));
    Ok(())
}

/// `kaidan blueprint rescore` - batch re-normalize every stored score.
pub fn rescore() -> Result<()> {
    let store = open_store()?;
    let changes = rescore_all(&store)?;

    if changes.is_empty() {
        println!("{} all stored scores already authoritative", "✓".green());
    } else {
        for change in &changes {
            println!(
                "{} {}  {} -> {}",
                "✓".green(),
                change.id.cyan(),
                change.old_score,
                change.new_score
            );
        }
        println!("{} blueprints rescored", changes.len());
    }
    Ok(())
}
