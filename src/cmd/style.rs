//! Style archetype commands: add, extract, list, show, update, retire.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use kaidan::formatters::{format_style_list, format_style_validation};
use kaidan::operations::{
    create_style, extract_style_from_text, rate_style, set_style_active, update_style,
};
use kaidan::provider::provider_for;
use kaidan::repository::Store;
use kaidan::style::validate_style_blueprint;

use super::{load_config, open_store};

fn read_candidate(file: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", file.display()))
}

/// `kaidan style add` - store a hand-authored archetype file.
pub fn add(file: &Path) -> Result<()> {
    let store = open_store()?;
    let outcome = create_style(&store, read_candidate(file)?)?;

    println!(
        "{} stored archetype {} ({})",
        "✓".green(),
        outcome.record.id.cyan(),
        outcome.record.archetype_name
    );
    if !outcome.validation.warnings.is_empty() {
        println!("{}", format_style_validation(&outcome.validation));
    }
    Ok(())
}

/// `kaidan style extract` - distill an archetype from source prose.
pub fn extract(from: &Path) -> Result<()> {
    let config = load_config()?;
    let store = open_store()?;
    let source_text = std::fs::read_to_string(from)
        .with_context(|| format!("Failed to read {}", from.display()))?;

    let provider = provider_for(config.defaults.provider, &config.providers);
    let model = config.resolve_extract_model();

    let spinner =
        super::generate::spinner(&format!("Extracting archetype via {}...", provider.name()));
    let result = extract_style_from_text(&store, provider.as_ref(), &model, &source_text);
    spinner.finish_and_clear();
    let outcome = result?;

    println!(
        "{} extracted archetype {} ({})",
        "✓".green(),
        outcome.record.id.cyan(),
        outcome.record.archetype_name
    );
    if !outcome.validation.warnings.is_empty() {
        println!("{}", format_style_validation(&outcome.validation));
    }
    Ok(())
}

/// `kaidan style list`
pub fn list() -> Result<()> {
    let store = open_store()?;
    let records = store.list_styles()?;

    println!("{}", "Style archetypes".bold());
    println!("{}", format_style_list(&records));
    Ok(())
}

/// `kaidan style show`
pub fn show(id: &str) -> Result<()> {
    let store = open_store()?;
    let record = store
        .get_style(id)?
        .with_context(|| format!("Style archetype not found: {}", id))?;

    println!("{} {}", record.id.cyan(), record.archetype_name.bold());
    println!(
        "active: {}  used: {} times",
        record.is_active, record.usage_count
    );
    println!();
    println!("{}", serde_json::to_string_pretty(&record.style_data)?);
    println!();
    println!(
        "{}",
        format_style_validation(&validate_style_blueprint(&record.style_data))
    );
    Ok(())
}

/// `kaidan style update` - replace archetype content from a file.
pub fn update(id: &str, file: &Path) -> Result<()> {
    let store = open_store()?;
    let outcome = update_style(&store, id, read_candidate(file)?)?;

    println!(
        "{} updated archetype {} ({})",
        "✓".green(),
        outcome.record.id.cyan(),
        outcome.record.archetype_name
    );
    if !outcome.validation.warnings.is_empty() {
        println!("{}", format_style_validation(&outcome.validation));
    }
    Ok(())
}

/// `kaidan style rate` - assign an operator rating.
pub fn rate(id: &str, score: u32) -> Result<()> {
    let store = open_store()?;
    rate_style(&store, id, score)?;
    println!("{} rated archetype {} at {}", "✓".green(), id.cyan(), score);
    Ok(())
}

/// `kaidan style retire` / `kaidan style revive`
pub fn set_active(id: &str, active: bool) -> Result<()> {
    let store = open_store()?;
    set_style_active(&store, id, active)?;

    let verb = if active { "revived" } else { "retired" };
    println!("{} {} archetype {}", "✓".green(), verb, id.cyan());
    Ok(())
}
