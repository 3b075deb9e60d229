//! Story browsing commands: list, show, rank.

use anyhow::{Context, Result};
use colored::Colorize;

use kaidan::formatters::format_story_list;
use kaidan::repository::Store;

use super::{load_config, open_store};

/// `kaidan story list` - newest first.
pub fn list() -> Result<()> {
    let config = load_config()?;
    let store = open_store()?;
    let records = store.list_stories()?;

    println!("{}", "Stories".bold());
    println!("{}", format_story_list(&records, &config.gate));
    Ok(())
}

/// `kaidan story show`
pub fn show(id: &str) -> Result<()> {
    let store = open_store()?;
    let record = store
        .get_story(id)?
        .with_context(|| format!("Story not found: {}", id))?;

    println!("{}", record.title.bold());
    println!(
        "{}",
        format!(
            "word: {}  blueprint: {}  created: {}",
            record.word, record.blueprint_id, record.created_at
        )
        .dimmed()
    );
    println!();
    println!("{}", record.body);
    Ok(())
}

/// `kaidan story rank` - blueprint-score ranking view over stories.
pub fn rank(limit: Option<usize>) -> Result<()> {
    let config = load_config()?;
    let store = open_store()?;

    let mut records = store.list_stories()?;
    records.sort_by(|a, b| {
        b.quality_score
            .cmp(&a.quality_score)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    records.truncate(limit.unwrap_or(config.generation.rank_limit));

    println!("{}", "Ranking".bold());
    println!("{}", format_story_list(&records, &config.gate));
    Ok(())
}
