//! Story generation command.

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use kaidan::operations::{generate_story, GenerateOptions};
use kaidan::provider::provider_for;

use super::{load_config, open_store};

/// Spinner shown while a provider call is in flight.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// `kaidan generate <word>`
pub fn run(
    word: String,
    blueprint_id: Option<String>,
    style_id: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let config = load_config()?;
    let store = open_store()?;

    let provider = provider_for(config.defaults.provider, &config.providers);
    let model = model.unwrap_or_else(|| config.resolve_model());

    let options = GenerateOptions {
        word: word.clone(),
        blueprint_id,
        style_id,
        auto_style: config.generation.auto_style,
        model,
    };

    let pb = spinner(&format!("Generating story for 「{}」...", word));
    let result = generate_story(&store, provider.as_ref(), &config.gate, options);
    pb.finish_and_clear();
    let record = result?;

    println!("{}", record.title.bold());
    println!();
    println!("{}", record.body);
    println!();
    println!(
        "{} saved {} (blueprint {}, score {}{})",
        "✓".green(),
        record.id.cyan(),
        record.blueprint_id.cyan(),
        record.quality_score,
        match &record.style_id {
            Some(style) => format!(", style {}", style),
            None => String::new(),
        }
    );

    Ok(())
}
