//! Project initialization: scaffold `.kaidan/` with config, prompts, and the
//! database.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use kaidan::paths::{CONFIG_FILE, DB_FILE, KAIDAN_DIR, PROMPTS_DIR};
use kaidan::prompts::all_bundled_prompts;
use kaidan::repository::SqliteStore;

/// Default project config written by `kaidan init`.
fn default_config(project_name: &str) -> String {
    format!(
        r#"---
project:
  name: {}
defaults:
  provider: openai
  # model: gpt-4o-mini
  # extract_model: gpt-4o-mini
# providers:
#   openai:
#     endpoint: https://api.openai.com/v1
#   ollama:
#     endpoint: http://localhost:11434/v1
gate:
  priority_min: 70
  normal_min: 50
generation:
  auto_style: true
  rank_limit: 20
---

# kaidan configuration

Blueprint quality thresholds and provider settings for this project.
Scores at or above `priority_min` are preferred for generation; scores
below `normal_min` are excluded.
"#,
        project_name
    )
}

pub fn run(name: Option<String>, force: bool) -> Result<()> {
    let kaidan_dir = Path::new(KAIDAN_DIR);

    if kaidan_dir.exists() && !force {
        if atty::is(atty::Stream::Stdin) {
            let reinitialize = dialoguer::Confirm::new()
                .with_prompt(format!("{} already exists. Reinitialize?", KAIDAN_DIR))
                .default(false)
                .interact()?;
            if !reinitialize {
                println!("{} keeping existing project", "•".yellow());
                return Ok(());
            }
        } else {
            anyhow::bail!(
                "{} already exists. Use --force to reinitialize.",
                KAIDAN_DIR
            );
        }
    }

    fs::create_dir_all(PROMPTS_DIR).context("Failed to create .kaidan directory")?;

    let project_name = name.unwrap_or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .unwrap_or_else(|| "kaidan".to_string())
    });

    let config_path = Path::new(CONFIG_FILE);
    if !config_path.exists() || force {
        fs::write(config_path, default_config(&project_name))
            .context("Failed to write config")?;
        println!("{} wrote {}", "✓".green(), CONFIG_FILE);
    }

    let mut installed = 0;
    for prompt in all_bundled_prompts() {
        let path = Path::new(PROMPTS_DIR).join(format!("{}.md", prompt.name));
        if !path.exists() || force {
            fs::write(&path, prompt.content)
                .with_context(|| format!("Failed to write prompt {}", prompt.name))?;
            installed += 1;
        }
    }
    println!(
        "{} installed {} prompt templates to {}",
        "✓".green(),
        installed,
        PROMPTS_DIR
    );

    SqliteStore::open(Path::new(DB_FILE))?;
    println!("{} created database at {}", "✓".green(), DB_FILE);

    println!(
        "\n{} project '{}' is ready. Try:\n    kaidan blueprint extract --from story.txt\n    kaidan generate 鏡",
        "✓".green().bold(),
        project_name
    );

    Ok(())
}
