//! CLI entry point and command dispatch for kaidan.
//!
//! # Doc Audit
//! - audited: 2026-07-30
//! - docs: reference/cli.md
//! - ignore: false

mod cmd;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::PathBuf;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")");

#[derive(Parser)]
#[command(name = "kaidan")]
#[command(version = VERSION)]
#[command(about = "One-word horror story generator", long_about = None)]
#[command(
    after_help = "GETTING STARTED:\n    kaidan init                          Scaffold .kaidan/ in this directory\n    kaidan blueprint extract --from f    Distill a blueprint from prose\n    kaidan generate 鏡                    Generate a story from one word"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize kaidan in the current directory
    Init {
        /// Override detected project name
        #[arg(long)]
        name: Option<String>,
        /// Overwrite existing .kaidan/ files
        #[arg(long)]
        force: bool,
    },
    /// Generate a story from a single seed word
    Generate {
        /// The seed word
        word: String,
        /// Use a specific blueprint instead of the quality-gate pick
        #[arg(long)]
        blueprint: Option<String>,
        /// Use a specific style archetype
        #[arg(long)]
        style: Option<String>,
        /// Override the configured model
        #[arg(long)]
        model: Option<String>,
    },
    /// Manage structural blueprints
    Blueprint {
        #[command(subcommand)]
        command: BlueprintCommands,
    },
    /// Manage style archetypes
    Style {
        #[command(subcommand)]
        command: StyleCommands,
    },
    /// Browse generated stories
    Story {
        #[command(subcommand)]
        command: StoryCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum BlueprintCommands {
    /// Store a blueprint from a JSON file
    Add {
        /// Path to the blueprint JSON
        file: PathBuf,
        /// Display title (defaults to the head of the anomaly)
        #[arg(long)]
        title: Option<String>,
        /// Tags (can be specified multiple times)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Advisory score from a preview; ignored in favor of the recomputed one
        #[arg(long)]
        score: Option<u32>,
    },
    /// Distill a blueprint from a prose file via the model
    Extract {
        /// Path to the source prose
        #[arg(long)]
        from: PathBuf,
        /// Display title for the stored blueprint
        #[arg(long)]
        title: Option<String>,
    },
    /// Preview the score of a blueprint file without storing it
    Score {
        /// Path to the blueprint JSON
        file: PathBuf,
    },
    /// List blueprints, highest score first
    List,
    /// Show one blueprint with its scoring report
    Show {
        /// Blueprint ID
        id: String,
    },
    /// Update a stored blueprint
    Update {
        /// Blueprint ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// Replace tags (can be specified multiple times)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Replacement blueprint JSON file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Advisory score; ignored in favor of the recomputed one
        #[arg(long)]
        score: Option<u32>,
    },
    /// Re-run the scorer over every stored blueprint
    Rescore,
}

#[derive(Subcommand)]
enum StyleCommands {
    /// Store a style archetype from a JSON file
    Add {
        /// Path to the archetype JSON
        file: PathBuf,
    },
    /// Distill an archetype from a prose file via the model
    Extract {
        /// Path to the source prose
        #[arg(long)]
        from: PathBuf,
    },
    /// List archetypes, active first
    List,
    /// Show one archetype with its validation report
    Show {
        /// Archetype ID
        id: String,
    },
    /// Update a stored archetype from a JSON file
    Update {
        /// Archetype ID
        id: String,
        /// Replacement archetype JSON file
        file: PathBuf,
    },
    /// Assign an operator rating (0-100) to an archetype
    Rate {
        /// Archetype ID
        id: String,
        /// Rating to record
        score: u32,
    },
    /// Retire an archetype from the selection pool
    Retire {
        /// Archetype ID
        id: String,
    },
    /// Return a retired archetype to the selection pool
    Revive {
        /// Archetype ID
        id: String,
    },
}

#[derive(Subcommand)]
enum StoryCommands {
    /// List stories, newest first
    List,
    /// Show one story
    Show {
        /// Story ID
        id: String,
    },
    /// Rank stories by blueprint score
    Rank {
        /// Maximum number of stories to show
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { name, force } => cmd::init::run(name, force),
        Commands::Generate {
            word,
            blueprint,
            style,
            model,
        } => cmd::generate::run(word, blueprint, style, model),
        Commands::Blueprint { command } => match command {
            BlueprintCommands::Add {
                file,
                title,
                tags,
                score,
            } => cmd::blueprint::add(&file, title, tags, score),
            BlueprintCommands::Extract { from, title } => cmd::blueprint::extract(&from, title),
            BlueprintCommands::Score { file } => cmd::blueprint::score(&file),
            BlueprintCommands::List => cmd::blueprint::list(),
            BlueprintCommands::Show { id } => cmd::blueprint::show(&id),
            BlueprintCommands::Update {
                id,
                title,
                tags,
                file,
                score,
            } => {
                let tags = if tags.is_empty() { None } else { Some(tags) };
                cmd::blueprint::update(&id, title, tags, file.as_deref(), score)
            }
            BlueprintCommands::Rescore => cmd::blueprint::rescore(),
        },
        Commands::Style { command } => match command {
            StyleCommands::Add { file } => cmd::style::add(&file),
            StyleCommands::Extract { from } => cmd::style::extract(&from),
            StyleCommands::List => cmd::style::list(),
            StyleCommands::Show { id } => cmd::style::show(&id),
            StyleCommands::Update { id, file } => cmd::style::update(&id, &file),
            StyleCommands::Rate { id, score } => cmd::style::rate(&id, score),
            StyleCommands::Retire { id } => cmd::style::set_active(&id, false),
            StyleCommands::Revive { id } => cmd::style::set_active(&id, true),
        },
        Commands::Story { command } => match command {
            StoryCommands::List => cmd::story::list(),
            StoryCommands::Show { id } => cmd::story::show(&id),
            StoryCommands::Rank { limit } => cmd::story::rank(limit),
        },
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            generate(shell, &mut command, "kaidan", &mut io::stdout());
            Ok(())
        }
    }
}

fn main() {
    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("{} {:#}", "✗".red(), error);
        std::process::exit(1);
    }
}
