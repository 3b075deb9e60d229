//! # Kaidan - One-Word Horror Story Generation
//!
//! Kaidan turns a single word into a short horror story by combining a
//! structural blueprint (the plot shape: one anomaly, one irreversible point)
//! with an optional style archetype (the narrative voice), and an LLM provider
//! that does the actual prose.
//!
//! ## Overview
//!
//! Blueprints are scored by a deterministic deduction rubric before they are
//! stored; style archetypes are gated by a prohibition rule set. Both checks
//! are pure functions and are re-run authoritatively at the persistence
//! boundary, so a stored quality score can always be reproduced from the
//! stored blueprint alone.
//!
//! ## Core Concepts
//!
//! - **Structural blueprints**: reusable plot-shape templates (anomaly, normal
//!   rule, irreversible point, constraints) that drive generation
//! - **Style archetypes**: reusable narrative-voice templates independent of plot
//! - **Quality gate**: score thresholds deciding which blueprints generation
//!   may select from
//! - **Providers**: pluggable model backends (OpenAI-compatible, Ollama, Claude CLI)
//!
//! ## Modules
//!
//! - [`blueprint`] - Structural blueprint data model and shape checks
//! - [`scoring`] - Deduction rubric and quality tiers
//! - [`style`] - Style archetype data model and prohibition validator
//! - [`extract`] - JSON extraction and schema validation for model output
//! - [`provider`] - Model provider abstraction
//! - [`repository`] - Storage backends behind the `Store` trait
//! - [`operations`] - Persistence-boundary operations (create, update, generate)
//! - [`config`] - Configuration management for kaidan projects
//!
//! ## Example
//!
//! ```
//! use kaidan::blueprint::StructuralBlueprint;
//! use kaidan::scoring::score_blueprint;
//!
//! let blueprint = StructuralBlueprint::default();
//! let result = score_blueprint(&blueprint);
//!
//! // An empty blueprint fails every rule but still reports all of them.
//! assert_eq!(result.score, 0);
//! assert_eq!(result.total_deduction, 135);
//! ```

// Re-export all public modules
pub mod blueprint;
pub mod config;
pub mod extract;
pub mod formatters;
pub mod id;
pub mod operations;
pub mod prompts;
pub mod provider;
pub mod repository;
pub mod scoring;
pub mod style;

/// Default path constants for the kaidan directory structure.
pub mod paths {
    /// Project data directory: `.kaidan`
    pub const KAIDAN_DIR: &str = ".kaidan";
    /// SQLite database file: `.kaidan/kaidan.db`
    pub const DB_FILE: &str = ".kaidan/kaidan.db";
    /// Directory containing prompt templates: `.kaidan/prompts`
    pub const PROMPTS_DIR: &str = ".kaidan/prompts";
    /// Project configuration file: `.kaidan/config.md`
    pub const CONFIG_FILE: &str = ".kaidan/config.md";
}

/// Generate a UTC timestamp in ISO 8601 format: `YYYY-MM-DDTHH:MM:SSZ`
///
/// This function uses `chrono::Utc::now()` to ensure the timestamp is truly in UTC,
/// not local time with a misleading `Z` suffix.
pub fn utc_now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
