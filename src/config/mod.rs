//! Configuration management for kaidan projects.
//!
//! Config lives in `.kaidan/config.md` as YAML frontmatter, merged over an
//! optional global config at `~/.config/kaidan/config.md`. Project values
//! override global values.
//!
//! # Doc Audit
//! - audited: 2026-07-30
//! - docs: reference/config.md
//! - ignore: false

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::provider::ProviderConfig;
use crate::scoring::GateThresholds;

pub mod defaults;
pub mod validation;

pub use defaults::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub project: ProjectConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub providers: ProviderConfig,
    /// Quality gate thresholds consumed by generation selection
    #[serde(default)]
    pub gate: GateThresholds,
    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    pub name: String,
}

impl Config {
    /// Load configuration with full merge semantics.
    /// Merge order (later overrides earlier):
    /// 1. Global config (~/.config/kaidan/config.md)
    /// 2. Project config (.kaidan/config.md)
    pub fn load() -> Result<Self> {
        Self::load_merged_from(
            global_config_path().as_deref(),
            Path::new(crate::paths::CONFIG_FILE),
        )
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let (frontmatter, _body) = split_frontmatter(content);
        let frontmatter = frontmatter.context("Failed to extract frontmatter from config")?;

        let config: Config =
            serde_yaml::from_str(&frontmatter).context("Failed to parse config frontmatter")?;

        validation::validate_providers(&config.providers)?;
        validation::validate_gate(&config.gate)?;

        Ok(config)
    }

    /// Load merged configuration from specified global and project config paths.
    pub fn load_merged_from(global_path: Option<&Path>, project_path: &Path) -> Result<Self> {
        let global_config = global_path
            .filter(|p| p.exists())
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let project_config = PartialConfig::load_from(project_path)?;

        let config = global_config.merge_with(project_config);

        validation::validate_providers(&config.providers)?;
        validation::validate_gate(&config.gate)?;

        Ok(config)
    }

    /// Model name to use for generation, falling back to the provider's
    /// conventional default.
    pub fn resolve_model(&self) -> String {
        self.defaults
            .model
            .clone()
            .unwrap_or_else(|| default_model_for(self.defaults.provider))
    }

    /// Model name to use for extraction; falls back to the generation model.
    pub fn resolve_extract_model(&self) -> String {
        self.defaults
            .extract_model
            .clone()
            .unwrap_or_else(|| self.resolve_model())
    }
}

/// Returns the path to the global config file at ~/.config/kaidan/config.md
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/kaidan/config.md"))
}

/// Split a markdown document into YAML frontmatter and body.
pub fn split_frontmatter(content: &str) -> (Option<String>, &str) {
    let content = content.trim();

    if !content.starts_with("---") {
        return (None, content);
    }

    let rest = &content[3..];
    if let Some(end) = rest.find("---") {
        let frontmatter = rest[..end].to_string();
        let body = rest[end + 3..].trim_start();
        (Some(frontmatter), body)
    } else {
        (None, content)
    }
}

/// Partial config for merging - all fields optional
#[derive(Debug, Deserialize, Default)]
struct PartialConfig {
    pub project: Option<PartialProjectConfig>,
    pub defaults: Option<PartialDefaultsConfig>,
    pub providers: Option<ProviderConfig>,
    pub gate: Option<GateThresholds>,
    pub generation: Option<GenerationConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct PartialProjectConfig {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct PartialDefaultsConfig {
    pub provider: Option<crate::provider::ProviderType>,
    pub model: Option<String>,
    pub extract_model: Option<String>,
}

impl PartialConfig {
    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self> {
        let (frontmatter, _body) = split_frontmatter(content);
        let frontmatter = frontmatter.context("Failed to extract frontmatter from config")?;

        serde_yaml::from_str(&frontmatter).context("Failed to parse config frontmatter")
    }

    /// Merge this global config with a project config, returning the merged result.
    /// Values from the project config take precedence over global.
    fn merge_with(self, project: PartialConfig) -> Config {
        let global_project = self.project.unwrap_or_default();
        let global_defaults = self.defaults.unwrap_or_default();
        let project_project = project.project.unwrap_or_default();
        let project_defaults = project.defaults.unwrap_or_default();

        Config {
            project: ProjectConfig {
                // Project name is required in project config
                name: project_project
                    .name
                    .or(global_project.name)
                    .unwrap_or_default(),
            },
            defaults: DefaultsConfig {
                // Project value > global value > default
                provider: project_defaults
                    .provider
                    .or(global_defaults.provider)
                    .unwrap_or_default(),
                model: project_defaults.model.or(global_defaults.model),
                extract_model: project_defaults
                    .extract_model
                    .or(global_defaults.extract_model),
            },
            providers: project.providers.or(self.providers).unwrap_or_default(),
            gate: project.gate.or(self.gate).unwrap_or_default(),
            generation: project.generation.or(self.generation).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests;
