//! Default values and configuration structs with default implementations.

use serde::Deserialize;

use crate::provider::ProviderType;

/// Macro to generate default functions for serde attributes
macro_rules! default_fn {
    ($name:ident, $type:ty, $value:expr) => {
        pub(crate) fn $name() -> $type {
            $value
        }
    };
}

default_fn!(default_true, bool, true);
default_fn!(default_story_count, usize, 20);

/// Conventional model per provider when config does not name one.
pub fn default_model_for(provider: ProviderType) -> String {
    match provider {
        ProviderType::Openai => "gpt-4o-mini".to_string(),
        ProviderType::Ollama => "llama3.1".to_string(),
        ProviderType::Claude => "sonnet".to_string(),
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default provider (openai, ollama, claude)
    #[serde(default)]
    pub provider: ProviderType,
    /// Default model name for generation
    #[serde(default)]
    pub model: Option<String>,
    /// Model used for blueprint/style extraction (defaults to `model`)
    #[serde(default)]
    pub extract_model: Option<String>,
}

/// Options for story generation behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Co-select a style archetype automatically when none is requested
    #[serde(default = "default_true")]
    pub auto_style: bool,
    /// How many stories `story rank` shows by default
    #[serde(default = "default_story_count")]
    pub rank_limit: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            auto_style: default_true(),
            rank_limit: default_story_count(),
        }
    }
}
