//! Model provider abstraction for story and blueprint generation.
//!
//! Supports multiple providers (OpenAI-compatible endpoints, Ollama, Claude CLI).
//! All providers are blocking: kaidan sends one prompt and wants one body of
//! text back; streaming buys nothing at this call site.
//!
//! # Doc Audit
//! - audited: (pending)
//! - docs: architecture/providers.md
//! - ignore: false

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::process::Command;
use ureq::Agent;

/// Model provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    Openai,
    Ollama,
    Claude,
}

/// Provider configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub openai: Option<OpenaiConfig>,
    #[serde(default)]
    pub ollama: Option<OllamaConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenaiConfig {
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,
    /// API key; falls back to the OPENAI_API_KEY environment variable
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434/v1".to_string()
}

/// Trait for model providers
pub trait ModelProvider {
    /// Send one prompt, get the full completion text back.
    fn generate(&self, prompt: &str, model: &str) -> Result<String>;

    fn name(&self) -> &'static str;
}

/// OpenAI-compatible hosted API provider
pub struct OpenaiProvider {
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl OpenaiProvider {
    fn resolve_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| anyhow!("OPENAI_API_KEY environment variable not set"))
    }
}

impl ModelProvider for OpenaiProvider {
    fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        let api_key = self.resolve_api_key()?;
        let url = format!("{}/chat/completions", self.endpoint);
        chat_completion(&url, Some(&api_key), prompt, model)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Ollama provider (OpenAI-compatible local endpoint, no auth)
pub struct OllamaProvider {
    pub endpoint: String,
}

impl ModelProvider for OllamaProvider {
    fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.endpoint);
        chat_completion(&url, None, prompt, model).map_err(|e| {
            let err_str = e.to_string();
            if err_str.contains("Connection") || err_str.contains("connect") {
                anyhow!(
                    "Failed to connect to Ollama at {}\n\nOllama does not appear to be running. To fix:\n\n  1. Install Ollama: https://ollama.ai/download\n  2. Start Ollama: ollama serve\n  3. Pull a model: ollama pull {}\n\nOr switch providers in .kaidan/config.md",
                    self.endpoint, model
                )
            } else {
                e
            }
        })
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

/// Claude CLI provider (subprocess, uses the locally authenticated CLI)
pub struct ClaudeCliProvider;

impl ModelProvider for ClaudeCliProvider {
    fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        let output = Command::new("claude")
            .arg("--print")
            .arg("--model")
            .arg(model)
            .arg(prompt)
            .output()
            .context("Failed to invoke claude CLI. Is it installed and in PATH?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("claude CLI exited with {}: {}", output.status, stderr.trim());
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        if text.trim().is_empty() {
            anyhow::bail!("Empty response from claude CLI");
        }

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "claude"
    }
}

/// Shared non-streaming chat-completions call.
fn chat_completion(url: &str, api_key: Option<&str>, prompt: &str, model: &str) -> Result<String> {
    let request_body = serde_json::json!({
        "model": model,
        "messages": [
            {
                "role": "user",
                "content": prompt
            }
        ],
        "stream": false,
    });

    let agent = Agent::new();
    let mut request = agent.post(url).set("Content-Type", "application/json");
    if let Some(key) = api_key {
        request = request.set("Authorization", &format!("Bearer {}", key));
    }

    let response = match request.send_json(&request_body) {
        Ok(r) => r,
        Err(ureq::Error::Status(401, _)) => {
            return Err(anyhow!("Authentication failed. Check your API key"));
        }
        Err(ureq::Error::Status(code, response)) => {
            return Err(anyhow!("HTTP {}: {}", code, response.status_text()));
        }
        Err(e) => return Err(anyhow!("HTTP request failed: {}", e)),
    };

    let json: serde_json::Value = response
        .into_json()
        .context("Failed to parse provider response as JSON")?;

    let content = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| anyhow!("No completion content in provider response"))?;

    if content.trim().is_empty() {
        anyhow::bail!("Empty completion from provider");
    }

    Ok(content.to_string())
}

/// Build the provider selected by config.
pub fn provider_for(provider_type: ProviderType, config: &ProviderConfig) -> Box<dyn ModelProvider> {
    match provider_type {
        ProviderType::Openai => {
            let (endpoint, api_key) = match &config.openai {
                Some(c) => (c.endpoint.clone(), c.api_key.clone()),
                None => (default_openai_endpoint(), None),
            };
            Box::new(OpenaiProvider { endpoint, api_key })
        }
        ProviderType::Ollama => {
            let endpoint = match &config.ollama {
                Some(c) => c.endpoint.clone(),
                None => default_ollama_endpoint(),
            };
            Box::new(OllamaProvider { endpoint })
        }
        ProviderType::Claude => Box::new(ClaudeCliProvider),
    }
}
