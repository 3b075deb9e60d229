//! Config validation performed at load time, so a bad endpoint fails at
//! startup instead of mid-generation.

use anyhow::Result;
use url::Url;

use crate::provider::ProviderConfig;
use crate::scoring::GateThresholds;

/// Endpoint URLs must parse and use http(s).
pub fn validate_providers(providers: &ProviderConfig) -> Result<()> {
    if let Some(openai) = &providers.openai {
        validate_endpoint("providers.openai.endpoint", &openai.endpoint)?;
    }
    if let Some(ollama) = &providers.ollama {
        validate_endpoint("providers.ollama.endpoint", &ollama.endpoint)?;
    }
    Ok(())
}

fn validate_endpoint(field: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint)
        .map_err(|e| anyhow::anyhow!("{}: invalid URL '{}': {}", field, endpoint, e))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("{}: endpoint must be http or https, got '{}'", field, endpoint);
    }

    Ok(())
}

/// The normal floor cannot sit above the priority floor.
pub fn validate_gate(gate: &GateThresholds) -> Result<()> {
    if gate.normal_min > gate.priority_min {
        anyhow::bail!(
            "gate.normal_min ({}) must not exceed gate.priority_min ({})",
            gate.normal_min,
            gate.priority_min
        );
    }
    if gate.priority_min > 100 {
        anyhow::bail!("gate.priority_min ({}) must be at most 100", gate.priority_min);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{OllamaConfig, OpenaiConfig};

    #[test]
    fn test_valid_endpoints_pass() {
        let providers = ProviderConfig {
            openai: Some(OpenaiConfig {
                endpoint: "https://api.openai.com/v1".to_string(),
                api_key: None,
            }),
            ollama: Some(OllamaConfig {
                endpoint: "http://localhost:11434/v1".to_string(),
            }),
        };
        assert!(validate_providers(&providers).is_ok());
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let providers = ProviderConfig {
            openai: Some(OpenaiConfig {
                endpoint: "not a url".to_string(),
                api_key: None,
            }),
            ollama: None,
        };
        assert!(validate_providers(&providers).is_err());
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let providers = ProviderConfig {
            openai: Some(OpenaiConfig {
                endpoint: "ftp://example.com/v1".to_string(),
                api_key: None,
            }),
            ollama: None,
        };
        let err = validate_providers(&providers).unwrap_err().to_string();
        assert!(err.contains("http or https"));
    }

    #[test]
    fn test_gate_ordering_enforced() {
        let gate = GateThresholds {
            priority_min: 50,
            normal_min: 70,
        };
        assert!(validate_gate(&gate).is_err());
        assert!(validate_gate(&GateThresholds::default()).is_ok());
    }
}
