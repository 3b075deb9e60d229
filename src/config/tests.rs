use super::*;
use crate::provider::ProviderType;
use std::io::Write;

const PROJECT_CONFIG: &str = r#"---
project:
  name: yomawari
defaults:
  provider: ollama
  model: llama3.1
gate:
  priority_min: 80
  normal_min: 50
---

# kaidan config
"#;

const GLOBAL_CONFIG: &str = r#"---
defaults:
  provider: openai
  model: gpt-4o
  extract_model: gpt-4o-mini
providers:
  openai:
    endpoint: https://llm.example.com/v1
---
"#;

#[test]
fn test_parse_project_config() {
    let config = Config::parse(PROJECT_CONFIG).unwrap();
    assert_eq!(config.project.name, "yomawari");
    assert_eq!(config.defaults.provider, ProviderType::Ollama);
    assert_eq!(config.gate.priority_min, 80);
    // Unspecified sections default.
    assert!(config.generation.auto_style);
}

#[test]
fn test_parse_rejects_missing_frontmatter() {
    assert!(Config::parse("# no frontmatter here").is_err());
}

#[test]
fn test_parse_rejects_bad_gate_ordering() {
    let content = r#"---
project:
  name: x
gate:
  priority_min: 40
  normal_min: 60
---
"#;
    assert!(Config::parse(content).is_err());
}

#[test]
fn test_merge_project_overrides_global() {
    let tmp = tempfile::TempDir::new().unwrap();
    let global_path = tmp.path().join("global.md");
    let project_path = tmp.path().join("config.md");

    let mut f = std::fs::File::create(&global_path).unwrap();
    f.write_all(GLOBAL_CONFIG.as_bytes()).unwrap();
    let mut f = std::fs::File::create(&project_path).unwrap();
    f.write_all(PROJECT_CONFIG.as_bytes()).unwrap();

    let config = Config::load_merged_from(Some(&global_path), &project_path).unwrap();

    // Project wins where both specify.
    assert_eq!(config.defaults.provider, ProviderType::Ollama);
    assert_eq!(config.defaults.model.as_deref(), Some("llama3.1"));
    // Global fills what the project leaves out.
    assert_eq!(config.defaults.extract_model.as_deref(), Some("gpt-4o-mini"));
    assert_eq!(
        config.providers.openai.as_ref().unwrap().endpoint,
        "https://llm.example.com/v1"
    );
}

#[test]
fn test_merge_without_global() {
    let tmp = tempfile::TempDir::new().unwrap();
    let project_path = tmp.path().join("config.md");
    std::fs::write(&project_path, PROJECT_CONFIG).unwrap();

    let missing_global = tmp.path().join("does-not-exist.md");
    let config = Config::load_merged_from(Some(&missing_global), &project_path).unwrap();
    assert_eq!(config.project.name, "yomawari");
}

#[test]
fn test_resolve_model_falls_back_per_provider() {
    let config = Config::parse(
        r#"---
project:
  name: x
defaults:
  provider: claude
---
"#,
    )
    .unwrap();
    assert_eq!(config.resolve_model(), "sonnet");
    assert_eq!(config.resolve_extract_model(), "sonnet");
}

#[test]
fn test_resolve_extract_model_prefers_explicit() {
    let config = Config::parse(
        r#"---
project:
  name: x
defaults:
  model: gpt-4o
  extract_model: gpt-4o-mini
---
"#,
    )
    .unwrap();
    assert_eq!(config.resolve_model(), "gpt-4o");
    assert_eq!(config.resolve_extract_model(), "gpt-4o-mini");
}

#[test]
fn test_split_frontmatter_roundtrip() {
    let (fm, body) = split_frontmatter("---\na: 1\n---\n\nbody text");
    assert_eq!(fm.unwrap().trim(), "a: 1");
    assert_eq!(body, "body text");
}

#[test]
fn test_split_frontmatter_absent() {
    let (fm, body) = split_frontmatter("just a body");
    assert!(fm.is_none());
    assert_eq!(body, "just a body");
}
