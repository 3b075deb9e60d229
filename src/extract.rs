//! JSON extraction and schema validation for model output.
//!
//! Models are asked for a JSON candidate but return prose around it more
//! often than not. This module locates the JSON, then validates it against
//! the embedded schema for its kind before the typed decode runs. Schema
//! failure is an ingestion rejection, distinct from a low quality score.

use anyhow::Result;

/// Embedded schema for structural blueprint candidates.
pub const BLUEPRINT_SCHEMA: &str = include_str!("../schemas/blueprint.json");

/// Embedded schema for style archetype candidates.
pub const STYLE_SCHEMA: &str = include_str!("../schemas/style.json");

/// Extract a JSON object from model output text.
///
/// Tries multiple strategies:
/// 1. Look for ```json code blocks
/// 2. Look for bare ``` code blocks that contain JSON
/// 3. Try parsing the entire output as JSON
/// 4. Find a brace-balanced object embedded in the text
pub fn extract_json_from_output(output: &str) -> Option<serde_json::Value> {
    if let Some(json) = extract_json_code_block(output, "json") {
        return Some(json);
    }

    if let Some(json) = extract_json_code_block(output, "") {
        return Some(json);
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(output.trim()) {
        return Some(json);
    }

    find_object_in_text(output)
}

/// Extract JSON from a fenced code block with optional language specifier
fn extract_json_code_block(output: &str, lang: &str) -> Option<serde_json::Value> {
    let mut in_fence = false;
    let mut fence_content = String::new();
    let mut fence_lang = String::new();

    for line in output.lines() {
        let trimmed = line.trim_start();
        if let Some(after_fence) = trimmed.strip_prefix("```") {
            if in_fence {
                in_fence = false;
                if lang.is_empty()
                    || fence_lang.is_empty()
                    || fence_lang.to_lowercase() == lang.to_lowercase()
                {
                    if let Ok(json) = serde_json::from_str::<serde_json::Value>(&fence_content) {
                        return Some(json);
                    }
                }
                fence_content.clear();
                fence_lang.clear();
            } else {
                in_fence = true;
                fence_lang = after_fence.trim().to_string();
            }
        } else if in_fence {
            if !fence_content.is_empty() {
                fence_content.push('\n');
            }
            fence_content.push_str(line);
        }
    }

    // Handle unclosed fence (try what we have)
    if in_fence
        && !fence_content.is_empty()
        && (lang.is_empty()
            || fence_lang.is_empty()
            || fence_lang.to_lowercase() == lang.to_lowercase())
    {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&fence_content) {
            return Some(json);
        }
    }

    None
}

/// Find a brace-balanced JSON object in free text.
fn find_object_in_text(text: &str) -> Option<serde_json::Value> {
    let mut brace_depth = 0;
    let mut start_idx = None;

    for (idx, ch) in text.char_indices() {
        match ch {
            '{' => {
                if brace_depth == 0 {
                    start_idx = Some(idx);
                }
                brace_depth += 1;
            }
            '}' => {
                brace_depth -= 1;
                if brace_depth == 0 {
                    if let Some(start) = start_idx {
                        let candidate = &text[start..=idx];
                        if let Ok(json) = serde_json::from_str::<serde_json::Value>(candidate) {
                            return Some(json);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    None
}

/// Validate a candidate against one of the embedded schemas, collecting every
/// error rather than stopping at the first.
fn schema_errors(schema_str: &str, candidate: &serde_json::Value) -> Result<Vec<String>> {
    let schema: serde_json::Value = serde_json::from_str(schema_str)?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile embedded schema: {}", e))?;

    let errors: Vec<String> = validator
        .iter_errors(candidate)
        .map(|e| {
            let path = e.instance_path.to_string();
            if path.is_empty() {
                e.to_string()
            } else {
                format!("at '{}': {}", path, e)
            }
        })
        .collect();

    Ok(errors)
}

/// Schema errors for a structural blueprint candidate (empty = valid).
pub fn blueprint_schema_errors(candidate: &serde_json::Value) -> Result<Vec<String>> {
    schema_errors(BLUEPRINT_SCHEMA, candidate)
}

/// Schema errors for a style archetype candidate (empty = valid).
pub fn style_schema_errors(candidate: &serde_json::Value) -> Result<Vec<String>> {
    schema_errors(STYLE_SCHEMA, candidate)
}

/// Generate an "Output Format" prompt section from an embedded schema.
///
/// Appended to extraction prompts so the model knows the exact shape.
pub fn schema_prompt_section(schema_str: &str) -> Result<String> {
    let schema: serde_json::Value = serde_json::from_str(schema_str)?;

    let mut section = String::new();
    section.push_str("\n## Output Format\n\n");
    section.push_str("Your output MUST include a single valid JSON object matching this schema:\n\n");
    section.push_str("```json\n");
    section.push_str(&serde_json::to_string_pretty(&schema)?);
    section.push_str("\n```\n");

    if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
        let required_fields: Vec<&str> = required.iter().filter_map(|v| v.as_str()).collect();
        if !required_fields.is_empty() {
            section.push_str(&format!(
                "\n**Required fields:** {}\n",
                required_fields.join(", ")
            ));
        }
    }

    Ok(section)
}
