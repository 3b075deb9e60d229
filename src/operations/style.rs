//! Style archetype save operations.
//!
//! The validator runs on every create and every update - never once-and-done,
//! because callers may edit the style data between extraction and save. A
//! failed validation rejects the whole operation; nothing is written.

use anyhow::{Context, Result};

use crate::id::{generate_id, RecordKind};
use crate::repository::Store;
use crate::style::{decode_style, validate_style_blueprint, StyleRecord, StyleValidationResult};
use crate::utc_now_iso;

/// Result of a style save: the stored record plus any advisory warnings the
/// validator raised.
#[derive(Debug)]
pub struct StyleSaveOutcome {
    pub record: StyleRecord,
    pub validation: StyleValidationResult,
}

/// Validate and store a new style archetype.
///
/// Name collisions among active archetypes are resolved here by appending a
/// counter suffix before validation; the validator itself has no opinion on
/// naming.
pub fn create_style(store: &dyn Store, candidate: serde_json::Value) -> Result<StyleSaveOutcome> {
    let mut style = decode_style(candidate)?;

    let base_name = style.archetype_name.trim().to_string();
    style.archetype_name = unique_archetype_name(store, &base_name, None)?;

    let validation = validate_style_blueprint(&style);
    if !validation.is_valid {
        anyhow::bail!("Style archetype rejected: {}", join_violations(&validation));
    }

    let now = utc_now_iso();
    let record = StyleRecord {
        id: generate_id(RecordKind::Style),
        archetype_name: style.archetype_name.clone(),
        style_data: style,
        quality_score: None,
        is_active: true,
        usage_count: 0,
        created_at: now.clone(),
        updated_at: now,
    };

    store.insert_style(&record)?;

    Ok(StyleSaveOutcome { record, validation })
}

/// Replace a stored archetype's style data, re-validating from scratch.
/// `usage_count` and `is_active` are untouched; they belong to the store.
pub fn update_style(
    store: &dyn Store,
    id: &str,
    candidate: serde_json::Value,
) -> Result<StyleSaveOutcome> {
    let mut record = store
        .get_style(id)?
        .with_context(|| format!("Style archetype not found: {}", id))?;

    let mut style = decode_style(candidate)?;

    let base_name = style.archetype_name.trim().to_string();
    if base_name != record.archetype_name {
        style.archetype_name = unique_archetype_name(store, &base_name, Some(id))?;
    } else {
        style.archetype_name = base_name;
    }

    let validation = validate_style_blueprint(&style);
    if !validation.is_valid {
        anyhow::bail!("Style archetype rejected: {}", join_violations(&validation));
    }

    record.archetype_name = style.archetype_name.clone();
    record.style_data = style;
    record.updated_at = utc_now_iso();
    store.update_style(&record)?;

    Ok(StyleSaveOutcome { record, validation })
}

/// Assign an operator rating to an archetype.
///
/// This is the untrusted caller-supplied path, deliberately separate from
/// blueprint scoring: no rubric recomputes style ratings, so the store keeps
/// exactly what the operator assigned.
pub fn rate_style(store: &dyn Store, id: &str, score: u32) -> Result<()> {
    anyhow::ensure!(score <= 100, "Style rating must be between 0 and 100");

    let mut record = store
        .get_style(id)?
        .with_context(|| format!("Style archetype not found: {}", id))?;

    record.quality_score = Some(score);
    record.updated_at = utc_now_iso();
    store.update_style(&record)
}

/// Record one use of an archetype by generation.
pub fn increment_usage(store: &dyn Store, id: &str) -> Result<u32> {
    let mut record = store
        .get_style(id)?
        .with_context(|| format!("Style archetype not found: {}", id))?;

    record.usage_count += 1;
    record.updated_at = utc_now_iso();
    store.update_style(&record)?;

    Ok(record.usage_count)
}

/// Activate or retire an archetype. Retired archetypes keep their rows and
/// their usage history but leave the selection pool and free up their name.
pub fn set_style_active(store: &dyn Store, id: &str, active: bool) -> Result<()> {
    let mut record = store
        .get_style(id)?
        .with_context(|| format!("Style archetype not found: {}", id))?;

    record.is_active = active;
    record.updated_at = utc_now_iso();
    store.update_style(&record)
}

/// Resolve a name that is free among active archetypes, appending
/// `" (2)"`, `" (3)"`, ... when the base name is taken.
fn unique_archetype_name(
    store: &dyn Store,
    base: &str,
    exclude_id: Option<&str>,
) -> Result<String> {
    let taken: Vec<String> = store
        .list_styles()?
        .into_iter()
        .filter(|s| s.is_active && exclude_id != Some(s.id.as_str()))
        .map(|s| s.archetype_name)
        .collect();

    if !taken.iter().any(|name| name == base) {
        return Ok(base.to_string());
    }

    let mut counter = 2u32;
    loop {
        let candidate = format!("{} ({})", base, counter);
        if !taken.iter().any(|name| *name == candidate) {
            return Ok(candidate);
        }
        counter += 1;
    }
}

fn join_violations(validation: &StyleValidationResult) -> String {
    validation
        .violations
        .iter()
        .map(|v| v.detail.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use serde_json::json;

    fn valid_candidate() -> serde_json::Value {
        json!({
            "archetype_name": "乾いた観察者",
            "narrator_stance": "detached first person",
            "emotion_level": "flat",
            "sentence_style": "short declarative",
            "onomatopoeia_usage": "none",
            "dialogue_style": "fragmentary",
            "tone_features": ["dry"],
            "style_prohibitions": ["exclamation"],
            "sample_phrases": ["台所の電気は消したはずだった。", "三日目も同じ場所にあった。"]
        })
    }

    #[test]
    fn test_create_valid_style() {
        let store = InMemoryStore::new();
        let outcome = create_style(&store, valid_candidate()).unwrap();

        assert_eq!(outcome.record.archetype_name, "乾いた観察者");
        assert!(outcome.record.is_active);
        assert_eq!(outcome.record.usage_count, 0);
        assert!(outcome.validation.is_valid);
    }

    #[test]
    fn test_invalid_style_rejected_without_partial_write() {
        let store = InMemoryStore::new();
        let mut candidate = valid_candidate();
        candidate["sample_phrases"] = json!(["ドアが開いていた！"]);

        let err = create_style(&store, candidate).unwrap_err().to_string();
        assert!(err.contains("Style archetype rejected"));
        assert!(err.contains("exclamation"));
        assert!(store.list_styles().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_name_gets_counter_suffix() {
        let store = InMemoryStore::new();
        let first = create_style(&store, valid_candidate()).unwrap();
        let second = create_style(&store, valid_candidate()).unwrap();
        let third = create_style(&store, valid_candidate()).unwrap();

        assert_eq!(first.record.archetype_name, "乾いた観察者");
        assert_eq!(second.record.archetype_name, "乾いた観察者 (2)");
        assert_eq!(third.record.archetype_name, "乾いた観察者 (3)");
    }

    #[test]
    fn test_retired_archetype_frees_its_name() {
        let store = InMemoryStore::new();
        let first = create_style(&store, valid_candidate()).unwrap();
        set_style_active(&store, &first.record.id, false).unwrap();

        let second = create_style(&store, valid_candidate()).unwrap();
        assert_eq!(second.record.archetype_name, "乾いた観察者");
    }

    #[test]
    fn test_update_revalidates_every_time() {
        let store = InMemoryStore::new();
        let created = create_style(&store, valid_candidate()).unwrap();

        // The same record that passed at create time fails at update time
        // once the edited data breaks a rule.
        let mut degraded = valid_candidate();
        degraded["onomatopoeia_usage"] = json!("frequent");
        degraded["style_prohibitions"] = json!(["onomatopoeia"]);

        let err = update_style(&store, &created.record.id, degraded)
            .unwrap_err()
            .to_string();
        assert!(err.contains("onomatopoeia"));

        // Stored data unchanged.
        let stored = store.get_style(&created.record.id).unwrap().unwrap();
        assert_eq!(stored.style_data.onomatopoeia_usage, "none");
    }

    #[test]
    fn test_update_keeps_usage_count_and_activity() {
        let store = InMemoryStore::new();
        let created = create_style(&store, valid_candidate()).unwrap();
        increment_usage(&store, &created.record.id).unwrap();
        increment_usage(&store, &created.record.id).unwrap();

        let mut candidate = valid_candidate();
        candidate["tone_features"] = json!(["dry", "patient"]);
        let outcome = update_style(&store, &created.record.id, candidate).unwrap();

        assert_eq!(outcome.record.usage_count, 2);
        assert!(outcome.record.is_active);
        assert_eq!(
            outcome.record.style_data.tone_features,
            vec!["dry", "patient"]
        );
    }

    #[test]
    fn test_update_keeping_own_name_needs_no_suffix() {
        let store = InMemoryStore::new();
        let created = create_style(&store, valid_candidate()).unwrap();

        let outcome = update_style(&store, &created.record.id, valid_candidate()).unwrap();
        assert_eq!(outcome.record.archetype_name, "乾いた観察者");
    }

    #[test]
    fn test_update_renaming_onto_taken_name_gets_suffix() {
        let store = InMemoryStore::new();
        create_style(&store, valid_candidate()).unwrap();

        let mut other = valid_candidate();
        other["archetype_name"] = json!("別の声");
        let other = create_style(&store, other).unwrap();

        let renamed = update_style(&store, &other.record.id, valid_candidate()).unwrap();
        assert_eq!(renamed.record.archetype_name, "乾いた観察者 (2)");
    }

    #[test]
    fn test_rate_style_keeps_operator_value() {
        let store = InMemoryStore::new();
        let created = create_style(&store, valid_candidate()).unwrap();
        assert_eq!(created.record.quality_score, None);

        rate_style(&store, &created.record.id, 85).unwrap();
        let stored = store.get_style(&created.record.id).unwrap().unwrap();
        assert_eq!(stored.quality_score, Some(85));

        // Content updates do not clear the rating.
        update_style(&store, &created.record.id, valid_candidate()).unwrap();
        let stored = store.get_style(&created.record.id).unwrap().unwrap();
        assert_eq!(stored.quality_score, Some(85));
    }

    #[test]
    fn test_rate_style_rejects_out_of_range() {
        let store = InMemoryStore::new();
        let created = create_style(&store, valid_candidate()).unwrap();
        assert!(rate_style(&store, &created.record.id, 101).is_err());
    }

    #[test]
    fn test_increment_usage() {
        let store = InMemoryStore::new();
        let created = create_style(&store, valid_candidate()).unwrap();

        assert_eq!(increment_usage(&store, &created.record.id).unwrap(), 1);
        assert_eq!(increment_usage(&store, &created.record.id).unwrap(), 2);
    }

    #[test]
    fn test_warnings_survive_into_outcome() {
        let store = InMemoryStore::new();
        let mut candidate = valid_candidate();
        candidate["sample_phrases"] = json!(["一つだけ。"]);

        let outcome = create_style(&store, candidate).unwrap();
        assert!(outcome.validation.is_valid);
        assert!(!outcome.validation.warnings.is_empty());
    }
}
