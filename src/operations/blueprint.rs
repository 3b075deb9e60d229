//! Blueprint save operations.
//!
//! Canonical implementation for creating and updating structural blueprints.
//! The score persisted here is always the one the rubric computes; whatever
//! score the caller brought along is advisory display data, nothing more. The
//! two paths are kept syntactically separate so trusting client input would
//! take deliberate effort, not an accident.

use anyhow::{Context, Result};
use regex::Regex;

use crate::blueprint::{decode_blueprint, required_field_gaps, BlueprintRecord, StructuralBlueprint};
use crate::id::{generate_id, RecordKind};
use crate::repository::Store;
use crate::scoring::{score_blueprint, ScoringResult};
use crate::utc_now_iso;

/// Result of a blueprint save: the stored record plus the full scoring audit
/// trail, and the advisory score the caller sent if it disagreed.
#[derive(Debug)]
pub struct BlueprintSaveOutcome {
    pub record: BlueprintRecord,
    pub scoring: ScoringResult,
    /// Caller-supplied score that was ignored in favor of the recomputed one
    pub advisory_ignored: Option<u32>,
}

/// Fields an update may change. `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct BlueprintUpdate {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Replacement blueprint content as a raw candidate
    pub candidate: Option<serde_json::Value>,
    pub advisory_score: Option<u32>,
}

/// One blueprint whose authoritative score moved during a batch re-score.
#[derive(Debug, PartialEq, Eq)]
pub struct RescoreChange {
    pub id: String,
    pub old_score: u32,
    pub new_score: u32,
}

/// Validate and store a new blueprint.
///
/// Rejections here are shape failures, distinct from a low score: a candidate
/// missing required keys or permitting multiple anomalies never reaches the
/// store, while a well-formed candidate that fails every quality rule is
/// stored with score 0.
pub fn create_blueprint(
    store: &dyn Store,
    title: Option<String>,
    tags: Vec<String>,
    candidate: serde_json::Value,
    advisory_score: Option<u32>,
) -> Result<BlueprintSaveOutcome> {
    let blueprint = check_candidate(candidate)?;

    let tags = normalize_tags(&tags, &blueprint);
    let scoring = score_blueprint(&blueprint);
    let advisory_ignored = advisory_score.filter(|s| *s != scoring.score);

    let now = utc_now_iso();
    let record = BlueprintRecord {
        id: generate_id(RecordKind::Blueprint),
        title: title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| derive_title(&blueprint.anomaly)),
        tags,
        blueprint,
        quality_score: scoring.score,
        created_at: now.clone(),
        updated_at: now,
    };

    store.insert_blueprint(&record)?;

    Ok(BlueprintSaveOutcome {
        record,
        scoring,
        advisory_ignored,
    })
}

/// Apply an update to a stored blueprint, recomputing the score even when the
/// blueprint content itself did not change.
pub fn update_blueprint(
    store: &dyn Store,
    id: &str,
    update: BlueprintUpdate,
) -> Result<BlueprintSaveOutcome> {
    let mut record = store
        .get_blueprint(id)?
        .with_context(|| format!("Blueprint not found: {}", id))?;

    if let Some(candidate) = update.candidate {
        record.blueprint = check_candidate(candidate)?;
    }

    if let Some(title) = update.title {
        let title = title.trim().to_string();
        if !title.is_empty() {
            record.title = title;
        }
    }

    if let Some(tags) = update.tags {
        record.tags = normalize_tags(&tags, &record.blueprint);
    }

    let scoring = score_blueprint(&record.blueprint);
    let advisory_ignored = update.advisory_score.filter(|s| *s != scoring.score);

    record.quality_score = scoring.score;
    record.updated_at = utc_now_iso();
    store.update_blueprint(&record)?;

    Ok(BlueprintSaveOutcome {
        record,
        scoring,
        advisory_ignored,
    })
}

/// Re-run the scorer over every stored blueprint and persist the
/// authoritative values. Returns the blueprints whose score moved.
pub fn rescore_all(store: &dyn Store) -> Result<Vec<RescoreChange>> {
    let mut changes = Vec::new();

    for mut record in store.list_blueprints()? {
        let scoring = score_blueprint(&record.blueprint);
        if scoring.score != record.quality_score {
            changes.push(RescoreChange {
                id: record.id.clone(),
                old_score: record.quality_score,
                new_score: scoring.score,
            });
            record.quality_score = scoring.score;
            record.updated_at = utc_now_iso();
            store.update_blueprint(&record)?;
        }
    }

    Ok(changes)
}

/// Shape-check and decode a raw candidate, enforcing the boundary's hard
/// rules before any quality scoring happens.
fn check_candidate(candidate: serde_json::Value) -> Result<StructuralBlueprint> {
    let gaps = required_field_gaps(&candidate);
    if !gaps.is_empty() {
        anyhow::bail!(
            "Blueprint rejected: missing required fields: {}",
            gaps.join(", ")
        );
    }

    let blueprint = decode_blueprint(candidate)?;

    if !blueprint.constraints.single_anomaly_only {
        anyhow::bail!("Blueprint rejected: constraints.single_anomaly_only must be true");
    }

    Ok(blueprint)
}

/// Trim caller-supplied tags and drop empties; when nothing survives, derive
/// tags from the anomaly text unioned with the allowed subgenres.
pub fn normalize_tags(tags: &[String], blueprint: &StructuralBlueprint) -> Vec<String> {
    let cleaned: Vec<String> = tags
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if !cleaned.is_empty() {
        return cleaned;
    }

    derive_tags(blueprint)
}

/// First two substantial tokens from the head of the anomaly, plus the
/// subgenre tags, de-duplicated in order.
fn derive_tags(blueprint: &StructuralBlueprint) -> Vec<String> {
    let head: String = blueprint.anomaly.trim().chars().take(30).collect();

    let splitter = Regex::new(r"[\s\p{P}]+").unwrap();
    let mut tags: Vec<String> = splitter
        .split(&head)
        .filter(|token| token.chars().count() >= 2)
        .take(2)
        .map(|token| token.to_string())
        .collect();

    for subgenre in &blueprint.allowed_subgenres {
        let subgenre = subgenre.trim();
        if !subgenre.is_empty() {
            tags.push(subgenre.to_string());
        }
    }

    let mut seen = std::collections::HashSet::new();
    tags.retain(|t| seen.insert(t.clone()));
    tags
}

fn derive_title(anomaly: &str) -> String {
    let head: String = anomaly.trim().chars().take(24).collect();
    if head.is_empty() {
        "untitled blueprint".to_string()
    } else {
        head
    }
}
