//! In-memory implementation of the `Store` trait for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use crate::blueprint::{BlueprintRecord, StoryRecord};
use crate::style::StyleRecord;

use super::Store;

#[derive(Default)]
struct Tables {
    blueprints: HashMap<String, BlueprintRecord>,
    styles: HashMap<String, StyleRecord>,
    stories: HashMap<String, StoryRecord>,
}

/// In-memory store. Mutable behind a `Mutex` so the `&self` trait surface
/// matches the SQLite backend.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_tables<T>(&self, f: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| anyhow!("store mutex poisoned"))?;
        f(&mut tables)
    }
}

impl Store for InMemoryStore {
    fn insert_blueprint(&self, record: &BlueprintRecord) -> Result<()> {
        self.with_tables(|t| {
            t.blueprints.insert(record.id.clone(), record.clone());
            Ok(())
        })
    }

    fn get_blueprint(&self, id: &str) -> Result<Option<BlueprintRecord>> {
        self.with_tables(|t| Ok(t.blueprints.get(id).cloned()))
    }

    fn update_blueprint(&self, record: &BlueprintRecord) -> Result<()> {
        self.with_tables(|t| {
            if !t.blueprints.contains_key(&record.id) {
                return Err(anyhow!("Blueprint not found: {}", record.id));
            }
            t.blueprints.insert(record.id.clone(), record.clone());
            Ok(())
        })
    }

    fn list_blueprints(&self) -> Result<Vec<BlueprintRecord>> {
        self.with_tables(|t| {
            let mut records: Vec<BlueprintRecord> = t.blueprints.values().cloned().collect();
            records.sort_by(|a, b| {
                b.quality_score
                    .cmp(&a.quality_score)
                    .then_with(|| a.id.cmp(&b.id))
            });
            Ok(records)
        })
    }

    fn insert_style(&self, record: &StyleRecord) -> Result<()> {
        self.with_tables(|t| {
            t.styles.insert(record.id.clone(), record.clone());
            Ok(())
        })
    }

    fn get_style(&self, id: &str) -> Result<Option<StyleRecord>> {
        self.with_tables(|t| Ok(t.styles.get(id).cloned()))
    }

    fn update_style(&self, record: &StyleRecord) -> Result<()> {
        self.with_tables(|t| {
            if !t.styles.contains_key(&record.id) {
                return Err(anyhow!("Style archetype not found: {}", record.id));
            }
            t.styles.insert(record.id.clone(), record.clone());
            Ok(())
        })
    }

    fn list_styles(&self) -> Result<Vec<StyleRecord>> {
        self.with_tables(|t| {
            let mut records: Vec<StyleRecord> = t.styles.values().cloned().collect();
            records.sort_by(|a, b| {
                b.is_active
                    .cmp(&a.is_active)
                    .then_with(|| a.archetype_name.cmp(&b.archetype_name))
            });
            Ok(records)
        })
    }

    fn insert_story(&self, record: &StoryRecord) -> Result<()> {
        self.with_tables(|t| {
            t.stories.insert(record.id.clone(), record.clone());
            Ok(())
        })
    }

    fn get_story(&self, id: &str) -> Result<Option<StoryRecord>> {
        self.with_tables(|t| Ok(t.stories.get(id).cloned()))
    }

    fn list_stories(&self) -> Result<Vec<StoryRecord>> {
        self.with_tables(|t| {
            let mut records: Vec<StoryRecord> = t.stories.values().cloned().collect();
            records.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            });
            Ok(records)
        })
    }
}
