//! SQLite implementation of the `Store` trait.
//!
//! Blueprint and style payloads are stored as JSON text columns; the columns
//! the views sort and filter on (score, activity, timestamps) are first-class.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::blueprint::{BlueprintRecord, StoryRecord};
use crate::style::StyleRecord;

use super::Store;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS blueprints (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    tags_json TEXT NOT NULL,
    blueprint_json TEXT NOT NULL,
    quality_score INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_blueprints_score
    ON blueprints(quality_score DESC);

CREATE TABLE IF NOT EXISTS styles (
    id TEXT PRIMARY KEY,
    archetype_name TEXT NOT NULL,
    style_json TEXT NOT NULL,
    quality_score INTEGER,
    is_active INTEGER NOT NULL DEFAULT 1,
    usage_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_styles_active
    ON styles(is_active, archetype_name);

CREATE TABLE IF NOT EXISTS stories (
    id TEXT PRIMARY KEY,
    word TEXT NOT NULL,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    blueprint_id TEXT NOT NULL,
    style_id TEXT,
    quality_score INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_stories_created
    ON stories(created_at DESC);
"#;

/// SQLite-backed store. Construct once, pass by reference.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create data directory {}", parent.display())
                })?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Self::from_connection(conn)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize database schema")?;
        Ok(Self { conn })
    }

    fn row_to_blueprint(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, String, u32, String, String)> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
        ))
    }

    fn decode_blueprint_row(
        (id, title, tags_json, blueprint_json, quality_score, created_at, updated_at): (
            String,
            String,
            String,
            String,
            u32,
            String,
            String,
        ),
    ) -> Result<BlueprintRecord> {
        Ok(BlueprintRecord {
            id,
            title,
            tags: serde_json::from_str(&tags_json).context("Corrupt tags column")?,
            blueprint: serde_json::from_str(&blueprint_json).context("Corrupt blueprint column")?,
            quality_score,
            created_at,
            updated_at,
        })
    }

    #[allow(clippy::type_complexity)]
    fn row_to_style(
        row: &rusqlite::Row<'_>,
    ) -> rusqlite::Result<(String, String, String, Option<u32>, bool, u32, String, String)> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
            row.get(7)?,
        ))
    }

    #[allow(clippy::type_complexity)]
    fn decode_style_row(
        (id, archetype_name, style_json, quality_score, is_active, usage_count, created_at, updated_at): (
            String,
            String,
            String,
            Option<u32>,
            bool,
            u32,
            String,
            String,
        ),
    ) -> Result<StyleRecord> {
        Ok(StyleRecord {
            id,
            archetype_name,
            style_data: serde_json::from_str(&style_json).context("Corrupt style column")?,
            quality_score,
            is_active,
            usage_count,
            created_at,
            updated_at,
        })
    }

    fn row_to_story(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoryRecord> {
        Ok(StoryRecord {
            id: row.get(0)?,
            word: row.get(1)?,
            title: row.get(2)?,
            body: row.get(3)?,
            blueprint_id: row.get(4)?,
            style_id: row.get(5)?,
            quality_score: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl Store for SqliteStore {
    fn insert_blueprint(&self, record: &BlueprintRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO blueprints (id, title, tags_json, blueprint_json, quality_score, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                record.title,
                serde_json::to_string(&record.tags)?,
                serde_json::to_string(&record.blueprint)?,
                record.quality_score,
                record.created_at,
                record.updated_at,
            ],
        )?;
        Ok(())
    }

    fn get_blueprint(&self, id: &str) -> Result<Option<BlueprintRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, title, tags_json, blueprint_json, quality_score, created_at, updated_at
                 FROM blueprints WHERE id = ?1",
                params![id],
                Self::row_to_blueprint,
            )
            .optional()?;

        row.map(Self::decode_blueprint_row).transpose()
    }

    fn update_blueprint(&self, record: &BlueprintRecord) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE blueprints
             SET title = ?2, tags_json = ?3, blueprint_json = ?4, quality_score = ?5, updated_at = ?6
             WHERE id = ?1",
            params![
                record.id,
                record.title,
                serde_json::to_string(&record.tags)?,
                serde_json::to_string(&record.blueprint)?,
                record.quality_score,
                record.updated_at,
            ],
        )?;
        anyhow::ensure!(changed == 1, "Blueprint not found: {}", record.id);
        Ok(())
    }

    fn list_blueprints(&self) -> Result<Vec<BlueprintRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, tags_json, blueprint_json, quality_score, created_at, updated_at
             FROM blueprints ORDER BY quality_score DESC, id ASC",
        )?;
        let rows = stmt.query_map([], Self::row_to_blueprint)?;

        rows.map(|row| Self::decode_blueprint_row(row?))
            .collect::<Result<Vec<_>>>()
    }

    fn insert_style(&self, record: &StyleRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO styles (id, archetype_name, style_json, quality_score, is_active, usage_count, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.archetype_name,
                serde_json::to_string(&record.style_data)?,
                record.quality_score,
                record.is_active,
                record.usage_count,
                record.created_at,
                record.updated_at,
            ],
        )?;
        Ok(())
    }

    fn get_style(&self, id: &str) -> Result<Option<StyleRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, archetype_name, style_json, quality_score, is_active, usage_count, created_at, updated_at
                 FROM styles WHERE id = ?1",
                params![id],
                Self::row_to_style,
            )
            .optional()?;

        row.map(Self::decode_style_row).transpose()
    }

    fn update_style(&self, record: &StyleRecord) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE styles
             SET archetype_name = ?2, style_json = ?3, quality_score = ?4, is_active = ?5, usage_count = ?6, updated_at = ?7
             WHERE id = ?1",
            params![
                record.id,
                record.archetype_name,
                serde_json::to_string(&record.style_data)?,
                record.quality_score,
                record.is_active,
                record.usage_count,
                record.updated_at,
            ],
        )?;
        anyhow::ensure!(changed == 1, "Style archetype not found: {}", record.id);
        Ok(())
    }

    fn list_styles(&self) -> Result<Vec<StyleRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, archetype_name, style_json, quality_score, is_active, usage_count, created_at, updated_at
             FROM styles ORDER BY is_active DESC, archetype_name ASC",
        )?;
        let rows = stmt.query_map([], Self::row_to_style)?;

        rows.map(|row| Self::decode_style_row(row?))
            .collect::<Result<Vec<_>>>()
    }

    fn insert_story(&self, record: &StoryRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO stories (id, word, title, body, blueprint_id, style_id, quality_score, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.word,
                record.title,
                record.body,
                record.blueprint_id,
                record.style_id,
                record.quality_score,
                record.created_at,
            ],
        )?;
        Ok(())
    }

    fn get_story(&self, id: &str) -> Result<Option<StoryRecord>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, word, title, body, blueprint_id, style_id, quality_score, created_at
                 FROM stories WHERE id = ?1",
                params![id],
                Self::row_to_story,
            )
            .optional()?)
    }

    fn list_stories(&self) -> Result<Vec<StoryRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, word, title, body, blueprint_id, style_id, quality_score, created_at
             FROM stories ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], Self::row_to_story)?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
