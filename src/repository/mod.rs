//! Storage backends behind the `Store` trait.
//!
//! All persistence goes through [`Store`], which is constructed once and
//! passed into the operations that need it. Nothing in the crate holds a
//! module-level connection handle; the two-tier trust boundary (recompute vs.
//! accept caller value) lives in [`crate::operations`], not here.

mod in_memory;
mod sqlite;

pub use in_memory::InMemoryStore;
pub use sqlite::SqliteStore;

use anyhow::Result;

use crate::blueprint::{BlueprintRecord, StoryRecord};
use crate::style::StyleRecord;

/// CRUD surface the persistence boundary needs. Backends are plain row
/// stores; all validation and scoring happens above this trait.
pub trait Store {
    fn insert_blueprint(&self, record: &BlueprintRecord) -> Result<()>;
    fn get_blueprint(&self, id: &str) -> Result<Option<BlueprintRecord>>;
    fn update_blueprint(&self, record: &BlueprintRecord) -> Result<()>;
    /// All blueprints, highest score first.
    fn list_blueprints(&self) -> Result<Vec<BlueprintRecord>>;

    fn insert_style(&self, record: &StyleRecord) -> Result<()>;
    fn get_style(&self, id: &str) -> Result<Option<StyleRecord>>;
    fn update_style(&self, record: &StyleRecord) -> Result<()>;
    /// All style archetypes, active first, then by name.
    fn list_styles(&self) -> Result<Vec<StyleRecord>>;

    fn insert_story(&self, record: &StoryRecord) -> Result<()>;
    fn get_story(&self, id: &str) -> Result<Option<StoryRecord>>;
    /// All stories, newest first.
    fn list_stories(&self) -> Result<Vec<StoryRecord>>;
}
