//! Persistence-boundary operations.
//!
//! Everything that writes to a [`crate::repository::Store`] goes through this
//! module. The boundary re-runs the scorer and the style validator on every
//! write - caller-supplied scores are advisory, earlier validations are not
//! trusted - and rejects whole operations rather than writing partial rows.

pub mod blueprint;
pub mod extract;
pub mod generate;
pub mod style;

pub use blueprint::{
    create_blueprint, normalize_tags, rescore_all, update_blueprint, BlueprintSaveOutcome,
    BlueprintUpdate, RescoreChange,
};
pub use extract::{extract_blueprint_from_text, extract_style_from_text};
pub use generate::{generate_story, GenerateOptions};
pub use style::{
    create_style, increment_usage, rate_style, set_style_active, update_style, StyleSaveOutcome,
};
