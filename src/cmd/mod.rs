//! Command module structure for the kaidan CLI

use anyhow::Result;
use std::path::Path;

use kaidan::config::Config;
use kaidan::paths::{DB_FILE, KAIDAN_DIR};
use kaidan::repository::SqliteStore;

pub mod blueprint;
pub mod generate;
pub mod init;
pub mod story;
pub mod style;

/// Ensure kaidan is initialized in the current directory.
///
/// This checks for the existence of `.kaidan` and returns an error if kaidan
/// has not been initialized.
pub fn ensure_initialized() -> Result<()> {
    if !Path::new(KAIDAN_DIR).exists() {
        anyhow::bail!("Kaidan not initialized. Run `kaidan init` first.");
    }
    Ok(())
}

/// Open the project database. Constructed once per command and passed down.
pub fn open_store() -> Result<SqliteStore> {
    ensure_initialized()?;
    SqliteStore::open(Path::new(DB_FILE))
}

/// Load the merged project configuration.
pub fn load_config() -> Result<Config> {
    ensure_initialized()?;
    Config::load()
}
