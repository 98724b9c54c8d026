//! Startup configuration.
//!
//! Settings come from command-line flags with environment fallbacks:
//! - `TODO_LISTS_STORAGE` - `database` (default) or `session`
//! - `TODO_LISTS_DATABASE` - SQLite file path (default: platform data directory)
//! - `TODO_LISTS_PORT` - HTTP port (default: 3000)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::db::Database;
use crate::store::{Backend, SessionRegistry};

const APP_NAME: &str = "todo-lists";
const DATABASE_FILE: &str = "todos.db";

/// Which store backs the lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StorageMode {
    /// SQLite database shared by all visitors
    #[default]
    Database,
    /// In-memory lists, one set per browser session
    Session,
}

/// Storage settings shared by the `serve` and `migrate` commands.
#[derive(Debug, Clone, Default, Args)]
pub struct StorageSettings {
    /// Backing store for lists
    #[arg(long, value_enum, env = "TODO_LISTS_STORAGE", default_value_t = StorageMode::Database)]
    pub storage: StorageMode,

    /// Path to the SQLite database file
    #[arg(long, env = "TODO_LISTS_DATABASE")]
    pub database: Option<PathBuf>,
}

impl StorageSettings {
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => default_database_path(),
        }
    }

    /// Open and migrate the configured database.
    pub fn open_database(&self) -> Result<Database> {
        let path = self.database_path()?;
        tracing::info!("Opening database at {}", path.display());

        let db = Database::open(path.clone())
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        db.migrate()?;
        Ok(db)
    }

    /// Build the backend selected by `storage`.
    pub fn backend(&self) -> Result<Backend> {
        match self.storage {
            StorageMode::Database => Ok(Backend::Database(self.open_database()?)),
            StorageMode::Session => Ok(Backend::Session(SessionRegistry::new())),
        }
    }
}

/// `<data dir>/todo-lists/todos.db` for the current platform.
pub fn default_database_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join(DATABASE_FILE))
}
