//! Platform-aware data storage directory management
//!
//! ## Platform Paths
//!
//! | Type | Windows | macOS | Linux |
//! |------|---------|-------|-------|
//! | Data | `%APPDATA%\Kotodo\` | `~/Library/Application Support/Kotodo/` | `$XDG_DATA_HOME/kotodo/` |

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use super::config::AppConfig;
use super::constants::{APP_DOT_FOLDER, APP_NAME, ENV_DATA_DIR, SQLITE_DB_FILENAME};
use crate::utils::file::expand_path;

/// Application storage manager
#[derive(Debug, Clone)]
pub struct AppStorage {
    data_dir: PathBuf,
    db_path: PathBuf,
}

impl AppStorage {
    /// Resolve and create the data directory and the database's parent directory
    pub async fn init(config: &AppConfig) -> Result<Self> {
        let data_dir = Self::resolve_data_dir();

        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        // Canonicalize requires the path to exist
        let data_dir = data_dir.canonicalize().unwrap_or(data_dir);

        let db_path = match &config.database.path {
            Some(path) => path.clone(),
            None => data_dir.join(SQLITE_DB_FILENAME),
        };
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        tracing::debug!(
            data_dir = %data_dir.display(),
            db_path = %db_path.display(),
            "Storage initialized"
        );

        if config.debug {
            tracing::warn!("Debug mode enabled, statements are logged with inlined values");
        }

        Ok(Self { data_dir, db_path })
    }

    /// Resolve data directory from env var or platform default
    pub fn resolve_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            return expand_path(&dir);
        }

        if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            return proj_dirs.data_dir().to_path_buf();
        }

        // Fallback to local .kotodo
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        cwd.join(APP_DOT_FOLDER)
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the SQLite database file path
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Create AppStorage for testing with a specific data directory
    #[cfg(test)]
    pub fn init_for_test(data_dir: PathBuf) -> Self {
        let db_path = data_dir.join(SQLITE_DB_FILENAME);
        Self { data_dir, db_path }
    }
}
