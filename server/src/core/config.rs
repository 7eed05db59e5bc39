use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TOKEN_TTL_MINUTES,
    ENV_JWT_SECRET, MAX_TOKEN_TTL_MINUTES, MIN_JWT_SECRET_LEN, SQLITE_MAX_CONNECTIONS,
};

// =============================================================================
// File Config Structs (JSON sections, every field optional)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Authentication configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthFileConfig {
    pub jwt_secret: Option<String>,
    pub token_ttl_minutes: Option<u64>,
}

/// Database configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    pub path: Option<String>,
    pub max_connections: Option<u32>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub auth: Option<AuthFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                current.host = server.host;
            }
            if server.port.is_some() {
                current.port = server.port;
            }
        }

        if let Some(auth) = other.auth {
            let current = self.auth.get_or_insert_with(AuthFileConfig::default);
            if auth.jwt_secret.is_some() {
                current.jwt_secret = auth.jwt_secret;
            }
            if auth.token_ttl_minutes.is_some() {
                tracing::trace!(ttl = ?auth.token_ttl_minutes, "Merging auth.token_ttl_minutes");
                current.token_ttl_minutes = auth.token_ttl_minutes;
            }
        }

        if let Some(database) = other.database {
            let current = self.database.get_or_insert_with(DatabaseFileConfig::default);
            if database.path.is_some() {
                tracing::trace!(path = ?database.path, "Merging database.path");
                current.path = database.path;
            }
            if database.max_connections.is_some() {
                current.max_connections = database.max_connections;
            }
        }

        if other.debug.is_some() {
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Configured signing secret; `None` means one is generated at startup
    pub jwt_secret: Option<String>,
    pub token_ttl_minutes: u64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[redacted]"))
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .finish()
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Explicit database file; `None` means `<data dir>/kotodo.db`
    pub path: Option<PathBuf>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_connections: SQLITE_MAX_CONNECTIONS,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.kotodo/kotodo.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::layer(cli, file_config);
        config.validate()?;
        Ok(config)
    }

    /// Layer CLI/env values over file values over defaults
    fn layer(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_auth = file_config.auth.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();

        let server = ServerConfig {
            host: cli
                .host
                .clone()
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT),
        };

        let auth = AuthConfig {
            jwt_secret: cli
                .jwt_secret
                .clone()
                .or(file_auth.jwt_secret)
                .filter(|s| !s.is_empty()),
            token_ttl_minutes: cli
                .token_ttl_minutes
                .or(file_auth.token_ttl_minutes)
                .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES),
        };

        let database = DatabaseConfig {
            path: cli
                .db_path
                .clone()
                .or_else(|| file_database.path.map(|p| expand_path(&p))),
            max_connections: file_database
                .max_connections
                .unwrap_or(SQLITE_MAX_CONNECTIONS),
        };

        // CLI/env flag takes precedence, then file config, default false
        let debug = cli.debug || file_config.debug.unwrap_or(false);

        Self {
            server,
            auth,
            database,
            debug,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.auth.token_ttl_minutes == 0 || self.auth.token_ttl_minutes > MAX_TOKEN_TTL_MINUTES {
            anyhow::bail!(
                "Configuration error: auth.token_ttl_minutes must be between 1 and {}",
                MAX_TOKEN_TTL_MINUTES
            );
        }

        if let Some(ref secret) = self.auth.jwt_secret
            && secret.len() < MIN_JWT_SECRET_LEN
        {
            anyhow::bail!(
                "Configuration error: JWT secret must be at least {} bytes. \
                 Set via {} env var or auth.jwt_secret in config file.",
                MIN_JWT_SECRET_LEN,
                ENV_JWT_SECRET
            );
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Configuration error: database.max_connections must be greater than 0");
        }

        if is_all_interfaces(&self.server.host) {
            tracing::warn!(
                host = %self.server.host,
                "Server is listening on all interfaces"
            );
        }

        Ok(())
    }
}

/// Get the profile config path (~/.kotodo/kotodo.json)
fn get_profile_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub(crate) fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> FileConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_file_config_parse_full() {
        let config = parse(
            r#"{
                "server": { "host": "0.0.0.0", "port": 8080 },
                "auth": { "token_ttl_minutes": 30 },
                "database": { "path": "/var/lib/kotodo/todos.db", "max_connections": 2 },
                "debug": true
            }"#,
        );

        assert_eq!(
            config.server.as_ref().unwrap().host,
            Some("0.0.0.0".to_string())
        );
        assert_eq!(config.server.as_ref().unwrap().port, Some(8080));
        assert_eq!(config.auth.as_ref().unwrap().token_ttl_minutes, Some(30));
        assert_eq!(config.database.as_ref().unwrap().max_connections, Some(2));
        assert_eq!(config.debug, Some(true));
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let config = parse(r#"{ "server": { "host": "localhost" }, "unknown_field": 123 }"#);
        assert_eq!(config.extra.get("unknown_field").unwrap(), 123);
    }

    #[test]
    fn test_file_config_merge() {
        let mut base = parse(r#"{ "server": { "host": "localhost", "port": 3000 } }"#);
        let overlay = parse(r#"{ "server": { "port": 9000 }, "debug": true }"#);
        base.merge(overlay);

        let server = base.server.unwrap();
        assert_eq!(server.host, Some("localhost".to_string()));
        assert_eq!(server.port, Some(9000));
        assert_eq!(base.debug, Some(true));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::layer(&CliConfig::default(), FileConfig::default());

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.auth.token_ttl_minutes, DEFAULT_TOKEN_TTL_MINUTES);
        assert!(config.auth.jwt_secret.is_none());
        assert!(config.database.path.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = parse(r#"{ "server": { "port": 9000 }, "auth": { "token_ttl_minutes": 30 } }"#);
        let cli = CliConfig {
            port: Some(4000),
            ..Default::default()
        };
        let config = AppConfig::layer(&cli, file);

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.auth.token_ttl_minutes, 30);
    }

    #[test]
    fn test_empty_secret_means_generated() {
        let cli = CliConfig {
            jwt_secret: Some(String::new()),
            ..Default::default()
        };
        let config = AppConfig::layer(&cli, FileConfig::default());
        assert!(config.auth.jwt_secret.is_none());
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let cli = CliConfig {
            jwt_secret: Some("short".to_string()),
            ..Default::default()
        };
        let config = AppConfig::layer(&cli, FileConfig::default());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let cli = CliConfig {
            token_ttl_minutes: Some(0),
            ..Default::default()
        };
        let config = AppConfig::layer(&cli, FileConfig::default());
        assert!(config.validate().is_err());

        let cli = CliConfig {
            token_ttl_minutes: Some(MAX_TOKEN_TTL_MINUTES + 1),
            ..Default::default()
        };
        let config = AppConfig::layer(&cli, FileConfig::default());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_auth_config_debug_redacts_secret() {
        let auth = AuthConfig {
            jwt_secret: Some("a".repeat(40)),
            token_ttl_minutes: 15,
        };
        let rendered = format!("{:?}", auth);
        assert!(rendered.contains("[redacted]"));
        assert!(!rendered.contains("aaaa"));
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(!is_all_interfaces("127.0.0.1"));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{ "server": { "port": 7000 } }"#).unwrap();

        let cli = CliConfig {
            config: Some(path),
            port: None,
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.port, 7000);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/kotodo.json")),
            ..Default::default()
        };
        assert!(AppConfig::load(&cli).is_err());
    }
}
