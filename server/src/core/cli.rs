use clap::Parser;

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_DB_PATH, ENV_DEBUG, ENV_HOST, ENV_JWT_SECRET, ENV_PORT,
    ENV_TOKEN_TTL_MINUTES,
};

#[derive(Parser)]
#[command(name = "kotodo")]
#[command(version, about = "Todo list REST backend", long_about = None)]
pub struct Cli {
    /// Server host address
    #[arg(long, short = 'H', env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug mode (logs every statement as simulated SQL)
    #[arg(long, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// SQLite database file (defaults to the data directory)
    #[arg(long, env = ENV_DB_PATH)]
    pub db_path: Option<PathBuf>,

    /// Secret used to sign access tokens
    #[arg(long, env = ENV_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Access token lifetime in minutes
    #[arg(long, env = ENV_TOKEN_TTL_MINUTES)]
    pub token_ttl_minutes: Option<u64>,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub jwt_secret: Option<String>,
    pub token_ttl_minutes: Option<u64>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            debug: cli.debug,
            config: cli.config,
            db_path: cli.db_path,
            jwt_secret: cli.jwt_secret,
            token_ttl_minutes: cli.token_ttl_minutes,
        }
    }
}

/// Parse CLI arguments
pub fn parse() -> CliConfig {
    Cli::parse().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "kotodo",
            "--host",
            "0.0.0.0",
            "-p",
            "8080",
            "--db-path",
            "/tmp/todos.db",
            "--token-ttl-minutes",
            "60",
        ])
        .unwrap();
        let config = CliConfig::from(cli);

        assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/todos.db")));
        assert_eq!(config.token_ttl_minutes, Some(60));
        assert!(!config.debug);
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(Cli::try_parse_from(["kotodo", "--port", "not-a-port"]).is_err());
    }
}
