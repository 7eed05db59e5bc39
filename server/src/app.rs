//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{ApiServer, AuthManager};
use crate::core::cli::{self, CliConfig};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::SqliteService;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub database: Arc<SqliteService>,
    pub auth: Arc<AuthManager>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        let cli_config = cli::parse();
        Self::init_logging(cli_config.debug);

        tracing::debug!("Application starting");

        let app = Self::init(&cli_config).await?;
        Self::start_server(app).await
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init(&config).await?;

        let database = Arc::new(
            SqliteService::init(&storage, &config.database)
                .await
                .with_context(|| {
                    format!("Failed to open database at {}", storage.db_path().display())
                })?,
        );
        let auth = Arc::new(AuthManager::new(&config.auth));
        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            shutdown,
            config,
            storage,
            database,
            auth,
        })
    }

    /// `--debug` lowers the default filter so executed statements are logged
    fn init_logging(debug: bool) {
        let level = if debug { "debug" } else { "info" };
        let default_filter = format!("info,{}={}", env!("CARGO_CRATE_NAME"), level);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Before anything that can block
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        tracing::info!(
            host = %app.config.server.host,
            port = app.config.server.port,
            database = %app.storage.db_path().display(),
            "{} listening",
            APP_NAME
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        self.shutdown
            .register(
                self.database
                    .start_checkpoint_task(self.shutdown.subscribe()),
            )
            .await;

        tracing::debug!("Background tasks started");
    }
}
