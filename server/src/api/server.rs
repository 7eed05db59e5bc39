//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::auth::{AuthManager, require_auth};
use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{auth, health, todos, users};
use crate::core::CoreApp;
use crate::core::constants::{AUTH_BODY_LIMIT, DEFAULT_BODY_LIMIT};
use crate::data::SqliteService;
use crate::domain::{TodoService, UserService};

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);
        Self {
            app,
            allowed_origins,
        }
    }

    /// Serve until shutdown is triggered. Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        let shutdown = app.shutdown.clone();
        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);

        let router = build_router(&app.database, app.auth.clone(), &allowed_origins);

        let listener = TcpListener::bind(addr).await?;
        tracing::debug!(%addr, "API server bound");
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Assemble every route with its layers
pub fn build_router(
    database: &SqliteService,
    auth_manager: Arc<AuthManager>,
    allowed_origins: &AllowedOrigins,
) -> Router {
    let users = UserService::new(database.runner());
    let todos = TodoService::new(database.runner());

    let require_auth = axum::middleware::from_fn_with_state(auth_manager.clone(), require_auth);

    let auth_routes =
        auth::routes(auth_manager, users.clone()).layer(DefaultBodyLimit::max(AUTH_BODY_LIMIT));

    let users_routes = users::public_routes(users.clone())
        .layer(DefaultBodyLimit::max(AUTH_BODY_LIMIT))
        .merge(users::routes(users).layer(require_auth.clone()));

    let todos_routes = todos::routes(todos).layer(require_auth);

    Router::new()
        .route("/api/v1/health", get(health::health))
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/users", users_routes)
        .nest("/api/v1/todos", todos_routes)
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors(allowed_origins))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}
