//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::routes::{auth, health, todos, users};
use crate::api::types::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kotodo API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Per-user todo lists"
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User registration and profile"),
        (name = "todos", description = "Todo management")
    ),
    paths(
        // Health
        health::health,
        // Auth
        auth::login,
        // Users
        users::create_user,
        users::get_current_user,
        users::update_current_user,
        users::delete_current_user,
        // Todos
        todos::list_todos,
        todos::create_todo,
        todos::create_todos_batch,
        todos::get_todo,
        todos::update_todo,
        todos::toggle_todo,
        todos::delete_todo,
    ),
    components(schemas(
        ErrorBody,
        health::HealthResponse,
        auth::LoginRequest,
        auth::LoginResponse,
        users::types::UserDto,
        users::types::CreateUserRequest,
        users::types::UpdateUserRequest,
        todos::types::TodoDto,
        todos::types::CreateTodoRequest,
        todos::types::BatchCreateTodosRequest,
        todos::types::BatchCreatedResponse,
        todos::types::UpdateTodoRequest,
    ))
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Kotodo API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;
