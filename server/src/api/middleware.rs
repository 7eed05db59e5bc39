//! HTTP middleware (CORS, 404 handler)

use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::IntoResponse;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::core::config::is_all_interfaces;

/// Allowed origins configuration
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    origins: Vec<String>,
}

impl AllowedOrigins {
    /// Create allowed origins from host and port configuration
    pub fn new(host: &str, port: u16) -> Self {
        let mut origins = Vec::new();
        let dev_port = port.saturating_add(1);

        // Local and wildcard binds accept both loopback spellings
        let base_hosts: Vec<&str> = if is_all_interfaces(host)
            || host == "127.0.0.1"
            || host == "localhost"
        {
            vec!["localhost", "127.0.0.1"]
        } else {
            vec![host]
        };

        for h in &base_hosts {
            origins.push(format!("http://{}:{}", h, port));
            origins.push(format!("http://{}:{}", h, dev_port));
            origins.push(format!("http://{}", h));
        }

        Self { origins }
    }

    /// Check if an origin is allowed
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
    }
}

/// Create CORS layer
pub fn cors(allowed: &AllowedOrigins) -> CorsLayer {
    let allowed = allowed.clone();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin.to_str().is_ok_and(|origin| allowed.is_allowed(origin))
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            header::CACHE_CONTROL,
        ])
        .allow_credentials(true)
}

const MAX_404_BODY_LOG: usize = 64 * 1024; // 64KB limit for logging

/// Handle 404 Not Found with logging
pub async fn handle_404(req: Request) -> impl IntoResponse {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return StatusCode::NOT_FOUND;
    }

    let method = req.method().clone();
    let uri = req.uri().clone();
    let headers = req.headers().clone();

    let body_bytes = match to_bytes(req.into_body(), MAX_404_BODY_LOG).await {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::debug!("[404] {} {} (failed to read body)", method, uri);
            return StatusCode::NOT_FOUND;
        }
    };

    let mut headers_map = serde_json::Map::new();
    for (name, value) in headers.iter() {
        if name == header::AUTHORIZATION {
            continue;
        }
        if let Ok(value_str) = value.to_str() {
            headers_map.insert(
                name.to_string(),
                serde_json::Value::String(value_str.to_string()),
            );
        }
    }

    let body_value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or_else(|_| {
            String::from_utf8(body_bytes.to_vec())
                .map(serde_json::Value::String)
                .unwrap_or_else(|_| {
                    serde_json::Value::String(format!("<binary {} bytes>", body_bytes.len()))
                })
        })
    };

    let log_entry = serde_json::json!({
        "status": 404,
        "method": method.to_string(),
        "url": uri.to_string(),
        "headers": headers_map,
        "body": body_value,
    });

    if let Ok(pretty) = serde_json::to_string_pretty(&log_entry) {
        tracing::debug!("[404]\n{}", pretty);
    }

    StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_bind_allows_both_loopback_names() {
        let origins = AllowedOrigins::new("127.0.0.1", 3000);
        assert!(origins.is_allowed("http://localhost:3000"));
        assert!(origins.is_allowed("http://127.0.0.1:3001"));
        assert!(!origins.is_allowed("http://evil.example:3000"));
    }

    #[test]
    fn test_named_host() {
        let origins = AllowedOrigins::new("todo.internal", 8080);
        assert!(origins.is_allowed("http://todo.internal:8080"));
        assert!(!origins.is_allowed("http://localhost:8080"));
    }
}
