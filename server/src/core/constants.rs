// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Kotodo";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".kotodo";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "kotodo.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "KOTODO_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode (logs simulated SQL for every statement)
pub const ENV_DEBUG: &str = "KOTODO_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "KOTODO_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "KOTODO_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "KOTODO_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 3000;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "KOTODO_DATA_DIR";

/// Environment variable to override the database file path
pub const ENV_DB_PATH: &str = "KOTODO_DB_PATH";

// =============================================================================
// Authentication
// =============================================================================

/// Environment variable for the JWT signing secret
pub const ENV_JWT_SECRET: &str = "KOTODO_JWT_SECRET";

/// Environment variable for access token lifetime in minutes
pub const ENV_TOKEN_TTL_MINUTES: &str = "KOTODO_TOKEN_TTL_MINUTES";

/// Default access token lifetime in minutes
pub const DEFAULT_TOKEN_TTL_MINUTES: u64 = 15;

/// Upper bound for the access token lifetime (30 days)
pub const MAX_TOKEN_TTL_MINUTES: u64 = 30 * 24 * 60;

/// Minimum accepted JWT secret length in bytes
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// PBKDF2-HMAC-SHA256 iteration count for new password hashes
pub const PASSWORD_HASH_ITERATIONS: u32 = 100_000;

/// Salt length for password hashes in bytes
pub const PASSWORD_SALT_LEN: usize = 16;

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "kotodo.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL auto-checkpoint threshold (pages, ~4MB at 1000)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default body limit for API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Body limit for auth endpoints (64 KB)
pub const AUTH_BODY_LIMIT: usize = 64 * 1024;

/// Maximum number of todos accepted by one batch insert
pub const MAX_BATCH_TODOS: usize = 500;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
