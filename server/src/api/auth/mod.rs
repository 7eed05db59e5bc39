//! Authentication module

mod extractors;
pub mod jwt;
mod manager;
pub mod middleware;

pub use extractors::Auth;
pub use jwt::{AccessClaims, JwtError};
pub use manager::{AuthManager, IssuedToken};
pub use middleware::{AuthError, AuthUser, require_auth};
