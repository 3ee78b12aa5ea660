//! Admin authentication and login throttling

pub mod admin_auth;
pub mod rate_limit;

pub use admin_auth::{AdminIdentity, admin_auth_middleware};
pub use rate_limit::RateLimiter;
