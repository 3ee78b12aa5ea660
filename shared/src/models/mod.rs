//! Data models
//!
//! Shared between the server and the browser clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL).

pub mod brand;
pub mod category;
pub mod product;
pub mod special_offer;
pub mod stock;

// Re-exports
pub use brand::*;
pub use category::*;
pub use product::*;
pub use special_offer::*;
pub use stock::*;
