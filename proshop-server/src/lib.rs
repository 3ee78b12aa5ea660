//! proshop-server: golf pro-shop storefront and back-office API
//!
//! # Modules
//!
//! ```text
//! proshop-server/src/
//! ├── api/        # axum routers and handlers
//! ├── assistant/  # chat-completion client and prompts
//! ├── auth/       # admin JWT session, login rate limit
//! ├── db/         # PostgreSQL queries (sqlx)
//! ├── storage/    # SigV4 signing and R2 uploads
//! ├── config.rs   # environment configuration
//! ├── error.rs    # ServiceError bridge to AppError
//! └── state.rs    # shared AppState
//! ```

pub mod api;
pub mod assistant;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod storage;

pub use api::create_router;
pub use config::Config;
pub use state::AppState;
