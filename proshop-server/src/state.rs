//! Application state

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::assistant::AssistantClient;
use crate::auth::RateLimiter;
use crate::auth::admin_auth::hash_password;
use crate::config::Config;
use crate::storage::ObjectStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const MAX_DB_CONNECTIONS: u32 = 10;

/// Admin login settings resolved at startup
#[derive(Clone)]
pub struct AdminAuth {
    pub username: String,
    /// Argon2 PHC hash of `ADMIN_PASSWORD`
    pub password_hash: String,
    /// JWT secret for admin sessions
    pub jwt_secret: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// R2 uploader
    pub storage: ObjectStore,
    /// Chat-completion client
    pub assistant: AssistantClient,
    pub admin: AdminAuth,
    /// Rate limiter for the login route
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Connect to PostgreSQL, run migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_DB_CONNECTIONS)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Self::with_pool(pool, config)
    }

    /// Build the state around an existing pool (no migrations)
    pub fn with_pool(pool: PgPool, config: &Config) -> Result<Self, BoxError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("proshop-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let password_hash = hash_password(&config.admin_password)
            .map_err(|e| format!("failed to hash admin password: {e}"))?;

        Ok(Self {
            pool,
            storage: ObjectStore::new(http.clone(), config.storage.clone()),
            assistant: AssistantClient::new(http, config.assistant.clone()),
            admin: AdminAuth {
                username: config.admin_username.clone(),
                password_hash,
                jwt_secret: config.jwt_secret.clone(),
            },
            rate_limiter: RateLimiter::new(),
        })
    }
}
