//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const DEFAULT_ASSISTANT_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_ASSISTANT_MODEL: &str = "gpt-4o-mini";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Object store (R2) settings
    pub storage: StorageConfig,
    /// Language model settings
    pub assistant: AssistantConfig,
    /// Admin dashboard login
    pub admin_username: String,
    pub admin_password: String,
    /// Secret used to sign admin session tokens
    pub jwt_secret: String,
}

/// S3-compatible object store settings.
///
/// Every field is optional at startup; uploads check for the credentials
/// they need and fail without touching the network when any is missing.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub account_id: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub bucket: Option<String>,
    /// Public base URL that serves uploaded objects
    pub public_url: Option<String>,
    /// Endpoint override (defaults to `https://{account_id}.r2.cloudflarestorage.com`)
    pub endpoint: Option<String>,
}

/// Chat-completion API settings
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Missing key puts the chat widget in fallback mode
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_ASSISTANT_URL.into(),
            model: DEFAULT_ASSISTANT_MODEL.into(),
        }
    }
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            storage: StorageConfig::from_env(),
            assistant: AssistantConfig::from_env(),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: Self::require_secret("ADMIN_PASSWORD", &environment)?,
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            environment,
        })
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            account_id: optional("R2_ACCOUNT_ID"),
            access_key_id: optional("R2_ACCESS_KEY_ID"),
            secret_access_key: optional("R2_SECRET_ACCESS_KEY"),
            bucket: optional("R2_BUCKET_NAME"),
            public_url: optional("R2_PUBLIC_URL"),
            endpoint: optional("R2_ENDPOINT"),
        }
    }
}

impl AssistantConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: optional("OPENAI_API_KEY"),
            api_url: optional("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_ASSISTANT_URL.into()),
            model: optional("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_ASSISTANT_MODEL.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_secret_development_placeholder() {
        let val = Config::require_secret("PROSHOP_TEST_UNSET_SECRET", "development").unwrap();
        assert_eq!(val, "dev-PROSHOP_TEST_UNSET_SECRET-not-for-production");
    }

    #[test]
    fn test_require_secret_production_errors() {
        let err = Config::require_secret("PROSHOP_TEST_UNSET_SECRET", "production").unwrap_err();
        assert!(err.to_string().contains("must be set in production"));
    }

    #[test]
    fn test_assistant_defaults() {
        let cfg = AssistantConfig::default();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.api_url, DEFAULT_ASSISTANT_URL);
    }
}
