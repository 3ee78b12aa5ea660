//! Admin session tokens (HS256 JWT) and the middleware guarding
//! back-office routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

const JWT_EXPIRY_HOURS: i64 = 12;
const ADMIN_ROLE: &str = "admin";

/// JWT claims for an admin session
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin username
    pub sub: String,
    pub role: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated admin, inserted into request extensions
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub username: String,
}

/// Issue a session token. Returns the token and its expiry (Unix seconds).
pub fn create_token(
    username: &str,
    secret: &str,
) -> Result<(String, i64), jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let exp = (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp();
    let claims = AdminClaims {
        sub: username.to_string(),
        role: ADMIN_ROLE.to_string(),
        exp: exp as usize,
        iat: now.timestamp() as usize,
    };

    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok((token, exp))
}

/// Validate a token and return its claims
pub fn verify_token(token: &str, secret: &str) -> Result<AdminClaims, AppError> {
    let data = jsonwebtoken::decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::new(ErrorCode::TokenExpired),
            _ => AppError::invalid_token("Invalid or expired token"),
        }
    })?;

    if data.claims.role != ADMIN_ROLE {
        return Err(AppError::new(ErrorCode::PermissionDenied));
    }
    Ok(data.claims)
}

/// Hash a password with Argon2 (PHC string)
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Require a valid admin bearer token
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(header) = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return AppError::not_authenticated().into_response();
    };

    let Some(token) = header.strip_prefix("Bearer ") else {
        return AppError::invalid_token("Invalid Authorization format").into_response();
    };

    match verify_token(token.trim(), &state.admin.jwt_secret) {
        Ok(claims) => {
            request
                .extensions_mut()
                .insert(AdminIdentity { username: claims.sub });
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(uri = %request.uri(), code = %e.code, "Admin request rejected");
            e.into_response()
        }
    }
}
