//! Password hashing, bearer tokens and the `AuthUser` extractor.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use tracing::{info, warn};

use crate::db;
use crate::error::AppError;
use crate::models::{Role, Status, User};
use crate::state::AppState;

/// Argon2 runs on the blocking pool so it does not stall the async workers.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password_blocking(&password))
        .await
        .map_err(|e| AppError::Internal(format!("password hashing task failed: {}", e)))?
}

fn hash_password_blocking(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("failed to hash password: {}", e)))
}

/// False for a wrong password and for a malformed stored hash.
pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let password_hash = password_hash.to_string();
    tokio::task::spawn_blocking(move || verify_password_blocking(&password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(format!("password check task failed: {}", e)))
}

fn verify_password_blocking(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("stored password hash is malformed: {}", e);
            false
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("invalid token: {}", e)))
    }
}

/// Check credentials; the same message is returned for every failure.
pub async fn authenticate(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let rejected = || AppError::Unauthorized("invalid username or password".to_string());

    let user = db::users::find_by_username(conn, username)
        .await?
        .ok_or_else(rejected)?;
    if !verify_password(password, &user.password_hash).await? {
        warn!(username, "failed login attempt");
        return Err(rejected());
    }
    if user.status != Status::Active {
        return Err(AppError::Unauthorized("account is inactive".to_string()));
    }
    info!(user_id = %user.id, "user logged in");
    Ok(user)
}

/// Create the first admin account when the users table is empty.
pub async fn bootstrap_admin(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
) -> Result<bool, AppError> {
    if db::users::count(conn).await? > 0 {
        return Ok(false);
    }
    crate::models::user::validate_username(username)?;
    crate::models::user::validate_password(password)?;
    let password_hash = hash_password(password).await?;

    let now = db::now();
    let admin = User {
        id: db::new_id(),
        username: username.to_string(),
        password_hash,
        role: Role::Admin,
        name: "Administrator".to_string(),
        email: None,
        status: Status::Active,
        created_at: now.clone(),
        updated_at: now,
    };
    db::users::insert(conn, &admin).await?;
    info!(username, "created bootstrap admin account");
    Ok(true)
}

/// The caller behind a valid bearer token. Accounts that were deleted or
/// deactivated after the token was issued are rejected.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub role: Role,
}

impl AuthUser {
    pub fn require(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "role '{}' may not perform this action",
                self.role.as_str()
            )))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        self.require(&[Role::Admin])
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        let claims = state.tokens.verify(token.trim())?;

        let mut conn = state.db.acquire().await?;
        let user = db::users::find_by_id(&mut conn, &claims.sub)
            .await?
            .filter(|user| user.status == Status::Active)
            .ok_or_else(|| AppError::Unauthorized("account is no longer active".to_string()))?;

        Ok(Self {
            id: user.id,
            role: user.role,
        })
    }
}
