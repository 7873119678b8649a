/**
 * Authentication Routes
 * Single shared admin credential: login checks the configured
 * username/password and hands back the static admin token.
 */
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;
use crate::config::{AdminPassword, AppConfig};
use crate::state::AppState;
use crate::validation::validate_login;

// ============================================================================
// Token checking
// ============================================================================

/// Decides whether a bearer token grants admin access.
pub trait AdminAuthenticator: Send + Sync {
    fn validate(&self, token: &str) -> bool;
}

/// Accepts exactly one configured token.
#[derive(Debug, Clone)]
pub struct StaticTokenAuthenticator {
    token: String,
}

impl StaticTokenAuthenticator {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl AdminAuthenticator for StaticTokenAuthenticator {
    fn validate(&self, token: &str) -> bool {
        !self.token.is_empty() && token == self.token
    }
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub fn is_admin(state: &AppState, headers: &HeaderMap) -> bool {
    extract_bearer_token(headers).is_some_and(|token| state.auth.validate(token))
}

/// Absent and wrong tokens are rejected the same way.
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    if is_admin(state, headers) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

// ============================================================================
// Login
// ============================================================================

/// The one admin account plus the token handed out on login.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password_hash: String,
    pub token: String,
}

impl AdminCredentials {
    pub fn from_config(config: &AppConfig) -> Result<Self, bcrypt::BcryptError> {
        let password_hash = match &config.admin_password {
            AdminPassword::Hashed(hash) => hash.clone(),
            AdminPassword::Plain(plain) => hash(plain, DEFAULT_COST)?,
        };

        Ok(Self {
            username: config.admin_username.clone(),
            password_hash,
            token: config.admin_token.clone(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserInfo,
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let credentials = validate_login(&body)?;

    let admin = state.credentials.clone();
    let password = credentials.password;
    let stored_hash = admin.password_hash.clone();
    let password_ok = tokio::task::spawn_blocking(move || verify(password, &stored_hash))
        .await
        .map_err(|e| ApiError::internal("Internal server error", e))?
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Stored admin password hash is invalid");
            false
        });

    if credentials.username != admin.username || !password_ok {
        tracing::warn!(username = %credentials.username, "Failed admin login attempt");
        return Err(ApiError::InvalidCredentials);
    }

    tracing::info!(username = %admin.username, "Admin logged in");
    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token: admin.token.clone(),
            user: UserInfo {
                username: admin.username.clone(),
                role: "admin".to_string(),
            },
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{send, test_app, TEST_PASSWORD, TEST_TOKEN};
    use axum::http::Method;
    use serde_json::json;

    #[test]
    fn test_static_token_authenticator() {
        let auth = StaticTokenAuthenticator::new("secret");
        assert!(auth.validate("secret"));
        assert!(!auth.validate("Secret"));
        assert!(!auth.validate(""));
        assert!(!StaticTokenAuthenticator::new("").validate(""));
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert("authorization", "Basic abc".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert("authorization", "Bearer abc".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers), Some("abc"));
    }

    #[tokio::test]
    async fn test_login_success_returns_token() {
        let (app, _dir) = test_app(false);
        let (status, body) = send(
            app,
            Method::POST,
            "/api/admin/login",
            None,
            Some(json!({ "username": "admin", "password": TEST_PASSWORD })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token"], TEST_TOKEN);
        assert_eq!(body["user"]["username"], "admin");
        assert_eq!(body["user"]["role"], "admin");
    }

    #[tokio::test]
    async fn test_login_wrong_credentials_returns_unauthorized() {
        let (app, _dir) = test_app(false);
        let (status, body) = send(
            app,
            Method::POST,
            "/api/admin/login",
            None,
            Some(json!({ "username": "admin", "password": "wrongpassword" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
        assert!(body.get("token").is_none());
    }

    #[tokio::test]
    async fn test_login_empty_fields_returns_bad_request() {
        let (app, _dir) = test_app(false);
        let (status, body) = send(
            app,
            Method::POST,
            "/api/admin/login",
            None,
            Some(json!({ "username": "", "password": "" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
    }
}
