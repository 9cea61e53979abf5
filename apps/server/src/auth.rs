//! Bearer-token protection backed by an Azure AD client-credentials token.
//!
//! The server fetches one application token from the identity provider and
//! caches it until five minutes before it expires. Protected routes accept
//! exactly that token.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::error_response;
use crate::main_lib::AppState;

pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";
pub const DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Seconds shaved off the provider's lifetime before a token is refreshed
const EXPIRY_MARGIN_SECONDS: u64 = 300;
const DEFAULT_EXPIRES_IN: u64 = 3600;
const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct AzureAuthConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
    pub authority_url: String,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_in: u64,
    refresh_at: Instant,
}

pub struct AuthManager {
    config: AzureAuthConfig,
    client: reqwest::Client,
    token: RwLock<Option<CachedToken>>,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    NotConfigured,
    TokenRequest(String),
}

#[derive(Deserialize)]
struct TokenEndpointResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

impl AuthManager {
    pub fn new(config: AzureAuthConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(TOKEN_REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            config,
            client,
            token: RwLock::new(None),
        })
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.authority_url.trim_end_matches('/'),
            self.config.tenant_id
        )
    }

    /// Current application token, fetched again once the cached one is due.
    pub async fn access_token(&self) -> Result<TokenResponse, AuthError> {
        if let Some(cached) = self.token.read().await.as_ref() {
            if Instant::now() < cached.refresh_at {
                return Ok(cached.into());
            }
        }

        let mut slot = self.token.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(cached) = slot.as_ref() {
            if Instant::now() < cached.refresh_at {
                return Ok(cached.into());
            }
        }

        let fresh = self.request_token().await?;
        let response = TokenResponse::from(&fresh);
        *slot = Some(fresh);
        Ok(response)
    }

    async fn request_token(&self) -> Result<CachedToken, AuthError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", self.config.scope.as_str()),
        ];

        let response = self
            .client
            .post(self.token_url())
            .form(&form)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::error!("Error getting access token: {}", e);
                AuthError::TokenRequest(e.to_string())
            })?;
        let body: TokenEndpointResponse = response.json().await.map_err(|e| {
            tracing::error!("Malformed token response: {}", e);
            AuthError::TokenRequest(e.to_string())
        })?;

        let expires_in = body.expires_in.unwrap_or(DEFAULT_EXPIRES_IN);
        let lifetime = expires_in.saturating_sub(EXPIRY_MARGIN_SECONDS);
        tracing::info!("Obtained identity provider access token");
        Ok(CachedToken {
            access_token: body.access_token,
            expires_in,
            refresh_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }

    /// Accept `candidate` only if it is the token currently held by the server.
    pub async fn validate_token(&self, candidate: &str) -> Result<(), AuthError> {
        let current = self.access_token().await.map_err(|e| {
            tracing::warn!("Token validation failed: {:?}", e);
            AuthError::Unauthorized
        })?;
        if current.access_token == candidate {
            Ok(())
        } else {
            Err(AuthError::Unauthorized)
        }
    }
}

impl From<&CachedToken> for TokenResponse {
    fn from(token: &CachedToken) -> Self {
        Self {
            access_token: token.access_token.clone(),
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthorized => error_response(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication credentials were not provided or invalid".to_string(),
            ),
            AuthError::NotConfigured => error_response(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Authentication is not configured for this server".to_string(),
            ),
            AuthError::TokenRequest(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Failed to obtain access token from the identity provider".to_string(),
            ),
        }
    }
}

pub async fn issue_token(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TokenResponse>, AuthError> {
    let auth = state.auth.as_ref().ok_or(AuthError::NotConfigured)?;
    Ok(Json(auth.access_token().await?))
}

pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(auth) = state.auth.clone() else {
        return Ok(next.run(request).await);
    };

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(AuthError::Unauthorized);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    auth.validate_token(token).await?;
    Ok(next.run(request).await)
}
