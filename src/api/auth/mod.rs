//! Authentication API endpoints
//!
//! `POST /authenticate` exchanges a username and password for a bare token.
//! The `/auth` routes add a richer login response, logout by revocation and
//! a "who am I" lookup for the bearer of a token.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequirePrincipal;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::Principal;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(get_current_principal))
}

#[derive(Deserialize)]
pub struct AuthenticationRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AuthenticationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
pub struct AuthenticationResponse {
    pub jwt: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: String,
    pub expires_in: i64,
    pub principal: PrincipalResponse,
}

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub id: String,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl From<&Principal> for PrincipalResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id().to_string(),
            roles: principal.roles().iter().cloned().collect(),
            attributes: principal.attributes().clone(),
        }
    }
}

/// POST /authenticate
pub async fn authenticate(
    State(state): State<AppState>,
    Json(request): Json<AuthenticationRequest>,
) -> Result<Json<AuthenticationResponse>, ApiError> {
    let issued = state
        .gate
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(AuthenticationResponse {
        jwt: issued.into_string(),
    }))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<AuthenticationRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let issued = state
        .gate
        .login(&request.username, &request.password)
        .await?;

    let principal = issued.principal();
    let expires_in = issued.claims().exp - issued.claims().iat;

    Ok(Json(LoginResponse {
        expires_at: issued.expires_at().to_rfc3339(),
        expires_in,
        principal: PrincipalResponse::from(&principal),
        token_type: "Bearer",
        token: issued.into_string(),
    }))
}

/// POST /auth/logout
///
/// Revokes the presented token so it is refused for the rest of its lifetime.
pub async fn logout(
    State(state): State<AppState>,
    auth: RequirePrincipal,
) -> Result<StatusCode, ApiError> {
    state.gate.revoke(&auth.token).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me
pub async fn get_current_principal(auth: RequirePrincipal) -> Json<PrincipalResponse> {
    Json(PrincipalResponse::from(&auth.principal))
}
