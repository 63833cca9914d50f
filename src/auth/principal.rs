//! The authenticated principal and its two resolution strategies.
//!
//! A request carries at most one usable credential: a bearer token or
//! a signed session cookie. Exactly one strategy runs, selected by
//! which credential is present, and both produce the same
//! `{user_id, username}` shape for downstream logic.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::{cookie, jwt::TokenKeys, session::Session},
    error::AppError,
    state::AppState,
};

#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
}

impl Principal {
    async fn resolve(parts: &Parts, state: &AppState) -> Result<Self, AppError> {
        if let Some(auth) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            let token = auth
                .strip_prefix("Bearer ")
                .or_else(|| auth.strip_prefix("bearer "))
                .ok_or(AppError::Unauthenticated("Invalid token"))?;
            let keys = TokenKeys::from_ref(state);
            let claims = keys.verify(token).map_err(|_| {
                warn!("invalid or expired token");
                AppError::Unauthenticated("Invalid token")
            })?;
            return Ok(Principal {
                user_id: claims.sub,
                username: claims.username,
            });
        }

        if let Some(value) = cookie::session_cookie_from_headers(&parts.headers) {
            let sid = cookie::verify_session_cookie(&value, &state.config.session.secret)
                .ok_or(AppError::Unauthenticated("Invalid session"))?;
            let (user_id, username) = Session::resolve(&state.db, sid)
                .await?
                .ok_or(AppError::Unauthenticated("Invalid session"))?;
            return Ok(Principal { user_id, username });
        }

        Err(AppError::Unauthenticated("Missing token"))
    }
}

/// API-flow principal: rejects with 401 JSON, no redirect.
pub struct ApiUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for ApiUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Principal::resolve(parts, state).await.map(ApiUser)
    }
}

/// Cookie-flow principal: unauthenticated requests are redirected to
/// the login page instead of receiving an error body.
pub struct WebUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for WebUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Principal::resolve(parts, state).await {
            Ok(principal) => Ok(WebUser(principal)),
            Err(err @ AppError::Internal(_)) => Err(err.into_response()),
            Err(_) => Err(Redirect::to("/login").into_response()),
        }
    }
}
