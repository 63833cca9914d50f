use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, MeResponse, MessageResponse, SignupRequest, TokenResponse},
        jwt::TokenKeys,
        password::{hash_password, verify_password},
        principal::ApiUser,
        repo::{is_unique_violation, User},
    },
    error::AppError,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/signup", post(signup))
        .route("/api/login", post(login))
        .route("/api/me", get(me))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[instrument(skip(state, payload))]
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let valid = payload.validate()?;

    if User::find_by_email_or_username(&state.db, &valid.email, &valid.username)
        .await?
        .is_some()
    {
        warn!(username = %valid.username, "signup with taken email or username");
        return Err(AppError::DuplicateCredential);
    }

    let password = valid.password;
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let user = match User::create(&state.db, &valid.email, &valid.username, &hash).await {
        Ok(user) => user,
        // Two signups can race past the pre-check; the unique
        // constraint rejects the loser and gets the same message.
        Err(e) if is_unique_violation(&e) => {
            warn!(username = %valid.username, "signup lost uniqueness race");
            return Err(AppError::DuplicateCredential);
        }
        Err(e) => return Err(AppError::Internal(e)),
    };

    info!(user_id = %user.id, username = %user.username, "user created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created",
        }),
    ))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let valid = payload.validate()?;

    let user = User::find_by_username(&state.db, &valid.username)
        .await?
        .ok_or_else(|| {
            warn!(username = %valid.username, "login with unknown username");
            AppError::InvalidCredentials
        })?;

    let password = valid.password;
    let hash = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    if !ok {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let keys = TokenKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.username)?;
    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
async fn me(
    State(state): State<AppState>,
    ApiUser(principal): ApiUser,
) -> Result<Json<MeResponse>, AppError> {
    let user = User::find_by_id(&state.db, principal.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        username: user.username,
        created_at: user.created_at,
    }))
}
