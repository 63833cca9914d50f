use axum::{
    extract::{Form, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use time::Duration;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        cookie,
        password::{hash_password, verify_password},
        principal::WebUser,
        repo::{is_unique_violation, User},
        session::Session,
    },
    error::AppError,
    state::AppState,
    web::{
        forms::{LoginForm, SignupForm},
        views,
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", get(signup_page).post(signup))
        .route("/login", get(login_page).post(login))
        .route("/dashboard", get(dashboard))
        .route("/logout", post(logout))
}

async fn signup_page() -> Html<String> {
    Html(views::signup_page(None))
}

async fn login_page() -> Html<String> {
    Html(views::login_page(None))
}

fn signup_error(err: &AppError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Html(views::signup_page(Some(&err.to_string()))),
    )
        .into_response()
}

fn login_error(err: &AppError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Html(views::login_page(Some(&err.to_string()))),
    )
        .into_response()
}

#[instrument(skip(state, form))]
async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    // No storage access happens on a validation failure.
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(err) => return Ok(signup_error(&err)),
    };

    if User::find_by_email_or_username(&state.db, &valid.email, &valid.username)
        .await?
        .is_some()
    {
        warn!(username = %valid.username, "signup with taken email or username");
        return Ok(signup_error(&AppError::DuplicateCredential));
    }

    let password = valid.password;
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    match User::create(&state.db, &valid.email, &valid.username, &hash).await {
        Ok(user) => {
            info!(user_id = %user.id, username = %user.username, "user created");
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) if is_unique_violation(&e) => {
            warn!(username = %valid.username, "signup lost uniqueness race");
            Ok(signup_error(&AppError::DuplicateCredential))
        }
        Err(e) => Err(AppError::Internal(e)),
    }
}

#[instrument(skip(state, form))]
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(err) => return Ok(login_error(&err)),
    };

    let user = match User::find_by_username(&state.db, &valid.username).await? {
        Some(user) => user,
        None => {
            warn!(username = %valid.username, "login with unknown username");
            return Ok(login_error(&AppError::InvalidCredentials));
        }
    };

    let password = valid.password;
    let hash = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    if !ok {
        warn!(user_id = %user.id, "login with invalid password");
        return Ok(login_error(&AppError::InvalidCredentials));
    }

    let ttl = Duration::hours(state.config.session.ttl_hours);
    let session = Session::create(&state.db, user.id, &user.username, ttl).await?;
    let signed = cookie::sign_session_id(&session.id, &state.config.session.secret);
    let set_cookie = cookie::session_cookie(&signed, ttl.whole_seconds());

    info!(user_id = %user.id, username = %user.username, "session opened");
    Ok(([(header::SET_COOKIE, set_cookie)], Redirect::to("/dashboard")).into_response())
}

#[instrument(skip(state, principal))]
async fn dashboard(
    State(state): State<AppState>,
    WebUser(principal): WebUser,
) -> Result<Response, AppError> {
    // The session may outlive the user row; treat that as signed out.
    let user = match User::find_by_id(&state.db, principal.user_id).await? {
        Some(user) => user,
        None => return Ok(Redirect::to("/login").into_response()),
    };

    Ok(Html(views::dashboard_page(&user.username, &user.email, user.created_at)).into_response())
}

/// Destroys the session if the request carries one; always clears the
/// cookie and redirects. A second logout is a no-op, not an error.
#[instrument(skip(state, headers))]
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(value) = cookie::session_cookie_from_headers(&headers) {
        if let Some(sid) = cookie::verify_session_cookie(&value, &state.config.session.secret) {
            Session::destroy(&state.db, sid).await?;
            info!("session closed");
        }
    }

    Ok((
        [(header::SET_COOKIE, cookie::clear_session_cookie())],
        Redirect::to("/login"),
    )
        .into_response())
}
