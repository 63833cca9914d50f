use axum::Router;

use crate::state::AppState;

pub mod cookie;
pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod principal;
pub mod repo;
pub mod session;

pub fn router() -> Router<AppState> {
    handlers::router()
}
