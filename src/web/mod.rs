use axum::Router;

use crate::state::AppState;

pub mod forms;
pub mod handlers;
mod views;

pub fn router() -> Router<AppState> {
    handlers::router()
}
