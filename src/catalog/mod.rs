mod dto;
pub mod handlers;
pub mod models;
pub mod repo;
pub mod seed;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::catalog_routes()
}
