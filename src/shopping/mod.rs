pub mod dto;
pub mod handlers;
pub mod ingredient;
pub mod repo;
pub mod tally;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
