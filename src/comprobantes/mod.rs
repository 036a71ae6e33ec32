use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod model;
pub mod pdf;
pub mod render;
pub mod repo;
pub mod totals;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::comprobantes_routes())
}
