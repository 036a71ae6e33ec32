use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::instrument;

use crate::{error::AppResult, state::AppState};

pub fn lookup_routes() -> Router<AppState> {
    Router::new()
        .route("/reniec/:dni", get(get_dni))
        .route("/sunat/:ruc", get(get_ruc))
        .route("/currency/usd-pen", get(get_tipo_cambio))
}

#[instrument(skip(state))]
pub async fn get_dni(State(state): State<AppState>, Path(dni): Path<String>) -> AppResult<Json<Value>> {
    Ok(Json(state.lookup.consultar_dni(&dni).await?))
}

#[instrument(skip(state))]
pub async fn get_ruc(State(state): State<AppState>, Path(ruc): Path<String>) -> AppResult<Json<Value>> {
    Ok(Json(state.lookup.consultar_ruc(&ruc).await?))
}

#[instrument(skip(state))]
pub async fn get_tipo_cambio(State(state): State<AppState>) -> AppResult<Json<Value>> {
    Ok(Json(state.lookup.consultar_tipo_cambio().await?))
}
