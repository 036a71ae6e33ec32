use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::AuthUser,
    comprobantes::{
        dto::CreateComprobanteRequest,
        model::Comprobante,
        pdf::render_pdf,
        render::ComprobanteView,
    },
    error::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

pub fn comprobantes_routes() -> Router<AppState> {
    Router::new()
        .route("/comprobantes", get(list_comprobantes).post(create_comprobante))
        .route("/comprobantes/:id", get(get_comprobante))
        .route("/comprobantes/:id/pdf", get(get_comprobante_pdf))
}

#[instrument(skip(state, auth, body))]
pub async fn create_comprobante(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    AppJson(body): AppJson<CreateComprobanteRequest>,
) -> AppResult<(StatusCode, Json<Comprobante>)> {
    if let Err(e) = body.validate() {
        warn!(user_id = auth.user_id, error = %e, "comprobante rejected");
        return Err(e);
    }
    let comprobante = Comprobante::create(&state.store, body, auth.user_id).await?;
    info!(
        comprobante_id = comprobante.id,
        serie = %comprobante.serie,
        numero = comprobante.numero,
        user_id = auth.user_id,
        "comprobante created"
    );
    Ok((StatusCode::CREATED, Json(comprobante)))
}

#[instrument(skip(state, _auth))]
pub async fn list_comprobantes(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<Comprobante>>> {
    Ok(Json(Comprobante::list(&state.store).await))
}

#[instrument(skip(state, _auth))]
pub async fn get_comprobante(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Comprobante>> {
    Ok(Json(Comprobante::get_by_id(&state.store, &id).await?))
}

#[instrument(skip(state, _auth))]
pub async fn get_comprobante_pdf(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let comprobante = Comprobante::get_by_id(&state.store, &id).await?;
    let view = ComprobanteView::from(&comprobante);
    let filename = view.filename.clone();

    let fonts_dir = state.config.fonts_dir.clone();
    let bytes = tokio::task::spawn_blocking(move || render_pdf(&view, &fonts_dir))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("pdf task failed: {e}")))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
