use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    extract::AppJson,
    productos::{
        dto::CreateProductoRequest,
        repo_types::{NewProducto, Producto},
    },
    state::AppState,
};

pub fn productos_routes() -> Router<AppState> {
    Router::new().route("/productos", get(list_productos).post(create_producto))
}

#[instrument(skip(state, _auth))]
pub async fn list_productos(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<Producto>>> {
    Ok(Json(Producto::list(&state.store).await))
}

#[instrument(skip(state, auth, body))]
pub async fn create_producto(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    AppJson(body): AppJson<CreateProductoRequest>,
) -> AppResult<(StatusCode, Json<Producto>)> {
    let nombre = body.nombre.trim().to_string();
    if nombre.is_empty() {
        return Err(AppError::validation(
            "El nombre del producto no puede estar vacío",
        ));
    }
    if !body.precio.is_finite() || body.precio < 0.01 {
        return Err(AppError::validation("El precio debe ser mayor a 0"));
    }
    if Producto::find_by_nombre(&state.store, &nombre).await.is_some() {
        warn!(%nombre, "duplicate product name");
        return Err(AppError::validation("Ya existe un producto con ese nombre"));
    }

    let descripcion = body
        .descripcion
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    let producto = Producto::create(
        &state.store,
        NewProducto {
            nombre,
            precio: body.precio,
            descripcion,
        },
    )
    .await?;

    info!(producto_id = producto.id, user_id = auth.user_id, "producto created");
    Ok((StatusCode::CREATED, Json(producto)))
}
