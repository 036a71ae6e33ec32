use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::{NewUser, PublicUser, User},
    },
    error::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Credenciales incorrectas.";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_dni(dni: &str) -> bool {
    lazy_static! {
        static ref DNI_RE: Regex = Regex::new(r"^\d{8}$").unwrap();
    }
    DNI_RE.is_match(dni)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    payload.email = payload.email.trim().to_lowercase();
    payload.dni = payload.dni.trim().to_string();
    payload.nombres = payload.nombres.trim().to_string();
    payload.apellidos = payload.apellidos.trim().to_string();

    if payload.nombres.is_empty() || payload.apellidos.is_empty() || payload.password.is_empty() {
        warn!("registration with missing fields");
        return Err(AppError::validation("Todos los campos son obligatorios."));
    }
    if !is_valid_dni(&payload.dni) {
        warn!(dni = %payload.dni, "invalid dni");
        return Err(AppError::validation("El DNI debe tener 8 dígitos."));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::validation("El email no es válido."));
    }

    // DNI is checked before email
    if User::find_by_dni(&state.store, &payload.dni).await.is_some() {
        warn!(dni = %payload.dni, "dni already registered");
        return Err(AppError::validation("El DNI ya se encuentra registrado."));
    }
    if User::find_by_email(&state.store, &payload.email).await.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::validation("El email ya se encuentra registrado."));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.store,
        NewUser {
            nombres: payload.nombres,
            apellidos: payload.apellidos,
            dni: payload.dni,
            email: payload.email,
            password_hash,
        },
    )
    .await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Usuario registrado con éxito".into(),
            user_id: user.id,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    payload.email = payload.email.trim().to_lowercase();

    let Some(user) = User::find_by_email(&state.store, &payload.email).await else {
        warn!(email = %payload.email, "login unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = JwtKeys::from_ref(&state).sign(user.id, &user.email)?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login exitoso".into(),
        token,
        user: PublicUser::from(&user),
    }))
}
