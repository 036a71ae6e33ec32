use std::time::Duration;

use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::auth::repo_types::PublicUser;
use crate::client::session::Session;
use crate::comprobantes::dto::CreateComprobanteRequest;
use crate::comprobantes::model::Comprobante;
use crate::error::ErrorBody;
use crate::productos::dto::CreateProductoRequest;
use crate::productos::repo_types::Producto;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx answer; `message` is the server's own text.
    #[error("{message}")]
    Server { status: StatusCode, message: String },

    #[error("Debe iniciar sesión.")]
    SinSesion,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Http(e) => e.status(),
            ApiError::SinSesion => None,
        }
    }
}

/// HTTP client for the `/api` routes, carrying the session.
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// `base_url` points at the API root, e.g. `http://localhost:3001/api`.
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_session(base_url, Session::new())
    }

    pub fn with_session(base_url: impl Into<String>, session: Session) -> anyhow::Result<Self> {
        let http = HttpClient::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.session.token().ok_or(ApiError::SinSesion)?;
        Ok(req.bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ApiError> {
        let res = req.send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res.json::<T>().await?);
        }
        let message = match res.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status.canonical_reason().unwrap_or("Error").to_string(),
        };
        warn!(%status, %message, "api request failed");
        Err(ApiError::Server { status, message })
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        Self::send(self.http.post(self.url("/auth/register")).json(req)).await
    }

    /// Log in and keep the token in the session.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<PublicUser, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let res: LoginResponse =
            Self::send(self.http.post(self.url("/auth/login")).json(&body)).await?;
        self.session.login(res.token, res.user.clone());
        Ok(res.user)
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    pub async fn productos(&self) -> Result<Vec<Producto>, ApiError> {
        Self::send(self.authed(self.http.get(self.url("/productos")))?).await
    }

    pub async fn crear_producto(&self, req: &CreateProductoRequest) -> Result<Producto, ApiError> {
        Self::send(self.authed(self.http.post(self.url("/productos")))?.json(req)).await
    }

    pub async fn crear_comprobante(
        &self,
        req: &CreateComprobanteRequest,
    ) -> Result<Comprobante, ApiError> {
        Self::send(self.authed(self.http.post(self.url("/comprobantes")))?.json(req)).await
    }

    pub async fn comprobantes(&self) -> Result<Vec<Comprobante>, ApiError> {
        Self::send(self.authed(self.http.get(self.url("/comprobantes")))?).await
    }

    pub async fn comprobante(&self, id: u64) -> Result<Comprobante, ApiError> {
        Self::send(self.authed(self.http.get(self.url(&format!("/comprobantes/{id}"))))?).await
    }

    /// USD sell rate. Served from the session while the snapshot is fresh;
    /// a failed refresh falls back to whatever the session can offer.
    pub async fn tipo_cambio(&mut self) -> f64 {
        if self.session.rate().is_fresh() {
            return self.session.tipo_cambio();
        }
        match Self::send::<Value>(self.http.get(self.url("/currency/usd-pen"))).await {
            Ok(snapshot) => {
                debug!("exchange rate refreshed");
                self.session.set_rate(snapshot);
            }
            Err(e) => warn!(error = %e, "exchange rate unavailable"),
        }
        self.session.tipo_cambio()
    }

    pub async fn consultar_dni(&self, dni: &str) -> Result<Value, ApiError> {
        Self::send(self.http.get(self.url(&format!("/reniec/{dni}")))).await
    }

    pub async fn consultar_ruc(&self, ruc: &str) -> Result<Value, ApiError> {
        Self::send(self.http.get(self.url(&format!("/sunat/{ruc}")))).await
    }
}
