use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::DecolectaConfig;
use crate::error::AppError;

/// Which third-party lookup failed.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("No se pudo consultar el DNI.")]
    Dni(#[source] anyhow::Error),
    #[error("No se pudo consultar el RUC.")]
    Ruc(#[source] anyhow::Error),
    #[error("No se pudo consultar el tipo de cambio.")]
    TipoCambio(#[source] anyhow::Error),
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

/// Identity and exchange-rate lookups. Responses are relayed as raw JSON.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn consultar_dni(&self, numero: &str) -> Result<Value, LookupError>;
    async fn consultar_ruc(&self, numero: &str) -> Result<Value, LookupError>;
    async fn consultar_tipo_cambio(&self) -> Result<Value, LookupError>;
}

/// Decolecta API client (RENIEC, SUNAT and SUNAT exchange rate).
#[derive(Clone)]
pub struct DecolectaClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl DecolectaClient {
    pub fn new(cfg: &DecolectaConfig) -> anyhow::Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> anyhow::Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "decolecta request");
        let res = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json::<Value>().await?)
    }
}

#[async_trait]
impl IdentityLookup for DecolectaClient {
    async fn consultar_dni(&self, numero: &str) -> Result<Value, LookupError> {
        self.get_json("/reniec/dni", &[("numero", numero)])
            .await
            .map_err(|e| {
                error!(error = %e, "reniec lookup failed");
                LookupError::Dni(e)
            })
    }

    async fn consultar_ruc(&self, numero: &str) -> Result<Value, LookupError> {
        self.get_json("/sunat/ruc", &[("numero", numero)])
            .await
            .map_err(|e| {
                error!(error = %e, "sunat lookup failed");
                LookupError::Ruc(e)
            })
    }

    async fn consultar_tipo_cambio(&self) -> Result<Value, LookupError> {
        self.get_json("/tipo-cambio/sunat", &[]).await.map_err(|e| {
            error!(error = %e, "exchange rate lookup failed");
            LookupError::TipoCambio(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use std::collections::HashMap;

    async fn fake_reniec(
        headers: HeaderMap,
        Query(q): Query<HashMap<String, String>>,
    ) -> Result<Json<Value>, StatusCode> {
        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer k-123") {
            return Err(StatusCode::UNAUTHORIZED);
        }
        match q.get("numero").map(String::as_str) {
            Some("12345678") => Ok(Json(serde_json::json!({
                "first_name": "ANA",
                "first_last_name": "QUISPE",
                "second_last_name": "ROJAS",
                "document_number": "12345678"
            }))),
            _ => Err(StatusCode::NOT_FOUND),
        }
    }

    async fn spawn_upstream() -> String {
        let app = Router::new()
            .route("/v1/reniec/dni", get(fake_reniec))
            .route("/v1/tipo-cambio/sunat", get(|| async { "not json" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}/v1")
    }

    fn client(base_url: String, api_key: &str) -> DecolectaClient {
        DecolectaClient::new(&DecolectaConfig {
            base_url,
            api_key: api_key.into(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn dni_lookup_forwards_bearer_and_query() {
        let base = spawn_upstream().await;
        let data = client(base, "k-123").consultar_dni("12345678").await.unwrap();
        assert_eq!(data["first_name"], "ANA");
    }

    #[tokio::test]
    async fn upstream_failures_become_domain_errors() {
        let base = spawn_upstream().await;

        let err = client(base.clone(), "k-123").consultar_dni("00000000").await.unwrap_err();
        assert!(matches!(err, LookupError::Dni(_)));
        assert_eq!(err.to_string(), "No se pudo consultar el DNI.");

        let err = client(base.clone(), "wrong").consultar_dni("12345678").await.unwrap_err();
        assert!(matches!(err, LookupError::Dni(_)));

        let err = client(base.clone(), "k-123").consultar_ruc("20123456789").await.unwrap_err();
        assert_eq!(err.to_string(), "No se pudo consultar el RUC.");

        let err = client(base, "k-123").consultar_tipo_cambio().await.unwrap_err();
        assert!(matches!(err, LookupError::TipoCambio(_)));
    }

    #[test]
    fn lookup_error_maps_to_upstream() {
        let err: AppError = LookupError::Ruc(anyhow::anyhow!("timeout")).into();
        assert!(matches!(err, AppError::Upstream(ref m) if m == "No se pudo consultar el RUC."));
    }
}
