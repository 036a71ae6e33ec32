use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecolectaConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub jwt: JwtConfig,
    pub decolecta: DecolectaConfig,
    pub cors_origin: String,
    pub fonts_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let data_path = std::env::var("DATA_PATH").unwrap_or_else(|_| "db.json".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "facturacion".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let decolecta = DecolectaConfig {
            base_url: std::env::var("DECOLECTA_BASE_URL")
                .unwrap_or_else(|_| "https://api.decolecta.com/v1".into()),
            api_key: std::env::var("DECOLECTA_API_KEY").unwrap_or_default(),
            timeout_secs: std::env::var("LOOKUP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        };
        Ok(Self {
            data_path: data_path.into(),
            jwt,
            decolecta,
            cors_origin: std::env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3003".into()),
            fonts_dir: std::env::var("FONTS_DIR")
                .unwrap_or_else(|_| "fonts".into())
                .into(),
        })
    }
}
