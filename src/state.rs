use std::sync::Arc;

use crate::config::AppConfig;
use crate::lookup::client::{DecolectaClient, IdentityLookup};
use crate::store::JsonStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
    pub config: Arc<AppConfig>,
    pub lookup: Arc<dyn IdentityLookup>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = Arc::new(JsonStore::new(config.data_path.clone()));
        let lookup = Arc::new(DecolectaClient::new(&config.decolecta)?) as Arc<dyn IdentityLookup>;
        tracing::info!(path = %store.path().display(), "using json store");
        Ok(Self::from_parts(store, config, lookup))
    }

    pub fn from_parts(
        store: Arc<JsonStore>,
        config: Arc<AppConfig>,
        lookup: Arc<dyn IdentityLookup>,
    ) -> Self {
        Self {
            store,
            config,
            lookup,
        }
    }

    /// State backed by a store file under `dir` and a canned lookup client.
    #[cfg(test)]
    pub(crate) fn fake(dir: &std::path::Path) -> Self {
        use crate::config::{DecolectaConfig, JwtConfig};
        use crate::lookup::client::LookupError;
        use async_trait::async_trait;
        use serde_json::{json, Value};

        struct FakeLookup;
        #[async_trait]
        impl IdentityLookup for FakeLookup {
            async fn consultar_dni(&self, numero: &str) -> Result<Value, LookupError> {
                match numero {
                    "12345678" => Ok(json!({
                        "first_name": "ANA",
                        "first_last_name": "QUISPE",
                        "second_last_name": "ROJAS",
                        "document_number": numero
                    })),
                    _ => Err(LookupError::Dni(anyhow::anyhow!("404 from upstream"))),
                }
            }
            async fn consultar_ruc(&self, numero: &str) -> Result<Value, LookupError> {
                match numero {
                    "20123456789" => Ok(json!({
                        "razon_social": "COMERCIAL ANDINA S.A.C.",
                        "numero_documento": numero
                    })),
                    _ => Err(LookupError::Ruc(anyhow::anyhow!("404 from upstream"))),
                }
            }
            async fn consultar_tipo_cambio(&self) -> Result<Value, LookupError> {
                Ok(json!({
                    "buy_price": "3.370",
                    "sell_price": "3.500",
                    "base_currency": "USD",
                    "quote_currency": "PEN",
                    "date": "2025-06-30"
                }))
            }
        }

        let config = Arc::new(AppConfig {
            data_path: dir.join("db.json"),
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                ttl_minutes: 60,
            },
            decolecta: DecolectaConfig {
                base_url: "http://fake.local".into(),
                api_key: "fake".into(),
                timeout_secs: 1,
            },
            cors_origin: "*".into(),
            fonts_dir: dir.join("fonts"),
        });
        let store = Arc::new(JsonStore::new(config.data_path.clone()));
        Self::from_parts(store, config, Arc::new(FakeLookup))
    }
}
