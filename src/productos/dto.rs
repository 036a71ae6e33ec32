use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductoRequest {
    #[serde(default)]
    pub nombre: String,
    pub precio: f64,
    #[serde(default)]
    pub descripcion: Option<String>,
}
