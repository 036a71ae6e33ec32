use serde::{Deserialize, Serialize};

/// Catalog product. `precio` is in PEN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producto {
    pub id: u64,
    pub nombre: String,
    pub precio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProducto {
    pub nombre: String,
    pub precio: f64,
    pub descripcion: Option<String>,
}
