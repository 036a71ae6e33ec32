use crate::productos::repo_types::{NewProducto, Producto};
use crate::store::{next_id, JsonStore};

impl Producto {
    /// Case-insensitive name match.
    pub async fn find_by_nombre(store: &JsonStore, nombre: &str) -> Option<Producto> {
        let wanted = nombre.trim().to_lowercase();
        store
            .read()
            .await
            .productos
            .into_iter()
            .find(|p| p.nombre.to_lowercase() == wanted)
    }

    pub async fn list(store: &JsonStore) -> Vec<Producto> {
        store.read().await.productos
    }

    pub async fn create(store: &JsonStore, new: NewProducto) -> anyhow::Result<Producto> {
        store
            .update(|db| {
                let producto = Producto {
                    id: next_id(db.productos.iter().map(|p| p.id)),
                    nombre: new.nombre,
                    precio: new.precio,
                    descripcion: new.descripcion,
                };
                db.productos.push(producto.clone());
                Ok(producto)
            })
            .await
    }
}
