use tracing::warn;

use crate::comprobantes::{dto::CreateComprobanteRequest, model::Comprobante};
use crate::error::{AppError, AppResult};
use crate::store::{next_id, JsonStore};

impl Comprobante {
    /// Append a new comprobante stamped with the creating user.
    pub async fn create(
        store: &JsonStore,
        req: CreateComprobanteRequest,
        user_id: u64,
    ) -> anyhow::Result<Comprobante> {
        store
            .update(|db| {
                if db
                    .comprobantes
                    .iter()
                    .any(|c| c.serie == req.serie && c.numero == req.numero)
                {
                    warn!(serie = %req.serie, numero = req.numero, "numero already used in serie");
                }
                let comprobante = Comprobante {
                    id: next_id(db.comprobantes.iter().map(|c| c.id)),
                    serie: req.serie,
                    numero: req.numero,
                    fecha_emision: req.fecha_emision,
                    moneda: req.moneda,
                    tipo_cambio: req.tipo_cambio,
                    cliente: req.cliente,
                    detalle: req.detalle,
                    totales: req.totales,
                    user_id,
                };
                db.comprobantes.push(comprobante.clone());
                Ok(comprobante)
            })
            .await
    }

    /// All comprobantes, most recent (highest id) first.
    pub async fn list(store: &JsonStore) -> Vec<Comprobante> {
        let mut all = store.read().await.comprobantes;
        all.sort_by(|a, b| b.id.cmp(&a.id));
        all
    }

    /// Lookup by id as received in the path; non-numeric ids cannot match.
    pub async fn get_by_id(store: &JsonStore, id: &str) -> AppResult<Comprobante> {
        let not_found = || AppError::NotFound("Comprobante no encontrado".into());
        let id: u64 = id.trim().parse().map_err(|_| not_found())?;
        store
            .read()
            .await
            .comprobantes
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comprobantes::dto::tests::boleta;

    #[tokio::test]
    async fn create_then_fetch_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("db.json"));

        let req = boleta();
        let created = Comprobante::create(&store, req.clone(), 5).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.user_id, 5);

        let fetched = Comprobante::get_by_id(&store, &created.id.to_string()).await.unwrap();
        assert_eq!(fetched.detalle, req.detalle);
        assert_eq!(fetched.cliente, req.cliente);
        assert_eq!(fetched.moneda, req.moneda);
        assert_eq!(fetched.totales, req.totales);
    }

    #[tokio::test]
    async fn list_is_id_descending() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("db.json"));
        for _ in 0..3 {
            Comprobante::create(&store, boleta(), 1).await.unwrap();
        }
        let ids: Vec<u64> = Comprobante::list(&store).await.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn unknown_or_malformed_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("db.json"));
        Comprobante::create(&store, boleta(), 1).await.unwrap();

        for id in ["2", "abc", ""] {
            let err = Comprobante::get_by_id(&store, id).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "id {id:?}");
        }
    }
}
