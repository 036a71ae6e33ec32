use serde::{Deserialize, Serialize};
use time::Date;

use crate::comprobantes::model::{fecha_iso, Cliente, DetalleItem, Moneda};
use crate::comprobantes::totals::{parse_totales, total_matches};
use crate::error::{AppError, AppResult};

/// Payload submitted by the invoice form; `id` and `userId` are assigned
/// by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComprobanteRequest {
    pub serie: String,
    pub numero: u32,
    #[serde(with = "fecha_iso")]
    pub fecha_emision: Date,
    pub moneda: Moneda,
    #[serde(default)]
    pub tipo_cambio: Option<f64>,
    pub cliente: Cliente,
    pub detalle: Vec<DetalleItem>,
    pub totales: String,
}

impl CreateComprobanteRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.detalle.is_empty() {
            return Err(AppError::validation(
                "Debe agregar al menos un producto al detalle.",
            ));
        }
        for (i, item) in self.detalle.iter().enumerate() {
            let linea = i + 1;
            if item.descripcion.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "Línea {linea}: la descripción es obligatoria."
                )));
            }
            if item.cantidad < 1 {
                return Err(AppError::validation(format!(
                    "Línea {linea}: la cantidad debe ser al menos 1."
                )));
            }
            if !item.precio_unitario.is_finite() || item.precio_unitario < 0.01 {
                return Err(AppError::validation(format!(
                    "Línea {linea}: el precio unitario debe ser mayor a 0."
                )));
            }
        }

        if self.cliente.numero_doc.trim().is_empty() || self.cliente.nombre.trim().is_empty() {
            return Err(AppError::validation("Los datos del cliente son obligatorios."));
        }
        if self.serie != self.cliente.tipo_doc.serie() {
            return Err(AppError::validation(
                "La serie no corresponde al tipo de documento del cliente.",
            ));
        }

        match (self.moneda, self.tipo_cambio) {
            (Moneda::Usd, Some(tc)) if tc.is_finite() && tc > 0.0 => {}
            (Moneda::Usd, _) => {
                return Err(AppError::validation(
                    "El tipo de cambio es obligatorio para comprobantes en USD.",
                ))
            }
            (Moneda::Pen, Some(_)) => {
                return Err(AppError::validation(
                    "Los comprobantes en PEN no llevan tipo de cambio.",
                ))
            }
            (Moneda::Pen, None) => {}
        }

        let declarado = parse_totales(&self.totales)
            .ok_or_else(|| AppError::validation("El total del comprobante no es un número."))?;
        if !total_matches(declarado, &self.detalle) {
            return Err(AppError::validation(
                "El total no coincide con el detalle del comprobante.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::comprobantes::model::TipoDoc;
    use time::macros::date;

    pub(crate) fn boleta() -> CreateComprobanteRequest {
        CreateComprobanteRequest {
            serie: "B001".into(),
            numero: 4321,
            fecha_emision: date!(2025 - 06 - 30),
            moneda: Moneda::Pen,
            tipo_cambio: None,
            cliente: Cliente {
                tipo_doc: TipoDoc::Dni,
                numero_doc: "87654321".into(),
                nombre: "Luis Mamani Ccori".into(),
            },
            detalle: vec![
                DetalleItem {
                    producto_id: Some(1),
                    descripcion: "Cuaderno".into(),
                    cantidad: 4,
                    precio_unitario: 12.5,
                },
                DetalleItem {
                    producto_id: None,
                    descripcion: "Forrado".into(),
                    cantidad: 1,
                    precio_unitario: 68.0,
                },
            ],
            totales: "118.00".into(),
        }
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(m) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn well_formed_boleta_passes() {
        boleta().validate().unwrap();
    }

    #[test]
    fn empty_detail_is_rejected() {
        let mut req = boleta();
        req.detalle.clear();
        req.totales = "0.00".into();
        assert!(message(req.validate().unwrap_err()).contains("al menos un producto"));
    }

    #[test]
    fn malformed_lines_are_rejected() {
        let mut req = boleta();
        req.detalle[1].cantidad = 0;
        assert!(message(req.validate().unwrap_err()).starts_with("Línea 2"));

        let mut req = boleta();
        req.detalle[0].precio_unitario = 0.0;
        assert!(message(req.validate().unwrap_err()).starts_with("Línea 1"));

        let mut req = boleta();
        req.detalle[0].descripcion = "  ".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn serie_must_match_client_document() {
        let mut req = boleta();
        req.serie = "F001".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn exchange_rate_only_with_usd() {
        let mut req = boleta();
        req.tipo_cambio = Some(3.4);
        assert!(req.validate().is_err());

        let mut req = boleta();
        req.moneda = Moneda::Usd;
        assert!(req.validate().is_err());
        req.tipo_cambio = Some(3.4);
        req.validate().unwrap();
    }

    #[test]
    fn declared_total_must_match_lines() {
        let mut req = boleta();
        req.totales = "117.00".into();
        assert!(message(req.validate().unwrap_err()).contains("no coincide"));

        req.totales = "ciento".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn float_rounded_total_is_accepted() {
        let mut req = boleta();
        req.detalle = vec![DetalleItem {
            producto_id: None,
            descripcion: "Pan".into(),
            cantidad: 1,
            precio_unitario: 2.675,
        }];
        req.totales = "2.67".into();
        req.validate().unwrap();
        req.totales = "2.68".into();
        req.validate().unwrap();
        req.totales = "2.66".into();
        assert!(req.validate().is_err());
    }
}
