//! Printable representation of a stored comprobante, shared by the PDF export.

use serde::Serialize;

use crate::comprobantes::model::{Comprobante, TipoDoc};
use crate::comprobantes::totals::{compute_total, line_base, unit_base, TaxBreakdown};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilaView {
    pub cantidad: String,
    pub descripcion: String,
    pub precio_unitario: String,
    pub subtotal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComprobanteView {
    pub titulo: String,
    pub numero: String,
    pub cliente: String,
    pub documento: String,
    pub fecha: String,
    pub tipo_cambio: Option<String>,
    pub simbolo: String,
    pub filas: Vec<FilaView>,
    pub op_gravada: String,
    pub igv: String,
    pub total: String,
    pub filename: String,
}

fn money(simbolo: &str, value: f64) -> String {
    format!("{simbolo} {value:.2}")
}

impl ComprobanteView {
    pub fn new(c: &Comprobante, totals: TaxBreakdown) -> Self {
        let simbolo = c.moneda.simbolo();
        let titulo = match c.cliente.tipo_doc {
            TipoDoc::Dni => "BOLETA DE VENTA",
            TipoDoc::Ruc => "FACTURA DE VENTA",
        };
        let d = c.fecha_emision;
        let filas = c
            .detalle
            .iter()
            .map(|item| FilaView {
                cantidad: item.cantidad.to_string(),
                descripcion: item.descripcion.clone(),
                precio_unitario: format!("{:.2}", unit_base(item.precio_unitario)),
                subtotal: format!("{:.2}", line_base(item)),
            })
            .collect();

        Self {
            titulo: titulo.into(),
            numero: format!("Nº: {}-{}", c.serie, c.numero),
            cliente: c.cliente.nombre.clone(),
            documento: format!("Doc: {}", c.cliente.numero_doc),
            fecha: format!("{:02}/{:02}/{}", d.day(), u8::from(d.month()), d.year()),
            tipo_cambio: c.tipo_cambio.map(|tc| format!("Tipo Cambio: {tc}")),
            simbolo: simbolo.into(),
            filas,
            op_gravada: format!("Op. Gravada: {}", money(simbolo, totals.base)),
            igv: format!("IGV (18%): {}", money(simbolo, totals.igv)),
            total: format!("TOTAL: {}", money(simbolo, totals.total)),
            filename: format!("comprobante-{}-{}.pdf", c.serie, c.numero),
        }
    }
}

/// Breakdown taken from the stored `totales`; recomputed from the lines
/// when that string is not a number.
impl From<&Comprobante> for ComprobanteView {
    fn from(c: &Comprobante) -> Self {
        let totals = TaxBreakdown::from_totales(&c.totales)
            .unwrap_or_else(|| TaxBreakdown::from_total(compute_total(&c.detalle)));
        Self::new(c, totals)
    }
}
