use serde::{Deserialize, Serialize};
use time::Date;

/// `YYYY-MM-DD` calendar dates, no time component.
pub mod fecha_iso {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{macros::format_description, Date};

    pub fn serialize<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
        let text = date
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;
        s.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Date, D::Error> {
        let text = String::deserialize(d)?;
        Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
            .map_err(serde::de::Error::custom)
    }
}

pub const SERIE_BOLETA: &str = "B001";
pub const SERIE_FACTURA: &str = "F001";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Moneda {
    Pen,
    Usd,
}

impl Moneda {
    pub fn simbolo(self) -> &'static str {
        match self {
            Moneda::Pen => "S/",
            Moneda::Usd => "$",
        }
    }
}

/// Client document type: DNI clients get a boleta, RUC clients a factura.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TipoDoc {
    Dni,
    Ruc,
}

impl TipoDoc {
    pub fn serie(self) -> &'static str {
        match self {
            TipoDoc::Dni => SERIE_BOLETA,
            TipoDoc::Ruc => SERIE_FACTURA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub tipo_doc: TipoDoc,
    pub numero_doc: String,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetalleItem {
    #[serde(default)]
    pub producto_id: Option<u64>,
    pub descripcion: String,
    pub cantidad: u32,
    pub precio_unitario: f64,
}

/// Stored sales document. `totales` is the tax-inclusive grand total in
/// `moneda`; base and IGV are derived from it on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comprobante {
    pub id: u64,
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
    #[serde(default)]
    pub user_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn wire_format_matches_stored_documents() {
        let raw = serde_json::json!({
            "id": 3,
            "serie": "F001",
            "numero": 4821,
            "fechaEmision": "2025-11-02",
            "moneda": "USD",
            "tipoCambio": 3.38,
            "cliente": {"tipoDoc": "RUC", "numeroDoc": "20123456789", "nombre": "ACME SAC"},
            "detalle": [
                {"productoId": 1, "descripcion": "Cafe", "cantidad": 2, "precioUnitario": 5.5, "esEditable": true},
                {"productoId": null, "descripcion": "Servicio", "cantidad": 1, "precioUnitario": 20}
            ],
            "totales": "31.00",
            "userId": 9
        });
        let c: Comprobante = serde_json::from_value(raw).unwrap();
        assert_eq!(c.fecha_emision, date!(2025 - 11 - 02));
        assert_eq!(c.moneda, Moneda::Usd);
        assert_eq!(c.cliente.tipo_doc, TipoDoc::Ruc);
        assert_eq!(c.detalle[1].producto_id, None);
        assert_eq!(c.user_id, 9);

        let back = serde_json::to_value(&c).unwrap();
        assert_eq!(back["fechaEmision"], "2025-11-02");
        assert_eq!(back["cliente"]["tipoDoc"], "RUC");
        assert_eq!(back["detalle"][0]["precioUnitario"], 5.5);
    }

    #[test]
    fn pen_documents_store_null_exchange_rate() {
        let c = Comprobante {
            id: 1,
            serie: SERIE_BOLETA.into(),
            numero: 1000,
            fecha_emision: date!(2025 - 01 - 15),
            moneda: Moneda::Pen,
            tipo_cambio: None,
            cliente: Cliente {
                tipo_doc: TipoDoc::Dni,
                numero_doc: "12345678".into(),
                nombre: "Ana Quispe".into(),
            },
            detalle: vec![],
            totales: "0.00".into(),
            user_id: 1,
        };
        let v = serde_json::to_value(&c).unwrap();
        assert!(v["tipoCambio"].is_null());
        assert_eq!(v["moneda"], "PEN");
    }

    #[test]
    fn serie_follows_document_type() {
        assert_eq!(TipoDoc::Dni.serie(), "B001");
        assert_eq!(TipoDoc::Ruc.serie(), "F001");
    }
}
