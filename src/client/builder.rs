//! Invoice form state: document kind, customer, line items and currency.
//!
//! Unit prices are always kept in the currently selected currency. Catalog
//! prices are PEN and are converted when added to a USD document.

use rand::Rng;
use serde_json::Value;
use thiserror::Error;
use time::{Date, OffsetDateTime};

use crate::comprobantes::dto::CreateComprobanteRequest;
use crate::comprobantes::model::{Cliente, DetalleItem, Moneda, TipoDoc};
use crate::comprobantes::totals::{compute_total, convert_price, format_totales, FALLBACK_TIPO_CAMBIO};
use crate::productos::repo_types::Producto;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoComprobante {
    Boleta,
    Factura,
}

impl TipoComprobante {
    pub fn tipo_doc(self) -> TipoDoc {
        match self {
            TipoComprobante::Boleta => TipoDoc::Dni,
            TipoComprobante::Factura => TipoDoc::Ruc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("Error: No puedes generar una boleta para tu propio DNI.")]
    BoletaPropia,
    #[error("Error: No puedes generar una factura a tu propio RUC.")]
    FacturaPropia,
    #[error("Debe agregar al menos un producto al detalle.")]
    DetalleVacio,
}

#[derive(Debug, Clone)]
pub struct ComprobanteBuilder {
    emisor_dni: String,
    tipo: TipoComprobante,
    moneda: Moneda,
    tipo_cambio: f64,
    numero_doc: String,
    nombres: String,
    apellidos: String,
    razon_social: String,
    detalle: Vec<DetalleItem>,
}

impl ComprobanteBuilder {
    /// `emisor_dni` is the logged-in user's DNI; `tipo_cambio` the USD sell rate.
    pub fn new(emisor_dni: impl Into<String>, tipo_cambio: f64) -> Self {
        let tipo_cambio = if tipo_cambio.is_finite() && tipo_cambio > 0.0 {
            tipo_cambio
        } else {
            FALLBACK_TIPO_CAMBIO
        };
        Self {
            emisor_dni: emisor_dni.into(),
            tipo: TipoComprobante::Boleta,
            moneda: Moneda::Pen,
            tipo_cambio,
            numero_doc: String::new(),
            nombres: String::new(),
            apellidos: String::new(),
            razon_social: String::new(),
            detalle: Vec::new(),
        }
    }

    pub fn tipo(&self) -> TipoComprobante {
        self.tipo
    }

    pub fn moneda(&self) -> Moneda {
        self.moneda
    }

    pub fn detalle(&self) -> &[DetalleItem] {
        &self.detalle
    }

    /// Switching kind wipes the form and goes back to PEN.
    pub fn set_tipo(&mut self, tipo: TipoComprobante) {
        self.tipo = tipo;
        self.numero_doc.clear();
        self.nombres.clear();
        self.apellidos.clear();
        self.razon_social.clear();
        self.detalle.clear();
        self.moneda = Moneda::Pen;
    }

    fn check_receptor(&self, numero: &str) -> Result<(), BuilderError> {
        match self.tipo {
            TipoComprobante::Boleta if numero == self.emisor_dni => Err(BuilderError::BoletaPropia),
            TipoComprobante::Factura if numero.starts_with(&format!("10{}", self.emisor_dni)) => {
                Err(BuilderError::FacturaPropia)
            }
            _ => Ok(()),
        }
    }

    /// DNI for a boleta, RUC for a factura.
    pub fn set_documento(&mut self, numero: &str) -> Result<(), BuilderError> {
        let numero = numero.trim();
        self.check_receptor(numero)?;
        self.numero_doc = numero.to_string();
        Ok(())
    }

    pub fn set_persona(&mut self, nombres: &str, apellidos: &str) {
        self.nombres = nombres.trim().to_string();
        self.apellidos = apellidos.trim().to_string();
    }

    pub fn set_razon_social(&mut self, razon_social: &str) {
        self.razon_social = razon_social.trim().to_string();
    }

    /// Fill the customer from a RENIEC response. Returns false and clears the
    /// name fields when the response lacks them, so they can be typed in.
    pub fn aplicar_dni(&mut self, data: &Value) -> bool {
        let campo = |k: &str| data.get(k).and_then(Value::as_str).unwrap_or("").trim();
        let nombres = campo("first_name");
        if nombres.is_empty() {
            self.set_persona("", "");
            return false;
        }
        let apellidos = format!("{} {}", campo("first_last_name"), campo("second_last_name"));
        self.set_persona(nombres, &apellidos);
        true
    }

    /// Fill the company name from a SUNAT response.
    pub fn aplicar_ruc(&mut self, data: &Value) -> bool {
        match data.get("razon_social").and_then(Value::as_str) {
            Some(rs) if !rs.trim().is_empty() => {
                self.set_razon_social(rs);
                true
            }
            _ => {
                self.razon_social.clear();
                false
            }
        }
    }

    pub fn cliente(&self) -> Cliente {
        let nombre = match self.tipo {
            TipoComprobante::Boleta => format!("{} {}", self.nombres, self.apellidos),
            TipoComprobante::Factura => self.razon_social.clone(),
        };
        Cliente {
            tipo_doc: self.tipo.tipo_doc(),
            numero_doc: self.numero_doc.clone(),
            nombre,
        }
    }

    /// Add a catalog product. Ignored when `cantidad` is zero.
    pub fn agregar_producto(&mut self, producto: &Producto, cantidad: u32) -> bool {
        if cantidad < 1 {
            return false;
        }
        self.detalle.push(DetalleItem {
            producto_id: Some(producto.id),
            descripcion: producto.nombre.clone(),
            cantidad,
            precio_unitario: convert_price(producto.precio, Moneda::Pen, self.moneda, self.tipo_cambio),
        });
        true
    }

    /// Add an empty line to be filled in by hand; returns its index.
    pub fn agregar_linea(&mut self) -> usize {
        self.detalle.push(DetalleItem {
            producto_id: None,
            descripcion: String::new(),
            cantidad: 1,
            precio_unitario: 0.0,
        });
        self.detalle.len() - 1
    }

    pub fn linea_mut(&mut self, index: usize) -> Option<&mut DetalleItem> {
        self.detalle.get_mut(index)
    }

    pub fn quitar_linea(&mut self, index: usize) -> Option<DetalleItem> {
        (index < self.detalle.len()).then(|| self.detalle.remove(index))
    }

    /// Change currency, re-expressing every unit price.
    pub fn set_moneda(&mut self, moneda: Moneda) {
        if moneda == self.moneda {
            return;
        }
        for item in &mut self.detalle {
            item.precio_unitario = convert_price(item.precio_unitario, self.moneda, moneda, self.tipo_cambio);
        }
        self.moneda = moneda;
    }

    pub fn total(&self) -> f64 {
        compute_total(&self.detalle)
    }

    pub fn build(&self) -> Result<CreateComprobanteRequest, BuilderError> {
        let hoy = OffsetDateTime::now_utc().date();
        self.build_with(&mut rand::thread_rng(), hoy)
    }

    pub fn build_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        fecha_emision: Date,
    ) -> Result<CreateComprobanteRequest, BuilderError> {
        if self.detalle.is_empty() {
            return Err(BuilderError::DetalleVacio);
        }
        self.check_receptor(&self.numero_doc)?;
        let tipo_doc = self.tipo.tipo_doc();
        Ok(CreateComprobanteRequest {
            serie: tipo_doc.serie().to_string(),
            numero: rng.gen_range(1000..=9999),
            fecha_emision,
            moneda: self.moneda,
            tipo_cambio: (self.moneda == Moneda::Usd).then_some(self.tipo_cambio),
            cliente: self.cliente(),
            detalle: self.detalle.clone(),
            totales: format_totales(self.total()),
        })
    }
}
