//! Invoice arithmetic: totals, IGV breakdown and currency conversion.
//!
//! Stored totals are tax-inclusive. The pre-tax base is always derived by
//! dividing by [`IGV_FACTOR`], never by applying [`IGV_RATE`] to a stored base.

use serde::Serialize;

use crate::comprobantes::model::{DetalleItem, Moneda};

pub const IGV_RATE: f64 = 0.18;
pub const IGV_FACTOR: f64 = 1.18;
/// USD sell rate used when no exchange-rate snapshot is available.
pub const FALLBACK_TIPO_CAMBIO: f64 = 3.4;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn line_subtotal(item: &DetalleItem) -> f64 {
    f64::from(item.cantidad) * item.precio_unitario
}

/// Largest accepted gap between a declared total and the line sum.
pub const TOTAL_TOLERANCE: f64 = 0.005 + 1e-9;

/// Unrounded sum of line subtotals; `0.0` for no lines.
pub fn sum_subtotals(items: &[DetalleItem]) -> f64 {
    items.iter().map(line_subtotal).fold(0.0, |acc, x| acc + x)
}

/// Sum of line subtotals, rounded to cents.
pub fn compute_total(items: &[DetalleItem]) -> f64 {
    round2(sum_subtotals(items))
}

/// Whether `declared` is the line sum rounded to cents, by any rounding
/// rule (half-up or the binary-float rounding of `toFixed`).
pub fn total_matches(declared: f64, items: &[DetalleItem]) -> bool {
    (declared - sum_subtotals(items)).abs() <= TOTAL_TOLERANCE
}

/// Two-decimal string stored as `totales`.
pub fn format_totales(total: f64) -> String {
    format!("{:.2}", round2(total))
}

pub fn parse_totales(totales: &str) -> Option<f64> {
    totales
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxBreakdown {
    pub base: f64,
    pub igv: f64,
    pub total: f64,
}

impl TaxBreakdown {
    pub fn from_total(total: f64) -> Self {
        let base = total / IGV_FACTOR;
        let igv = base * IGV_RATE;
        Self { base, igv, total }
    }

    pub fn from_totales(totales: &str) -> Option<Self> {
        parse_totales(totales).map(Self::from_total)
    }
}

/// Pre-tax unit price shown per line.
pub fn unit_base(precio_unitario: f64) -> f64 {
    precio_unitario / IGV_FACTOR
}

/// Pre-tax line amount; the unit price is taken at cents precision.
pub fn line_base(item: &DetalleItem) -> f64 {
    f64::from(item.cantidad) * round2(item.precio_unitario) / IGV_FACTOR
}

/// Re-express a unit price when the document currency changes.
/// `rate` is the USD sell rate in PEN.
pub fn convert_price(price: f64, from: Moneda, to: Moneda, rate: f64) -> f64 {
    match (from, to) {
        (Moneda::Pen, Moneda::Usd) => price / rate,
        (Moneda::Usd, Moneda::Pen) => price * rate,
        _ => price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(cantidad: u32, precio_unitario: f64) -> DetalleItem {
        DetalleItem {
            producto_id: None,
            descripcion: "x".into(),
            cantidad,
            precio_unitario,
        }
    }

    #[test]
    fn total_is_rounded_sum_of_lines() {
        let items = vec![item(3, 2.333), item(1, 10.0), item(2, 0.1)];
        let expected = 3.0 * 2.333 + 10.0 + 2.0 * 0.1;
        let total = compute_total(&items);
        assert!((total - expected).abs() < 0.005);
        assert_eq!(format_totales(total), "17.20");
    }

    #[test]
    fn empty_detail_totals_zero() {
        assert!(sum_subtotals(&[]).is_sign_positive());
        assert_eq!(format_totales(compute_total(&[])), "0.00");
    }

    #[test]
    fn declared_total_accepts_either_cent_rounding() {
        let items = vec![item(1, 2.675)];
        assert!(total_matches(2.67, &items));
        assert!(total_matches(2.68, &items));
        assert!(!total_matches(2.66, &items));
        assert!(!total_matches(2.69, &items));
        assert!(total_matches(0.0, &[]));
    }

    #[test]
    fn breakdown_of_118_is_100_plus_18() {
        let b = TaxBreakdown::from_totales("118.00").unwrap();
        assert!((b.base - 100.0).abs() < 0.01);
        assert!((b.igv - 18.0).abs() < 0.01);
        assert_eq!(b.total, 118.0);
    }

    #[test]
    fn breakdown_recomposes_total() {
        for t in [0.01, 1.0, 59.9, 123.45, 9999.99] {
            let b = TaxBreakdown::from_total(t);
            assert!((b.base + b.igv - t).abs() < 0.01, "total {t}");
        }
    }

    #[test]
    fn unparseable_totales_has_no_breakdown() {
        assert!(TaxBreakdown::from_totales("abc").is_none());
        assert!(TaxBreakdown::from_totales("").is_none());
    }

    #[test]
    fn currency_toggle_round_trips() {
        let usd = convert_price(10.0, Moneda::Pen, Moneda::Usd, 3.5);
        assert!((usd - 2.857143).abs() < 1e-6);
        let pen = convert_price(usd, Moneda::Usd, Moneda::Pen, 3.5);
        assert!((pen - 10.0).abs() < 0.01);
        assert_eq!(convert_price(10.0, Moneda::Pen, Moneda::Pen, 3.5), 10.0);
    }

    #[test]
    fn per_line_bases() {
        assert!((unit_base(11.8) - 10.0).abs() < 1e-9);
        assert!((line_base(&item(2, 5.9)) - 10.0).abs() < 1e-9);
    }
}
