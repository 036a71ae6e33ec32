use std::path::Path;

use anyhow::anyhow;
use genpdf::elements::{Break, Paragraph, StyledElement, TableLayout};
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Document, Element, Margins, SimplePageDecorator};

use crate::comprobantes::render::ComprobanteView;

const FONT_FAMILY: &str = "LiberationSans";

fn p(text: &str, style: Style) -> StyledElement<Paragraph> {
    Paragraph::new(text).styled(style)
}

fn p_aligned(text: &str, style: Style, align: Alignment) -> impl Element {
    Paragraph::new(text).aligned(align).styled(style)
}

/// Lay out the comprobante on an A4 page. Fonts are loaded from
/// `fonts_dir/LiberationSans-*.ttf`.
pub fn render_pdf(view: &ComprobanteView, fonts_dir: &Path) -> anyhow::Result<Vec<u8>> {
    let font_family = genpdf::fonts::from_files(fonts_dir, FONT_FAMILY, None)
        .map_err(|e| anyhow!("load {FONT_FAMILY} fonts from {}: {e}", fonts_dir.display()))?;

    let mut doc = Document::new(font_family);
    doc.set_title(format!("{} {}", view.titulo, view.numero));

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(Margins::trbl(15, 15, 15, 15));
    doc.set_page_decorator(decorator);

    let s_title = Style::new().with_font_size(20).bold();
    let s_numero = Style::new().with_font_size(12);
    let s_normal = Style::new().with_font_size(10);
    let s_bold = Style::new().with_font_size(10).bold();
    let s_total = Style::new().with_font_size(12).bold();
    let s_pie = Style::new().with_font_size(7).with_color(Color::Greyscale(128));

    doc.push(p_aligned(&view.titulo, s_title, Alignment::Center));
    doc.push(p_aligned(&view.numero, s_numero, Alignment::Center));
    doc.push(Break::new(1.5));

    let mut cabecera = TableLayout::new(vec![3, 2]);
    cabecera
        .row()
        .element(p(&format!("Cliente: {}", view.cliente), s_normal))
        .element(p_aligned(&format!("Fecha: {}", view.fecha), s_normal, Alignment::Right))
        .push()
        .map_err(|e| anyhow!("pdf header row: {e}"))?;
    let tipo_cambio = view.tipo_cambio.clone().unwrap_or_default();
    cabecera
        .row()
        .element(p(&view.documento, s_normal))
        .element(p_aligned(&tipo_cambio, s_normal, Alignment::Right))
        .push()
        .map_err(|e| anyhow!("pdf header row: {e}"))?;
    doc.push(cabecera);
    doc.push(Break::new(1.5));

    let mut tabla = TableLayout::new(vec![1, 6, 2, 2]);
    tabla.set_cell_decorator(genpdf::elements::FrameCellDecorator::new(true, true, false));
    tabla
        .row()
        .element(p("Cant.", s_bold))
        .element(p("Descripción", s_bold))
        .element(p_aligned(&format!("P. Unit. ({})", view.simbolo), s_bold, Alignment::Right))
        .element(p_aligned(&format!("Subtotal ({})", view.simbolo), s_bold, Alignment::Right))
        .push()
        .map_err(|e| anyhow!("pdf table header: {e}"))?;
    for fila in &view.filas {
        tabla
            .row()
            .element(p(&fila.cantidad, s_normal))
            .element(p(&fila.descripcion, s_normal))
            .element(p_aligned(&fila.precio_unitario, s_normal, Alignment::Right))
            .element(p_aligned(&fila.subtotal, s_normal, Alignment::Right))
            .push()
            .map_err(|e| anyhow!("pdf table row: {e}"))?;
    }
    doc.push(tabla);
    doc.push(Break::new(1.5));

    doc.push(p_aligned(&view.op_gravada, s_normal, Alignment::Right));
    doc.push(p_aligned(&view.igv, s_normal, Alignment::Right));
    doc.push(p_aligned(&view.total, s_total, Alignment::Right));
    doc.push(Break::new(2.0));
    doc.push(p_aligned(
        "Representación impresa del comprobante de venta",
        s_pie,
        Alignment::Center,
    ));

    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(|e| anyhow!("render pdf: {e}"))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fonts_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let view = ComprobanteView {
            titulo: "BOLETA DE VENTA".into(),
            numero: "Nº: B001-1000".into(),
            cliente: "Ana".into(),
            documento: "Doc: 12345678".into(),
            fecha: "01/01/2025".into(),
            tipo_cambio: None,
            simbolo: "S/".into(),
            filas: vec![],
            op_gravada: String::new(),
            igv: String::new(),
            total: String::new(),
            filename: "comprobante-B001-1000.pdf".into(),
        };
        let err = render_pdf(&view, dir.path()).unwrap_err();
        assert!(err.to_string().contains("LiberationSans"));
    }
}
