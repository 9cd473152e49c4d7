// src/services/builtin_pdf.rs

// Escreve um DocumentPlan com as fontes embutidas do PDF (Helvetica) via printpdf.
// Não depende de arquivo de fonte, então é o caminho que sempre está disponível.

use std::io::{BufWriter, Cursor};

use printpdf::{BuiltinFont, Color, Greyscale, IndirectFontRef, Line, Mm, PdfDocument, Point};

use crate::{
    models::report::ReportModel,
    services::{
        document_layout::{plan_document, plan_summary, DocumentPlan, LayoutOp, PAGE_HEIGHT_MM, PAGE_WIDTH_MM},
        document_service::{DocumentRenderer, RenderError, RenderPath},
    },
};

/// Tabelas montadas pelo motor de layout manual.
pub struct ManualPdfRenderer {
    attribution: String,
}

impl ManualPdfRenderer {
    pub fn new(attribution: impl Into<String>) -> Self {
        Self { attribution: attribution.into() }
    }
}

impl DocumentRenderer for ManualPdfRenderer {
    fn path(&self) -> RenderPath {
        RenderPath::Manual
    }

    fn render(&self, model: &ReportModel) -> Result<Vec<u8>, RenderError> {
        let plan = plan_document(model, &self.attribution);
        write_plan(&model.title, &plan)
    }
}

/// Uma página só com o resumo executivo.
pub struct SummaryPdfRenderer {
    attribution: String,
}

impl SummaryPdfRenderer {
    pub fn new(attribution: impl Into<String>) -> Self {
        Self { attribution: attribution.into() }
    }
}

impl DocumentRenderer for SummaryPdfRenderer {
    fn path(&self) -> RenderPath {
        RenderPath::Minimal
    }

    fn render(&self, model: &ReportModel) -> Result<Vec<u8>, RenderError> {
        let plan = plan_summary(model, &self.attribution);
        write_plan(&model.title, &plan)
    }
}

pub fn write_plan(title: &str, plan: &DocumentPlan) -> Result<Vec<u8>, RenderError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(to_builtin_text(title), Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;

    let mut targets = vec![(first_page, first_layer)];
    for index in 1..plan.pages.len() {
        targets.push(doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), format!("Layer {}", index + 1)));
    }

    for (page, (page_index, layer_index)) in plan.pages.iter().zip(targets) {
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for op in &page.ops {
            match op {
                LayoutOp::Fill { x, y, width, height, shade } => {
                    layer.set_fill_color(grey(*shade));
                    layer.add_shape(rectangle(*x, *y, *width, *height));
                    // O texto usa a mesma cor de preenchimento
                    layer.set_fill_color(grey(0.0));
                }
                LayoutOp::Text { x, y, size, bold: is_bold, text } => {
                    let font: &IndirectFontRef = if *is_bold { &bold } else { &regular };
                    layer.use_text(to_builtin_text(text), *size, Mm(*x), Mm(PAGE_HEIGHT_MM - *y), font);
                }
            }
        }
    }

    let mut writer = BufWriter::new(Cursor::new(Vec::new()));
    doc.save(&mut writer).map_err(pdf_err)?;
    let cursor = writer
        .into_inner()
        .map_err(|e| RenderError::Pdf(e.error().to_string()))?;

    Ok(cursor.into_inner())
}

fn pdf_err<E: std::fmt::Debug>(e: E) -> RenderError {
    RenderError::Pdf(format!("{:?}", e))
}

fn grey(shade: f64) -> Color {
    Color::Greyscale(Greyscale::new(shade, None))
}

// Coordenadas do plano têm origem no topo; as do PDF, na base.
fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Line {
    let top = PAGE_HEIGHT_MM - y;
    let bottom = top - height;
    Line {
        points: vec![
            (Point::new(Mm(x), Mm(bottom)), false),
            (Point::new(Mm(x + width), Mm(bottom)), false),
            (Point::new(Mm(x + width), Mm(top)), false),
            (Point::new(Mm(x), Mm(top)), false),
        ],
        is_closed: true,
        has_fill: true,
        has_stroke: false,
        is_clipping_path: false,
    }
}

/// As fontes embutidas só codificam ASCII com segurança: ₹ vira "Rs." e o resto vira "?".
pub fn to_builtin_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '₹' => out.push_str("Rs."),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c if c.is_whitespace() => out.push(' '),
            _ => out.push('?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::{OrderSummary, StatEntry, StatsSummary};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn model() -> ReportModel {
        ReportModel {
            title: "Tutor Earnings".to_string(),
            generated_at: Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap(),
            stats: StatsSummary {
                entries: vec![StatEntry {
                    key: "totalRevenue".to_string(),
                    label: "Total Revenue".to_string(),
                    value: Decimal::from(250000),
                    is_currency: true,
                }],
            },
            revenue: Vec::new(),
            courses: Vec::new(),
            orders: vec![OrderSummary {
                order_id: "ORD-1".to_string(),
                customer: "Ana".to_string(),
                items: 2,
                amount: Decimal::from(1000),
                status: "paid".to_string(),
                created_at: "2026-03-14".to_string(),
            }],
        }
    }

    #[test]
    fn glyph_and_non_ascii_are_transliterated() {
        assert_eq!(to_builtin_text("₹1,500.00"), "Rs.1,500.00");
        assert_eq!(to_builtin_text("Programação"), "Programa??o");
        assert_eq!(to_builtin_text("a\tb"), "a b");
    }

    #[test]
    fn manual_renderer_produces_pdf() {
        let bytes = ManualPdfRenderer::new("attr").render(&model()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn summary_renderer_produces_pdf() {
        let bytes = SummaryPdfRenderer::new("attr").render(&model()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
