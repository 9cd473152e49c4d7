// src/services/styled_pdf.rs

// Caminho principal do PDF: genpdf com fontes TrueType e TableLayout.
// Sem as fontes em FONTS_DIR o caminho fica indisponível e a cadeia segue para o manual.

use std::{cell::Cell, path::PathBuf, rc::Rc};

use genpdf::{elements, style, Element, Mm, Position, Size};

use crate::{
    models::report::{ReportModel, ReportSection},
    services::{
        document_layout::{plan_document, section_table, summary_lines, TableSpec},
        document_service::{DocumentRenderer, RenderError, RenderPath},
    },
};

const PAGE_MARGIN_MM: f64 = 12.0;
const FOOTER_HEIGHT_MM: f64 = 8.0;

pub struct StyledPdfRenderer {
    fonts_dir: PathBuf,
    font_family: String,
    attribution: String,
}

impl StyledPdfRenderer {
    pub fn new(fonts_dir: impl Into<PathBuf>, font_family: impl Into<String>, attribution: impl Into<String>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            font_family: font_family.into(),
            attribution: attribution.into(),
        }
    }

    fn build(
        &self,
        model: &ReportModel,
        breaks_before: &[ReportSection],
        footer: FooterDecorator,
    ) -> Result<genpdf::Document, RenderError> {
        // Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.font_family, None)
            .map_err(|e| RenderError::FontsUnavailable(format!("{}: {}", self.fonts_dir.display(), e)))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(model.title.clone());
        doc.set_font_size(10);
        doc.set_page_decorator(footer);

        // --- CABEÇALHO ---
        doc.push(elements::Paragraph::new(model.title.clone())
            .styled(style::Style::new().bold().with_font_size(18)));
        doc.push(elements::Paragraph::new(format!(
            "Generated on: {}",
            model.generated_at.format("%Y-%m-%d %H:%M UTC")
        )));
        doc.push(elements::Break::new(1.5));

        // --- SEÇÕES ---
        for section in model.sections() {
            if breaks_before.contains(&section) {
                doc.push(elements::PageBreak::new());
            }

            doc.push(elements::Paragraph::new(section.heading())
                .styled(style::Style::new().bold().with_font_size(13)));
            doc.push(elements::Break::new(0.5));

            match section_table(model, section) {
                Some(table) => doc.push(styled_table(&table)?),
                None => {
                    for (label, value) in summary_lines(model) {
                        doc.push(elements::Paragraph::new(format!("{}: {}", label, value)));
                    }
                }
            }
            doc.push(elements::Break::new(1.5));
        }

        Ok(doc)
    }
}

impl DocumentRenderer for StyledPdfRenderer {
    fn path(&self) -> RenderPath {
        RenderPath::Styled
    }

    fn render(&self, model: &ReportModel) -> Result<Vec<u8>, RenderError> {
        // As quebras de seção seguem a mesma regra de cursor do layout manual
        let breaks_before = plan_document(model, &self.attribution).breaks_before;

        // 1ª passada: o genpdf só sabe o total de páginas depois de renderizar
        let pages = Rc::new(Cell::new(0));
        let first = FooterDecorator::new(self.attribution.clone(), None, Rc::clone(&pages));
        let mut sink = Vec::new();
        self.build(model, &breaks_before, first)?
            .render(&mut sink)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        // 2ª passada com "Page X of N"
        let footer = FooterDecorator::new(self.attribution.clone(), Some(pages.get()), pages);
        let mut buffer = Vec::new();
        self.build(model, &breaks_before, footer)?
            .render(&mut buffer)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        Ok(buffer)
    }
}

fn styled_table(spec: &TableSpec) -> Result<elements::TableLayout, RenderError> {
    let weights = spec.widths.iter().map(|w| usize::from(*w)).collect();
    let mut table = elements::TableLayout::new(weights);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let header_style = style::Style::new().bold();
    let mut header = table.row();
    for title in &spec.headers {
        header.push_element(elements::Paragraph::new(title.clone()).styled(header_style).padded(1));
    }
    header.push().map_err(|e| RenderError::Layout(e.to_string()))?;

    // Linhas alternadas em cinza
    let stripe_style = style::Style::new().with_color(style::Color::Greyscale(90));
    for (index, cells) in spec.rows.iter().enumerate() {
        let cell_style = if index % 2 == 1 { stripe_style } else { style::Style::new() };
        let mut row = table.row();
        for cell in cells {
            row.push_element(elements::Paragraph::new(cell.clone()).styled(cell_style).padded(1));
        }
        row.push().map_err(|e| RenderError::Layout(e.to_string()))?;
    }

    Ok(table)
}

/// Margens e rodapé com atribuição e "Page X of N" em cada página.
struct FooterDecorator {
    attribution: String,
    total_pages: Option<usize>,
    page: usize,
    pages_seen: Rc<Cell<usize>>,
}

impl FooterDecorator {
    fn new(attribution: String, total_pages: Option<usize>, pages_seen: Rc<Cell<usize>>) -> Self {
        Self { attribution, total_pages, page: 0, pages_seen }
    }
}

impl genpdf::PageDecorator for FooterDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        _style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, genpdf::error::Error> {
        self.page += 1;
        self.pages_seen.set(self.page);

        area.add_margins(genpdf::Margins::all(PAGE_MARGIN_MM));
        let size = area.size();
        let footer_top = size.height - Mm::from(FOOTER_HEIGHT_MM);

        let page_label = match self.total_pages {
            Some(total) => format!("Page {} of {}", self.page, total),
            None => format!("Page {}", self.page),
        };
        let footer_style = style::Style::new().with_font_size(8);
        area.print_str(&context.font_cache, Position::new(Mm::from(0.0), footer_top), footer_style, &self.attribution)?;
        area.print_str(
            &context.font_cache,
            Position::new(size.width - Mm::from(30.0), footer_top),
            footer_style,
            &page_label,
        )?;

        area.set_size(Size::new(size.width, footer_top - Mm::from(2.0)));
        Ok(area)
    }
}
