// src/services/document_layout.rs

// Motor de layout manual do PDF. Calcula larguras de coluna, quebra o texto das
// células, avança linha a linha e decide as quebras de página. O resultado é
// uma lista de páginas com operações posicionadas (em mm, origem no topo).
// O caminho genpdf reaproveita as tabelas e as quebras de seção daqui.

use rust_decimal::Decimal;

use crate::{
    common::text::ELLIPSIS,
    models::report::{ReportModel, ReportSection, StatEntry},
    services::currency::{format_amount, format_currency, CurrencySymbol},
};

// --- Geometria da página (A4) ---
pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;
const MARGIN_X: f64 = 14.0;
const TOP_Y: f64 = 20.0;
// Seção que começaria depois desta linha vai para a próxima página
pub const SECTION_BREAK_Y: f64 = 220.0;
// Nenhuma linha de tabela passa daqui
pub const BOTTOM_LIMIT_Y: f64 = 270.0;
const FOOTER_Y: f64 = 285.0;

const TITLE_SIZE: f64 = 18.0;
const SUBTITLE_SIZE: f64 = 10.0;
const HEADING_SIZE: f64 = 13.0;
const BODY_SIZE: f64 = 10.0;
const TABLE_SIZE: f64 = 9.0;
const FOOTER_SIZE: f64 = 8.0;

const PT_TO_MM: f64 = 0.3528;
const TITLE_MAX_LINES: usize = 3;
const CELL_PADDING: f64 = 1.5;
const HEADER_SHADE: f64 = 0.82;
const STRIPE_SHADE: f64 = 0.95;

fn content_width() -> f64 {
    PAGE_WIDTH_MM - 2.0 * MARGIN_X
}

fn line_height(size: f64) -> f64 {
    size * PT_TO_MM * 1.35
}

// Largura média de caractere da Helvetica: ~0.5 em
fn chars_that_fit(width_mm: f64, size: f64) -> usize {
    let char_width = size * PT_TO_MM * 0.5;
    ((width_mm - 2.0 * CELL_PADDING) / char_width).floor().max(1.0) as usize
}

// =============================================================================
//  TABELAS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub headers: Vec<String>,
    // Percentual da largura útil por coluna
    pub widths: Vec<u8>,
    pub rows: Vec<Vec<String>>,
}

impl TableSpec {
    fn new(headers: &[&str], widths: &[u8], rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            widths: widths.to_vec(),
            rows,
        }
    }

    pub fn column_widths_mm(&self) -> Vec<f64> {
        self.widths
            .iter()
            .map(|pct| content_width() * f64::from(*pct) / 100.0)
            .collect()
    }
}

const HEADLINE_KEYS: [&str; 8] = [
    "totalUsers",
    "totalStudents",
    "totalTutors",
    "activeCourses",
    "totalCourses",
    "totalRevenue",
    "totalEarnings",
    "totalOrders",
];

/// Linhas "rótulo: valor" do Executive Summary.
pub fn summary_lines(model: &ReportModel) -> Vec<(String, String)> {
    let mut headline: Vec<&StatEntry> = HEADLINE_KEYS
        .iter()
        .filter_map(|key| model.stats.get(key))
        .collect();
    if headline.is_empty() {
        headline = model.stats.entries.iter().take(4).collect();
    }

    headline
        .into_iter()
        .map(|entry| {
            let value = if entry.is_currency {
                format_currency(entry.value)
            } else {
                plain_number(entry.value)
            };
            (entry.label.clone(), value)
        })
        .collect()
}

/// Tabela de cada seção tabular. Executive Summary não é tabela.
pub fn section_table(model: &ReportModel, section: ReportSection) -> Option<TableSpec> {
    let money = |amount: Decimal| format_amount(amount, CurrencySymbol::Ascii);

    let table = match section {
        ReportSection::ExecutiveSummary => return None,
        ReportSection::DetailedStatistics => TableSpec::new(
            &["Metric", "Value"],
            &[60, 40],
            model
                .stats
                .entries
                .iter()
                .map(|e| {
                    let value = if e.is_currency { money(e.value) } else { plain_number(e.value) };
                    vec![e.label.clone(), value]
                })
                .collect(),
        ),
        ReportSection::RevenueOverview => TableSpec::new(
            &["Period", "Revenue", "Profit"],
            &[40, 30, 30],
            model
                .revenue
                .iter()
                .map(|p| vec![p.period.clone(), money(p.revenue), money(p.profit)])
                .collect(),
        ),
        ReportSection::CoursesOverview => TableSpec::new(
            &["Course Title", "Enrolled", "Rating", "Price", "Status"],
            &[40, 15, 15, 15, 15],
            model
                .courses
                .iter()
                .map(|c| {
                    vec![
                        c.title.clone(),
                        c.enrolled.to_string(),
                        format!("{:.1}", c.rating),
                        money(c.price),
                        if c.listed { "Listed" } else { "Unlisted" }.to_string(),
                    ]
                })
                .collect(),
        ),
        ReportSection::RecentOrders => TableSpec::new(
            &["Order ID", "Customer", "Items", "Amount", "Status"],
            &[20, 30, 10, 20, 20],
            model
                .orders
                .iter()
                .map(|o| {
                    vec![
                        o.order_id.clone(),
                        o.customer.clone(),
                        o.items.to_string(),
                        money(o.amount),
                        o.status.clone(),
                    ]
                })
                .collect(),
        ),
    };

    Some(table)
}

fn plain_number(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Quebra por palavras; palavras maiores que a linha são cortadas.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

// =============================================================================
//  LAYOUT
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutOp {
    // `y` é a linha de base do texto, medida do topo
    Text { x: f64, y: f64, size: f64, bold: bool, text: String },
    // Retângulo preenchido; `shade` em tons de cinza (0 = preto, 1 = branco)
    Fill { x: f64, y: f64, width: f64, height: f64, shade: f64 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPage {
    pub ops: Vec<LayoutOp>,
}

#[cfg(test)]
impl LayoutPage {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            LayoutOp::Text { text, .. } => Some(text.as_str()),
            LayoutOp::Fill { .. } => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPlan {
    pub pages: Vec<LayoutPage>,
    // Seções impressas, com o índice da página onde começam
    pub sections: Vec<(ReportSection, usize)>,
    // Seções que abriram página nova pela regra do cursor
    pub breaks_before: Vec<ReportSection>,
}

#[cfg(test)]
impl DocumentPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn rendered_sections(&self) -> Vec<ReportSection> {
        self.sections.iter().map(|(s, _)| *s).collect()
    }
}

struct Cursor {
    pages: Vec<LayoutPage>,
    y: f64,
}

impl Cursor {
    fn new() -> Self {
        Self { pages: vec![LayoutPage::default()], y: TOP_Y }
    }

    fn new_page(&mut self) {
        self.pages.push(LayoutPage::default());
        self.y = TOP_Y;
    }

    fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    fn push(&mut self, op: LayoutOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn line(&mut self, text: impl Into<String>, size: f64, bold: bool) {
        self.y += line_height(size);
        self.push(LayoutOp::Text { x: MARGIN_X, y: self.y, size, bold, text: text.into() });
    }

    fn advance(&mut self, mm: f64) {
        self.y += mm;
    }

    fn table(&mut self, table: &TableSpec) {
        let widths = table.column_widths_mm();
        let header = wrap_row(&table.headers, &widths);
        let max_lines = max_row_lines(&header);

        if self.y + row_height(&header) > BOTTOM_LIMIT_Y {
            self.new_page();
        }
        self.row(&header, &widths, Some(HEADER_SHADE), true);

        for (index, cells) in table.rows.iter().enumerate() {
            let wrapped: Vec<Vec<String>> = wrap_row(cells, &widths)
                .into_iter()
                .map(|lines| clip_lines(lines, max_lines))
                .collect();
            if self.y + row_height(&wrapped) > BOTTOM_LIMIT_Y {
                self.new_page();
                self.row(&header, &widths, Some(HEADER_SHADE), true);
            }
            let shade = (index % 2 == 1).then_some(STRIPE_SHADE);
            self.row(&wrapped, &widths, shade, false);
        }
    }

    fn row(&mut self, cells: &[Vec<String>], widths: &[f64], shade: Option<f64>, bold: bool) {
        let height = row_height(cells);
        if let Some(shade) = shade {
            self.push(LayoutOp::Fill { x: MARGIN_X, y: self.y, width: content_width(), height, shade });
        }

        let mut x = MARGIN_X;
        for (lines, width) in cells.iter().zip(widths) {
            let mut y = self.y + CELL_PADDING;
            for line in lines {
                y += line_height(TABLE_SIZE);
                self.push(LayoutOp::Text {
                    x: x + CELL_PADDING,
                    y,
                    size: TABLE_SIZE,
                    bold,
                    text: line.clone(),
                });
            }
            x += width;
        }
        self.y += height;
    }

    fn finish(mut self, attribution: &str) -> Vec<LayoutPage> {
        let total = self.pages.len();
        for (index, page) in self.pages.iter_mut().enumerate() {
            page.ops.push(LayoutOp::Text {
                x: MARGIN_X,
                y: FOOTER_Y,
                size: FOOTER_SIZE,
                bold: false,
                text: attribution.to_string(),
            });
            page.ops.push(LayoutOp::Text {
                x: PAGE_WIDTH_MM - MARGIN_X - 22.0,
                y: FOOTER_Y,
                size: FOOTER_SIZE,
                bold: false,
                text: format!("Page {} of {}", index + 1, total),
            });
        }
        self.pages
    }
}

fn wrap_row(cells: &[String], widths: &[f64]) -> Vec<Vec<String>> {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| wrap_text(cell, chars_that_fit(*width, TABLE_SIZE)))
        .collect()
}

fn row_height(cells: &[Vec<String>]) -> f64 {
    let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    lines as f64 * line_height(TABLE_SIZE) + 2.0 * CELL_PADDING
}

// Uma linha de tabela precisa caber numa página nova, logo abaixo do cabeçalho repetido
fn max_row_lines(header: &[Vec<String>]) -> usize {
    let available = BOTTOM_LIMIT_Y - TOP_Y - row_height(header) - 2.0 * CELL_PADDING;
    ((available / line_height(TABLE_SIZE)).floor() as usize).max(1)
}

/// Mantém no máximo `max_lines` linhas; a última ganha `...` quando há corte.
fn clip_lines(mut lines: Vec<String>, max_lines: usize) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines.max(1));
    if let Some(last) = lines.last_mut() {
        let keep = last.chars().count().saturating_sub(ELLIPSIS.len());
        *last = last.chars().take(keep).chain(ELLIPSIS.chars()).collect();
    }
    lines
}

fn header_block(cursor: &mut Cursor, model: &ReportModel) {
    let title_lines = wrap_text(&model.title, chars_that_fit(content_width(), TITLE_SIZE));
    for line in clip_lines(title_lines, TITLE_MAX_LINES) {
        cursor.line(line, TITLE_SIZE, true);
    }
    cursor.line(
        format!("Generated on: {}", model.generated_at.format("%Y-%m-%d %H:%M UTC")),
        SUBTITLE_SIZE,
        false,
    );
    cursor.advance(6.0);
}

fn summary_block(cursor: &mut Cursor, model: &ReportModel) {
    for (label, value) in summary_lines(model) {
        if cursor.y + line_height(BODY_SIZE) > BOTTOM_LIMIT_Y {
            cursor.new_page();
        }
        cursor.line(format!("{}: {}", label, value), BODY_SIZE, false);
    }
}

/// Plano completo: cabeçalho, uma seção por coleção não vazia e rodapés.
pub fn plan_document(model: &ReportModel, attribution: &str) -> DocumentPlan {
    let mut cursor = Cursor::new();
    let mut sections = Vec::new();
    let mut breaks_before = Vec::new();

    header_block(&mut cursor, model);

    for section in model.sections() {
        if cursor.y > SECTION_BREAK_Y {
            cursor.new_page();
            breaks_before.push(section);
        }
        sections.push((section, cursor.page_index()));

        cursor.line(section.heading(), HEADING_SIZE, true);
        cursor.advance(2.0);
        match section_table(model, section) {
            Some(table) => cursor.table(&table),
            None => summary_block(&mut cursor, model),
        }
        cursor.advance(8.0);
    }

    DocumentPlan { pages: cursor.finish(attribution), sections, breaks_before }
}

/// Último recurso: uma página só com título, data e resumo.
pub fn plan_summary(model: &ReportModel, attribution: &str) -> DocumentPlan {
    let mut cursor = Cursor::new();
    header_block(&mut cursor, model);

    let mut sections = Vec::new();
    cursor.line(ReportSection::ExecutiveSummary.heading(), HEADING_SIZE, true);
    cursor.advance(2.0);

    let lines = summary_lines(model);
    if lines.is_empty() {
        cursor.line("No statistics available for this report.", BODY_SIZE, false);
    } else {
        sections.push((ReportSection::ExecutiveSummary, 0));
        for (label, value) in lines {
            if cursor.y + line_height(BODY_SIZE) > BOTTOM_LIMIT_Y {
                break;
            }
            cursor.line(format!("{}: {}", label, value), BODY_SIZE, false);
        }
    }

    DocumentPlan { pages: cursor.finish(attribution), sections, breaks_before: Vec::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            report::{CourseSummary, OrderSummary, RevenuePoint, StatsSummary},
            report_input::ReportInput,
        },
        services::report_assembler::ReportAssembler,
    };
    use chrono::{TimeZone, Utc};

    fn model() -> ReportModel {
        ReportModel {
            title: "Admin Dashboard Report".to_string(),
            generated_at: Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap(),
            stats: StatsSummary::default(),
            revenue: Vec::new(),
            courses: Vec::new(),
            orders: Vec::new(),
        }
    }

    fn course(i: usize) -> CourseSummary {
        CourseSummary {
            title: format!("Course number {}", i),
            enrolled: i as u64,
            rating: Decimal::new(45, 1),
            price: Decimal::from(499),
            listed: i % 2 == 0,
            created_at: "2026-01-15".to_string(),
            updated_at: "N/A".to_string(),
        }
    }

    fn order(i: usize) -> OrderSummary {
        OrderSummary {
            order_id: format!("ORD-{}", i),
            customer: "Ana Souza".to_string(),
            items: 1,
            amount: Decimal::from(1000),
            status: "paid".to_string(),
            created_at: "2026-03-14".to_string(),
        }
    }

    #[test]
    fn wrap_respects_budget_and_splits_long_words() {
        assert_eq!(wrap_text("alpha beta gamma", 11), ["alpha beta", "gamma"]);
        assert_eq!(wrap_text("abcdefghij", 4), ["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("", 10), [""]);
    }

    #[test]
    fn course_table_uses_fixed_widths() {
        let mut m = model();
        m.courses.push(course(1));
        let table = section_table(&m, ReportSection::CoursesOverview).unwrap();
        assert_eq!(table.widths, [40, 15, 15, 15, 15]);
        assert_eq!(table.rows[0], ["Course number 1", "1", "4.5", "Rs.499.00", "Unlisted"]);
    }

    #[test]
    fn empty_model_has_single_page_with_footer() {
        let plan = plan_document(&model(), "Generated by LearnHub Analytics");
        assert_eq!(plan.page_count(), 1);
        assert!(plan.sections.is_empty());
        let texts: Vec<&str> = plan.pages[0].texts().collect();
        assert!(texts.contains(&"Admin Dashboard Report"));
        assert!(texts.contains(&"Page 1 of 1"));
        assert!(texts.contains(&"Generated by LearnHub Analytics"));
    }

    #[test]
    fn long_tables_paginate_and_every_page_has_footer() {
        let mut m = model();
        m.courses = (0..120).map(course).collect();
        m.orders = (0..40).map(order).collect();

        let plan = plan_document(&m, "attr");
        let total = plan.page_count();
        assert!(total > 2);

        for (i, page) in plan.pages.iter().enumerate() {
            let expected = format!("Page {} of {}", i + 1, total);
            assert!(page.texts().any(|t| t == expected));
            // Nada além do limite inferior, exceto o rodapé
            for op in &page.ops {
                if let LayoutOp::Text { y, size, .. } = op {
                    if *size != FOOTER_SIZE {
                        assert!(*y <= BOTTOM_LIMIT_Y, "text at {} on page {}", y, i);
                    }
                }
            }
        }
    }

    #[test]
    fn repeated_header_on_continuation_pages() {
        let mut m = model();
        m.courses = (0..120).map(course).collect();
        let plan = plan_document(&m, "attr");
        assert!(plan.pages[1].texts().any(|t| t == "Course Title"));
    }

    #[test]
    fn section_starting_past_threshold_moves_to_new_page() {
        let mut m = model();
        // 22 linhas de curso deixam o cursor entre o limiar de seção e o limite inferior
        m.courses = (0..22).map(course).collect();
        m.orders = vec![order(1)];

        let plan = plan_document(&m, "attr");
        let orders_page = plan
            .sections
            .iter()
            .find(|(s, _)| *s == ReportSection::RecentOrders)
            .map(|(_, page)| *page)
            .unwrap();
        assert_eq!(orders_page, 1);
        assert_eq!(plan.breaks_before, [ReportSection::RecentOrders]);
        assert_eq!(plan.page_count(), 2);
    }

    #[test]
    fn short_sections_share_the_first_page() {
        let mut m = model();
        m.courses = (0..5).map(course).collect();
        m.orders = (0..5).map(order).collect();

        let plan = plan_document(&m, "attr");
        assert_eq!(plan.page_count(), 1);
        assert!(plan.breaks_before.is_empty());
        assert_eq!(
            plan.rendered_sections(),
            [ReportSection::CoursesOverview, ReportSection::RecentOrders]
        );
    }

    fn assert_within_bottom_limit(plan: &DocumentPlan) {
        for (i, page) in plan.pages.iter().enumerate() {
            for op in &page.ops {
                if let LayoutOp::Text { y, size, .. } = op {
                    if *size != FOOTER_SIZE {
                        assert!(*y <= BOTTOM_LIMIT_Y, "text at {} on page {}", y, i);
                    }
                }
            }
        }
    }

    #[test]
    fn oversized_cells_are_clipped_to_one_page() {
        let mut m = model();
        m.revenue = vec![RevenuePoint {
            period: "x".repeat(3000),
            revenue: Decimal::from(10),
            profit: Decimal::from(7),
        }];
        let mut long_order = order(1);
        long_order.status = "pending ".repeat(400);
        m.orders = vec![long_order];

        let plan = plan_document(&m, "attr");
        assert_within_bottom_limit(&plan);
        assert!(plan.pages.iter().flat_map(|p| p.texts()).any(|t| t.ends_with("...")));
    }

    #[test]
    fn long_payload_strings_stay_inside_the_page() {
        let input = ReportInput::from_value(serde_json::json!({
            "revenueData": [{"month": "x".repeat(3000)}],
            "ordersData": [{"status": "pending ".repeat(400)}]
        }));
        let m = ReportAssembler::new(30).assemble(input, None, Utc::now());

        let plan = plan_document(&m, "attr");
        assert_within_bottom_limit(&plan);
        assert_eq!(plan.page_count(), 1);
    }

    #[test]
    fn long_title_wraps_within_content_width() {
        let mut m = model();
        m.title = "Quarterly Tutor Earnings ".repeat(5).trim_end().to_string();
        let budget = chars_that_fit(content_width(), TITLE_SIZE);

        let plan = plan_document(&m, "attr");
        let title_lines: Vec<&LayoutOp> = plan.pages[0]
            .ops
            .iter()
            .filter(|op| matches!(op, LayoutOp::Text { size, .. } if *size == TITLE_SIZE))
            .collect();

        assert!(title_lines.len() > 1);
        assert!(title_lines.len() <= TITLE_MAX_LINES);
        for op in title_lines {
            if let LayoutOp::Text { text, .. } = op {
                assert!(text.chars().count() <= budget, "{:?}", text);
            }
        }
    }

    #[test]
    fn clip_lines_marks_the_cut() {
        let lines = vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()];
        assert_eq!(clip_lines(lines.clone(), 3), lines);
        assert_eq!(clip_lines(lines, 2), ["alpha", "b..."]);
    }

    #[test]
    fn summary_plan_is_single_page() {
        let mut m = model();
        m.courses = (0..200).map(course).collect();
        let plan = plan_summary(&m, "attr");
        assert_eq!(plan.page_count(), 1);
        assert!(plan.pages[0].texts().any(|t| t == "No statistics available for this report."));
    }
}
