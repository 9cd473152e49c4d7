// src/services/document_service.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::{
    common::{error::AppError, text::slugify},
    config::ReportSettings,
    models::report::ReportModel,
    services::{
        builtin_pdf::{ManualPdfRenderer, SummaryPdfRenderer},
        styled_pdf::StyledPdfRenderer,
    },
};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

// Falhas de um caminho de renderização. Não saem deste serviço:
// a cadeia tenta o próximo caminho.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("fontes indisponíveis: {0}")]
    FontsUnavailable(String),

    #[error("erro de layout da tabela: {0}")]
    Layout(String),

    #[error("erro ao escrever o PDF: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderPath {
    Styled,
    Manual,
    Minimal,
}

impl RenderPath {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderPath::Styled => "styled",
            RenderPath::Manual => "manual",
            RenderPath::Minimal => "minimal",
        }
    }
}

pub trait DocumentRenderer: Send + Sync {
    fn path(&self) -> RenderPath;

    fn render(&self, model: &ReportModel) -> Result<Vec<u8>, RenderError>;
}

/// Arquivo pronto para download.
#[derive(Debug)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    pub render_path: Option<RenderPath>,
}

/// `<slug>-<YYYY-MM-DD>.<ext>`
pub fn export_file_name(base: &str, generated_at: DateTime<Utc>, extension: &str) -> String {
    format!("{}-{}.{}", slugify(base), generated_at.format("%Y-%m-%d"), extension)
}

pub struct DocumentService {
    renderers: Vec<Box<dyn DocumentRenderer>>,
}

impl DocumentService {
    /// Cadeia padrão: styled (se habilitado) -> manual -> resumo de uma página.
    pub fn new(settings: &ReportSettings) -> Self {
        let mut renderers: Vec<Box<dyn DocumentRenderer>> = Vec::new();
        if settings.styled_pdf_enabled {
            renderers.push(Box::new(StyledPdfRenderer::new(
                settings.fonts_dir.clone(),
                settings.font_family.clone(),
                settings.attribution.clone(),
            )));
        }
        renderers.push(Box::new(ManualPdfRenderer::new(settings.attribution.clone())));
        renderers.push(Box::new(SummaryPdfRenderer::new(settings.attribution.clone())));

        Self::with_renderers(renderers)
    }

    pub fn with_renderers(renderers: Vec<Box<dyn DocumentRenderer>>) -> Self {
        Self { renderers }
    }

    pub fn export_pdf(&self, model: &ReportModel) -> Result<ExportArtifact, AppError> {
        let mut failures = Vec::new();

        for renderer in &self.renderers {
            match renderer.render(model) {
                Ok(bytes) => {
                    tracing::info!(
                        "📄 PDF '{}' gerado pelo caminho {} ({} bytes)",
                        model.title,
                        renderer.path().as_str(),
                        bytes.len()
                    );
                    return Ok(ExportArtifact {
                        file_name: export_file_name(&model.title, model.generated_at, "pdf"),
                        content_type: PDF_CONTENT_TYPE,
                        bytes,
                        render_path: Some(renderer.path()),
                    });
                }
                Err(e) => {
                    tracing::warn!("⚠️ Caminho {} falhou, tentando o próximo: {}", renderer.path().as_str(), e);
                    failures.push(format!("{}: {}", renderer.path().as_str(), e));
                }
            }
        }

        Err(AppError::ReportGeneration(if failures.is_empty() {
            "nenhum renderizador configurado".to_string()
        } else {
            failures.join("; ")
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::report_input::ReportInput, services::report_assembler::ReportAssembler};
    use chrono::TimeZone;
    use serde_json::json;

    struct Failing(RenderPath);

    impl DocumentRenderer for Failing {
        fn path(&self) -> RenderPath {
            self.0
        }

        fn render(&self, _model: &ReportModel) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::Layout("boom".to_string()))
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
    }

    fn settings() -> ReportSettings {
        ReportSettings {
            fonts_dir: "/nonexistent/fonts".into(),
            ..ReportSettings::default()
        }
    }

    fn full_input() -> serde_json::Value {
        json!({
            "stats": {"totalUsers": 1520, "totalRevenue": 250000, "totalOrders": 310},
            "revenueData": [{"month": "Jan", "revenue": 12000}, {"month": "Feb", "revenue": 18000}],
            "coursesData": [{"title": "Rust for Beginners", "enrolledStudents": 40, "rating": 4.7, "price": 499, "isListed": true}],
            "ordersData": [{"orderId": "ORD-1", "customerName": "Ana", "itemCount": 2, "finalAmount": 998, "status": "paid"}]
        })
    }

    #[test]
    fn file_name_is_slug_plus_date() {
        assert_eq!(
            export_file_name("Admin Dashboard Report", now(), "pdf"),
            "admin-dashboard-report-2026-10-18.pdf"
        );
    }

    #[test]
    fn every_input_combination_renders_matching_sections() {
        let full = full_input();
        let keys = ["stats", "revenueData", "coursesData", "ordersData"];
        let service = DocumentService::new(&settings());
        let assembler = ReportAssembler::new(30);

        for mask in 0..16u8 {
            let mut input = serde_json::Map::new();
            for (bit, key) in keys.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    input.insert(key.to_string(), full[*key].clone());
                }
            }

            let model = assembler.assemble(ReportInput::from_value(input.into()), None, now());
            let artifact = service.export_pdf(&model).expect("export never fails for valid data");
            assert!(artifact.bytes.starts_with(b"%PDF"), "mask {}", mask);
            assert_eq!(artifact.render_path, Some(RenderPath::Manual));

            let mut expected = Vec::new();
            if mask & 1 != 0 {
                expected.push(crate::models::report::ReportSection::ExecutiveSummary);
                expected.push(crate::models::report::ReportSection::DetailedStatistics);
            }
            if mask & 2 != 0 {
                expected.push(crate::models::report::ReportSection::RevenueOverview);
            }
            if mask & 4 != 0 {
                expected.push(crate::models::report::ReportSection::CoursesOverview);
            }
            if mask & 8 != 0 {
                expected.push(crate::models::report::ReportSection::RecentOrders);
            }
            let plan = crate::services::document_layout::plan_document(&model, "attr");
            assert_eq!(plan.rendered_sections(), expected, "mask {}", mask);
        }
    }

    #[test]
    fn falls_back_to_summary_when_tables_fail() {
        let service = DocumentService::with_renderers(vec![
            Box::new(Failing(RenderPath::Styled)),
            Box::new(Failing(RenderPath::Manual)),
            Box::new(SummaryPdfRenderer::new("attr")),
        ]);
        let model = ReportAssembler::new(30).assemble(ReportInput::from_value(full_input()), None, now());

        let artifact = service.export_pdf(&model).unwrap();
        assert_eq!(artifact.render_path, Some(RenderPath::Minimal));
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn all_paths_failing_is_a_report_error() {
        let service = DocumentService::with_renderers(vec![
            Box::new(Failing(RenderPath::Manual)),
            Box::new(Failing(RenderPath::Minimal)),
        ]);
        let model = ReportAssembler::new(30).assemble(ReportInput::default(), None, now());

        match service.export_pdf(&model) {
            Err(AppError::ReportGeneration(message)) => {
                assert!(message.contains("manual"));
                assert!(message.contains("minimal"));
            }
            other => panic!("expected ReportGeneration, got {:?}", other),
        }
    }

    #[test]
    fn repeated_exports_are_independent() {
        let service = DocumentService::new(&settings());
        let model = ReportAssembler::new(30).assemble(ReportInput::from_value(full_input()), None, now());

        let first = service.export_pdf(&model).unwrap();
        let second = service.export_pdf(&model).unwrap();
        assert!(first.bytes.starts_with(b"%PDF"));
        assert!(second.bytes.starts_with(b"%PDF"));
        assert_eq!(first.file_name, second.file_name);
        assert_eq!(
            crate::services::document_layout::plan_document(&model, "attr"),
            crate::services::document_layout::plan_document(&model, "attr")
        );
    }
}
