// src/config.rs

use std::{env, path::PathBuf, sync::Arc};

use crate::services::{
    document_service::DocumentService,
    report_assembler::ReportAssembler,
    spreadsheet_service::SpreadsheetService,
};

#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub http_addr: String,
    pub fonts_dir: PathBuf,
    pub font_family: String,
    // PDF_ENGINE=manual pula o caminho genpdf
    pub styled_pdf_enabled: bool,
    pub attribution: String,
    pub title_max_chars: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:3000".to_string(),
            fonts_dir: PathBuf::from("./fonts"),
            font_family: "Roboto".to_string(),
            styled_pdf_enabled: true,
            attribution: "Generated by LearnHub Analytics".to_string(),
            title_max_chars: 30,
        }
    }
}

impl ReportSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let title_max_chars = match env::var("TITLE_MAX_CHARS") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|e| anyhow::anyhow!("TITLE_MAX_CHARS inválido ({}): {}", raw, e))?,
            Err(_) => defaults.title_max_chars,
        };

        let styled_pdf_enabled = match env::var("PDF_ENGINE").as_deref() {
            Ok("manual") => false,
            Ok("auto") | Err(_) => true,
            Ok(other) => anyhow::bail!("PDF_ENGINE deve ser 'auto' ou 'manual', recebido '{}'", other),
        };

        Ok(Self {
            http_addr: env::var("HTTP_ADDR").unwrap_or(defaults.http_addr),
            fonts_dir: env::var("FONTS_DIR").map(PathBuf::from).unwrap_or(defaults.fonts_dir),
            font_family: env::var("FONT_FAMILY").unwrap_or(defaults.font_family),
            styled_pdf_enabled,
            attribution: env::var("REPORT_ATTRIBUTION").unwrap_or(defaults.attribution),
            title_max_chars,
        })
    }
}

// O estado compartilhado é só configuração e serviços imutáveis:
// cada exportação monta o próprio modelo.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<ReportSettings>,
    pub assembler: ReportAssembler,
    pub document_service: Arc<DocumentService>,
    pub spreadsheet_service: SpreadsheetService,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let settings = ReportSettings::from_env()?;
        if settings.styled_pdf_enabled && !settings.fonts_dir.exists() {
            tracing::warn!(
                "⚠️ Pasta de fontes {} não encontrada; PDFs vão usar o layout manual",
                settings.fonts_dir.display()
            );
        }

        Ok(Self::from_settings(settings))
    }

    pub fn from_settings(settings: ReportSettings) -> Self {
        // --- Monta o gráfico de dependências ---
        let assembler = ReportAssembler::new(settings.title_max_chars);
        let document_service = DocumentService::new(&settings);

        Self {
            settings: Arc::new(settings),
            assembler,
            document_service: Arc::new(document_service),
            spreadsheet_service: SpreadsheetService::new(),
        }
    }
}
