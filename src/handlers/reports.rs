// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        report::ReportModel,
        report_input::ReportInput,
    },
    services::document_service::ExportArtifact,
};

pub const EXPORT_ID_HEADER: &str = "x-export-id";
pub const RENDER_PATH_HEADER: &str = "x-render-path";

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    #[validate(length(max = 120, message = "O título deve ter no máximo 120 caracteres."))]
    #[param(example = "Admin Dashboard Report")]
    pub title: Option<String>,

    #[validate(length(max = 80, message = "O nome do arquivo deve ter no máximo 80 caracteres."))]
    #[param(example = "tutor-earnings")]
    pub file_name: Option<String>,
}

// POST /api/reports/pdf
#[utoipa::path(
    post,
    path = "/api/reports/pdf",
    tag = "Reports",
    request_body = ReportInput,
    params(ExportQuery),
    responses(
        (status = 200, description = "Relatório em PDF para download (application/pdf)"),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 500, description = "Nenhum caminho de renderização funcionou")
    )
)]
pub async fn export_pdf(
    State(app_state): State<AppState>,
    Query(query): Query<ExportQuery>,
    Json(payload): Json<Value>,
) -> Result<Response, AppError> {
    query.validate()?;

    let export_id = Uuid::new_v4();
    let generated_at = Utc::now();

    // Renderizar é CPU puro: sai do runtime assíncrono
    let artifact = tokio::task::spawn_blocking(move || {
        let model = app_state.assembler.assemble(
            ReportInput::from_value(payload),
            query.title.as_deref(),
            generated_at,
        );
        tracing::info!("🧾 Exportação {} (PDF): {} seção(ões)", export_id, model.sections().len());
        app_state.document_service.export_pdf(&model)
    })
    .await
    .map_err(|e| anyhow::anyhow!("tarefa de exportação abortada: {}", e))??;

    Ok(attachment(export_id, artifact))
}

// POST /api/reports/xlsx
#[utoipa::path(
    post,
    path = "/api/reports/xlsx",
    tag = "Reports",
    request_body = ReportInput,
    params(ExportQuery),
    responses(
        (status = 200, description = "Planilha .xlsx com uma aba por seção"),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 500, description = "Falha ao gerar a planilha")
    )
)]
pub async fn export_xlsx(
    State(app_state): State<AppState>,
    Query(query): Query<ExportQuery>,
    Json(payload): Json<Value>,
) -> Result<Response, AppError> {
    query.validate()?;

    let export_id = Uuid::new_v4();
    let generated_at = Utc::now();

    let artifact = tokio::task::spawn_blocking(move || {
        let model = app_state.assembler.assemble(
            ReportInput::from_value(payload),
            query.title.as_deref(),
            generated_at,
        );
        tracing::info!("🧾 Exportação {} (Excel): {} seção(ões)", export_id, model.sections().len());
        app_state.spreadsheet_service.export_xlsx(&model, query.file_name.as_deref())
    })
    .await
    .map_err(|e| anyhow::anyhow!("tarefa de exportação abortada: {}", e))??;

    Ok(attachment(export_id, artifact))
}

// POST /api/reports/preview
#[utoipa::path(
    post,
    path = "/api/reports/preview",
    tag = "Reports",
    request_body = ReportInput,
    params(ExportQuery),
    responses(
        (status = 200, description = "Modelo normalizado que seria exportado", body = ReportModel)
    )
)]
pub async fn preview_report(
    State(app_state): State<AppState>,
    Query(query): Query<ExportQuery>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;

    let model = app_state.assembler.assemble(
        ReportInput::from_value(payload),
        query.title.as_deref(),
        Utc::now(),
    );

    Ok((StatusCode::OK, Json(model)))
}

// Configura os Headers para o navegador baixar o arquivo
fn attachment(export_id: Uuid, artifact: ExportArtifact) -> Response {
    let headers = [
        (header::CONTENT_TYPE, artifact.content_type.to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", artifact.file_name)),
        (HeaderName::from_static(EXPORT_ID_HEADER), export_id.to_string()),
    ];

    let mut response = (headers, artifact.bytes).into_response();
    if let Some(path) = artifact.render_path {
        response.headers_mut().insert(
            HeaderName::from_static(RENDER_PATH_HEADER),
            HeaderValue::from_static(path.as_str()),
        );
    }
    response
}
