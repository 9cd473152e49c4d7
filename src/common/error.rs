use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Erros que saem da API. As falhas internas de renderização (RenderError)
// ficam dentro do document_service e só viram AppError quando toda a cadeia falha.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Todos os caminhos de PDF falharam. A mensagem vai para o usuário.
    #[error("Falha ao gerar o relatório: {0}")]
    ReportGeneration(String),

    #[error("Erro ao gerar a planilha: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::ReportGeneration(message) => {
                tracing::error!("🔥 Nenhum caminho de renderização funcionou: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            ref e @ AppError::Spreadsheet(_) => {
                tracing::error!("🔥 {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
