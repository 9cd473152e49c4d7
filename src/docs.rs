// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Reports ---
        handlers::reports::export_pdf,
        handlers::reports::export_xlsx,
        handlers::reports::preview_report,

        // --- Dashboard ---
        handlers::dashboard::get_revenue_chart,
    ),
    components(
        schemas(
            // --- Entrada ---
            models::report_input::ReportInput,
            models::report_input::RawRevenuePoint,
            models::report_input::RawCourse,
            models::report_input::RawOrder,
            models::report_input::RawPerson,

            // --- Modelo normalizado ---
            models::report::ReportModel,
            models::report::ReportSection,
            models::report::StatsSummary,
            models::report::StatEntry,
            models::report::RevenuePoint,
            models::report::CourseSummary,
            models::report::OrderSummary,

            // --- DASHBOARD ---
            models::dashboard::RevenueChartEntry,
            models::dashboard::RevenueChartPayload,
        )
    ),
    tags(
        (name = "Reports", description = "Exportação de relatórios em PDF e Excel"),
        (name = "Dashboard", description = "Indicadores e Gráficos Gerenciais")
    )
)]
pub struct ApiDoc;
