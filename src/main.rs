//src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() {
    // Inicializa o logger (RUST_LOG, padrão "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new().expect("Falha ao inicializar o estado da aplicação.");
    let addr = app_state.settings.http_addr.clone();

    let app = build_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}

fn build_router(app_state: AppState) -> Router {
    // Exportações disparadas pelos botões "PDF" / "Excel" do dashboard
    let report_routes = Router::new()
        .route("/pdf", post(handlers::reports::export_pdf))
        .route("/xlsx", post(handlers::reports::export_xlsx))
        .route("/preview", post(handlers::reports::preview_report));

    let dashboard_routes = Router::new()
        .route("/revenue-chart", post(handlers::dashboard::get_revenue_chart));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/reports", report_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
