// src/handlers/dashboard.rs

use axum::{extract::Query, http::StatusCode, response::IntoResponse, Json};
use chrono::{Datelike, Utc};
use serde_json::Value;

use crate::{
    models::dashboard::{RevenueChartEntry, RevenueChartPayload, RevenueChartQuery},
    services::dashboard_service::generate_revenue_chart_data,
};

// POST /api/dashboard/revenue-chart
#[utoipa::path(
    post,
    path = "/api/dashboard/revenue-chart",
    tag = "Dashboard",
    request_body = RevenueChartPayload,
    params(RevenueChartQuery),
    responses(
        (status = 200, description = "Receita e lucro por mês (sempre 12 meses)", body = Vec<RevenueChartEntry>)
    )
)]
pub async fn get_revenue_chart(
    Query(query): Query<RevenueChartQuery>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let payload = RevenueChartPayload::from_value(payload);

    let chart = generate_revenue_chart_data(&payload.orders, year);

    (StatusCode::OK, Json(chart))
}
