// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::models::report_input::{lenient, RawOrder};

// Gráfico de receita: sempre 12 meses do ano pedido
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueChartEntry {
    #[schema(example = "Mar")]
    pub month: String,
    pub revenue: Decimal,
    pub profit: Decimal,
    // Rótulo para o tooltip, com o glifo ₹
    #[schema(example = "₹1,000.00")]
    pub revenue_label: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RevenueChartPayload {
    #[serde(default, deserialize_with = "lenient::list")]
    pub orders: Vec<RawOrder>,
}

impl RevenueChartPayload {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RevenueChartQuery {
    // Sem ano, usa o ano corrente
    #[param(example = 2026)]
    pub year: Option<i32>,
}
