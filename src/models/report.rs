// src/models/report.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// 1. Métrica da plataforma (totalUsers, totalRevenue, ...)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatEntry {
    #[schema(example = "totalRevenue")]
    pub key: String,
    #[schema(example = "Total Revenue")]
    pub label: String,
    pub value: Decimal,
    // Chaves de receita/ganhos são exibidas como moeda
    pub is_currency: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct StatsSummary {
    pub entries: Vec<StatEntry>,
}

impl StatsSummary {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&StatEntry> {
        self.entries.iter().find(|e| e.key == key)
    }
}

// 2. Série de receita (um ponto por mês)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    #[schema(example = "Mar")]
    pub period: String,
    pub revenue: Decimal,
    pub profit: Decimal,
}

// 3. Cursos
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub title: String,
    pub enrolled: u64,
    pub rating: Decimal,
    pub price: Decimal,
    pub listed: bool,
    #[schema(example = "2026-01-15")]
    pub created_at: String,
    pub updated_at: String,
}

// 4. Pedidos
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: String,
    pub customer: String,
    pub items: u64,
    pub amount: Decimal,
    pub status: String,
    pub created_at: String,
}

/// Blocos do documento, na ordem em que são impressos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum ReportSection {
    ExecutiveSummary,
    DetailedStatistics,
    RevenueOverview,
    CoursesOverview,
    RecentOrders,
}

impl ReportSection {
    pub fn heading(self) -> &'static str {
        match self {
            ReportSection::ExecutiveSummary => "Executive Summary",
            ReportSection::DetailedStatistics => "Detailed Statistics",
            ReportSection::RevenueOverview => "Revenue Overview",
            ReportSection::CoursesOverview => "Courses Overview",
            ReportSection::RecentOrders => "Recent Orders Summary",
        }
    }
}

/// Modelo normalizado de uma exportação. Vive só durante a requisição.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportModel {
    #[schema(example = "Admin Dashboard Report")]
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub stats: StatsSummary,
    pub revenue: Vec<RevenuePoint>,
    pub courses: Vec<CourseSummary>,
    pub orders: Vec<OrderSummary>,
}

impl ReportModel {
    pub fn sections(&self) -> Vec<ReportSection> {
        let mut sections = Vec::new();
        if !self.stats.is_empty() {
            sections.push(ReportSection::ExecutiveSummary);
            sections.push(ReportSection::DetailedStatistics);
        }
        if !self.revenue.is_empty() {
            sections.push(ReportSection::RevenueOverview);
        }
        if !self.courses.is_empty() {
            sections.push(ReportSection::CoursesOverview);
        }
        if !self.orders.is_empty() {
            sections.push(ReportSection::RecentOrders);
        }
        sections
    }
}
