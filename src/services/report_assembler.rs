// src/services/report_assembler.rs

// Normaliza a entrada tolerante no ReportModel fixo.
// Nunca falha: o que não dá para aproveitar vira seção vazia ou valor padrão.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::{
    common::text::{humanize_key, or_placeholder, truncate_text, PLACEHOLDER, UNTITLED},
    models::{
        report::{CourseSummary, OrderSummary, ReportModel, RevenuePoint, StatEntry, StatsSummary},
        report_input::{first_text, lenient, RawCourse, RawOrder, RawRevenuePoint, ReportInput},
    },
    services::currency::profit_share,
};

pub const DEFAULT_TITLE: &str = "Dashboard Report";

const CURRENCY_HINTS: [&str; 7] = ["revenue", "earning", "amount", "sales", "profit", "balance", "payout"];

#[derive(Debug, Clone)]
pub struct ReportAssembler {
    title_max_chars: usize,
}

impl ReportAssembler {
    pub fn new(title_max_chars: usize) -> Self {
        Self { title_max_chars }
    }

    pub fn assemble(
        &self,
        input: ReportInput,
        title: Option<&str>,
        generated_at: DateTime<Utc>,
    ) -> ReportModel {
        let title = or_placeholder(title.map(str::to_string), DEFAULT_TITLE);

        ReportModel {
            title,
            generated_at,
            stats: self.normalize_stats(input.stats.unwrap_or_default()),
            revenue: input.revenue_data.into_iter().map(|r| self.normalize_revenue(r)).collect(),
            courses: input.courses_data.into_iter().map(|c| self.normalize_course(c)).collect(),
            orders: input.orders_data.into_iter().map(|o| self.normalize_order(o)).collect(),
        }
    }

    fn normalize_course(&self, raw: RawCourse) -> CourseSummary {
        let title = or_placeholder(first_text([&raw.title, &raw.name]), UNTITLED);

        CourseSummary {
            title: truncate_text(&title, self.title_max_chars),
            enrolled: raw.enrolled_students.or(raw.enrolled).or(raw.students_count).unwrap_or(0),
            rating: raw.rating.or(raw.average_rating).unwrap_or(Decimal::ZERO),
            price: raw.price.unwrap_or(Decimal::ZERO),
            listed: raw.is_listed.or(raw.is_active).or(raw.status).unwrap_or(false),
            created_at: display_date(raw.created_at.as_deref()),
            updated_at: display_date(raw.updated_at.as_deref()),
        }
    }

    fn normalize_order(&self, raw: RawOrder) -> OrderSummary {
        let order_id = or_placeholder(raw.display_id(), PLACEHOLDER);
        let customer = or_placeholder(raw.customer(), PLACEHOLDER);
        let status = or_placeholder(first_text([&raw.status, &raw.payment_status]), PLACEHOLDER);

        OrderSummary {
            order_id: truncate_text(&order_id, self.title_max_chars),
            customer: truncate_text(&customer, self.title_max_chars),
            items: raw.item_total().unwrap_or(0),
            amount: raw.final_total().unwrap_or(Decimal::ZERO),
            status: truncate_text(&status, self.title_max_chars),
            created_at: display_date(raw.created_at.as_deref()),
        }
    }

    fn normalize_revenue(&self, raw: RawRevenuePoint) -> RevenuePoint {
        let revenue = raw.revenue.unwrap_or(Decimal::ZERO);
        let period = or_placeholder(first_text([&raw.month, &raw.period, &raw.name, &raw.label]), PLACEHOLDER);

        RevenuePoint {
            period: truncate_text(&period, self.title_max_chars),
            revenue,
            profit: raw.profit.unwrap_or_else(|| profit_share(revenue)),
        }
    }

    // Escalares viram número (ou 0). Objetos e arrays não são métricas e saem.
    fn normalize_stats(&self, map: Map<String, Value>) -> StatsSummary {
        let entries = map
            .into_iter()
            .filter(|(_, value)| !value.is_object() && !value.is_array())
            .map(|(key, value)| {
                let lowered = key.to_ascii_lowercase();
                StatEntry {
                    label: truncate_text(&humanize_key(&key), self.title_max_chars),
                    value: lenient::to_decimal(&value).unwrap_or(Decimal::ZERO),
                    is_currency: CURRENCY_HINTS.iter().any(|hint| lowered.contains(hint)),
                    key,
                }
            })
            .collect();

        StatsSummary { entries }
    }
}

/// Aceita RFC 3339 ou YYYY-MM-DD.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn display_date(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
