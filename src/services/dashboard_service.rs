// src/services/dashboard_service.rs

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::{
    models::{dashboard::RevenueChartEntry, report_input::RawOrder},
    services::{
        currency::{format_amount, profit_share, CurrencySymbol},
        report_assembler::parse_timestamp,
    },
};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Série mensal de receita do ano: sempre 12 entradas, só pedidos pagos.
pub fn generate_revenue_chart_data(orders: &[RawOrder], year: i32) -> Vec<RevenueChartEntry> {
    let mut revenue_by_month = [Decimal::ZERO; 12];

    for order in orders.iter().filter(|o| o.is_paid()) {
        let Some(created_at) = order.created_at.as_deref().and_then(parse_timestamp) else {
            continue;
        };
        if created_at.year() != year {
            continue;
        }
        let month = created_at.month0() as usize;
        let amount = order.final_total().unwrap_or(Decimal::ZERO);
        // Soma satura em vez de estourar: valores absurdos não derrubam o gráfico
        revenue_by_month[month] = revenue_by_month[month].checked_add(amount).unwrap_or_else(|| {
            tracing::warn!("⚠️ Receita de {} {} estourou o limite do Decimal", MONTHS[month], year);
            if amount.is_sign_negative() { Decimal::MIN } else { Decimal::MAX }
        });
    }

    MONTHS
        .iter()
        .zip(revenue_by_month)
        .map(|(month, revenue)| RevenueChartEntry {
            month: month.to_string(),
            revenue,
            profit: profit_share(revenue),
            revenue_label: format_amount(revenue, CurrencySymbol::Glyph),
        })
        .collect()
}
