// src/services/currency.rs

// Política única de formatação de moeda (INR).
// O símbolo é escolhido por quem renderiza: a tela usa o glifo ₹, os documentos
// usam "Rs." porque as fontes embutidas do PDF não codificam o glifo.

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    Glyph,
    Ascii,
}

impl CurrencySymbol {
    pub fn prefix(self) -> &'static str {
        match self {
            CurrencySymbol::Glyph => "₹",
            CurrencySymbol::Ascii => "Rs.",
        }
    }
}

const CRORE: i64 = 10_000_000;
const LAKH: i64 = 100_000;
const THOUSAND: i64 = 1_000;

/// Formato compacto usado nos cards e nas exportações: Rs.1.5K, Rs.2.5L, Rs.1.5Cr.
pub fn format_currency(amount: Decimal) -> String {
    format_compact(amount, CurrencySymbol::Ascii)
}

pub fn format_compact(amount: Decimal, symbol: CurrencySymbol) -> String {
    let prefix = symbol.prefix();
    let scales = [(CRORE, "Cr"), (LAKH, "L"), (THOUSAND, "K")];

    for (scale, suffix) in scales {
        let scale = Decimal::from(scale);
        if amount >= scale {
            return format!("{}{}{}", prefix, one_decimal(amount / scale), suffix);
        }
    }

    format!("{}{}", prefix, amount.normalize())
}

/// Valor completo com agrupamento indiano e duas casas: ₹12,34,567.50
pub fn format_amount(amount: Decimal, symbol: CurrencySymbol) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let digits = rounded.abs().to_string();
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{}{}{}.{}", sign, symbol.prefix(), group_indian(integer), fraction)
}

/// Lucro estimado: 70% da receita, arredondado para inteiro.
pub fn profit_share(revenue: Decimal) -> Decimal {
    (revenue * Decimal::new(7, 1)).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub fn to_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or(0.0)
}

fn one_decimal(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    rounded.to_string()
}

// 1234567 -> 12,34,567 (últimos três dígitos, depois grupos de dois)
fn group_indian(integer: &str) -> String {
    if integer.len() <= 3 {
        return integer.to_string();
    }
    let (head, tail) = integer.split_at(integer.len() - 3);

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn compact_scales() {
        assert_eq!(format_currency(d(0)), "Rs.0");
        assert_eq!(format_currency(d(1500)), "Rs.1.5K");
        assert_eq!(format_currency(d(250000)), "Rs.2.5L");
        assert_eq!(format_currency(d(15000000)), "Rs.1.5Cr");
    }

    #[test]
    fn compact_keeps_one_decimal_and_raw_below_thousand() {
        assert_eq!(format_currency(d(2000)), "Rs.2.0K");
        assert_eq!(format_currency(d(999)), "Rs.999");
        assert_eq!(format_currency(Decimal::new(4995, 1)), "Rs.499.5");
    }

    #[test]
    fn compact_glyph_uses_same_policy() {
        assert_eq!(format_compact(d(1500), CurrencySymbol::Glyph), "₹1.5K");
    }

    #[test]
    fn full_amount_uses_indian_grouping() {
        assert_eq!(format_amount(d(1234567), CurrencySymbol::Glyph), "₹12,34,567.00");
        assert_eq!(format_amount(Decimal::new(150050, 2), CurrencySymbol::Ascii), "Rs.1,500.50");
        assert_eq!(format_amount(d(999), CurrencySymbol::Ascii), "Rs.999.00");
        assert_eq!(format_amount(d(0), CurrencySymbol::Ascii), "Rs.0.00");
        assert_eq!(format_amount(d(-2500), CurrencySymbol::Ascii), "-Rs.2,500.00");
    }

    #[test]
    fn profit_is_seventy_percent_rounded() {
        assert_eq!(profit_share(d(1000)), d(700));
        assert_eq!(profit_share(d(5)), d(4)); // 3.5 -> 4
        assert_eq!(profit_share(d(0)), d(0));
    }
}
