// src/models/report_input.rs

// Contrato de entrada vindo do dashboard: { stats, revenueData, coursesData, ordersData }.
// Todos os campos são opcionais e tolerantes. Nada aqui devolve erro por dado
// malformado: o campo vira None e o montador aplica o padrão.

use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{Map, Value};
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    #[serde(default, deserialize_with = "lenient::object")]
    #[schema(value_type = Option<Object>, example = json!({"totalUsers": 1520, "totalRevenue": 250000}))]
    pub stats: Option<Map<String, Value>>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub revenue_data: Vec<RawRevenuePoint>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub courses_data: Vec<RawCourse>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub orders_data: Vec<RawOrder>,
}

impl ReportInput {
    /// Qualquer JSON vira uma entrada. Topo que não é objeto vira entrada vazia.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawRevenuePoint {
    #[serde(default, deserialize_with = "lenient::text")]
    #[schema(example = "Mar")]
    pub month: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub label: Option<String>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    #[schema(example = "45000")]
    pub revenue: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub profit: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawCourse {
    #[serde(default, deserialize_with = "lenient::text")]
    #[schema(example = "Complete Rust Programming Bootcamp")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::count")]
    pub enrolled_students: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub enrolled: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub students_count: Option<u64>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub rating: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub average_rating: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    #[schema(example = "499")]
    pub price: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_listed: Option<bool>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub status: Option<bool>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RawPerson {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawOrder {
    #[serde(default, deserialize_with = "lenient::text")]
    pub order_id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "lenient::text")]
    pub mongo_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    #[schema(example = "Ana Souza")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub user: Option<RawPerson>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub customer: Option<RawPerson>,

    #[serde(default, deserialize_with = "lenient::count")]
    pub items: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub item_count: Option<u64>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    #[schema(example = "1000")]
    pub final_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::text")]
    #[schema(example = "paid")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub payment_status: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    #[schema(example = "2026-03-14T10:30:00Z")]
    pub created_at: Option<String>,
}

impl RawOrder {
    pub fn display_id(&self) -> Option<String> {
        first_text([&self.order_id, &self.mongo_id, &self.id])
    }

    pub fn customer(&self) -> Option<String> {
        let nested = |p: &Option<RawPerson>| p.as_ref().and_then(|p| p.name.clone());
        first_text([&self.customer_name, &nested(&self.user), &nested(&self.customer)])
    }

    pub fn item_total(&self) -> Option<u64> {
        self.items.or(self.item_count)
    }

    pub fn final_total(&self) -> Option<Decimal> {
        self.final_amount.or(self.total_amount).or(self.amount)
    }

    /// Pedido pago: status ou paymentStatus em paid/completed/success.
    pub fn is_paid(&self) -> bool {
        [&self.status, &self.payment_status].into_iter().flatten().any(|s| {
            matches!(s.trim().to_ascii_lowercase().as_str(), "paid" | "completed" | "success")
        })
    }
}

pub(crate) fn first_text<const N: usize>(candidates: [&Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Desserializadores tolerantes: aceitam qualquer JSON e devolvem None
/// quando o valor não serve.
pub mod lenient {
    use super::*;
    use std::str::FromStr;

    pub fn object<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Map<String, Value>>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Object(map) => Some(map),
            _ => None,
        })
    }

    /// Itens que não encaixam no schema (ex.: não-objetos) são descartados.
    pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn nested<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(d)?;
        if !value.is_object() {
            return Ok(None);
        }
        Ok(serde_json::from_value(value).ok())
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
        Ok(to_decimal(&Value::deserialize(d)?))
    }

    /// Contagem: número, string numérica ou tamanho de um array.
    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        let value = Value::deserialize(d)?;
        if let Value::Array(items) = &value {
            return Ok(Some(items.len() as u64));
        }
        Ok(to_decimal(&value).map(|n| {
            use rust_decimal::prelude::ToPrimitive;
            n.trunc().to_u64().unwrap_or(0)
        }))
    }

    /// Flag de listagem: bool, número != 0, ou status textual.
    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => Some(b),
            Value::Number(n) => n.as_f64().map(|n| n != 0.0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "active" | "listed" | "published" | "approved" | "true" => Some(true),
                "" => None,
                _ => Some(false),
            },
            _ => None,
        })
    }

    pub fn to_decimal(value: &Value) -> Option<Decimal> {
        match value {
            Value::Number(n) => {
                let raw = n.to_string();
                Decimal::from_str(&raw)
                    .or_else(|_| Decimal::from_scientific(&raw))
                    .ok()
            }
            Value::String(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_top_level_is_empty_input() {
        for value in [json!(null), json!(42), json!("stats"), json!([1, 2, 3])] {
            let input = ReportInput::from_value(value);
            assert!(input.stats.is_none());
            assert!(input.revenue_data.is_empty());
            assert!(input.courses_data.is_empty());
            assert!(input.orders_data.is_empty());
        }
    }

    #[test]
    fn non_object_entries_are_dropped() {
        let input = ReportInput::from_value(json!({
            "coursesData": [{"title": "Rust"}, 7, "x", null, {"title": "Go"}],
            "ordersData": "not a list",
            "stats": [1, 2],
        }));
        assert_eq!(input.courses_data.len(), 2);
        assert!(input.orders_data.is_empty());
        assert!(input.stats.is_none());
    }

    #[test]
    fn wrong_field_types_become_none() {
        let input = ReportInput::from_value(json!({
            "coursesData": [{
                "title": {"nested": true},
                "price": "abc",
                "enrolledStudents": ["u1", "u2", "u3"],
                "rating": "4.5",
                "status": "active"
            }]
        }));
        let course = &input.courses_data[0];
        assert!(course.title.is_none());
        assert!(course.price.is_none());
        assert_eq!(course.enrolled_students, Some(3));
        assert_eq!(course.rating, Some(Decimal::new(45, 1)));
        assert_eq!(course.status, Some(true));
    }

    #[test]
    fn order_accessors_pick_first_present_field() {
        let input = ReportInput::from_value(json!({
            "ordersData": [{
                "_id": "65f1c0ffee",
                "user": {"name": "Ravi"},
                "items": [{}, {}],
                "totalAmount": 1200,
                "paymentStatus": "Completed"
            }]
        }));
        let order = &input.orders_data[0];
        assert_eq!(order.display_id().as_deref(), Some("65f1c0ffee"));
        assert_eq!(order.customer().as_deref(), Some("Ravi"));
        assert_eq!(order.item_total(), Some(2));
        assert_eq!(order.final_total(), Some(Decimal::from(1200)));
        assert!(order.is_paid());
    }

    #[test]
    fn pending_orders_are_not_paid() {
        let order = RawOrder { status: Some("pending".into()), ..Default::default() };
        assert!(!order.is_paid());
    }
}
