// src/services/spreadsheet_service.rs

use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::{
    common::error::AppError,
    models::report::ReportModel,
    services::{
        currency::{format_amount, to_f64, CurrencySymbol},
        document_service::{export_file_name, ExportArtifact},
    },
};

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const DEFAULT_BASE_NAME: &str = "dashboard-report";
pub const NO_DATA_SHEET: &str = "No Data";

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    fn money(amount: Decimal) -> [CellValue; 2] {
        [
            CellValue::Number(to_f64(amount)),
            CellValue::Text(format_amount(amount, CurrencySymbol::Ascii)),
        ]
    }
}

/// Uma aba: colunas (título, largura em caracteres) e linhas planas.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub name: &'static str,
    pub columns: Vec<(&'static str, f64)>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Uma aba por seção não vazia. Sem dados, uma aba "No Data".
pub fn plan_workbook(model: &ReportModel) -> Vec<SheetPlan> {
    let mut sheets = Vec::new();

    if !model.stats.is_empty() {
        sheets.push(SheetPlan {
            name: "Statistics",
            columns: vec![("Metric", 28.0), ("Value", 16.0), ("Display Value", 20.0)],
            rows: model
                .stats
                .entries
                .iter()
                .map(|e| {
                    let display = if e.is_currency {
                        format_amount(e.value, CurrencySymbol::Ascii)
                    } else {
                        e.value.normalize().to_string()
                    };
                    vec![CellValue::text(e.label.clone()), CellValue::Number(to_f64(e.value)), CellValue::Text(display)]
                })
                .collect(),
        });
    }

    if !model.revenue.is_empty() {
        sheets.push(SheetPlan {
            name: "Revenue",
            columns: vec![
                ("Period", 14.0),
                ("Revenue", 14.0),
                ("Revenue (Rs.)", 18.0),
                ("Profit", 14.0),
                ("Profit (Rs.)", 18.0),
            ],
            rows: model
                .revenue
                .iter()
                .map(|p| {
                    let mut row = vec![CellValue::text(p.period.clone())];
                    row.extend(CellValue::money(p.revenue));
                    row.extend(CellValue::money(p.profit));
                    row
                })
                .collect(),
        });
    }

    if !model.courses.is_empty() {
        sheets.push(SheetPlan {
            name: "Courses",
            columns: vec![
                ("Title", 36.0),
                ("Enrolled", 10.0),
                ("Rating", 8.0),
                ("Price", 12.0),
                ("Price (Rs.)", 16.0),
                ("Status", 10.0),
                ("Created", 12.0),
            ],
            rows: model
                .courses
                .iter()
                .map(|c| {
                    let mut row = vec![
                        CellValue::text(c.title.clone()),
                        CellValue::Number(c.enrolled as f64),
                        CellValue::Number(to_f64(c.rating)),
                    ];
                    row.extend(CellValue::money(c.price));
                    row.push(CellValue::text(if c.listed { "Listed" } else { "Unlisted" }));
                    row.push(CellValue::text(c.created_at.clone()));
                    row
                })
                .collect(),
        });
    }

    if !model.orders.is_empty() {
        sheets.push(SheetPlan {
            name: "Orders",
            columns: vec![
                ("Order ID", 18.0),
                ("Customer", 24.0),
                ("Items", 8.0),
                ("Amount", 12.0),
                ("Amount (Rs.)", 16.0),
                ("Status", 12.0),
                ("Date", 12.0),
            ],
            rows: model
                .orders
                .iter()
                .map(|o| {
                    let mut row = vec![
                        CellValue::text(o.order_id.clone()),
                        CellValue::text(o.customer.clone()),
                        CellValue::Number(o.items as f64),
                    ];
                    row.extend(CellValue::money(o.amount));
                    row.push(CellValue::text(o.status.clone()));
                    row.push(CellValue::text(o.created_at.clone()));
                    row
                })
                .collect(),
        });
    }

    if sheets.is_empty() {
        sheets.push(SheetPlan {
            name: NO_DATA_SHEET,
            columns: vec![("Message", 40.0)],
            rows: vec![vec![CellValue::text("No data available for export")]],
        });
    }

    sheets
}

pub fn render_workbook(sheets: &[SheetPlan]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;

        for (col, (title, width)) in sheet.columns.iter().enumerate() {
            let col = col as u16;
            worksheet.write_string_with_format(0, col, *title, &header_format)?;
            worksheet.set_column_width(col, *width)?;
        }

        for (index, cells) in sheet.rows.iter().enumerate() {
            let row = index as u32 + 1;
            for (col, cell) in cells.iter().enumerate() {
                let col = col as u16;
                match cell {
                    CellValue::Text(text) => worksheet.write_string(row, col, text.as_str())?,
                    CellValue::Number(number) => worksheet.write_number(row, col, *number)?,
                };
            }
        }
    }

    workbook.save_to_buffer()
}

#[derive(Debug, Clone, Default)]
pub struct SpreadsheetService;

impl SpreadsheetService {
    pub fn new() -> Self {
        Self
    }

    /// Sem fallback: o erro do rust_xlsxwriter sobe para quem chamou.
    pub fn export_xlsx(&self, model: &ReportModel, base_name: Option<&str>) -> Result<ExportArtifact, AppError> {
        let sheets = plan_workbook(model);
        let bytes = render_workbook(&sheets)?;

        let base_name = base_name.map(str::trim).filter(|b| !b.is_empty()).unwrap_or(DEFAULT_BASE_NAME);
        tracing::info!("📊 Planilha gerada com {} aba(s) ({} bytes)", sheets.len(), bytes.len());

        Ok(ExportArtifact {
            file_name: export_file_name(base_name, model.generated_at, "xlsx"),
            content_type: XLSX_CONTENT_TYPE,
            bytes,
            render_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::report_input::ReportInput, services::report_assembler::ReportAssembler};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn model(value: serde_json::Value) -> ReportModel {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        ReportAssembler::new(30).assemble(ReportInput::from_value(value), None, now)
    }

    #[test]
    fn empty_report_gets_single_no_data_sheet() {
        let sheets = plan_workbook(&model(json!({})));
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].name, NO_DATA_SHEET);

        let bytes = render_workbook(&sheets).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn one_sheet_per_non_empty_section() {
        let sheets = plan_workbook(&model(json!({
            "stats": {"totalUsers": 10},
            "coursesData": [{"title": "Rust"}],
            "ordersData": []
        })));
        let names: Vec<&str> = sheets.iter().map(|s| s.name).collect();
        assert_eq!(names, ["Statistics", "Courses"]);
    }

    #[test]
    fn currency_fields_have_raw_and_formatted_columns() {
        let sheets = plan_workbook(&model(json!({
            "ordersData": [{"orderId": "ORD-9", "customerName": "Ravi", "items": [1], "finalAmount": 1500, "status": "paid"}]
        })));
        let orders = &sheets[0];
        assert_eq!(orders.columns.len(), orders.rows[0].len());
        assert_eq!(orders.rows[0][3], CellValue::Number(1500.0));
        assert_eq!(orders.rows[0][4], CellValue::Text("Rs.1,500.00".to_string()));
    }

    #[test]
    fn export_names_file_after_base_name() {
        let artifact = SpreadsheetService::new()
            .export_xlsx(&model(json!({"stats": {"totalOrders": 3}})), Some("Tutor Earnings"))
            .unwrap();
        assert_eq!(artifact.file_name, "tutor-earnings-2026-10-18.xlsx");
        assert_eq!(artifact.content_type, XLSX_CONTENT_TYPE);

        let fallback = SpreadsheetService::new().export_xlsx(&model(json!({})), None).unwrap();
        assert_eq!(fallback.file_name, "dashboard-report-2026-10-18.xlsx");
    }
}
