pub mod currency;
pub mod report_assembler;
pub mod dashboard_service;

// Exportação
pub mod document_layout;
pub mod document_service;
pub mod builtin_pdf;
pub mod styled_pdf;
pub mod spreadsheet_service;
