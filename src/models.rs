pub mod dashboard;
pub mod report;
pub mod report_input;
