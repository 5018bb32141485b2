mod report_service;

pub use report_service::{ReportImage, ReportService};
