mod report_dto;

pub use report_dto::{
    ReportDetailResponseDto, ReportListQuery, ReportResponseDto, SubmitReportDto,
    SubmitReportFormDto, UpdateReportStatusDto,
};
