use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report, ReportStatus};
use crate::features::volunteers::dtos::MovementSummaryDto;
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_DESCRIPTION_LENGTH};
use crate::shared::types::PaginationQuery;

/// JSON body for report submission. The multipart form uses the same field
/// names plus an optional `image` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitReportDto {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: Option<f64>,

    #[validate(length(
        min = 1,
        max = MAX_DESCRIPTION_LENGTH,
        message = "Description must be 1-5000 characters"
    ))]
    pub description: Option<String>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

impl SubmitReportDto {
    /// Validate and turn the submission into insert data for `user_id`
    pub fn into_create(self, user_id: i64) -> Result<CreateReport> {
        let description = self.description.map(|d| d.trim().to_string());
        let (Some(latitude), Some(longitude), Some(description)) =
            (self.latitude, self.longitude, description.filter(|d| !d.is_empty()))
        else {
            return Err(AppError::BadRequest(
                "Missing required fields: latitude, longitude, description".to_string(),
            ));
        };

        let checked = SubmitReportDto {
            latitude: Some(latitude),
            longitude: Some(longitude),
            description: Some(description),
            image_url: self.image_url,
        };
        checked
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        Ok(CreateReport {
            user_id,
            latitude,
            longitude,
            description: checked.description.unwrap_or_default(),
            image_url: checked.image_url,
        })
    }
}

/// Multipart form accepted by `POST /api/submit_report`.
/// The handler reads the fields with axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReportFormDto {
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    /// Photo of the site (jpeg, png, gif or webp, max 10 MB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    /// `in progress` or `cleaned`
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ReportListQuery {
    /// Filter by status (`pending`, `in progress`, `cleaned`)
    pub status: Option<String>,

    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl ReportListQuery {
    pub fn status_filter(&self) -> Result<Option<ReportStatus>> {
        match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(raw) => ReportStatus::parse(raw)
                .map(Some)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown status '{}'", raw))),
        }
    }

    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: i64,
    pub user_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub image_url: Option<String>,
    pub status: ReportStatus,
    pub claimed_by: Option<i64>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            latitude: r.latitude,
            longitude: r.longitude,
            description: r.description,
            image_url: r.image_url,
            status: r.status,
            claimed_by: r.claimed_by,
            claimed_at: r.claimed_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Report with its volunteer movement, if one was organized
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDetailResponseDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    pub movement: Option<MovementSummaryDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(lat: Option<f64>, lon: Option<f64>, description: Option<&str>) -> SubmitReportDto {
        SubmitReportDto {
            latitude: lat,
            longitude: lon,
            description: description.map(String::from),
            image_url: None,
        }
    }

    #[test]
    fn test_into_create_accepts_valid_submission() {
        let create = dto(Some(-6.2), Some(106.8), Some("  Dumped tyres  "))
            .into_create(3)
            .unwrap();
        assert_eq!(create.user_id, 3);
        assert_eq!(create.description, "Dumped tyres");
    }

    #[test]
    fn test_into_create_requires_fields() {
        for missing in [
            dto(None, Some(1.0), Some("x")),
            dto(Some(1.0), None, Some("x")),
            dto(Some(1.0), Some(1.0), None),
            dto(Some(1.0), Some(1.0), Some("   ")),
        ] {
            assert!(matches!(
                missing.into_create(1),
                Err(AppError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn test_into_create_checks_coordinate_ranges() {
        assert!(matches!(
            dto(Some(90.5), Some(0.0), Some("x")).into_create(1),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            dto(Some(0.0), Some(-180.1), Some("x")).into_create(1),
            Err(AppError::Validation(_))
        ));
        assert!(dto(Some(-90.0), Some(180.0), Some("x"))
            .into_create(1)
            .is_ok());
    }

    #[test]
    fn test_into_create_limits_description() {
        let long = "a".repeat(MAX_DESCRIPTION_LENGTH as usize + 1);
        assert!(dto(Some(0.0), Some(0.0), Some(&long)).into_create(1).is_err());
    }

    #[test]
    fn test_status_filter() {
        let query = ReportListQuery {
            status: Some("in_progress".to_string()),
            page: 1,
            page_size: 10,
        };
        assert_eq!(query.status_filter().unwrap(), Some(ReportStatus::InProgress));

        let bad = ReportListQuery {
            status: Some("lost".to_string()),
            ..query
        };
        assert!(bad.status_filter().is_err());
    }
}
