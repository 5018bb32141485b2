use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};

/// Report status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
pub enum ReportStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in progress", alias = "in_progress")]
    InProgress,
    #[serde(rename = "cleaned")]
    Cleaned,
}

impl ReportStatus {
    /// Parse a status sent by a client. Accepts `in progress` and `in_progress`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "pending" => Some(ReportStatus::Pending),
            "in progress" | "in_progress" => Some(ReportStatus::InProgress),
            "cleaned" => Some(ReportStatus::Cleaned),
            _ => None,
        }
    }

    /// Statuses an organization may set through a status update
    pub fn parse_update_target(raw: &str) -> Result<Self> {
        match Self::parse(raw) {
            Some(status @ (ReportStatus::InProgress | ReportStatus::Cleaned)) => Ok(status),
            _ => Err(AppError::BadRequest(
                "Invalid status. Allowed values: 'in progress', 'cleaned'".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::InProgress => write!(f, "in progress"),
            ReportStatus::Cleaned => write!(f, "cleaned"),
        }
    }
}

/// Database model for report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
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

impl Report {
    pub fn ensure_claimable(&self) -> Result<()> {
        if self.claimed_by.is_some() {
            return Err(AppError::Conflict(
                "This report has already been claimed".to_string(),
            ));
        }
        Ok(())
    }

    /// Check that `actor_id` may move this report to `target`
    pub fn ensure_status_update(&self, actor_id: i64, target: ReportStatus) -> Result<()> {
        if target == ReportStatus::Pending {
            return Err(AppError::BadRequest(
                "Invalid status. Allowed values: 'in progress', 'cleaned'".to_string(),
            ));
        }
        if self.claimed_by != Some(actor_id) {
            return Err(AppError::Forbidden(
                "You can only update reports you claimed".to_string(),
            ));
        }
        if self.status == ReportStatus::Cleaned {
            return Err(AppError::Conflict(
                "This report has already been cleaned".to_string(),
            ));
        }
        Ok(())
    }

    /// Volunteer movements can only be organized for reports not yet cleaned
    pub fn ensure_open_for_volunteers(&self) -> Result<()> {
        if self.status == ReportStatus::Cleaned {
            return Err(AppError::Conflict(
                "This report has already been cleaned".to_string(),
            ));
        }
        Ok(())
    }
}

/// Data for creating a new report
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub user_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub image_url: Option<String>,
}
