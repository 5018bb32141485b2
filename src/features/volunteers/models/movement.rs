use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};

/// Movement status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "movement_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MovementStatus {
    Active,
    Blocked,
}

impl std::fmt::Display for MovementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementStatus::Active => write!(f, "active"),
            MovementStatus::Blocked => write!(f, "blocked"),
        }
    }
}

/// Database model for a volunteer cleanup movement. At most one per report.
#[derive(Debug, Clone, FromRow)]
pub struct VolunteerMovement {
    pub id: i64,
    pub report_id: i64,
    pub organizer_id: i64,
    pub needed_volunteers: i32,
    pub scheduled_date: NaiveDate,
    pub status: MovementStatus,
    /// Government user who last blocked or unblocked the movement
    pub status_changed_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VolunteerMovement {
    pub fn ensure_joinable(&self) -> Result<()> {
        if self.status == MovementStatus::Blocked {
            return Err(AppError::Conflict(
                "This volunteer movement has been blocked".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ensure_blockable(&self) -> Result<()> {
        if self.status == MovementStatus::Blocked {
            return Err(AppError::Conflict(
                "This volunteer movement is already blocked".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ensure_unblockable(&self) -> Result<()> {
        if self.status != MovementStatus::Blocked {
            return Err(AppError::Conflict(
                "This volunteer movement is not blocked".to_string(),
            ));
        }
        Ok(())
    }
}

/// Movement row together with how many volunteers joined it
#[derive(Debug, Clone, FromRow)]
pub struct MovementWithCount {
    #[sqlx(flatten)]
    pub movement: VolunteerMovement,
    pub participant_count: i64,
}

/// Data for creating a new movement
#[derive(Debug, Clone)]
pub struct CreateMovement {
    pub report_id: i64,
    pub organizer_id: i64,
    pub needed_volunteers: i32,
    pub scheduled_date: NaiveDate,
}
