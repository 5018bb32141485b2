use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::volunteers::models::{
    CreateMovement, MovementStatus, MovementWithCount, VolunteerMovement,
};
use crate::shared::constants::MAX_NEEDED_VOLUNTEERS;

/// Request DTO for starting a movement
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StartMovementDto {
    #[serde(default)]
    #[validate(range(
        min = 0,
        max = MAX_NEEDED_VOLUNTEERS,
        message = "needed_volunteers must be between 0 and 10000"
    ))]
    pub needed_volunteers: i32,

    /// Day of the cleanup (YYYY-MM-DD), today or later
    pub scheduled_date: NaiveDate,
}

impl StartMovementDto {
    pub fn into_create(
        self,
        report_id: i64,
        organizer_id: i64,
        today: NaiveDate,
    ) -> Result<CreateMovement> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.scheduled_date < today {
            return Err(AppError::BadRequest(
                "scheduled_date cannot be in the past".to_string(),
            ));
        }

        Ok(CreateMovement {
            report_id,
            organizer_id,
            needed_volunteers: self.needed_volunteers,
            scheduled_date: self.scheduled_date,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovementResponseDto {
    pub id: i64,
    pub report_id: i64,
    pub organizer_id: i64,
    pub needed_volunteers: i32,
    pub scheduled_date: NaiveDate,
    pub status: MovementStatus,
    pub status_changed_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VolunteerMovement> for MovementResponseDto {
    fn from(m: VolunteerMovement) -> Self {
        Self {
            id: m.id,
            report_id: m.report_id,
            organizer_id: m.organizer_id,
            needed_volunteers: m.needed_volunteers,
            scheduled_date: m.scheduled_date,
            status: m.status,
            status_changed_by: m.status_changed_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Movement with its current participant count
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovementSummaryDto {
    pub id: i64,
    pub report_id: i64,
    pub organizer_id: i64,
    pub needed_volunteers: i32,
    pub scheduled_date: NaiveDate,
    pub status: MovementStatus,
    pub participant_count: i64,
}

impl From<MovementWithCount> for MovementSummaryDto {
    fn from(row: MovementWithCount) -> Self {
        let m = row.movement;
        Self {
            id: m.id,
            report_id: m.report_id,
            organizer_id: m.organizer_id,
            needed_volunteers: m.needed_volunteers,
            scheduled_date: m.scheduled_date,
            status: m.status,
            participant_count: row.participant_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JoinMovementResponseDto {
    pub movement_id: i64,
    pub report_id: i64,
    pub participant_count: i64,
    pub joined_at: DateTime<Utc>,
}
