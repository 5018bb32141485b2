use sqlx::PgPool;

use crate::core::error::{conflict_on_unique, AppError, Result};
use crate::features::reports::models::Report;
use crate::features::volunteers::models::{
    CreateMovement, MovementStatus, MovementWithCount, VolunteerMovement, VolunteerParticipant,
};

const MOVEMENT_COLUMNS: &str = "id, report_id, organizer_id, needed_volunteers, scheduled_date, \
     status, status_changed_by, created_at, updated_at";

const SUMMARY_SELECT: &str = r#"
    SELECT m.id, m.report_id, m.organizer_id, m.needed_volunteers, m.scheduled_date,
           m.status, m.status_changed_by, m.created_at, m.updated_at,
           COUNT(p.id) AS participant_count
    FROM volunteer_movements m
    LEFT JOIN volunteer_participants p ON p.movement_id = m.id
"#;

/// Volunteer movement lifecycle: start, join, block and unblock
pub struct VolunteerService {
    pool: PgPool,
}

impl VolunteerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Start the movement for a report. The UNIQUE constraint on `report_id`
    /// decides between concurrent organizers.
    pub async fn start(&self, data: CreateMovement) -> Result<VolunteerMovement> {
        let mut tx = self.pool.begin().await?;

        let report = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, user_id, latitude, longitude, description, image_url, status,
                   claimed_by, claimed_at, created_at, updated_at
            FROM reports
            WHERE id = $1
            FOR SHARE
            "#,
        )
        .bind(data.report_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

        report.ensure_open_for_volunteers()?;

        let sql = format!(
            r#"
            INSERT INTO volunteer_movements (report_id, organizer_id, needed_volunteers, scheduled_date)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            MOVEMENT_COLUMNS
        );
        let movement = sqlx::query_as::<_, VolunteerMovement>(&sql)
            .bind(data.report_id)
            .bind(data.organizer_id)
            .bind(data.needed_volunteers)
            .bind(data.scheduled_date)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                conflict_on_unique(e, "A volunteer movement for this report already exists")
            })?;

        tx.commit().await?;

        tracing::info!(
            "Volunteer movement started: id={}, report_id={}, organizer_id={}",
            movement.id,
            movement.report_id,
            movement.organizer_id
        );

        Ok(movement)
    }

    /// Movement of a report with its participant count, if one exists
    pub async fn summary_for_report(&self, report_id: i64) -> Result<Option<MovementWithCount>> {
        let sql = format!(
            "{} WHERE m.report_id = $1 GROUP BY m.id",
            SUMMARY_SELECT
        );
        let summary = sqlx::query_as::<_, MovementWithCount>(&sql)
            .bind(report_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(summary)
    }

    /// Active movements, soonest first
    pub async fn list_active(&self) -> Result<Vec<MovementWithCount>> {
        let sql = format!(
            "{} WHERE m.status = 'active' GROUP BY m.id ORDER BY m.scheduled_date ASC, m.id ASC",
            SUMMARY_SELECT
        );
        let movements = sqlx::query_as::<_, MovementWithCount>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(movements)
    }

    /// Record `user_id` as a participant. Returns the movement, the new
    /// participant row and the updated participant count.
    ///
    /// The shared row lock keeps a concurrent block from slipping in between
    /// the status check and the insert.
    pub async fn join(
        &self,
        report_id: i64,
        user_id: i64,
    ) -> Result<(VolunteerMovement, VolunteerParticipant, i64)> {
        let mut tx = self.pool.begin().await?;

        let movement = Self::lock_movement(&mut tx, report_id, "FOR SHARE").await?;
        movement.ensure_joinable()?;

        let participant = sqlx::query_as::<_, VolunteerParticipant>(
            r#"
            INSERT INTO volunteer_participants (movement_id, user_id)
            VALUES ($1, $2)
            RETURNING id, movement_id, user_id, joined_at
            "#,
        )
        .bind(movement.id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "You have already joined this volunteer movement"))?;

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM volunteer_participants WHERE movement_id = $1")
                .bind(movement.id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        tracing::info!(
            "User {} joined volunteer movement {} as participant {} ({} participants)",
            participant.user_id,
            participant.movement_id,
            participant.id,
            count
        );

        Ok((movement, participant, count))
    }

    pub async fn block(&self, report_id: i64, actor_id: i64) -> Result<VolunteerMovement> {
        self.set_status(report_id, actor_id, MovementStatus::Blocked)
            .await
    }

    pub async fn unblock(&self, report_id: i64, actor_id: i64) -> Result<VolunteerMovement> {
        self.set_status(report_id, actor_id, MovementStatus::Active)
            .await
    }

    async fn set_status(
        &self,
        report_id: i64,
        actor_id: i64,
        target: MovementStatus,
    ) -> Result<VolunteerMovement> {
        let mut tx = self.pool.begin().await?;

        let movement = Self::lock_movement(&mut tx, report_id, "FOR UPDATE").await?;
        match target {
            MovementStatus::Blocked => movement.ensure_blockable()?,
            MovementStatus::Active => movement.ensure_unblockable()?,
        }

        let sql = format!(
            r#"
            UPDATE volunteer_movements
            SET status = $2, status_changed_by = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            MOVEMENT_COLUMNS
        );
        let updated = sqlx::query_as::<_, VolunteerMovement>(&sql)
            .bind(movement.id)
            .bind(target)
            .bind(actor_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Volunteer movement {} set to {} by user {}",
            updated.id,
            updated.status,
            actor_id
        );

        Ok(updated)
    }

    async fn lock_movement(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        report_id: i64,
        lock: &str,
    ) -> Result<VolunteerMovement> {
        let sql = format!(
            "SELECT {} FROM volunteer_movements WHERE report_id = $1 {}",
            MOVEMENT_COLUMNS, lock
        );
        sqlx::query_as::<_, VolunteerMovement>(&sql)
            .bind(report_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No volunteer movement found for this report".to_string())
            })
    }
}
