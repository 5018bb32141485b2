use sqlx::PgPool;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report, ReportStatus};
use crate::modules::storage::ImageStore;
use crate::shared::types::PaginationQuery;

const REPORT_COLUMNS: &str = "id, user_id, latitude, longitude, description, image_url, status, \
     claimed_by, claimed_at, created_at, updated_at";

/// Photo attached to a multipart submission
#[derive(Debug, Clone)]
pub struct ReportImage {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Report lifecycle: submission, listing, claiming and status updates
pub struct ReportService {
    pool: PgPool,
    images: Arc<dyn ImageStore>,
}

impl ReportService {
    pub fn new(pool: PgPool, images: Arc<dyn ImageStore>) -> Self {
        Self { pool, images }
    }

    /// Store a new report for a verified user.
    ///
    /// The photo, if any, is uploaded only after the submitter has been
    /// checked, and its URL replaces any `image_url` sent in the body.
    pub async fn submit(&self, data: CreateReport, image: Option<ReportImage>) -> Result<Report> {
        self.ensure_verified_submitter(data.user_id).await?;

        let image_url = match image {
            Some(image) => Some(
                self.images
                    .store_image(data.user_id, image.data, &image.content_type)
                    .await?,
            ),
            None => data.image_url,
        };

        let sql = format!(
            r#"
            INSERT INTO reports (user_id, latitude, longitude, description, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );
        let report = sqlx::query_as::<_, Report>(&sql)
            .bind(data.user_id)
            .bind(data.latitude)
            .bind(data.longitude)
            .bind(&data.description)
            .bind(image_url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create report: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Report submitted: id={}, user_id={}", report.id, report.user_id);

        Ok(report)
    }

    async fn ensure_verified_submitter(&self, user_id: i64) -> Result<()> {
        let verified: Option<bool> =
            sqlx::query_scalar("SELECT is_verified FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        match verified {
            Some(true) => Ok(()),
            _ => Err(AppError::Forbidden(
                "Email must be verified before submitting reports".to_string(),
            )),
        }
    }

    /// Newest reports first, optionally filtered by status. Returns the page
    /// and the total number of matching reports.
    pub async fn list(
        &self,
        status: Option<ReportStatus>,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<Report>, i64)> {
        let sql = format!(
            r#"
            SELECT {}
            FROM reports
            WHERE ($1::report_status IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            REPORT_COLUMNS
        );
        let reports = sqlx::query_as::<_, Report>(&sql)
            .bind(status)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reports WHERE ($1::report_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok((reports, total))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Report> {
        let sql = format!("SELECT {} FROM reports WHERE id = $1", REPORT_COLUMNS);
        sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))
    }

    /// Claim a report for an organization user.
    ///
    /// The conditional update is the only writer of `claimed_by`, so two
    /// concurrent claims cannot both succeed.
    pub async fn claim(&self, id: i64, user_id: i64) -> Result<Report> {
        let sql = format!(
            r#"
            UPDATE reports
            SET claimed_by = $2, claimed_at = NOW(), status = 'in_progress', updated_at = NOW()
            WHERE id = $1 AND claimed_by IS NULL
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );
        let claimed = sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match claimed {
            Some(report) => {
                tracing::info!("Report claimed: id={}, by={}", report.id, user_id);
                Ok(report)
            }
            None => {
                // Either missing or lost the race; report which one
                self.get_by_id(id).await?.ensure_claimable()?;
                Err(AppError::Conflict(
                    "This report has already been claimed".to_string(),
                ))
            }
        }
    }

    /// Set the status of a claimed report. Only the claimant may do so and a
    /// cleaned report is final.
    pub async fn update_status(
        &self,
        id: i64,
        user_id: i64,
        target: ReportStatus,
    ) -> Result<Report> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {} FROM reports WHERE id = $1 FOR UPDATE", REPORT_COLUMNS);
        let report = sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

        report.ensure_status_update(user_id, target)?;

        let sql = format!(
            "UPDATE reports SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            REPORT_COLUMNS
        );
        let updated = sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .bind(target)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Report status updated: id={}, {} -> {}",
            id,
            report.status,
            updated.status
        );

        Ok(updated)
    }
}
