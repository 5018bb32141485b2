use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A user signed up for a movement. Unique per (movement, user).
#[derive(Debug, Clone, FromRow)]
pub struct VolunteerParticipant {
    pub id: i64,
    pub movement_id: i64,
    pub user_id: i64,
    pub joined_at: DateTime<Utc>,
}
