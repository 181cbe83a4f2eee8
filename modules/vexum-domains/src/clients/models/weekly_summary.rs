use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::Result;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClientWeeklySummary {
    pub id: Uuid,
    pub client_id: Uuid,
    pub meeting_id: Uuid,
    pub achievements: Option<String>,
    pub next_week_commitment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarySubmission {
    pub client_id: Uuid,
    pub meeting_id: Uuid,
    pub achievements: Option<String>,
    pub next_week_commitment: Option<String>,
}

impl ClientWeeklySummary {
    /// One summary per (client, meeting); resubmitting replaces both fields.
    pub async fn upsert(submission: SummarySubmission, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO client_weekly_summaries (client_id, meeting_id, achievements, next_week_commitment)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (client_id, meeting_id) DO UPDATE SET
                achievements = EXCLUDED.achievements,
                next_week_commitment = EXCLUDED.next_week_commitment,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(submission.client_id)
        .bind(submission.meeting_id)
        .bind(submission.achievements.filter(|s| !s.is_empty()))
        .bind(submission.next_week_commitment.filter(|s| !s.is_empty()))
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find(client_id: Uuid, meeting_id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM client_weekly_summaries WHERE client_id = $1 AND meeting_id = $2",
        )
        .bind(client_id)
        .bind(meeting_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
