use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{Result, VexumError};

/// A ranked strategic priority. Rank is unique within a meeting.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StrategyPriority {
    pub id: Uuid,
    pub meeting_id: Uuid,
    pub priority_rank: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrioritySubmission {
    pub meeting_id: Uuid,
    pub priority_rank: i32,
    pub content: String,
}

impl StrategyPriority {
    /// Writing an occupied rank replaces its content.
    pub async fn upsert(submission: PrioritySubmission, pool: &PgPool) -> Result<Self> {
        if submission.priority_rank < 1 {
            return Err(VexumError::validation("priority_rank must be at least 1"));
        }
        if submission.content.trim().is_empty() {
            return Err(VexumError::validation("content must not be empty"));
        }

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO strategy_priorities (meeting_id, priority_rank, content)
            VALUES ($1, $2, $3)
            ON CONFLICT (meeting_id, priority_rank) DO UPDATE SET
                content = EXCLUDED.content,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(submission.meeting_id)
        .bind(submission.priority_rank)
        .bind(submission.content.trim())
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list_for_meeting(meeting_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM strategy_priorities WHERE meeting_id = $1 ORDER BY priority_rank",
        )
        .bind(meeting_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
