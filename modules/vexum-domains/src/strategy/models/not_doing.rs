use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{Result, VexumError};

/// Something the organization has explicitly decided not to pursue.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StrategyNotDoing {
    pub id: Uuid,
    pub meeting_id: Uuid,
    pub content: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewNotDoing {
    pub meeting_id: Uuid,
    pub content: String,
    pub reason: Option<String>,
}

impl StrategyNotDoing {
    pub async fn create(new: NewNotDoing, pool: &PgPool) -> Result<Self> {
        if new.content.trim().is_empty() {
            return Err(VexumError::validation("content must not be empty"));
        }

        sqlx::query_as::<_, Self>(
            "INSERT INTO strategy_not_doing (meeting_id, content, reason) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(new.meeting_id)
        .bind(new.content.trim())
        .bind(new.reason.filter(|r| !r.is_empty()))
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list_for_meeting(meeting_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM strategy_not_doing WHERE meeting_id = $1 ORDER BY created_at",
        )
        .bind(meeting_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
