use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{Result, VexumError};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StrategyAllocation {
    pub id: Uuid,
    pub meeting_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAllocation {
    pub meeting_id: Uuid,
    pub content: String,
}

impl StrategyAllocation {
    pub async fn create(new: NewAllocation, pool: &PgPool) -> Result<Self> {
        if new.content.trim().is_empty() {
            return Err(VexumError::validation("content must not be empty"));
        }

        sqlx::query_as::<_, Self>(
            "INSERT INTO strategy_allocations (meeting_id, content) VALUES ($1, $2) RETURNING *",
        )
        .bind(new.meeting_id)
        .bind(new.content.trim())
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list_for_meeting(meeting_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM strategy_allocations WHERE meeting_id = $1 ORDER BY created_at",
        )
        .bind(meeting_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
