use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{Result, VexumError};

/// A change to company rules announced at a headquarters meeting.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RuleUpdate {
    pub id: Uuid,
    pub meeting_id: Uuid,
    pub change_description: String,
    pub impact: Option<String>,
    pub migration_steps: Option<String>,
    pub completion_criteria: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRuleUpdate {
    pub meeting_id: Uuid,
    pub change_description: String,
    pub impact: Option<String>,
    pub migration_steps: Option<String>,
    pub completion_criteria: Option<String>,
}

impl RuleUpdate {
    pub async fn create(new: NewRuleUpdate, created_by: Uuid, pool: &PgPool) -> Result<Self> {
        if new.change_description.trim().is_empty() {
            return Err(VexumError::validation("change_description must not be empty"));
        }

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO rule_updates (meeting_id, change_description, impact, migration_steps, completion_criteria, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new.meeting_id)
        .bind(new.change_description.trim())
        .bind(new.impact)
        .bind(new.migration_steps)
        .bind(new.completion_criteria)
        .bind(created_by)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list_for_meeting(meeting_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM rule_updates WHERE meeting_id = $1 ORDER BY created_at",
        )
        .bind(meeting_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
