use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{ConsumptionType, Result};

/// One entry in a broadcast's consumption log. The log is append-only: a team
/// may consume the same broadcast several times.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BroadcastConsumption {
    pub id: Uuid,
    pub broadcast_id: Uuid,
    pub team_id: Uuid,
    pub meeting_id: Uuid,
    pub consumption_type: ConsumptionType,
    pub action_id: Option<Uuid>,
    pub issue_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewConsumption {
    pub team_id: Uuid,
    pub meeting_id: Uuid,
    pub consumption_type: ConsumptionType,
    pub action_id: Option<Uuid>,
    pub issue_id: Option<Uuid>,
}

impl BroadcastConsumption {
    /// Caller has already scoped the broadcast and meeting to the organization.
    pub async fn record(broadcast_id: Uuid, new: NewConsumption, pool: &PgPool) -> Result<Self> {
        let consumption = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO broadcast_consumptions (broadcast_id, team_id, meeting_id, consumption_type, action_id, issue_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(broadcast_id)
        .bind(new.team_id)
        .bind(new.meeting_id)
        .bind(new.consumption_type)
        .bind(new.action_id)
        .bind(new.issue_id)
        .fetch_one(pool)
        .await?;

        tracing::info!(
            broadcast_id = %consumption.broadcast_id,
            team_id = %consumption.team_id,
            consumption_type = %consumption.consumption_type,
            "Broadcast consumed"
        );
        Ok(consumption)
    }

    pub async fn list_for_broadcast(broadcast_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM broadcast_consumptions WHERE broadcast_id = $1 ORDER BY created_at",
        )
        .bind(broadcast_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
