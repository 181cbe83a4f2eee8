use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{OrNotFound, Result, VexumError};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AgendaItem {
    pub id: Uuid,
    pub meeting_id: Uuid,
    pub content: String,
    pub order_index: i32,
    pub is_from_broadcast: bool,
    pub broadcast_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAgendaItem {
    pub meeting_id: Uuid,
    pub content: String,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub is_from_broadcast: bool,
    pub broadcast_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgendaItemPatch {
    pub content: Option<String>,
    pub order_index: Option<i32>,
}

const IN_ORG: &str = " AND meeting_id IN (SELECT id FROM meetings WHERE organization_id = ";

impl AgendaItem {
    /// Caller has already checked that the meeting belongs to the creator's organization.
    pub async fn create(new: NewAgendaItem, created_by: Uuid, pool: &PgPool) -> Result<Self> {
        if new.content.trim().is_empty() {
            return Err(VexumError::validation("content must not be empty"));
        }

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO agenda_items (meeting_id, content, order_index, is_from_broadcast, broadcast_id, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new.meeting_id)
        .bind(new.content.trim())
        .bind(new.order_index)
        .bind(new.is_from_broadcast || new.broadcast_id.is_some())
        .bind(new.broadcast_id)
        .bind(created_by)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: Uuid,
        organization_id: Uuid,
        patch: AgendaItemPatch,
        pool: &PgPool,
    ) -> Result<Self> {
        let mut qb = sqlx::QueryBuilder::new("UPDATE agenda_items SET updated_at = NOW()");

        if let Some(content) = patch.content {
            qb.push(", content = ");
            qb.push_bind(content);
        }
        if let Some(order_index) = patch.order_index {
            qb.push(", order_index = ");
            qb.push_bind(order_index);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(IN_ORG);
        qb.push_bind(organization_id);
        qb.push(") RETURNING *");

        qb.build_query_as::<Self>()
            .fetch_optional(pool)
            .await?
            .or_not_found("Agenda item not found")
    }

    pub async fn delete(id: Uuid, organization_id: Uuid, pool: &PgPool) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM agenda_items
            WHERE id = $1 AND meeting_id IN (SELECT id FROM meetings WHERE organization_id = $2)
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(VexumError::NotFound("Agenda item not found"));
        }
        Ok(())
    }

    pub async fn list_for_meeting(meeting_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM agenda_items WHERE meeting_id = $1 ORDER BY order_index, created_at",
        )
        .bind(meeting_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
