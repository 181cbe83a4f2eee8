use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{ActionStatus, OrNotFound, Result, VexumError};

use crate::shared::nullable;

/// A workstream for a client, tracked with the same statuses as actions.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Initiative {
    pub id: Uuid,
    pub client_id: Uuid,
    pub meeting_id: Option<Uuid>,
    pub name: String,
    pub status: ActionStatus,
    /// Definition of done.
    pub dod: String,
    pub next_review_date: Option<NaiveDate>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInitiative {
    pub client_id: Uuid,
    pub meeting_id: Option<Uuid>,
    pub name: String,
    #[serde(default = "default_status")]
    pub status: ActionStatus,
    pub dod: String,
    pub next_review_date: Option<NaiveDate>,
}

fn default_status() -> ActionStatus {
    ActionStatus::NotStarted
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitiativePatch {
    pub name: Option<String>,
    pub status: Option<ActionStatus>,
    pub dod: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub next_review_date: Option<Option<NaiveDate>>,
}

impl Initiative {
    pub async fn create(new: NewInitiative, created_by: Uuid, pool: &PgPool) -> Result<Self> {
        if new.name.trim().is_empty() {
            return Err(VexumError::validation("name must not be empty"));
        }

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO initiatives (client_id, meeting_id, name, status, dod, next_review_date, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(new.client_id)
        .bind(new.meeting_id)
        .bind(new.name.trim())
        .bind(new.status)
        .bind(new.dod)
        .bind(new.next_review_date)
        .bind(created_by)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: Uuid,
        organization_id: Uuid,
        patch: InitiativePatch,
        pool: &PgPool,
    ) -> Result<Self> {
        let mut qb = sqlx::QueryBuilder::new("UPDATE initiatives SET updated_at = NOW()");

        if let Some(name) = patch.name {
            qb.push(", name = ");
            qb.push_bind(name);
        }
        if let Some(status) = patch.status {
            qb.push(", status = ");
            qb.push_bind(status);
        }
        if let Some(dod) = patch.dod {
            qb.push(", dod = ");
            qb.push_bind(dod);
        }
        if let Some(next_review_date) = patch.next_review_date {
            qb.push(", next_review_date = ");
            qb.push_bind(next_review_date);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" AND client_id IN (SELECT id FROM clients WHERE organization_id = ");
        qb.push_bind(organization_id);
        qb.push(") RETURNING *");

        qb.build_query_as::<Self>()
            .fetch_optional(pool)
            .await?
            .or_not_found("Initiative not found")
    }

    pub async fn list_for_client(client_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM initiatives WHERE client_id = $1 ORDER BY created_at",
        )
        .bind(client_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
