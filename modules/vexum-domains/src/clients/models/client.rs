use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{ClientStatus, OrNotFound, Result, VexumError};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilters {
    pub team_id: Option<Uuid>,
    pub status: Option<ClientStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewClient {
    pub team_id: Uuid,
    pub name: String,
    #[serde(default = "default_status")]
    pub status: ClientStatus,
}

fn default_status() -> ClientStatus {
    ClientStatus::Focus
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub status: Option<ClientStatus>,
}

impl Client {
    /// Caller has already checked the team belongs to the organization.
    pub async fn create(organization_id: Uuid, new: NewClient, pool: &PgPool) -> Result<Self> {
        if new.name.trim().is_empty() {
            return Err(VexumError::validation("name must not be empty"));
        }

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO clients (organization_id, team_id, name, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(new.team_id)
        .bind(new.name.trim())
        .bind(new.status)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_org(id: Uuid, organization_id: Uuid, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM clients WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await?
            .or_not_found("Client not found")
    }

    pub async fn update(
        id: Uuid,
        organization_id: Uuid,
        patch: ClientPatch,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE clients
            SET name = COALESCE($1, name), status = COALESCE($2, status), updated_at = NOW()
            WHERE id = $3 AND organization_id = $4
            RETURNING *
            "#,
        )
        .bind(patch.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()))
        .bind(patch.status)
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?
        .or_not_found("Client not found")
    }

    pub async fn list(
        organization_id: Uuid,
        filters: &ClientFilters,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM clients
            WHERE organization_id = $1
              AND ($2::uuid IS NULL OR team_id = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY name
            "#,
        )
        .bind(organization_id)
        .bind(filters.team_id)
        .bind(filters.status)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// A team's clients in board order: focus first, then all, then dormant.
    pub async fn list_for_team(team_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM clients
            WHERE team_id = $1
            ORDER BY CASE status WHEN 'focus' THEN 0 WHEN 'all' THEN 1 ELSE 2 END, name
            "#,
        )
        .bind(team_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
