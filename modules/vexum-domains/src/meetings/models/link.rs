use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{Result, VexumError};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Link {
    pub id: Uuid,
    pub meeting_id: Uuid,
    pub url: String,
    pub title: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLink {
    pub meeting_id: Uuid,
    pub url: String,
    pub title: Option<String>,
}

impl Link {
    pub async fn create(new: NewLink, created_by: Uuid, pool: &PgPool) -> Result<Self> {
        let url = new.url.trim();
        if url.is_empty() {
            return Err(VexumError::validation("url must not be empty"));
        }

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO links (meeting_id, url, title, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(new.meeting_id)
        .bind(url)
        .bind(new.title.filter(|t| !t.trim().is_empty()))
        .bind(created_by)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: Uuid, organization_id: Uuid, pool: &PgPool) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM links
            WHERE id = $1 AND meeting_id IN (SELECT id FROM meetings WHERE organization_id = $2)
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(VexumError::NotFound("Link not found"));
        }
        Ok(())
    }

    pub async fn list_for_meeting(meeting_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM links WHERE meeting_id = $1 ORDER BY created_at")
            .bind(meeting_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}
