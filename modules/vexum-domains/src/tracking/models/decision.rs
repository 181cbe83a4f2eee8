use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{OrNotFound, Result, VexumError};

use crate::shared::nullable;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Decision {
    pub id: Uuid,
    pub meeting_id: Uuid,
    pub content: String,
    pub related_link: Option<String>,
    pub is_confirmed: bool,
    pub created_by: Uuid,
    pub confirmed_by: Option<Uuid>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DecisionWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub decision: Decision,
    pub creator_name: Option<String>,
    pub confirmer_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDecision {
    pub meeting_id: Uuid,
    pub content: String,
    pub related_link: Option<String>,
    #[serde(default)]
    pub is_confirmed: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecisionPatch {
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub related_link: Option<Option<String>>,
    pub is_confirmed: Option<bool>,
}

const WITH_NAMES: &str = r#"
    SELECT d.*, u.name AS creator_name, cu.name AS confirmer_name
    FROM decisions d
    LEFT JOIN users u ON u.id = d.created_by
    LEFT JOIN users cu ON cu.id = d.confirmed_by
"#;

impl Decision {
    /// A decision created already confirmed is confirmed by its creator.
    pub async fn create(new: NewDecision, created_by: Uuid, pool: &PgPool) -> Result<Self> {
        if new.content.trim().is_empty() {
            return Err(VexumError::validation("content must not be empty"));
        }

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO decisions (meeting_id, content, related_link, is_confirmed, created_by, confirmed_by, confirmed_at)
            VALUES ($1, $2, $3, $4, $5,
                    CASE WHEN $4 THEN $5 END,
                    CASE WHEN $4 THEN NOW() END)
            RETURNING *
            "#,
        )
        .bind(new.meeting_id)
        .bind(new.content.trim())
        .bind(new.related_link)
        .bind(new.is_confirmed)
        .bind(created_by)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Confirming records the caller as confirmer; unconfirming clears both
    /// confirmer and timestamp.
    pub async fn update(
        id: Uuid,
        organization_id: Uuid,
        patch: DecisionPatch,
        actor_id: Uuid,
        pool: &PgPool,
    ) -> Result<Self> {
        let mut qb = sqlx::QueryBuilder::new("UPDATE decisions SET updated_at = NOW()");

        if let Some(content) = patch.content {
            if content.trim().is_empty() {
                return Err(VexumError::validation("content must not be empty"));
            }
            qb.push(", content = ");
            qb.push_bind(content.trim().to_string());
        }
        if let Some(related_link) = patch.related_link {
            qb.push(", related_link = ");
            qb.push_bind(related_link);
        }
        match patch.is_confirmed {
            Some(true) => {
                qb.push(", is_confirmed = TRUE, confirmed_at = NOW(), confirmed_by = ");
                qb.push_bind(actor_id);
            }
            Some(false) => {
                qb.push(", is_confirmed = FALSE, confirmed_at = NULL, confirmed_by = NULL");
            }
            None => {}
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" AND meeting_id IN (SELECT id FROM meetings WHERE organization_id = ");
        qb.push_bind(organization_id);
        qb.push(") RETURNING *");

        qb.build_query_as::<Self>()
            .fetch_optional(pool)
            .await?
            .or_not_found("Decision not found")
    }

    pub async fn list_for_meeting(meeting_id: Uuid, pool: &PgPool) -> Result<Vec<DecisionWithNames>> {
        sqlx::query_as::<_, DecisionWithNames>(&format!(
            "{WITH_NAMES} WHERE d.meeting_id = $1 ORDER BY d.created_at"
        ))
        .bind(meeting_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
