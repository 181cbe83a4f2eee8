use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{NextActionType, OrNotFound, Result, VexumError};

use crate::shared::nullable;

/// An early sales idea for a client, with the next step toward a proposal.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProposalSeed {
    pub id: Uuid,
    pub client_id: Uuid,
    pub meeting_id: Option<Uuid>,
    pub memo: String,
    pub next_action: Option<NextActionType>,
    pub action_id: Option<Uuid>,
    pub is_dormant: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProposalSeed {
    pub client_id: Uuid,
    pub meeting_id: Option<Uuid>,
    pub memo: String,
    pub next_action: Option<NextActionType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProposalSeedPatch {
    pub memo: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub next_action: Option<Option<NextActionType>>,
    #[serde(default, deserialize_with = "nullable")]
    pub action_id: Option<Option<Uuid>>,
    pub is_dormant: Option<bool>,
}

impl ProposalSeed {
    pub async fn create(new: NewProposalSeed, created_by: Uuid, pool: &PgPool) -> Result<Self> {
        if new.memo.trim().is_empty() {
            return Err(VexumError::validation("memo must not be empty"));
        }

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO proposal_seeds (client_id, meeting_id, memo, next_action, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new.client_id)
        .bind(new.meeting_id)
        .bind(new.memo.trim())
        .bind(new.next_action)
        .bind(created_by)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: Uuid,
        organization_id: Uuid,
        patch: ProposalSeedPatch,
        pool: &PgPool,
    ) -> Result<Self> {
        let mut qb = sqlx::QueryBuilder::new("UPDATE proposal_seeds SET updated_at = NOW()");

        if let Some(memo) = patch.memo {
            qb.push(", memo = ");
            qb.push_bind(memo);
        }
        if let Some(next_action) = patch.next_action {
            qb.push(", next_action = ");
            qb.push_bind(next_action);
        }
        if let Some(action_id) = patch.action_id {
            qb.push(", action_id = ");
            qb.push_bind(action_id);
        }
        if let Some(is_dormant) = patch.is_dormant {
            qb.push(", is_dormant = ");
            qb.push_bind(is_dormant);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" AND client_id IN (SELECT id FROM clients WHERE organization_id = ");
        qb.push_bind(organization_id);
        qb.push(") RETURNING *");

        qb.build_query_as::<Self>()
            .fetch_optional(pool)
            .await?
            .or_not_found("Proposal seed not found")
    }

    pub async fn list_active_for_client(client_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM proposal_seeds
            WHERE client_id = $1 AND NOT is_dormant
            ORDER BY created_at
            "#,
        )
        .bind(client_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
