use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use vexum_core::{ActionStatus, ExceptionReason, OrNotFound, Result, VexumError};

use crate::shared::nullable;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Action {
    pub id: Uuid,
    pub meeting_id: Uuid,
    pub content: String,
    pub status: ActionStatus,
    pub assignee_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub completion_criteria: Option<String>,
    pub waiting_reason: Option<String>,
    pub is_tentative: bool,
    pub snooze_until: Option<NaiveDate>,
    pub exception_reason: Option<ExceptionReason>,
    pub last_updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ActionWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub action: Action,
    pub assignee_name: Option<String>,
    pub creator_name: Option<String>,
}

/// An action awaiting triage, with the meeting it came from.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TriageAction {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub action: Action,
    pub assignee_name: Option<String>,
    pub meeting_title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionFilters {
    pub meeting_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
    pub status: Option<ActionStatus>,
    pub tentative: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAction {
    pub meeting_id: Uuid,
    pub content: String,
    #[serde(default = "default_status")]
    pub status: ActionStatus,
    pub assignee_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub completion_criteria: Option<String>,
    pub waiting_reason: Option<String>,
    #[serde(default = "default_tentative")]
    pub is_tentative: bool,
}

fn default_status() -> ActionStatus {
    ActionStatus::NotStarted
}

fn default_tentative() -> bool {
    true
}

impl NewAction {
    /// The shape quick capture and issue conversion produce: tentative, not started,
    /// nobody assigned.
    pub fn tentative(meeting_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            meeting_id,
            content: content.into(),
            status: ActionStatus::NotStarted,
            assignee_id: None,
            due_date: None,
            completion_criteria: None,
            waiting_reason: None,
            is_tentative: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionPatch {
    pub content: Option<String>,
    pub status: Option<ActionStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub assignee_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub completion_criteria: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub waiting_reason: Option<Option<String>>,
    pub is_tentative: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub snooze_until: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub exception_reason: Option<Option<ExceptionReason>>,
}

/// One row of a triage batch. Every field is written, so omitted values clear
/// the column.
#[derive(Debug, Clone, Deserialize)]
pub struct TriageUpdate {
    pub id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_tentative: bool,
}

const IN_ORG: &str = "meeting_id IN (SELECT id FROM meetings WHERE organization_id = ";

const WITH_NAMES: &str = r#"
    SELECT a.*, u.name AS assignee_name, cu.name AS creator_name
    FROM actions a
    LEFT JOIN users u ON u.id = a.assignee_id
    LEFT JOIN users cu ON cu.id = a.created_by
"#;

impl Action {
    /// Insert an action. Generic over the executor so issue conversion can run
    /// it inside its transaction.
    pub async fn create<'e, E>(new: NewAction, created_by: Uuid, executor: E) -> Result<Self>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if new.content.trim().is_empty() {
            return Err(VexumError::validation("content must not be empty"));
        }

        let action = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO actions (
                meeting_id, content, status, assignee_id, due_date,
                completion_criteria, waiting_reason, is_tentative, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(new.meeting_id)
        .bind(new.content.trim())
        .bind(new.status)
        .bind(new.assignee_id)
        .bind(new.due_date)
        .bind(new.completion_criteria)
        .bind(new.waiting_reason)
        .bind(new.is_tentative)
        .bind(created_by)
        .fetch_one(executor)
        .await?;

        tracing::info!(action_id = %action.id, meeting_id = %action.meeting_id, "Action created");
        Ok(action)
    }

    pub async fn find_for_org(id: Uuid, organization_id: Uuid, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT * FROM actions WHERE id = $1 AND {IN_ORG}$2)"
        ))
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?
        .or_not_found("Action not found")
    }

    /// Apply a partial update. Every update counts as activity and bumps
    /// `last_updated_at`, which resets the stale/waiting clocks.
    pub async fn update(
        id: Uuid,
        organization_id: Uuid,
        patch: ActionPatch,
        pool: &PgPool,
    ) -> Result<Self> {
        let mut qb = sqlx::QueryBuilder::new(
            "UPDATE actions SET last_updated_at = NOW(), updated_at = NOW()",
        );

        if let Some(content) = patch.content {
            if content.trim().is_empty() {
                return Err(VexumError::validation("content must not be empty"));
            }
            qb.push(", content = ");
            qb.push_bind(content.trim().to_string());
        }
        if let Some(status) = patch.status {
            qb.push(", status = ");
            qb.push_bind(status);
        }
        if let Some(assignee_id) = patch.assignee_id {
            qb.push(", assignee_id = ");
            qb.push_bind(assignee_id);
        }
        if let Some(due_date) = patch.due_date {
            qb.push(", due_date = ");
            qb.push_bind(due_date);
        }
        if let Some(completion_criteria) = patch.completion_criteria {
            qb.push(", completion_criteria = ");
            qb.push_bind(completion_criteria);
        }
        if let Some(waiting_reason) = patch.waiting_reason {
            qb.push(", waiting_reason = ");
            qb.push_bind(waiting_reason);
        }
        if let Some(is_tentative) = patch.is_tentative {
            qb.push(", is_tentative = ");
            qb.push_bind(is_tentative);
        }
        if let Some(snooze_until) = patch.snooze_until {
            qb.push(", snooze_until = ");
            qb.push_bind(snooze_until);
        }
        if let Some(exception_reason) = patch.exception_reason {
            qb.push(", exception_reason = ");
            qb.push_bind(exception_reason);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" AND ");
        qb.push(IN_ORG);
        qb.push_bind(organization_id);
        qb.push(") RETURNING *");

        let action = qb
            .build_query_as::<Self>()
            .fetch_optional(pool)
            .await?
            .or_not_found("Action not found")?;

        tracing::info!(action_id = %action.id, status = %action.status, "Action updated");
        Ok(action)
    }

    /// Set or clear the radar snooze on an action.
    pub async fn snooze(
        id: Uuid,
        organization_id: Uuid,
        snooze_until: Option<NaiveDate>,
        exception_reason: Option<ExceptionReason>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(&format!(
            r#"
            UPDATE actions
            SET snooze_until = $1, exception_reason = $2,
                last_updated_at = NOW(), updated_at = NOW()
            WHERE id = $3 AND {IN_ORG}$4)
            RETURNING *
            "#
        ))
        .bind(snooze_until)
        .bind(exception_reason)
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?
        .or_not_found("Action not found")
    }

    /// Apply a triage batch atomically. An id outside the organization aborts
    /// the whole batch.
    pub async fn triage(
        updates: Vec<TriageUpdate>,
        organization_id: Uuid,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let mut tx = pool.begin().await?;
        let mut results = Vec::with_capacity(updates.len());

        for update in updates {
            let action = sqlx::query_as::<_, Self>(&format!(
                r#"
                UPDATE actions
                SET assignee_id = $1, due_date = $2, is_tentative = $3,
                    last_updated_at = NOW(), updated_at = NOW()
                WHERE id = $4 AND {IN_ORG}$5)
                RETURNING *
                "#
            ))
            .bind(update.assignee_id)
            .bind(update.due_date)
            .bind(update.is_tentative)
            .bind(update.id)
            .bind(organization_id)
            .fetch_optional(&mut *tx)
            .await?
            .or_not_found("Action not found")?;
            results.push(action);
        }

        tx.commit().await?;
        tracing::info!(count = results.len(), "Triage batch applied");
        Ok(results)
    }

    pub async fn list(
        organization_id: Uuid,
        filters: &ActionFilters,
        pool: &PgPool,
    ) -> Result<Vec<ActionWithNames>> {
        let mut qb = sqlx::QueryBuilder::new(WITH_NAMES);
        qb.push(" WHERE a.");
        qb.push(IN_ORG);
        qb.push_bind(organization_id);
        qb.push(") ");

        if let Some(meeting_id) = filters.meeting_id {
            qb.push("AND a.meeting_id = ");
            qb.push_bind(meeting_id);
            qb.push(" ");
        }
        if let Some(assignee_id) = filters.assignee_id {
            qb.push("AND a.assignee_id = ");
            qb.push_bind(assignee_id);
            qb.push(" ");
        }
        if let Some(status) = filters.status {
            qb.push("AND a.status = ");
            qb.push_bind(status);
            qb.push(" ");
        }
        if let Some(tentative) = filters.tentative {
            qb.push("AND a.is_tentative = ");
            qb.push_bind(tentative);
            qb.push(" ");
        }

        qb.push("ORDER BY a.due_date NULLS LAST, a.created_at");

        qb.build_query_as::<ActionWithNames>()
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Actions still needing triage: tentative, unassigned, or undated. The
    /// optional meeting filter narrows the whole disjunction.
    pub async fn list_triage(
        organization_id: Uuid,
        meeting_id: Option<Uuid>,
        pool: &PgPool,
    ) -> Result<Vec<TriageAction>> {
        sqlx::query_as::<_, TriageAction>(
            r#"
            SELECT a.*, u.name AS assignee_name, m.title AS meeting_title
            FROM actions a
            JOIN meetings m ON m.id = a.meeting_id
            LEFT JOIN users u ON u.id = a.assignee_id
            WHERE m.organization_id = $1
              AND (a.is_tentative OR a.assignee_id IS NULL OR a.due_date IS NULL)
              AND ($2::uuid IS NULL OR a.meeting_id = $2)
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(organization_id)
        .bind(meeting_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list_for_meeting(meeting_id: Uuid, pool: &PgPool) -> Result<Vec<ActionWithNames>> {
        sqlx::query_as::<_, ActionWithNames>(&format!(
            "{WITH_NAMES} WHERE a.meeting_id = $1 ORDER BY a.created_at"
        ))
        .bind(meeting_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Open actions (not completed or on hold) in an organization, optionally
    /// limited to one team's meetings. Oldest first.
    pub async fn list_open_in_scope(
        organization_id: Uuid,
        team_id: Option<Uuid>,
        pool: &PgPool,
    ) -> Result<Vec<ActionWithNames>> {
        sqlx::query_as::<_, ActionWithNames>(&format!(
            r#"
            {WITH_NAMES}
            JOIN meetings m ON m.id = a.meeting_id
            WHERE m.organization_id = $1
              AND ($2::uuid IS NULL OR m.team_id = $2)
              AND a.status NOT IN ('completed', 'on_hold')
            ORDER BY a.created_at, a.id
            "#
        ))
        .bind(organization_id)
        .bind(team_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
