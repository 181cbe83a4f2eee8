use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use vexum_core::{ExceptionReason, IssueState, OrNotFound, Result, VexumError};

use super::action::{Action, NewAction};
use crate::shared::{nullable, MeetingScope};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Issue {
    pub id: Uuid,
    pub meeting_id: Option<Uuid>,
    pub organization_id: Uuid,
    pub team_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub content: String,
    pub state: IssueState,
    pub owner_id: Option<Uuid>,
    pub times_postponed: i32,
    pub snooze_until: Option<NaiveDate>,
    pub exception_reason: Option<ExceptionReason>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub last_updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct IssueWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub issue: Issue,
    pub owner_name: Option<String>,
    pub team_name: Option<String>,
    pub client_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueFilters {
    pub team_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub state: Option<IssueState>,
    pub resolved: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewIssue {
    pub meeting_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub content: String,
    #[serde(default = "default_state")]
    pub state: IssueState,
    pub owner_id: Option<Uuid>,
}

fn default_state() -> IssueState {
    IssueState::PendingDecision
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuePatch {
    pub content: Option<String>,
    pub state: Option<IssueState>,
    #[serde(default, deserialize_with = "nullable")]
    pub owner_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub team_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub client_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    pub snooze_until: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub exception_reason: Option<Option<ExceptionReason>>,
    pub times_postponed: Option<i32>,
    /// `true` stamps `resolved_at`, `false` reopens.
    pub resolved: Option<bool>,
}

const WITH_NAMES: &str = r#"
    SELECT i.*, u.name AS owner_name, t.name AS team_name, cl.name AS client_name
    FROM issues i
    LEFT JOIN users u ON u.id = i.owner_id
    LEFT JOIN teams t ON t.id = i.team_id
    LEFT JOIN clients cl ON cl.id = i.client_id
"#;

impl Issue {
    pub async fn create<'e, E>(
        organization_id: Uuid,
        new: NewIssue,
        created_by: Uuid,
        executor: E,
    ) -> Result<Self>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if new.content.trim().is_empty() {
            return Err(VexumError::validation("content must not be empty"));
        }

        let issue = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO issues (meeting_id, organization_id, team_id, client_id, content, state, owner_id, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(new.meeting_id)
        .bind(organization_id)
        .bind(new.team_id)
        .bind(new.client_id)
        .bind(new.content.trim())
        .bind(new.state)
        .bind(new.owner_id)
        .bind(created_by)
        .fetch_one(executor)
        .await?;

        tracing::info!(issue_id = %issue.id, state = %issue.state, "Issue created");
        Ok(issue)
    }

    pub async fn find_for_org(id: Uuid, organization_id: Uuid, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM issues WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await?
            .or_not_found("Issue not found")
    }

    pub async fn update(
        id: Uuid,
        organization_id: Uuid,
        patch: IssuePatch,
        pool: &PgPool,
    ) -> Result<Self> {
        let mut qb = sqlx::QueryBuilder::new(
            "UPDATE issues SET last_updated_at = NOW(), updated_at = NOW()",
        );

        if let Some(content) = patch.content {
            if content.trim().is_empty() {
                return Err(VexumError::validation("content must not be empty"));
            }
            qb.push(", content = ");
            qb.push_bind(content.trim().to_string());
        }
        if let Some(state) = patch.state {
            qb.push(", state = ");
            qb.push_bind(state);
        }
        if let Some(owner_id) = patch.owner_id {
            qb.push(", owner_id = ");
            qb.push_bind(owner_id);
        }
        if let Some(team_id) = patch.team_id {
            qb.push(", team_id = ");
            qb.push_bind(team_id);
        }
        if let Some(client_id) = patch.client_id {
            qb.push(", client_id = ");
            qb.push_bind(client_id);
        }
        if let Some(snooze_until) = patch.snooze_until {
            qb.push(", snooze_until = ");
            qb.push_bind(snooze_until);
        }
        if let Some(exception_reason) = patch.exception_reason {
            qb.push(", exception_reason = ");
            qb.push_bind(exception_reason);
        }
        if let Some(times_postponed) = patch.times_postponed {
            if times_postponed < 0 {
                return Err(VexumError::validation("times_postponed must not be negative"));
            }
            qb.push(", times_postponed = ");
            qb.push_bind(times_postponed);
        }
        match patch.resolved {
            Some(true) => {
                qb.push(", resolved_at = COALESCE(resolved_at, NOW())");
            }
            Some(false) => {
                qb.push(", resolved_at = NULL");
            }
            None => {}
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" AND organization_id = ");
        qb.push_bind(organization_id);
        qb.push(" RETURNING *");

        let issue = qb
            .build_query_as::<Self>()
            .fetch_optional(pool)
            .await?
            .or_not_found("Issue not found")?;

        tracing::info!(issue_id = %issue.id, resolved = issue.is_resolved(), "Issue updated");
        Ok(issue)
    }

    /// Carry an issue over to the next meeting once more.
    pub async fn postpone(id: Uuid, organization_id: Uuid, pool: &PgPool) -> Result<Self> {
        let issue = sqlx::query_as::<_, Self>(
            r#"
            UPDATE issues
            SET times_postponed = times_postponed + 1,
                last_updated_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND organization_id = $2 AND resolved_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?
        .or_not_found("Issue not found")?;

        tracing::info!(issue_id = %issue.id, times_postponed = issue.times_postponed, "Issue postponed");
        Ok(issue)
    }

    pub async fn snooze(
        id: Uuid,
        organization_id: Uuid,
        snooze_until: Option<NaiveDate>,
        exception_reason: Option<ExceptionReason>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE issues
            SET snooze_until = $1, exception_reason = $2,
                last_updated_at = NOW(), updated_at = NOW()
            WHERE id = $3 AND organization_id = $4
            RETURNING *
            "#,
        )
        .bind(snooze_until)
        .bind(exception_reason)
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?
        .or_not_found("Issue not found")
    }

    /// Turn an issue into a tentative action on the given meeting and resolve
    /// the issue, in one transaction.
    pub async fn convert_to_action(
        id: Uuid,
        meeting_id: Uuid,
        organization_id: Uuid,
        created_by: Uuid,
        pool: &PgPool,
    ) -> Result<Action> {
        let mut tx = pool.begin().await?;

        let issue = sqlx::query_as::<_, Self>(
            "SELECT * FROM issues WHERE id = $1 AND organization_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(&mut *tx)
        .await?
        .or_not_found("Issue not found")?;

        MeetingScope::load(meeting_id, organization_id, &mut *tx).await?;

        let action = Action::create(
            NewAction::tentative(meeting_id, issue.content.clone()),
            created_by,
            &mut *tx,
        )
        .await?;

        sqlx::query(
            r#"
            UPDATE issues
            SET resolved_at = COALESCE(resolved_at, NOW()),
                last_updated_at = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(issue.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(issue_id = %issue.id, action_id = %action.id, "Issue converted to action");
        Ok(action)
    }

    pub async fn list(
        organization_id: Uuid,
        filters: &IssueFilters,
        pool: &PgPool,
    ) -> Result<Vec<IssueWithNames>> {
        let mut qb = sqlx::QueryBuilder::new(WITH_NAMES);
        qb.push(" WHERE i.organization_id = ");
        qb.push_bind(organization_id);
        qb.push(" ");

        if let Some(team_id) = filters.team_id {
            qb.push("AND i.team_id = ");
            qb.push_bind(team_id);
            qb.push(" ");
        }
        if let Some(client_id) = filters.client_id {
            qb.push("AND i.client_id = ");
            qb.push_bind(client_id);
            qb.push(" ");
        }
        if let Some(state) = filters.state {
            qb.push("AND i.state = ");
            qb.push_bind(state);
            qb.push(" ");
        }
        match filters.resolved {
            Some(true) => {
                qb.push("AND i.resolved_at IS NOT NULL ");
            }
            Some(false) => {
                qb.push("AND i.resolved_at IS NULL ");
            }
            None => {}
        }

        qb.push("ORDER BY i.times_postponed DESC, i.created_at DESC");

        qb.build_query_as::<IssueWithNames>()
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn list_for_meeting(meeting_id: Uuid, pool: &PgPool) -> Result<Vec<IssueWithNames>> {
        sqlx::query_as::<_, IssueWithNames>(&format!(
            "{WITH_NAMES} WHERE i.meeting_id = $1 ORDER BY i.created_at"
        ))
        .bind(meeting_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Unresolved issues not owned by any team, for the headquarters board.
    pub async fn list_cross_team(organization_id: Uuid, pool: &PgPool) -> Result<Vec<IssueWithNames>> {
        sqlx::query_as::<_, IssueWithNames>(&format!(
            r#"
            {WITH_NAMES}
            WHERE i.organization_id = $1 AND i.team_id IS NULL AND i.resolved_at IS NULL
            ORDER BY i.times_postponed DESC, i.created_at
            "#
        ))
        .bind(organization_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Unresolved issues in an organization, optionally limited to one team.
    pub async fn list_unresolved_in_scope(
        organization_id: Uuid,
        team_id: Option<Uuid>,
        pool: &PgPool,
    ) -> Result<Vec<IssueWithNames>> {
        sqlx::query_as::<_, IssueWithNames>(&format!(
            r#"
            {WITH_NAMES}
            WHERE i.organization_id = $1
              AND ($2::uuid IS NULL OR i.team_id = $2)
              AND i.resolved_at IS NULL
            ORDER BY i.created_at, i.id
            "#
        ))
        .bind(organization_id)
        .bind(team_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
