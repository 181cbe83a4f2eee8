use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{MeetingStatus, MeetingType, OrNotFound, Result, VexumError};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Meeting {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub team_id: Option<Uuid>,
    pub meeting_type: MeetingType,
    pub title: String,
    pub slug: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: MeetingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Meeting joined with its team name, as listed and as the head of the detail view.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MeetingWithTeam {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meeting: Meeting,
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeetingFilters {
    #[serde(rename = "type")]
    pub meeting_type: Option<MeetingType>,
    pub team_id: Option<Uuid>,
    pub status: Option<MeetingStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMeeting {
    pub meeting_type: MeetingType,
    pub team_id: Option<Uuid>,
    pub title: String,
    pub slug: Option<String>,
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeetingPatch {
    pub title: Option<String>,
    pub status: Option<MeetingStatus>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Meeting {
    pub async fn create(
        organization_id: Uuid,
        new: NewMeeting,
        pool: &PgPool,
    ) -> Result<Self> {
        if new.title.trim().is_empty() {
            return Err(VexumError::validation("title must not be empty"));
        }

        let meeting = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO meetings (organization_id, team_id, meeting_type, title, slug, scheduled_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(new.team_id)
        .bind(new.meeting_type)
        .bind(new.title.trim())
        .bind(new.slug)
        .bind(new.scheduled_at)
        .fetch_one(pool)
        .await?;

        tracing::info!(
            meeting_id = %meeting.id,
            meeting_type = %meeting.meeting_type,
            "Meeting created"
        );
        Ok(meeting)
    }

    pub async fn find_for_org(id: Uuid, organization_id: Uuid, pool: &PgPool) -> Result<MeetingWithTeam> {
        sqlx::query_as::<_, MeetingWithTeam>(
            r#"
            SELECT m.*, t.name AS team_name
            FROM meetings m
            LEFT JOIN teams t ON t.id = m.team_id
            WHERE m.id = $1 AND m.organization_id = $2
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?
        .or_not_found("Meeting not found")
    }

    /// List meetings of the organization, newest first, restricted to the
    /// meeting types the caller may view.
    pub async fn list(
        organization_id: Uuid,
        filters: &MeetingFilters,
        viewable: &[MeetingType],
        pool: &PgPool,
    ) -> Result<Vec<MeetingWithTeam>> {
        let viewable: Vec<&'static str> = viewable.iter().map(MeetingType::as_str).collect();

        let mut qb = sqlx::QueryBuilder::new(
            r#"
            SELECT m.*, t.name AS team_name
            FROM meetings m
            LEFT JOIN teams t ON t.id = m.team_id
            WHERE m.organization_id = "#,
        );
        qb.push_bind(organization_id);
        qb.push(" AND m.meeting_type = ANY(");
        qb.push_bind(viewable);
        qb.push(") ");

        if let Some(meeting_type) = filters.meeting_type {
            qb.push("AND m.meeting_type = ");
            qb.push_bind(meeting_type);
            qb.push(" ");
        }

        if let Some(team_id) = filters.team_id {
            qb.push("AND m.team_id = ");
            qb.push_bind(team_id);
            qb.push(" ");
        }

        if let Some(status) = filters.status {
            qb.push("AND m.status = ");
            qb.push_bind(status);
            qb.push(" ");
        }

        qb.push("ORDER BY m.scheduled_at DESC");

        qb.build_query_as::<MeetingWithTeam>()
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Apply a partial update. Moving to `active` stamps `started_at`, moving to
    /// `completed` stamps `ended_at`; any status may follow any other.
    pub async fn update(
        id: Uuid,
        organization_id: Uuid,
        patch: MeetingPatch,
        pool: &PgPool,
    ) -> Result<Self> {
        let mut qb = sqlx::QueryBuilder::new("UPDATE meetings SET updated_at = NOW()");

        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(VexumError::validation("title must not be empty"));
            }
            qb.push(", title = ");
            qb.push_bind(title.trim().to_string());
        }

        if let Some(scheduled_at) = patch.scheduled_at {
            qb.push(", scheduled_at = ");
            qb.push_bind(scheduled_at);
        }

        if let Some(status) = patch.status {
            qb.push(", status = ");
            qb.push_bind(status);
            match status {
                MeetingStatus::Active => {
                    qb.push(", started_at = NOW()");
                }
                MeetingStatus::Completed => {
                    qb.push(", ended_at = NOW()");
                }
                MeetingStatus::Scheduled => {}
            }
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" AND organization_id = ");
        qb.push_bind(organization_id);
        qb.push(" RETURNING *");

        let meeting = qb
            .build_query_as::<Self>()
            .fetch_optional(pool)
            .await?
            .or_not_found("Meeting not found")?;

        tracing::info!(meeting_id = %meeting.id, status = %meeting.status, "Meeting updated");
        Ok(meeting)
    }
}
