use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use vexum_core::{MeetingType, OrNotFound, Result};

/// The organization/team a meeting belongs to. Records hung off a meeting
/// inherit their scope from it.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct MeetingScope {
    #[sqlx(rename = "id")]
    pub meeting_id: Uuid,
    pub organization_id: Uuid,
    pub team_id: Option<Uuid>,
    pub meeting_type: MeetingType,
}

impl MeetingScope {
    /// Load a meeting's scope, treating meetings of other organizations as missing.
    pub async fn load<'e, E>(meeting_id: Uuid, organization_id: Uuid, executor: E) -> Result<Self>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, organization_id, team_id, meeting_type
            FROM meetings
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(meeting_id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?
        .or_not_found("Meeting not found")
    }
}

pub async fn ensure_meeting_in_org(
    meeting_id: Uuid,
    organization_id: Uuid,
    pool: &PgPool,
) -> Result<MeetingScope> {
    MeetingScope::load(meeting_id, organization_id, pool).await
}
