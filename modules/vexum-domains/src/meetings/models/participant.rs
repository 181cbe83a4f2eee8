use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{Result, UserRole};

/// A user attending a meeting, with the role they hold in that meeting.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Participant {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub meeting_role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewParticipant {
    pub user_id: Uuid,
    #[serde(default = "default_meeting_role")]
    pub role: String,
}

fn default_meeting_role() -> String {
    "participant".to_string()
}

impl Participant {
    /// Add a user to a meeting, or change the role of an existing participant.
    pub async fn upsert(meeting_id: Uuid, new: NewParticipant, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO meeting_participants (meeting_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (meeting_id, user_id) DO UPDATE SET role = EXCLUDED.role
            "#,
        )
        .bind(meeting_id)
        .bind(new.user_id)
        .bind(new.role)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn list_for_meeting(meeting_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT u.id, u.organization_id, u.email, u.name, u.role, mp.role AS meeting_role
            FROM meeting_participants mp
            JOIN users u ON u.id = mp.user_id
            WHERE mp.meeting_id = $1
            ORDER BY u.name
            "#,
        )
        .bind(meeting_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
