use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{IssueState, Result, VexumError};

pub const MAX_CONFIDENCE: i32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CheckIn {
    pub id: Uuid,
    pub meeting_id: Uuid,
    pub user_id: Uuid,
    pub confidence_score: i32,
    pub uncertainty_factor: Option<IssueState>,
    pub needs_help: bool,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CheckInWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub check_in: CheckIn,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckInSubmission {
    pub meeting_id: Uuid,
    pub confidence_score: i32,
    pub uncertainty_factor: Option<IssueState>,
    #[serde(default)]
    pub needs_help: bool,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl CheckInSubmission {
    pub fn validate(&self) -> Result<()> {
        if !(0..=MAX_CONFIDENCE).contains(&self.confidence_score) {
            return Err(VexumError::validation(format!(
                "confidence_score must be between 0 and {MAX_CONFIDENCE}"
            )));
        }
        Ok(())
    }
}

impl CheckIn {
    /// One check-in per (meeting, user). A second submission overwrites every
    /// field of the first; concurrent submissions resolve last-write-wins.
    pub async fn upsert(
        submission: CheckInSubmission,
        user_id: Uuid,
        pool: &PgPool,
    ) -> Result<Self> {
        submission.validate()?;

        let check_in = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO check_ins (meeting_id, user_id, confidence_score, uncertainty_factor, needs_help, is_anonymous)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (meeting_id, user_id) DO UPDATE SET
                confidence_score = EXCLUDED.confidence_score,
                uncertainty_factor = EXCLUDED.uncertainty_factor,
                needs_help = EXCLUDED.needs_help,
                is_anonymous = EXCLUDED.is_anonymous,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(submission.meeting_id)
        .bind(user_id)
        .bind(submission.confidence_score)
        .bind(submission.uncertainty_factor)
        .bind(submission.needs_help)
        .bind(submission.is_anonymous)
        .fetch_one(pool)
        .await?;

        tracing::info!(
            meeting_id = %check_in.meeting_id,
            confidence_score = check_in.confidence_score,
            "Check-in recorded"
        );
        Ok(check_in)
    }

    /// Anonymous check-ins come back without the user's name.
    pub async fn list_for_meeting(meeting_id: Uuid, pool: &PgPool) -> Result<Vec<CheckInWithUser>> {
        sqlx::query_as::<_, CheckInWithUser>(
            r#"
            SELECT ci.*, CASE WHEN ci.is_anonymous THEN NULL ELSE u.name END AS user_name
            FROM check_ins ci
            LEFT JOIN users u ON u.id = ci.user_id
            WHERE ci.meeting_id = $1
            ORDER BY ci.created_at
            "#,
        )
        .bind(meeting_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
