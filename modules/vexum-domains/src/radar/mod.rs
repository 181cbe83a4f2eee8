//! Stagnation radar: surfaces actions and issues that have stopped moving.

pub mod rules;

pub use rules::{evaluate, StagnationItem};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{EntityType, ExceptionReason, RadarConfig, Result};

use crate::tracking::{Action, Issue};

/// Scan an organization (optionally one team) for stagnating items as of `now`.
///
/// Actions are in scope through their meeting: with a team, only that team's
/// meetings count. Issues are scoped by their own team column.
pub async fn scan(
    organization_id: Uuid,
    team_id: Option<Uuid>,
    config: &RadarConfig,
    now: DateTime<Utc>,
    pool: &PgPool,
) -> Result<Vec<StagnationItem>> {
    let (actions, issues) = tokio::try_join!(
        Action::list_open_in_scope(organization_id, team_id, pool),
        Issue::list_unresolved_in_scope(organization_id, team_id, pool),
    )?;

    let items = evaluate(&actions, &issues, now, config);
    tracing::debug!(
        organization_id = %organization_id,
        team_id = ?team_id,
        candidates = actions.len() + issues.len(),
        flagged = items.len(),
        "Radar scan complete"
    );
    Ok(items)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnoozeRequest {
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    /// `None` lifts the snooze.
    pub snooze_until: Option<NaiveDate>,
    pub exception_reason: Option<ExceptionReason>,
}

/// The row a snooze was applied to, serialized as the row itself.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SnoozedEntity {
    Action(Action),
    Issue(Issue),
}

pub async fn snooze(
    request: SnoozeRequest,
    organization_id: Uuid,
    pool: &PgPool,
) -> Result<SnoozedEntity> {
    let SnoozeRequest {
        entity_type,
        entity_id,
        snooze_until,
        exception_reason,
    } = request;

    let snoozed = match entity_type {
        EntityType::Action => SnoozedEntity::Action(
            Action::snooze(entity_id, organization_id, snooze_until, exception_reason, pool).await?,
        ),
        EntityType::Issue => SnoozedEntity::Issue(
            Issue::snooze(entity_id, organization_id, snooze_until, exception_reason, pool).await?,
        ),
    };

    tracing::info!(
        entity_type = %entity_type,
        entity_id = %entity_id,
        snooze_until = ?snooze_until,
        "Radar snooze updated"
    );
    Ok(snoozed)
}
