//! Broadcast consumption tracking. A broadcast is pending for a team when the
//! team is a target and no consumption row exists for the pair.

pub mod models;

pub use models::broadcast::{Broadcast, BroadcastWithCreator, BroadcastWithTargets, NewBroadcast};
pub use models::consumption::{BroadcastConsumption, NewConsumption};

use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::Result;

use crate::shared::MeetingScope;

/// Record that a team handled a broadcast in one of its meetings.
pub async fn consume(
    broadcast_id: Uuid,
    new: NewConsumption,
    organization_id: Uuid,
    pool: &PgPool,
) -> Result<BroadcastConsumption> {
    let broadcast = Broadcast::find_for_org(broadcast_id, organization_id, pool).await?;
    MeetingScope::load(new.meeting_id, organization_id, pool).await?;
    BroadcastConsumption::record(broadcast.id, new, pool).await
}
