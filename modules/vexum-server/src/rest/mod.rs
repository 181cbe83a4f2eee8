pub mod auth;
pub mod broadcasts;
pub mod capture;
pub mod clients;
pub mod directory;
pub mod meetings;
pub mod radar;
pub mod strategy;
pub mod tracking;

use sqlx::PgPool;
use uuid::Uuid;
use vexum_domains::organizations::{Team, User};

use crate::error::ApiResult;

// --- Scope helpers ---
//
// Foreign keys named in a request body must point inside the caller's
// organization; a miss answers 404 like any other out-of-scope lookup.

pub(crate) async fn ensure_user(user_id: Option<Uuid>, organization_id: Uuid, pool: &PgPool) -> ApiResult<()> {
    if let Some(id) = user_id {
        User::find_for_org(id, organization_id, pool).await?;
    }
    Ok(())
}

pub(crate) async fn ensure_team(team_id: Option<Uuid>, organization_id: Uuid, pool: &PgPool) -> ApiResult<()> {
    if let Some(id) = team_id {
        Team::find_for_org(id, organization_id, pool).await?;
    }
    Ok(())
}
