use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;
use vexum_domains::broadcasts::{
    self, Broadcast, BroadcastConsumption, BroadcastWithTargets, NewBroadcast, NewConsumption,
};
use vexum_domains::shared::ensure_meeting_in_org;
use vexum_domains::tracking::{Action, Issue};

use super::ensure_team;
use crate::auth::Session;
use crate::error::ApiResult;
use crate::routes::AppState;

#[derive(Deserialize)]
pub struct BroadcastsQuery {
    unconsumed_by_team: Option<Uuid>,
}

pub async fn list_broadcasts(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<BroadcastsQuery>,
) -> ApiResult<Json<Vec<BroadcastWithTargets>>> {
    let broadcasts =
        Broadcast::list(session.organization_id, query.unconsumed_by_team, state.pool()).await?;
    Ok(Json(broadcasts))
}

pub async fn create_broadcast(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<NewBroadcast>,
) -> ApiResult<(StatusCode, Json<Broadcast>)> {
    ensure_meeting_in_org(body.meeting_id, session.organization_id, state.pool()).await?;
    let broadcast =
        Broadcast::create(session.organization_id, body, session.user_id, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(broadcast)))
}

pub async fn consume_broadcast(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(body): Json<NewConsumption>,
) -> ApiResult<(StatusCode, Json<BroadcastConsumption>)> {
    let org = session.organization_id;
    let pool = state.pool();

    ensure_team(Some(body.team_id), org, pool).await?;
    if let Some(action_id) = body.action_id {
        Action::find_for_org(action_id, org, pool).await?;
    }
    if let Some(issue_id) = body.issue_id {
        Issue::find_for_org(issue_id, org, pool).await?;
    }

    let consumption = broadcasts::consume(id, body, org, pool).await?;
    Ok((StatusCode::CREATED, Json(consumption)))
}
