use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use vexum_domains::dashboard::{DashboardQuery, DashboardStats};
use vexum_domains::radar::{self, SnoozeRequest, SnoozedEntity, StagnationItem};

use super::ensure_team;
use crate::auth::Session;
use crate::error::ApiResult;
use crate::routes::AppState;

#[derive(Deserialize)]
pub struct RadarQuery {
    team_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct DashboardParams {
    team_id: Option<Uuid>,
    days: Option<i64>,
}

pub async fn scan(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<RadarQuery>,
) -> ApiResult<Json<Vec<StagnationItem>>> {
    ensure_team(query.team_id, session.organization_id, state.pool()).await?;

    let items = radar::scan(
        session.organization_id,
        query.team_id,
        &state.deps.file_config.radar,
        Utc::now(),
        state.pool(),
    )
    .await?;
    Ok(Json(items))
}

pub async fn snooze(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SnoozeRequest>,
) -> ApiResult<Json<SnoozedEntity>> {
    Ok(Json(radar::snooze(body, session.organization_id, state.pool()).await?))
}

pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<DashboardParams>,
) -> ApiResult<Json<DashboardStats>> {
    ensure_team(params.team_id, session.organization_id, state.pool()).await?;

    let config = &state.deps.file_config;
    let query = DashboardQuery {
        organization_id: session.organization_id,
        team_id: params.team_id,
        window_days: params.days.unwrap_or(config.dashboard.window_days),
        postponed_threshold: config.radar.postponed_threshold,
    };
    Ok(Json(DashboardStats::compute(query, Utc::now(), state.pool()).await?))
}
