use axum::{extract::State, http::StatusCode, response::Json};
use vexum_domains::shared::ensure_meeting_in_org;
use vexum_domains::strategy::{
    NewAllocation, NewNotDoing, NewRuleUpdate, PrioritySubmission, RuleUpdate, StrategyAllocation,
    StrategyNotDoing, StrategyPriority,
};

use crate::auth::Session;
use crate::error::ApiResult;
use crate::routes::AppState;

/// Upsert keyed on (meeting, rank).
pub async fn upsert_priority(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<PrioritySubmission>,
) -> ApiResult<Json<StrategyPriority>> {
    ensure_meeting_in_org(body.meeting_id, session.organization_id, state.pool()).await?;
    Ok(Json(StrategyPriority::upsert(body, state.pool()).await?))
}

pub async fn create_not_doing(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<NewNotDoing>,
) -> ApiResult<(StatusCode, Json<StrategyNotDoing>)> {
    ensure_meeting_in_org(body.meeting_id, session.organization_id, state.pool()).await?;
    let item = StrategyNotDoing::create(body, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn create_allocation(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<NewAllocation>,
) -> ApiResult<(StatusCode, Json<StrategyAllocation>)> {
    ensure_meeting_in_org(body.meeting_id, session.organization_id, state.pool()).await?;
    let item = StrategyAllocation::create(body, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn create_rule_update(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<NewRuleUpdate>,
) -> ApiResult<(StatusCode, Json<RuleUpdate>)> {
    ensure_meeting_in_org(body.meeting_id, session.organization_id, state.pool()).await?;
    let item = RuleUpdate::create(body, session.user_id, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(item)))
}
