use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;
use vexum_domains::clients::Client;
use vexum_domains::shared::ensure_meeting_in_org;
use vexum_domains::tracking::{
    Action, ActionFilters, ActionPatch, ActionWithNames, CheckIn, CheckInSubmission, Decision,
    DecisionPatch, DecisionWithNames, Issue, IssueFilters, IssuePatch, IssueWithNames, NewAction,
    NewDecision, NewIssue, TriageAction, TriageUpdate,
};

use super::{ensure_team, ensure_user};
use crate::auth::Session;
use crate::error::ApiResult;
use crate::routes::AppState;

#[derive(Deserialize)]
pub struct MeetingQuery {
    meeting_id: Uuid,
}

#[derive(Deserialize)]
pub struct TriageQuery {
    meeting_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct TriageRequest {
    actions: Vec<TriageUpdate>,
}

#[derive(Deserialize)]
pub struct ConvertRequest {
    meeting_id: Uuid,
}

// --- Decisions ---

pub async fn list_decisions(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MeetingQuery>,
) -> ApiResult<Json<Vec<DecisionWithNames>>> {
    let scope = ensure_meeting_in_org(query.meeting_id, session.organization_id, state.pool()).await?;
    Ok(Json(Decision::list_for_meeting(scope.meeting_id, state.pool()).await?))
}

pub async fn create_decision(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<NewDecision>,
) -> ApiResult<(StatusCode, Json<Decision>)> {
    ensure_meeting_in_org(body.meeting_id, session.organization_id, state.pool()).await?;
    let decision = Decision::create(body, session.user_id, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(decision)))
}

pub async fn update_decision(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(body): Json<DecisionPatch>,
) -> ApiResult<Json<Decision>> {
    let decision =
        Decision::update(id, session.organization_id, body, session.user_id, state.pool()).await?;
    Ok(Json(decision))
}

// --- Actions ---

pub async fn list_actions(
    State(state): State<AppState>,
    session: Session,
    Query(filters): Query<ActionFilters>,
) -> ApiResult<Json<Vec<ActionWithNames>>> {
    Ok(Json(Action::list(session.organization_id, &filters, state.pool()).await?))
}

pub async fn create_action(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<NewAction>,
) -> ApiResult<(StatusCode, Json<Action>)> {
    ensure_meeting_in_org(body.meeting_id, session.organization_id, state.pool()).await?;
    ensure_user(body.assignee_id, session.organization_id, state.pool()).await?;

    let action = Action::create(body, session.user_id, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(action)))
}

pub async fn update_action(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(body): Json<ActionPatch>,
) -> ApiResult<Json<Action>> {
    ensure_user(body.assignee_id.flatten(), session.organization_id, state.pool()).await?;
    Ok(Json(Action::update(id, session.organization_id, body, state.pool()).await?))
}

pub async fn triage_actions(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<TriageRequest>,
) -> ApiResult<Json<Vec<Action>>> {
    for update in &body.actions {
        ensure_user(update.assignee_id, session.organization_id, state.pool()).await?;
    }
    Ok(Json(Action::triage(body.actions, session.organization_id, state.pool()).await?))
}

pub async fn list_triage(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<TriageQuery>,
) -> ApiResult<Json<Vec<TriageAction>>> {
    let actions = Action::list_triage(session.organization_id, query.meeting_id, state.pool()).await?;
    Ok(Json(actions))
}

// --- Issues ---

pub async fn list_issues(
    State(state): State<AppState>,
    session: Session,
    Query(filters): Query<IssueFilters>,
) -> ApiResult<Json<Vec<IssueWithNames>>> {
    Ok(Json(Issue::list(session.organization_id, &filters, state.pool()).await?))
}

pub async fn create_issue(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<NewIssue>,
) -> ApiResult<(StatusCode, Json<Issue>)> {
    let org = session.organization_id;
    let pool = state.pool();

    if let Some(meeting_id) = body.meeting_id {
        ensure_meeting_in_org(meeting_id, org, pool).await?;
    }
    if let Some(client_id) = body.client_id {
        Client::find_for_org(client_id, org, pool).await?;
    }
    ensure_team(body.team_id, org, pool).await?;
    ensure_user(body.owner_id, org, pool).await?;

    let issue = Issue::create(org, body, session.user_id, pool).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

pub async fn update_issue(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(body): Json<IssuePatch>,
) -> ApiResult<Json<Issue>> {
    let org = session.organization_id;
    let pool = state.pool();

    if let Some(Some(client_id)) = body.client_id {
        Client::find_for_org(client_id, org, pool).await?;
    }
    ensure_team(body.team_id.flatten(), org, pool).await?;
    ensure_user(body.owner_id.flatten(), org, pool).await?;

    Ok(Json(Issue::update(id, org, body, pool).await?))
}

pub async fn postpone_issue(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Issue>> {
    Ok(Json(Issue::postpone(id, session.organization_id, state.pool()).await?))
}

pub async fn convert_issue(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(body): Json<ConvertRequest>,
) -> ApiResult<(StatusCode, Json<Action>)> {
    let action = Issue::convert_to_action(
        id,
        body.meeting_id,
        session.organization_id,
        session.user_id,
        state.pool(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(action)))
}

// --- Check-ins ---

pub async fn submit_check_in(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CheckInSubmission>,
) -> ApiResult<Json<CheckIn>> {
    ensure_meeting_in_org(body.meeting_id, session.organization_id, state.pool()).await?;
    Ok(Json(CheckIn::upsert(body, session.user_id, state.pool()).await?))
}
