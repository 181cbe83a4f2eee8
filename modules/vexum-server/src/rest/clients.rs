use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_domains::clients::{
    Client, ClientFilters, ClientPatch, ClientWeeklySummary, Initiative, InitiativePatch,
    NewClient, NewInitiative, NewProposalSeed, ProposalSeed, ProposalSeedPatch, SummarySubmission,
};
use vexum_domains::shared::ensure_meeting_in_org;
use vexum_domains::tracking::Action;

use super::ensure_team;
use crate::auth::Session;
use crate::error::ApiResult;
use crate::routes::AppState;

async fn ensure_optional_meeting(meeting_id: Option<Uuid>, org: Uuid, pool: &PgPool) -> ApiResult<()> {
    if let Some(id) = meeting_id {
        ensure_meeting_in_org(id, org, pool).await?;
    }
    Ok(())
}

pub async fn list_clients(
    State(state): State<AppState>,
    session: Session,
    Query(filters): Query<ClientFilters>,
) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(Client::list(session.organization_id, &filters, state.pool()).await?))
}

pub async fn create_client(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<NewClient>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    ensure_team(Some(body.team_id), session.organization_id, state.pool()).await?;
    let client = Client::create(session.organization_id, body, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn update_client(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(body): Json<ClientPatch>,
) -> ApiResult<Json<Client>> {
    Ok(Json(Client::update(id, session.organization_id, body, state.pool()).await?))
}

// --- Initiatives ---

pub async fn create_initiative(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<NewInitiative>,
) -> ApiResult<(StatusCode, Json<Initiative>)> {
    Client::find_for_org(body.client_id, session.organization_id, state.pool()).await?;
    ensure_optional_meeting(body.meeting_id, session.organization_id, state.pool()).await?;

    let initiative = Initiative::create(body, session.user_id, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(initiative)))
}

pub async fn update_initiative(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(body): Json<InitiativePatch>,
) -> ApiResult<Json<Initiative>> {
    Ok(Json(Initiative::update(id, session.organization_id, body, state.pool()).await?))
}

// --- Weekly summaries ---

pub async fn submit_summary(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SummarySubmission>,
) -> ApiResult<Json<ClientWeeklySummary>> {
    Client::find_for_org(body.client_id, session.organization_id, state.pool()).await?;
    ensure_meeting_in_org(body.meeting_id, session.organization_id, state.pool()).await?;
    Ok(Json(ClientWeeklySummary::upsert(body, state.pool()).await?))
}

// --- Proposal seeds ---

pub async fn create_proposal_seed(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<NewProposalSeed>,
) -> ApiResult<(StatusCode, Json<ProposalSeed>)> {
    Client::find_for_org(body.client_id, session.organization_id, state.pool()).await?;
    ensure_optional_meeting(body.meeting_id, session.organization_id, state.pool()).await?;

    let seed = ProposalSeed::create(body, session.user_id, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(seed)))
}

pub async fn update_proposal_seed(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(body): Json<ProposalSeedPatch>,
) -> ApiResult<Json<ProposalSeed>> {
    if let Some(Some(action_id)) = body.action_id {
        Action::find_for_org(action_id, session.organization_id, state.pool()).await?;
    }
    Ok(Json(ProposalSeed::update(id, session.organization_id, body, state.pool()).await?))
}
