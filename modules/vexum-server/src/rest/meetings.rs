use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use uuid::Uuid;
use vexum_domains::access;
use vexum_domains::meetings::{
    AgendaItem, AgendaItemPatch, Link, Meeting, MeetingDetail, MeetingFilters, MeetingPatch,
    MeetingWithTeam, NewAgendaItem, NewLink, NewMeeting, NewParticipant, Participant,
};
use vexum_domains::shared::{ensure_meeting_in_org, MeetingScope};

use super::{ensure_team, ensure_user};
use crate::auth::Session;
use crate::error::ApiResult;
use crate::routes::AppState;

pub async fn list_meetings(
    State(state): State<AppState>,
    session: Session,
    Query(filters): Query<MeetingFilters>,
) -> ApiResult<Json<Vec<MeetingWithTeam>>> {
    let viewable = access::viewable_types(session.role);
    let meetings = Meeting::list(session.organization_id, &filters, &viewable, state.pool()).await?;
    Ok(Json(meetings))
}

pub async fn get_meeting(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MeetingDetail>> {
    let meeting = Meeting::find_for_org(id, session.organization_id, state.pool()).await?;
    session.ensure_can_view(meeting.meeting.meeting_type)?;

    let detail = MeetingDetail::load(
        meeting,
        &state.deps.file_config.radar,
        Utc::now(),
        state.pool(),
    )
    .await?;
    Ok(Json(detail))
}

pub async fn create_meeting(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<NewMeeting>,
) -> ApiResult<(StatusCode, Json<Meeting>)> {
    session.ensure_can_create(body.meeting_type)?;
    ensure_team(body.team_id, session.organization_id, state.pool()).await?;

    let meeting = Meeting::create(session.organization_id, body, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(meeting)))
}

pub async fn update_meeting(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(body): Json<MeetingPatch>,
) -> ApiResult<Json<Meeting>> {
    let scope = MeetingScope::load(id, session.organization_id, state.pool()).await?;
    session.ensure_can_manage(scope.meeting_type)?;

    Ok(Json(Meeting::update(id, session.organization_id, body, state.pool()).await?))
}

/// Add (or re-role) a participant and return the full participant list.
pub async fn add_participant(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(body): Json<NewParticipant>,
) -> ApiResult<Json<Vec<Participant>>> {
    let scope = MeetingScope::load(id, session.organization_id, state.pool()).await?;
    session.ensure_can_manage(scope.meeting_type)?;
    ensure_user(Some(body.user_id), session.organization_id, state.pool()).await?;

    Participant::upsert(scope.meeting_id, body, state.pool()).await?;
    Ok(Json(Participant::list_for_meeting(scope.meeting_id, state.pool()).await?))
}

// --- Agenda ---

pub async fn create_agenda_item(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<NewAgendaItem>,
) -> ApiResult<(StatusCode, Json<AgendaItem>)> {
    ensure_meeting_in_org(body.meeting_id, session.organization_id, state.pool()).await?;
    let item = AgendaItem::create(body, session.user_id, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_agenda_item(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(body): Json<AgendaItemPatch>,
) -> ApiResult<Json<AgendaItem>> {
    Ok(Json(AgendaItem::update(id, session.organization_id, body, state.pool()).await?))
}

pub async fn delete_agenda_item(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    AgendaItem::delete(id, session.organization_id, state.pool()).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Links ---

pub async fn create_link(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<NewLink>,
) -> ApiResult<(StatusCode, Json<Link>)> {
    ensure_meeting_in_org(body.meeting_id, session.organization_id, state.pool()).await?;
    let link = Link::create(body, session.user_id, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn delete_link(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    Link::delete(id, session.organization_id, state.pool()).await?;
    Ok(StatusCode::NO_CONTENT)
}
