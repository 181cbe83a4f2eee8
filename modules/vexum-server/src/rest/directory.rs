use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;
use vexum_domains::access::{self, MeetingTypeInfo};
use vexum_domains::organizations::{Team, User};

use crate::auth::Session;
use crate::error::ApiResult;
use crate::routes::AppState;

pub async fn list_users(State(state): State<AppState>, session: Session) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(User::list_for_org(session.organization_id, state.pool()).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    Ok(Json(User::find_for_org(id, session.organization_id, state.pool()).await?))
}

pub async fn list_teams(State(state): State<AppState>, session: Session) -> ApiResult<Json<Vec<Team>>> {
    Ok(Json(Team::list_for_org(session.organization_id, state.pool()).await?))
}

pub async fn meeting_types(_session: Session) -> Json<Vec<MeetingTypeInfo>> {
    Json(access::meeting_type_catalog())
}
