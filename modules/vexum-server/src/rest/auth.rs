use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use vexum_core::VexumError;
use vexum_domains::access::{self, MeetingTypeAccess};
use vexum_domains::organizations::{Team, User};

use crate::auth::{jwt, Session};
use crate::error::{ApiError, ApiResult};
use crate::routes::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: Option<String>,
}

/// The signed-in user with what they may do.
#[derive(Serialize)]
pub struct Me {
    user: User,
    accessible_meeting_types: Vec<MeetingTypeAccess>,
    teams: Vec<Team>,
}

async fn load_me(user: User, state: &AppState) -> ApiResult<Me> {
    let teams = Team::list_for_user(user.id, state.pool()).await?;
    Ok(Me {
        accessible_meeting_types: access::accessible_meeting_types(user.role),
        teams,
        user,
    })
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Response> {
    let email = body.email.trim();
    if email.is_empty() {
        return Err(ApiError::BadRequest("email is required".to_string()));
    }

    let user = User::find_by_email(email, state.pool())
        .await?
        .filter(|u| u.verify_password(body.password.as_deref()))
        .ok_or_else(|| {
            tracing::warn!("Login rejected");
            VexumError::Unauthorized("Invalid email or password".to_string())
        })?;

    let token = state.jwt.create_token(user.id, user.organization_id, user.role)?;
    let cookie = state.jwt.session_cookie(&token);

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    let me = load_me(user, &state).await?;
    Ok(([(header::SET_COOKIE, cookie)], Json(me)).into_response())
}

pub async fn me(State(state): State<AppState>, session: Session) -> ApiResult<Json<Me>> {
    let user = User::find_for_org(session.user_id, session.organization_id, state.pool())
        .await
        .map_err(|_| ApiError::Unauthenticated)?;
    Ok(Json(load_me(user, &state).await?))
}

/// Always succeeds, so a stale cookie can be cleared without a valid session.
pub async fn logout() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, jwt::clear_session_cookie())],
    )
}
