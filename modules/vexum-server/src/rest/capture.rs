use axum::{extract::State, http::StatusCode, response::Json};
use vexum_domains::capture::{self, CaptureRequest, CapturedItem};

use crate::auth::Session;
use crate::error::ApiResult;
use crate::routes::AppState;

/// `D:` / `A:` / `I:` prefixed line → decision, action or issue on the meeting.
pub async fn quick_capture(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CaptureRequest>,
) -> ApiResult<(StatusCode, Json<CapturedItem>)> {
    let item = capture::capture(body, session.organization_id, session.user_id, state.pool()).await?;
    Ok((StatusCode::CREATED, Json(item)))
}
