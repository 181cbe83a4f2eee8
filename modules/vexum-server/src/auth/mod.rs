pub mod jwt;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;
use vexum_core::{MeetingType, UserRole, VexumError};
use vexum_domains::access;

use crate::error::ApiError;
use crate::routes::AppState;

/// The authenticated caller, taken from the session cookie or a bearer token.
/// Handlers that require a login take this as an argument.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: UserRole,
}

impl Session {
    pub fn ensure_can_view(&self, meeting_type: MeetingType) -> Result<(), ApiError> {
        if access::can_view(self.role, meeting_type) {
            Ok(())
        } else {
            Err(VexumError::forbidden("You cannot view this meeting type").into())
        }
    }

    pub fn ensure_can_manage(&self, meeting_type: MeetingType) -> Result<(), ApiError> {
        if access::can_manage(self.role, meeting_type) {
            Ok(())
        } else {
            Err(VexumError::forbidden("You cannot manage this meeting type").into())
        }
    }

    pub fn ensure_can_create(&self, meeting_type: MeetingType) -> Result<(), ApiError> {
        if access::can_create(self.role, meeting_type) {
            Ok(())
        } else {
            Err(VexumError::forbidden("You cannot create this meeting type").into())
        }
    }
}

/// Cookie first, then `Authorization: Bearer`.
fn token_from_parts(parts: &Parts) -> Option<&str> {
    let from_cookie = parts
        .headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(jwt::parse_session_cookie);

    from_cookie.or_else(|| {
        parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(jwt::parse_bearer)
    })
}

impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts).ok_or(ApiError::Unauthenticated)?;

        let claims = state.jwt.verify_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            ApiError::Unauthenticated
        })?;

        Ok(Session {
            user_id: claims.sub,
            organization_id: claims.org,
            role: claims.role,
        })
    }
}
