use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use vexum_core::VexumError;

/// Handler-level error, rendered as `{"error": "<message>"}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] VexumError),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Domain(err) => match err {
                VexumError::NotFound(_) => StatusCode::NOT_FOUND,
                VexumError::Validation(_) => StatusCode::BAD_REQUEST,
                VexumError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                VexumError::Forbidden(_) => StatusCode::FORBIDDEN,
                VexumError::Database(_) | VexumError::Config(_) | VexumError::Anyhow(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing text. Server faults never expose their cause.
    fn public_message(&self) -> String {
        match self {
            Self::Domain(VexumError::NotFound(what)) => (*what).to_string(),
            Self::Domain(VexumError::Validation(msg))
            | Self::Domain(VexumError::Unauthorized(msg))
            | Self::Domain(VexumError::Forbidden(msg))
            | Self::BadRequest(msg) => msg.clone(),
            Self::Unauthenticated => self.to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(serde_json::json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_carries_its_static_message() {
        let (status, body) = body_of(VexumError::NotFound("Meeting not found").into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Meeting not found");
    }

    #[tokio::test]
    async fn validation_is_a_bad_request() {
        let (status, body) = body_of(VexumError::validation("days must be at least 1").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "days must be at least 1");
    }

    #[tokio::test]
    async fn forbidden_and_unauthenticated() {
        let (status, _) = body_of(VexumError::forbidden("no access").into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = body_of(ApiError::Unauthenticated).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authentication required");
    }

    #[tokio::test]
    async fn database_errors_are_hidden() {
        let err: ApiError = VexumError::Database(sqlx::Error::PoolTimedOut).into();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}
