// Request-level error taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing credential or connection string. Fatal for the request.
    #[error("{0}")]
    Configuration(String),

    #[error("need at least 8 teams for tournament, have {have}")]
    InsufficientTeams { have: usize },

    #[error("{0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Challonge rejected the primary resource fetch; the foreign status
    /// code is passed through to our caller.
    #[error("challonge api error: {message}")]
    Upstream { status: u16, message: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Transport-level failure talking to the foreign API (no status code).
    #[error("challonge request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Configuration(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InsufficientTeams { .. } | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Http(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Configuration("CHALLONGE_API_KEY not configured".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::InsufficientTeams { have: 5 }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Validation("tournament_id required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound("team".into()).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_status_passes_through() {
        let err = AppError::Upstream {
            status: 404,
            message: "tournament not found".into(),
        };
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        // An unmappable foreign status falls back to bad gateway.
        let weird = AppError::Upstream {
            status: 42,
            message: "?".into(),
        };
        assert_eq!(weird.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_insufficient_teams_message() {
        let err = AppError::InsufficientTeams { have: 5 };
        assert_eq!(
            err.to_string(),
            "need at least 8 teams for tournament, have 5"
        );
    }
}
