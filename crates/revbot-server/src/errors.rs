//! Server errors.

use actix_http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use revbot_core::DomainError;
use revbot_sentry::sentry;
use thiserror::Error;
use tracing::error;

use crate::metrics::LOCK_TIMEOUTS;

/// Server error.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error,\n  caused by: {source}")]
    IoError { source: std::io::Error },

    #[error("Metrics setup error: {message}")]
    MetricsError { message: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Domain { source: DomainError },
}

impl ServerError {
    /// Stable error code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::Domain { source } => match source {
                DomainError::TeamAlreadyExists { .. } => "TEAM_EXISTS",
                DomainError::PullRequestAlreadyExists { .. } => "PR_EXISTS",
                DomainError::AuthorNotFound { .. }
                | DomainError::PullRequestNotFound { .. }
                | DomainError::UserNotFound { .. }
                | DomainError::TeamNotFound { .. } => "NOT_FOUND",
                DomainError::PullRequestMerged { .. } => "PR_MERGED",
                DomainError::ReviewerNotAssigned { .. } => "NOT_ASSIGNED",
                DomainError::NoCandidate { .. } => "NO_CANDIDATE",
                DomainError::Busy { .. } => "BUSY",
                DomainError::SlotsError { .. } | DomainError::DatabaseError { .. } => "INTERNAL",
            },
            Self::IoError { .. } | Self::MetricsError { .. } => "INTERNAL",
        }
    }

    fn public_message(&self) -> String {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => "internal server error".into(),
            _ => self.to_string(),
        }
    }
}

impl From<DomainError> for ServerError {
    fn from(e: DomainError) -> Self {
        if e.is_retryable() {
            LOCK_TIMEOUTS.inc();
        }

        Self::Domain { source: e }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Domain { source } => match source {
                DomainError::TeamAlreadyExists { .. } => StatusCode::BAD_REQUEST,
                DomainError::AuthorNotFound { .. }
                | DomainError::PullRequestNotFound { .. }
                | DomainError::UserNotFound { .. }
                | DomainError::TeamNotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::PullRequestAlreadyExists { .. }
                | DomainError::PullRequestMerged { .. }
                | DomainError::ReviewerNotAssigned { .. }
                | DomainError::NoCandidate { .. } => StatusCode::CONFLICT,
                DomainError::Busy { .. } => StatusCode::SERVICE_UNAVAILABLE,
                DomainError::SlotsError { .. } | DomainError::DatabaseError { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::IoError { .. } | Self::MetricsError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Internal error while handling request");
            sentry::capture_error(self);
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": {
                "code": self.code(),
                "message": self.public_message(),
            }
        }))
    }
}

/// Result alias for `ServerError`.
pub type Result<T, E = ServerError> = core::result::Result<T, E>;
