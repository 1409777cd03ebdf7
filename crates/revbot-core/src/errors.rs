//! Domain errors.

use revbot_database_interface::DatabaseError;
use revbot_models::ReviewerSlotsError;
use thiserror::Error;

/// Domain error.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown author '{author_id}'")]
    AuthorNotFound { author_id: String },

    #[error("Unknown pull request '{pull_request_id}'")]
    PullRequestNotFound { pull_request_id: String },

    #[error("Pull request '{pull_request_id}' already exists")]
    PullRequestAlreadyExists { pull_request_id: String },

    #[error("Pull request '{pull_request_id}' is merged")]
    PullRequestMerged { pull_request_id: String },

    #[error("Reviewer '{reviewer_id}' is not assigned to pull request '{pull_request_id}'")]
    ReviewerNotAssigned {
        pull_request_id: String,
        reviewer_id: String,
    },

    #[error("No active replacement candidate for pull request '{pull_request_id}'")]
    NoCandidate { pull_request_id: String },

    #[error("Unknown user '{user_id}'")]
    UserNotFound { user_id: String },

    #[error("Unknown team '{team_name}'")]
    TeamNotFound { team_name: String },

    #[error("Team '{team_name}' already exists")]
    TeamAlreadyExists { team_name: String },

    /// Contention on a row lock or on the connection pool.
    #[error("Resource busy, retry later: {source}")]
    Busy { source: DatabaseError },

    /// Wraps [`revbot_models::ReviewerSlotsError`].
    #[error("Inconsistent reviewer slots: {source}")]
    SlotsError { source: ReviewerSlotsError },

    /// Wraps [`revbot_database_interface::DatabaseError`].
    #[error("Database error: {source}")]
    DatabaseError { source: DatabaseError },
}

impl DomainError {
    /// Whether the same request may succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}

impl From<DatabaseError> for DomainError {
    fn from(e: DatabaseError) -> Self {
        match e {
            e if e.is_timeout() => Self::Busy { source: e },
            DatabaseError::UnknownUser(user_id) => Self::UserNotFound { user_id },
            DatabaseError::UnknownTeam(team_name) => Self::TeamNotFound { team_name },
            DatabaseError::UnknownPullRequest(pull_request_id) => {
                Self::PullRequestNotFound { pull_request_id }
            }
            DatabaseError::TeamAlreadyExists(team_name) => Self::TeamAlreadyExists { team_name },
            DatabaseError::PullRequestAlreadyExists(pull_request_id) => {
                Self::PullRequestAlreadyExists { pull_request_id }
            }
            e => Self::DatabaseError { source: e },
        }
    }
}

impl From<ReviewerSlotsError> for DomainError {
    fn from(e: ReviewerSlotsError) -> Self {
        Self::SlotsError { source: e }
    }
}

/// Result alias for `DomainError`.
pub type Result<T> = core::result::Result<T, DomainError>;
