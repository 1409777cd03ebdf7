use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Unknown user '{0}'")]
    UnknownUser(String),

    #[error("Unknown team '{0}'")]
    UnknownTeam(String),

    #[error("Unknown pull request '{0}'")]
    UnknownPullRequest(String),

    #[error("Unknown slot #{1} on pull request '{0}'")]
    UnknownSlot(String, u32),

    #[error("Team '{0}' already exists")]
    TeamAlreadyExists(String),

    #[error("Pull request '{0}' already exists")]
    PullRequestAlreadyExists(String),

    #[error("Reviewer '{1}' is already assigned to pull request '{0}'")]
    ReviewerAlreadyAssigned(String, String),

    #[error("Slot #{1} is already taken on pull request '{0}'")]
    SlotAlreadyTaken(String, u32),

    #[error("Timed out while waiting for the lock on pull request '{0}'")]
    LockTimeout(String),

    #[error("Timed out while waiting for a database connection")]
    ConnectionTimeout,

    #[error(transparent)]
    ImplementationError {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl DatabaseError {
    /// Whether the operation can be retried as-is.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::LockTimeout(_) | Self::ConnectionTimeout)
    }
}

pub type Result<T, E = DatabaseError> = core::result::Result<T, E>;
