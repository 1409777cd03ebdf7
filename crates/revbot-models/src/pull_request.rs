use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{AssignmentSlot, PullRequestStatus};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
    /// Reviewer ids, ordered by slot number.
    pub reviewers: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub merged_at: Option<OffsetDateTime>,
}

impl Default for PullRequest {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            author_id: String::new(),
            status: PullRequestStatus::Open,
            reviewers: Vec::new(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            merged_at: None,
        }
    }
}

impl PullRequest {
    pub fn new<I: Into<String>, N: Into<String>, A: Into<String>>(
        id: I,
        name: N,
        author_id: A,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            author_id: author_id.into(),
            ..Default::default()
        }
    }

    /// Replace the reviewer slate with the occupants of `slots`, in slot order.
    pub fn with_slots(mut self, slots: &[AssignmentSlot]) -> Self {
        let mut slots: Vec<_> = slots.iter().collect();
        slots.sort_by_key(|s| s.slot);
        self.reviewers = slots.into_iter().map(|s| s.reviewer_id.clone()).collect();
        self
    }

    pub fn is_merged(&self) -> bool {
        self.status == PullRequestStatus::Merged
    }
}
