//! JSON payloads.

use revbot_core::use_cases::teams::TeamWithMembers;
use revbot_models::{PullRequest, PullRequestStatus, User};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct TeamMemberJson {
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl TeamMemberJson {
    pub fn into_user(self) -> User {
        let username = if self.username.is_empty() {
            self.user_id.clone()
        } else {
            self.username
        };

        User::new(self.user_id, "")
            .with_username(username)
            .with_active(self.is_active)
    }
}

impl From<User> for TeamMemberJson {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct TeamJson {
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<TeamMemberJson>,
}

impl From<TeamWithMembers> for TeamJson {
    fn from(value: TeamWithMembers) -> Self {
        Self {
            team_name: value.team.name,
            members: value.members.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UserJson {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl From<User> for UserJson {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            team_name: user.team_name,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PullRequestJson {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
    pub assigned_reviewers: Vec<String>,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(
        rename = "mergedAt",
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub merged_at: Option<OffsetDateTime>,
}

impl From<PullRequest> for PullRequestJson {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status: pr.status,
            assigned_reviewers: pr.reviewers,
            created_at: pr.created_at,
            merged_at: pr.merged_at,
        }
    }
}

/// Review queue entry, without timestamps.
#[derive(Debug, Serialize)]
pub(crate) struct PullRequestShortJson {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
    pub assigned_reviewers: Vec<String>,
}

impl From<PullRequest> for PullRequestShortJson {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status: pr.status,
            assigned_reviewers: pr.reviewers,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TeamQuery {
    pub team_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SetIsActiveJson {
    pub user_id: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatePullRequestJson {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MergePullRequestJson {
    pub pull_request_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReassignJson {
    pub pull_request_id: String,
    pub old_user_id: String,
}
