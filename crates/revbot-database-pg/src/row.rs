use revbot_models::{AssignmentSlot, PullRequest, Team, User};
use sqlx::{postgres::PgRow, FromRow, Row};

use crate::fields::PullRequestStatusDecode;

pub(crate) struct TeamRow(Team);
pub(crate) struct UserRow(User);
pub(crate) struct PullRequestRow(PullRequest);
pub(crate) struct AssignmentSlotRow(AssignmentSlot);

impl From<TeamRow> for Team {
    fn from(r: TeamRow) -> Self {
        r.0
    }
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        r.0
    }
}

impl From<PullRequestRow> for PullRequest {
    fn from(r: PullRequestRow) -> Self {
        r.0
    }
}

impl From<AssignmentSlotRow> for AssignmentSlot {
    fn from(r: AssignmentSlotRow) -> Self {
        r.0
    }
}

impl<'r> FromRow<'r, PgRow> for TeamRow {
    fn from_row(row: &'r PgRow) -> core::result::Result<Self, sqlx::Error> {
        Ok(Self(Team {
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
        }))
    }
}

impl<'r> FromRow<'r, PgRow> for UserRow {
    fn from_row(row: &'r PgRow) -> core::result::Result<Self, sqlx::Error> {
        Ok(Self(User {
            id: row.try_get("user_id")?,
            username: row.try_get("username")?,
            team_name: row.try_get("team_name")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        }))
    }
}

impl<'r> FromRow<'r, PgRow> for PullRequestRow {
    fn from_row(row: &'r PgRow) -> core::result::Result<Self, sqlx::Error> {
        Ok(Self(PullRequest {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            author_id: row.try_get("author_id")?,
            status: *row.try_get::<PullRequestStatusDecode, _>("status")?,
            reviewers: Vec::new(),
            created_at: row.try_get("created_at")?,
            merged_at: row.try_get("merged_at")?,
        }))
    }
}

impl<'r> FromRow<'r, PgRow> for AssignmentSlotRow {
    fn from_row(row: &'r PgRow) -> core::result::Result<Self, sqlx::Error> {
        Ok(Self(AssignmentSlot {
            pull_request_id: row.try_get("pull_request_id")?,
            slot: row.try_get::<i32, _>("slot")? as u32,
            reviewer_id: row.try_get("reviewer_id")?,
            assigned_at: row.try_get("assigned_at")?,
        }))
    }
}
