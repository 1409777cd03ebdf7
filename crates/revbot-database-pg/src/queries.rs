use std::collections::HashMap;

use revbot_database_interface::{DatabaseError, Result};
use revbot_models::{AssignmentSlot, PullRequest, Team, User};
use sqlx::PgConnection;

use crate::row::{AssignmentSlotRow, PullRequestRow, TeamRow, UserRow};

pub(crate) const UNIQUE_VIOLATION: &str = "23505";
pub(crate) const FOREIGN_KEY_VIOLATION: &str = "23503";
const LOCK_NOT_AVAILABLE: &str = "55P03";

pub(crate) fn error_code(e: &sqlx::Error) -> Option<String> {
    e.as_database_error()
        .and_then(|d| d.code())
        .map(|c| c.into_owned())
}

pub(crate) fn error_constraint(e: &sqlx::Error) -> Option<&str> {
    e.as_database_error().and_then(|d| d.constraint())
}

pub(crate) fn wrap_error(e: sqlx::Error) -> DatabaseError {
    match e {
        sqlx::Error::PoolTimedOut => DatabaseError::ConnectionTimeout,
        e => DatabaseError::ImplementationError { source: e.into() },
    }
}

/// Same as [`wrap_error`], reporting lock waits on `key` as timeouts.
pub(crate) fn wrap_lock_error(e: sqlx::Error, key: &str) -> DatabaseError {
    if error_code(&e).as_deref() == Some(LOCK_NOT_AVAILABLE) {
        DatabaseError::LockTimeout(key.into())
    } else {
        wrap_error(e)
    }
}

pub(crate) async fn fetch_team(conn: &mut PgConnection, name: &str) -> Result<Option<Team>> {
    let row = sqlx::query_as::<_, TeamRow>(
        r#"
            SELECT *
            FROM team
            WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(conn)
    .await
    .map_err(wrap_error)?;

    Ok(row.map(Into::into))
}

pub(crate) async fn fetch_user(conn: &mut PgConnection, id: &str) -> Result<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
            SELECT *
            FROM member
            WHERE user_id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(wrap_error)?;

    Ok(row.map(Into::into))
}

pub(crate) async fn fetch_slots(
    conn: &mut PgConnection,
    pull_request_id: &str,
) -> Result<Vec<AssignmentSlot>> {
    let rows = sqlx::query_as::<_, AssignmentSlotRow>(
        r#"
            SELECT *
            FROM assignment_slot
            WHERE pull_request_id = $1
            ORDER BY slot
        "#,
    )
    .bind(pull_request_id)
    .fetch_all(conn)
    .await
    .map_err(wrap_error)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Read a pull request with its slate, optionally taking its row lock.
pub(crate) async fn fetch_pull_request(
    conn: &mut PgConnection,
    id: &str,
    for_update: bool,
) -> Result<Option<PullRequest>> {
    let query = if for_update {
        r#"
            SELECT *
            FROM pull_request
            WHERE id = $1
            FOR UPDATE
        "#
    } else {
        r#"
            SELECT *
            FROM pull_request
            WHERE id = $1
        "#
    };

    let row = sqlx::query_as::<_, PullRequestRow>(query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| wrap_lock_error(e, id))?;

    match row {
        Some(row) => {
            let slots = fetch_slots(conn, id).await?;
            Ok(Some(PullRequest::from(row).with_slots(&slots)))
        }
        None => Ok(None),
    }
}

pub(crate) async fn fetch_open_pull_requests_for_reviewer(
    conn: &mut PgConnection,
    reviewer_id: &str,
) -> Result<Vec<PullRequest>> {
    let rows = sqlx::query_as::<_, PullRequestRow>(
        r#"
            SELECT pull_request.*
            FROM pull_request
            INNER JOIN assignment_slot ON assignment_slot.pull_request_id = pull_request.id
            WHERE assignment_slot.reviewer_id = $1
            AND pull_request.status = 'OPEN'
            ORDER BY pull_request.id
        "#,
    )
    .bind(reviewer_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(wrap_error)?;

    let pulls: Vec<PullRequest> = rows.into_iter().map(Into::into).collect();
    if pulls.is_empty() {
        return Ok(pulls);
    }

    let ids: Vec<String> = pulls.iter().map(|p| p.id.clone()).collect();
    let slot_rows = sqlx::query_as::<_, AssignmentSlotRow>(
        r#"
            SELECT *
            FROM assignment_slot
            WHERE pull_request_id = ANY($1)
            ORDER BY pull_request_id, slot
        "#,
    )
    .bind(ids)
    .fetch_all(conn)
    .await
    .map_err(wrap_error)?;

    let mut slots: HashMap<String, Vec<AssignmentSlot>> = HashMap::new();
    for slot in slot_rows.into_iter().map(AssignmentSlot::from) {
        slots
            .entry(slot.pull_request_id.clone())
            .or_default()
            .push(slot);
    }

    Ok(pulls
        .into_iter()
        .map(|pr| {
            let slate = slots.remove(&pr.id).unwrap_or_default();
            pr.with_slots(&slate)
        })
        .collect())
}
