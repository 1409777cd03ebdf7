use std::time::Duration;

use async_trait::async_trait;
use revbot_database_interface::{DatabaseError, DbService, DbTransaction, Result};
use revbot_models::{current_timestamp, AssignmentSlot, PullRequest, Team, User};
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;

use crate::{
    queries::{
        error_code, error_constraint, fetch_open_pull_requests_for_reviewer, fetch_pull_request,
        fetch_slots, fetch_team, fetch_user, wrap_error, wrap_lock_error, FOREIGN_KEY_VIOLATION,
        UNIQUE_VIOLATION,
    },
    row::{AssignmentSlotRow, PullRequestRow, TeamRow, UserRow},
};

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

pub struct PostgresDb {
    pool: PgPool,
    lock_timeout: Duration,
}

impl PostgresDb {
    pub fn new(pool: PgPool) -> Self {
        Self::with_lock_timeout(pool, DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(pool: PgPool, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }
}

#[async_trait]
impl DbService for PostgresDb {
    #[tracing::instrument(skip(self))]
    async fn begin(&self) -> Result<Box<dyn DbTransaction>> {
        let mut tx = self.pool.begin().await.map_err(wrap_error)?;

        sqlx::query(&format!(
            "SET LOCAL lock_timeout = '{}ms';",
            self.lock_timeout.as_millis()
        ))
        .execute(&mut *tx)
        .await
        .map_err(wrap_error)?;

        Ok(Box::new(PostgresTransaction { tx }))
    }

    #[tracing::instrument(skip(self))]
    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1;")
            .execute(&self.pool)
            .await
            .map_err(wrap_error)?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn users_get(&self, id: &str) -> Result<Option<User>> {
        let mut conn = self.pool.acquire().await.map_err(wrap_error)?;
        fetch_user(&mut conn, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn users_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT *
                FROM member
                ORDER BY user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(wrap_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn teams_get(&self, name: &str) -> Result<Option<Team>> {
        let mut conn = self.pool.acquire().await.map_err(wrap_error)?;
        fetch_team(&mut conn, name).await
    }

    #[tracing::instrument(skip(self))]
    async fn teams_all(&self) -> Result<Vec<Team>> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
                SELECT *
                FROM team
                ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(wrap_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn team_members_list(&self, team_name: &str) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT *
                FROM member
                WHERE team_name = $1
                ORDER BY user_id
            "#,
        )
        .bind(team_name)
        .fetch_all(&self.pool)
        .await
        .map_err(wrap_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn pull_requests_get(&self, id: &str) -> Result<Option<PullRequest>> {
        let mut conn = self.pool.acquire().await.map_err(wrap_error)?;
        fetch_pull_request(&mut conn, id, false).await
    }

    #[tracing::instrument(skip(self))]
    async fn pull_requests_list_for_reviewer(
        &self,
        reviewer_id: &str,
    ) -> Result<Vec<PullRequest>> {
        let mut conn = self.pool.acquire().await.map_err(wrap_error)?;
        fetch_open_pull_requests_for_reviewer(&mut conn, reviewer_id).await
    }

    #[tracing::instrument(skip(self))]
    async fn assignment_slots_list(&self, pull_request_id: &str) -> Result<Vec<AssignmentSlot>> {
        let mut conn = self.pool.acquire().await.map_err(wrap_error)?;
        fetch_slots(&mut conn, pull_request_id).await
    }
}

pub struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl DbTransaction for PostgresTransaction {
    #[tracing::instrument(skip(self))]
    async fn pull_requests_lock(&mut self, id: &str) -> Result<Option<PullRequest>> {
        fetch_pull_request(&mut self.tx, id, true).await
    }

    #[tracing::instrument(skip(self))]
    async fn pull_requests_get(&mut self, id: &str) -> Result<Option<PullRequest>> {
        fetch_pull_request(&mut self.tx, id, false).await
    }

    #[tracing::instrument(skip(self))]
    async fn pull_requests_create(&mut self, instance: PullRequest) -> Result<PullRequest> {
        let row = sqlx::query_as::<_, PullRequestRow>(
            r#"
            INSERT INTO pull_request
            (
                id,
                name,
                author_id,
                status,
                created_at,
                merged_at
            )
            VALUES
            (
                $1,
                $2,
                $3,
                $4,
                $5,
                $6
            )
            RETURNING *;
            "#,
        )
        .bind(&instance.id)
        .bind(&instance.name)
        .bind(&instance.author_id)
        .bind(instance.status.to_str())
        .bind(instance.created_at)
        .bind(instance.merged_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| match error_code(&e).as_deref() {
            Some(UNIQUE_VIOLATION) => DatabaseError::PullRequestAlreadyExists(instance.id.clone()),
            Some(FOREIGN_KEY_VIOLATION) => DatabaseError::UnknownUser(instance.author_id.clone()),
            _ => wrap_lock_error(e, &instance.id),
        })?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self))]
    async fn pull_requests_set_merged(
        &mut self,
        id: &str,
        merged_at: OffsetDateTime,
    ) -> Result<PullRequest> {
        let row = sqlx::query_as::<_, PullRequestRow>(
            r#"
            UPDATE pull_request
            SET status = 'MERGED',
            merged_at = $2
            WHERE id = $1
            RETURNING *;
            "#,
        )
        .bind(id)
        .bind(merged_at)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| wrap_lock_error(e, id))?
        .ok_or_else(|| DatabaseError::UnknownPullRequest(id.into()))?;

        let slots = fetch_slots(&mut self.tx, id).await?;
        Ok(PullRequest::from(row).with_slots(&slots))
    }

    #[tracing::instrument(skip(self))]
    async fn assignment_slots_list(
        &mut self,
        pull_request_id: &str,
    ) -> Result<Vec<AssignmentSlot>> {
        fetch_slots(&mut self.tx, pull_request_id).await
    }

    #[tracing::instrument(skip(self))]
    async fn assignment_slots_find_by_reviewer(
        &mut self,
        pull_request_id: &str,
        reviewer_id: &str,
    ) -> Result<Option<AssignmentSlot>> {
        let row = sqlx::query_as::<_, AssignmentSlotRow>(
            r#"
                SELECT *
                FROM assignment_slot
                WHERE pull_request_id = $1
                AND reviewer_id = $2
            "#,
        )
        .bind(pull_request_id)
        .bind(reviewer_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(wrap_error)?;

        Ok(row.map(Into::into))
    }

    #[tracing::instrument(skip(self))]
    async fn assignment_slots_create(
        &mut self,
        instance: AssignmentSlot,
    ) -> Result<AssignmentSlot> {
        let row = sqlx::query_as::<_, AssignmentSlotRow>(
            r#"
            INSERT INTO assignment_slot
            (
                pull_request_id,
                slot,
                reviewer_id,
                assigned_at
            )
            VALUES
            (
                $1,
                $2,
                $3,
                $4
            )
            RETURNING *;
            "#,
        )
        .bind(&instance.pull_request_id)
        .bind(instance.slot as i32)
        .bind(&instance.reviewer_id)
        .bind(instance.assigned_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            let pull_request_id = instance.pull_request_id.clone();
            let constraint = error_constraint(&e).map(str::to_owned);
            match (error_code(&e).as_deref(), constraint.as_deref()) {
                (Some(UNIQUE_VIOLATION), Some("assignment_slot_reviewer_unique")) => {
                    DatabaseError::ReviewerAlreadyAssigned(
                        pull_request_id,
                        instance.reviewer_id.clone(),
                    )
                }
                (Some(UNIQUE_VIOLATION), _) => {
                    DatabaseError::SlotAlreadyTaken(pull_request_id, instance.slot)
                }
                (Some(FOREIGN_KEY_VIOLATION), Some("assignment_slot_pull_request_id_fkey")) => {
                    DatabaseError::UnknownPullRequest(pull_request_id)
                }
                (Some(FOREIGN_KEY_VIOLATION), _) => {
                    DatabaseError::UnknownUser(instance.reviewer_id.clone())
                }
                _ => wrap_lock_error(e, &pull_request_id),
            }
        })?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self))]
    async fn assignment_slots_set_reviewer(
        &mut self,
        pull_request_id: &str,
        slot: u32,
        reviewer_id: &str,
        assigned_at: OffsetDateTime,
    ) -> Result<AssignmentSlot> {
        let row = sqlx::query_as::<_, AssignmentSlotRow>(
            r#"
            UPDATE assignment_slot
            SET reviewer_id = $3,
            assigned_at = $4
            WHERE pull_request_id = $1
            AND slot = $2
            RETURNING *;
            "#,
        )
        .bind(pull_request_id)
        .bind(slot as i32)
        .bind(reviewer_id)
        .bind(assigned_at)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| match error_code(&e).as_deref() {
            Some(UNIQUE_VIOLATION) => {
                DatabaseError::ReviewerAlreadyAssigned(pull_request_id.into(), reviewer_id.into())
            }
            Some(FOREIGN_KEY_VIOLATION) => DatabaseError::UnknownUser(reviewer_id.into()),
            _ => wrap_lock_error(e, pull_request_id),
        })?
        .ok_or_else(|| DatabaseError::UnknownSlot(pull_request_id.into(), slot))?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self))]
    async fn users_get(&mut self, id: &str) -> Result<Option<User>> {
        fetch_user(&mut self.tx, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn users_upsert(&mut self, instance: User) -> Result<User> {
        let now = current_timestamp();
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO member
            (
                user_id,
                username,
                team_name,
                is_active,
                created_at,
                updated_at
            )
            VALUES
            (
                $1,
                $2,
                $3,
                $4,
                $5,
                $5
            )
            ON CONFLICT (user_id) DO UPDATE
            SET username = EXCLUDED.username,
            team_name = EXCLUDED.team_name,
            is_active = EXCLUDED.is_active,
            updated_at = EXCLUDED.updated_at
            RETURNING *;
            "#,
        )
        .bind(&instance.id)
        .bind(&instance.username)
        .bind(&instance.team_name)
        .bind(instance.is_active)
        .bind(now)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| match error_code(&e).as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => DatabaseError::UnknownTeam(instance.team_name.clone()),
            _ => wrap_error(e),
        })?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self))]
    async fn users_set_active(&mut self, id: &str, value: bool) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE member
            SET is_active = $2,
            updated_at = $3
            WHERE user_id = $1
            RETURNING *;
            "#,
        )
        .bind(id)
        .bind(value)
        .bind(current_timestamp())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(wrap_error)?
        .ok_or_else(|| DatabaseError::UnknownUser(id.into()))?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self))]
    async fn users_list_active_teammates(
        &mut self,
        team_name: &str,
        excluding: &[String],
    ) -> Result<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
                SELECT user_id
                FROM member
                WHERE team_name = $1
                AND is_active
                AND NOT (user_id = ANY($2))
                ORDER BY user_id
            "#,
        )
        .bind(team_name)
        .bind(excluding)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(wrap_error)?;

        Ok(ids)
    }

    #[tracing::instrument(skip(self))]
    async fn teams_create(&mut self, instance: Team) -> Result<Team> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            INSERT INTO team
            (
                name,
                description,
                created_at
            )
            VALUES
            (
                $1,
                $2,
                $3
            )
            RETURNING *;
            "#,
        )
        .bind(&instance.name)
        .bind(&instance.description)
        .bind(instance.created_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| match error_code(&e).as_deref() {
            Some(UNIQUE_VIOLATION) => DatabaseError::TeamAlreadyExists(instance.name.clone()),
            _ => wrap_error(e),
        })?;

        Ok(row.into())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(wrap_error)
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(wrap_error)
    }
}
