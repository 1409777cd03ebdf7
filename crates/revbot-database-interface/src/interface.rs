use async_trait::async_trait;
use revbot_models::{AssignmentSlot, PullRequest, Team, User};
use time::OffsetDateTime;

use crate::{DatabaseError, Result};

/// Storage entry point.
///
/// Methods on the service itself never lock and read committed state.
/// Anything that mutates goes through [`DbTransaction`].
#[async_trait]
pub trait DbService: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn DbTransaction>>;
    async fn health_check(&self) -> Result<()>;

    async fn users_get(&self, id: &str) -> Result<Option<User>>;
    async fn users_get_expect(&self, id: &str) -> Result<User> {
        self.users_get(id)
            .await?
            .ok_or_else(|| DatabaseError::UnknownUser(id.into()))
    }
    async fn users_all(&self) -> Result<Vec<User>>;

    async fn teams_get(&self, name: &str) -> Result<Option<Team>>;
    async fn teams_get_expect(&self, name: &str) -> Result<Team> {
        self.teams_get(name)
            .await?
            .ok_or_else(|| DatabaseError::UnknownTeam(name.into()))
    }
    async fn teams_all(&self) -> Result<Vec<Team>>;
    /// Members of a team, sorted by id.
    async fn team_members_list(&self, team_name: &str) -> Result<Vec<User>>;

    /// Pull request with its reviewer slate.
    async fn pull_requests_get(&self, id: &str) -> Result<Option<PullRequest>>;
    async fn pull_requests_get_expect(&self, id: &str) -> Result<PullRequest> {
        self.pull_requests_get(id)
            .await?
            .ok_or_else(|| DatabaseError::UnknownPullRequest(id.into()))
    }
    /// Open pull requests where `reviewer_id` holds a slot, sorted by id.
    async fn pull_requests_list_for_reviewer(&self, reviewer_id: &str)
        -> Result<Vec<PullRequest>>;

    /// Slots of a pull request, sorted by slot number.
    async fn assignment_slots_list(&self, pull_request_id: &str) -> Result<Vec<AssignmentSlot>>;
}

/// Atomic unit of work.
///
/// Dropping a transaction without calling [`DbTransaction::commit`] discards
/// every staged write and releases every lock it holds.
#[async_trait]
pub trait DbTransaction: Send {
    /// Take the exclusive lock on a pull request row, then read it.
    ///
    /// The lock is held until the transaction ends.
    async fn pull_requests_lock(&mut self, id: &str) -> Result<Option<PullRequest>>;
    async fn pull_requests_get(&mut self, id: &str) -> Result<Option<PullRequest>>;
    async fn pull_requests_create(&mut self, instance: PullRequest) -> Result<PullRequest>;
    async fn pull_requests_set_merged(
        &mut self,
        id: &str,
        merged_at: OffsetDateTime,
    ) -> Result<PullRequest>;

    async fn assignment_slots_list(&mut self, pull_request_id: &str)
        -> Result<Vec<AssignmentSlot>>;
    async fn assignment_slots_find_by_reviewer(
        &mut self,
        pull_request_id: &str,
        reviewer_id: &str,
    ) -> Result<Option<AssignmentSlot>>;
    async fn assignment_slots_create(&mut self, instance: AssignmentSlot)
        -> Result<AssignmentSlot>;
    async fn assignment_slots_set_reviewer(
        &mut self,
        pull_request_id: &str,
        slot: u32,
        reviewer_id: &str,
        assigned_at: OffsetDateTime,
    ) -> Result<AssignmentSlot>;

    async fn users_get(&mut self, id: &str) -> Result<Option<User>>;
    async fn users_get_expect(&mut self, id: &str) -> Result<User> {
        self.users_get(id)
            .await?
            .ok_or_else(|| DatabaseError::UnknownUser(id.into()))
    }
    /// Insert or update a user, keeping its creation date.
    async fn users_upsert(&mut self, instance: User) -> Result<User>;
    async fn users_set_active(&mut self, id: &str, value: bool) -> Result<User>;
    /// Active members of `team_name` not listed in `excluding`, sorted by id.
    async fn users_list_active_teammates(
        &mut self,
        team_name: &str,
        excluding: &[String],
    ) -> Result<Vec<String>>;

    async fn teams_create(&mut self, instance: Team) -> Result<Team>;

    async fn commit(self: Box<Self>) -> Result<()>;
    async fn rollback(self: Box<Self>) -> Result<()>;
}
