use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use revbot_database_interface::{DatabaseError, DbTransaction, Result};
use revbot_models::{
    current_timestamp, AssignmentSlot, PullRequest, PullRequestStatus, Team, User,
};
use time::OffsetDateTime;

use crate::{locks::RowGuard, MemoryInner, MemoryState};

/// Writes not yet visible to other transactions.
#[derive(Debug, Default)]
struct Staging {
    teams: HashMap<String, Team>,
    users: HashMap<String, User>,
    /// Activity flips on rows this transaction did not upsert.
    activity: HashMap<String, (bool, OffsetDateTime)>,
    pull_requests: HashMap<String, PullRequest>,
    created_pull_requests: HashSet<String>,
    slots: HashMap<String, Vec<AssignmentSlot>>,
}

impl Staging {
    fn with_activity(&self, mut user: User) -> User {
        if let Some(&(is_active, updated_at)) = self.activity.get(&user.id) {
            user.is_active = is_active;
            user.updated_at = updated_at;
        }
        user
    }
}

pub(crate) struct MemoryTransaction {
    inner: Arc<MemoryInner>,
    staging: Staging,
    guards: HashMap<String, RowGuard>,
}

impl MemoryTransaction {
    pub fn new(inner: Arc<MemoryInner>) -> Self {
        Self {
            inner,
            staging: Staging::default(),
            guards: HashMap::new(),
        }
    }

    async fn lock_row(&mut self, id: &str) -> Result<()> {
        if !self.guards.contains_key(id) {
            let guard = self
                .inner
                .row_locks
                .acquire(id, self.inner.lock_timeout)
                .await?;
            self.guards.insert(id.into(), guard);
        }

        Ok(())
    }

    fn read<R>(&self, f: impl FnOnce(&MemoryState, &Staging) -> R) -> R {
        let state = self.inner.state.read().unwrap();
        f(&state, &self.staging)
    }

    fn team_exists(&self, name: &str) -> bool {
        self.read(|state, staging| {
            staging.teams.contains_key(name) || state.teams.contains_key(name)
        })
    }

    fn user(&self, id: &str) -> Option<User> {
        self.read(|state, staging| {
            staging.users.get(id).cloned().or_else(|| {
                state
                    .users
                    .get(id)
                    .map(|u| staging.with_activity(u.clone()))
            })
        })
    }

    fn pull_request(&self, id: &str) -> Option<PullRequest> {
        self.read(|state, staging| {
            staging
                .pull_requests
                .get(id)
                .or_else(|| state.pull_requests.get(id))
                .cloned()
        })
    }

    fn slots(&self, pull_request_id: &str) -> Vec<AssignmentSlot> {
        let mut slots = self.read(|state, staging| {
            staging
                .slots
                .get(pull_request_id)
                .cloned()
                .unwrap_or_else(|| state.slots_of(pull_request_id))
        });
        slots.sort_by_key(|s| s.slot);
        slots
    }

    fn pull_request_with_slate(&self, id: &str) -> Option<PullRequest> {
        self.pull_request(id)
            .map(|pr| pr.with_slots(&self.slots(id)))
    }
}

#[async_trait]
impl DbTransaction for MemoryTransaction {
    async fn pull_requests_lock(&mut self, id: &str) -> Result<Option<PullRequest>> {
        self.lock_row(id).await?;

        let pr = self.pull_request_with_slate(id);
        if pr.is_none() {
            self.guards.remove(id);
        }

        Ok(pr)
    }

    async fn pull_requests_get(&mut self, id: &str) -> Result<Option<PullRequest>> {
        Ok(self.pull_request_with_slate(id))
    }

    async fn pull_requests_create(&mut self, instance: PullRequest) -> Result<PullRequest> {
        self.lock_row(&instance.id).await?;

        if self.pull_request(&instance.id).is_some() {
            return Err(DatabaseError::PullRequestAlreadyExists(instance.id));
        }
        if self.user(&instance.author_id).is_none() {
            return Err(DatabaseError::UnknownUser(instance.author_id));
        }

        let stored = PullRequest {
            reviewers: Vec::new(),
            ..instance
        };
        self.staging
            .created_pull_requests
            .insert(stored.id.clone());
        self.staging
            .pull_requests
            .insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn pull_requests_set_merged(
        &mut self,
        id: &str,
        merged_at: OffsetDateTime,
    ) -> Result<PullRequest> {
        self.lock_row(id).await?;

        let mut pr = self
            .pull_request(id)
            .ok_or_else(|| DatabaseError::UnknownPullRequest(id.into()))?;
        pr.status = PullRequestStatus::Merged;
        pr.merged_at = Some(merged_at);
        self.staging.pull_requests.insert(id.into(), pr.clone());

        Ok(pr.with_slots(&self.slots(id)))
    }

    async fn assignment_slots_list(
        &mut self,
        pull_request_id: &str,
    ) -> Result<Vec<AssignmentSlot>> {
        Ok(self.slots(pull_request_id))
    }

    async fn assignment_slots_find_by_reviewer(
        &mut self,
        pull_request_id: &str,
        reviewer_id: &str,
    ) -> Result<Option<AssignmentSlot>> {
        Ok(self
            .slots(pull_request_id)
            .into_iter()
            .find(|s| s.reviewer_id == reviewer_id))
    }

    async fn assignment_slots_create(
        &mut self,
        instance: AssignmentSlot,
    ) -> Result<AssignmentSlot> {
        self.lock_row(&instance.pull_request_id).await?;

        if self.pull_request(&instance.pull_request_id).is_none() {
            return Err(DatabaseError::UnknownPullRequest(instance.pull_request_id));
        }
        if self.user(&instance.reviewer_id).is_none() {
            return Err(DatabaseError::UnknownUser(instance.reviewer_id));
        }

        let mut slots = self.slots(&instance.pull_request_id);
        if slots.iter().any(|s| s.slot == instance.slot) {
            return Err(DatabaseError::SlotAlreadyTaken(
                instance.pull_request_id,
                instance.slot,
            ));
        }
        if slots.iter().any(|s| s.reviewer_id == instance.reviewer_id) {
            return Err(DatabaseError::ReviewerAlreadyAssigned(
                instance.pull_request_id,
                instance.reviewer_id,
            ));
        }

        slots.push(instance.clone());
        self.staging
            .slots
            .insert(instance.pull_request_id.clone(), slots);
        Ok(instance)
    }

    async fn assignment_slots_set_reviewer(
        &mut self,
        pull_request_id: &str,
        slot: u32,
        reviewer_id: &str,
        assigned_at: OffsetDateTime,
    ) -> Result<AssignmentSlot> {
        self.lock_row(pull_request_id).await?;

        if self.user(reviewer_id).is_none() {
            return Err(DatabaseError::UnknownUser(reviewer_id.into()));
        }

        let mut slots = self.slots(pull_request_id);
        if !slots.iter().any(|s| s.slot == slot) {
            return Err(DatabaseError::UnknownSlot(pull_request_id.into(), slot));
        }
        if slots
            .iter()
            .any(|s| s.slot != slot && s.reviewer_id == reviewer_id)
        {
            return Err(DatabaseError::ReviewerAlreadyAssigned(
                pull_request_id.into(),
                reviewer_id.into(),
            ));
        }

        let seat = slots
            .iter_mut()
            .find(|s| s.slot == slot)
            .ok_or_else(|| DatabaseError::UnknownSlot(pull_request_id.into(), slot))?;
        reviewer_id.clone_into(&mut seat.reviewer_id);
        seat.assigned_at = assigned_at;
        let updated = seat.clone();

        self.staging.slots.insert(pull_request_id.into(), slots);
        Ok(updated)
    }

    async fn users_get(&mut self, id: &str) -> Result<Option<User>> {
        Ok(self.user(id))
    }

    async fn users_upsert(&mut self, instance: User) -> Result<User> {
        if !self.team_exists(&instance.team_name) {
            return Err(DatabaseError::UnknownTeam(instance.team_name));
        }

        let now = current_timestamp();
        let created_at = self
            .user(&instance.id)
            .map(|u| u.created_at)
            .unwrap_or(now);
        let user = User {
            created_at,
            updated_at: now,
            ..instance
        };

        self.staging.activity.remove(&user.id);
        self.staging.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn users_set_active(&mut self, id: &str, value: bool) -> Result<User> {
        let mut user = self
            .user(id)
            .ok_or_else(|| DatabaseError::UnknownUser(id.into()))?;
        user.is_active = value;
        user.updated_at = current_timestamp();

        // Only the flag is written back, other columns stay as committed.
        match self.staging.users.get_mut(id) {
            Some(staged) => staged.clone_from(&user),
            None => {
                self.staging
                    .activity
                    .insert(id.into(), (user.is_active, user.updated_at));
            }
        }
        Ok(user)
    }

    async fn users_list_active_teammates(
        &mut self,
        team_name: &str,
        excluding: &[String],
    ) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.read(|state, staging| {
            let mut users: HashMap<&str, User> = state
                .users
                .iter()
                .map(|(k, v)| (k.as_str(), staging.with_activity(v.clone())))
                .collect();
            users.extend(staging.users.iter().map(|(k, v)| (k.as_str(), v.clone())));

            users
                .into_values()
                .filter(|u| u.team_name == team_name && u.is_active)
                .filter(|u| !excluding.contains(&u.id))
                .map(|u| u.id.clone())
                .collect()
        });
        ids.sort();
        Ok(ids)
    }

    async fn teams_create(&mut self, instance: Team) -> Result<Team> {
        if self.team_exists(&instance.name) {
            return Err(DatabaseError::TeamAlreadyExists(instance.name));
        }

        self.staging
            .teams
            .insert(instance.name.clone(), instance.clone());
        Ok(instance)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let Self {
            inner,
            staging,
            guards,
        } = *self;

        {
            let mut state = inner.state.write().unwrap();

            // Creations race with other transactions until now.
            if let Some(name) = staging.teams.keys().find(|n| state.teams.contains_key(*n)) {
                return Err(DatabaseError::TeamAlreadyExists(name.clone()));
            }
            if let Some(id) = staging
                .created_pull_requests
                .iter()
                .find(|id| state.pull_requests.contains_key(*id))
            {
                return Err(DatabaseError::PullRequestAlreadyExists(id.clone()));
            }

            state.teams.extend(staging.teams);
            state.users.extend(staging.users);
            for (id, (is_active, updated_at)) in staging.activity {
                if let Some(user) = state.users.get_mut(&id) {
                    user.is_active = is_active;
                    user.updated_at = updated_at;
                }
            }
            state.pull_requests.extend(staging.pull_requests);
            state.slots.extend(staging.slots);
        }

        drop(guards);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
