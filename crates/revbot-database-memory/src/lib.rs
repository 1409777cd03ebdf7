mod locks;
mod transaction;

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
    time::Duration,
};

use async_trait::async_trait;
use locks::RowLocks;
use revbot_database_interface::{DbService, DbTransaction, Result};
use revbot_models::{AssignmentSlot, PullRequest, Team, User};
use transaction::MemoryTransaction;

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
pub(crate) struct MemoryState {
    teams: HashMap<String, Team>,
    users: HashMap<String, User>,
    pull_requests: HashMap<String, PullRequest>,
    slots: HashMap<String, Vec<AssignmentSlot>>,
}

impl MemoryState {
    fn slots_of(&self, pull_request_id: &str) -> Vec<AssignmentSlot> {
        self.slots.get(pull_request_id).cloned().unwrap_or_default()
    }

    fn pull_request_with_slate(&self, id: &str) -> Option<PullRequest> {
        self.pull_requests
            .get(id)
            .map(|pr| pr.clone().with_slots(&self.slots_of(id)))
    }
}

#[derive(Debug)]
pub(crate) struct MemoryInner {
    state: RwLock<MemoryState>,
    row_locks: RowLocks,
    lock_timeout: Duration,
}

/// In-process storage.
///
/// Pull request rows are locked through a keyed mutex table and transactions
/// stage their writes until commit.
#[derive(Debug, Clone)]
pub struct MemoryDb {
    inner: Arc<MemoryInner>,
}

impl Default for MemoryDb {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                state: RwLock::new(MemoryState::default()),
                row_locks: RowLocks::default(),
                lock_timeout,
            }),
        }
    }
}

#[async_trait]
impl DbService for MemoryDb {
    async fn begin(&self) -> Result<Box<dyn DbTransaction>> {
        Ok(Box::new(MemoryTransaction::new(self.inner.clone())))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    async fn users_get(&self, id: &str) -> Result<Option<User>> {
        Ok(self.inner.state.read().unwrap().users.get(id).cloned())
    }

    async fn users_all(&self) -> Result<Vec<User>> {
        let mut values: Vec<_> = self
            .inner
            .state
            .read()
            .unwrap()
            .users
            .values()
            .cloned()
            .collect();
        values.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(values)
    }

    async fn teams_get(&self, name: &str) -> Result<Option<Team>> {
        Ok(self.inner.state.read().unwrap().teams.get(name).cloned())
    }

    async fn teams_all(&self) -> Result<Vec<Team>> {
        let mut values: Vec<_> = self
            .inner
            .state
            .read()
            .unwrap()
            .teams
            .values()
            .cloned()
            .collect();
        values.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(values)
    }

    async fn team_members_list(&self, team_name: &str) -> Result<Vec<User>> {
        let mut values: Vec<_> = self
            .inner
            .state
            .read()
            .unwrap()
            .users
            .values()
            .filter(|u| u.team_name == team_name)
            .cloned()
            .collect();
        values.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(values)
    }

    async fn pull_requests_get(&self, id: &str) -> Result<Option<PullRequest>> {
        Ok(self.inner.state.read().unwrap().pull_request_with_slate(id))
    }

    async fn pull_requests_list_for_reviewer(
        &self,
        reviewer_id: &str,
    ) -> Result<Vec<PullRequest>> {
        let state = self.inner.state.read().unwrap();
        let mut values: Vec<_> = state
            .slots
            .iter()
            .filter(|(_, slots)| slots.iter().any(|s| s.reviewer_id == reviewer_id))
            .filter_map(|(id, _)| state.pull_request_with_slate(id))
            .filter(|pr| pr.status.is_open())
            .collect();
        values.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(values)
    }

    async fn assignment_slots_list(&self, pull_request_id: &str) -> Result<Vec<AssignmentSlot>> {
        let mut values = self.inner.state.read().unwrap().slots_of(pull_request_id);
        values.sort_by_key(|s| s.slot);
        Ok(values)
    }
}
