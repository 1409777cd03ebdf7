use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use revbot_database_interface::{DatabaseError, Result};
use tokio::sync::OwnedMutexGuard;

pub(crate) type RowGuard = OwnedMutexGuard<()>;

/// Exclusive locks keyed by row identifier.
///
/// Entries nobody holds or waits on are pruned on the next acquisition.
#[derive(Debug, Default)]
pub(crate) struct RowLocks {
    entries: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl RowLocks {
    pub async fn acquire(&self, key: &str, timeout: Duration) -> Result<RowGuard> {
        let entry = {
            let mut entries = self.entries.lock().unwrap();
            entries.retain(|_, m| Arc::strong_count(m) > 1);
            entries.entry(key.to_string()).or_default().clone()
        };

        tokio::time::timeout(timeout, entry.lock_owned())
            .await
            .map_err(|_| DatabaseError::LockTimeout(key.into()))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}
