use std::collections::HashMap;
use std::sync::Arc;

use arena_core::domain::{ContestId, UserId};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per (contest, user). Every read-modify-write of a
/// submission runs while holding its guard.
#[derive(Debug, Default)]
pub struct SubmissionLocks {
    locks: Mutex<HashMap<(ContestId, UserId), Arc<Mutex<()>>>>,
}

impl SubmissionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, contest_id: ContestId, user_id: UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry((contest_id, user_id)).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drops idle locks belonging to `contest_id`.
    pub async fn forget_contest(&self, contest_id: ContestId) {
        self.locks
            .lock()
            .await
            .retain(|(contest, _), lock| *contest != contest_id || Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}
