use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-user async mutexes serializing read-modify-write sequences
/// (e.g. warn then escalate) inside this process.
#[derive(Clone, Debug, Default)]
pub struct UserLocks {
    inner: Arc<Mutex<HashMap<u64, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    pub async fn lock(&self, user_id: u64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().await;
            // Entries nobody holds or waits on can go.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(user_id).or_default().clone()
        };

        lock.lock_owned().await
    }
}
