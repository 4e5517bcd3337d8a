use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>;

/// One async mutex per blog id. Holding the guard makes the caller the only
/// writer of that blog inside this process.
///
/// Entries live only while someone holds or waits for them, so ids that
/// never resolve to a blog leave nothing behind.
#[derive(Default)]
pub struct BlogLocks {
    inner: LockMap,
}

/// Releases the blog mutex on drop and removes the map entry when nobody
/// else is queued on it.
pub struct BlogLockGuard {
    blog_id: i64,
    guard: Option<OwnedMutexGuard<()>>,
    map: LockMap,
}

impl Drop for BlogLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut map = self.map.lock();
        if map.get(&self.blog_id).is_some_and(|m| Arc::strong_count(m) == 1) {
            map.remove(&self.blog_id);
        }
    }
}

impl BlogLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, blog_id: i64) -> BlogLockGuard {
        // declared before the mutex clone so a cancelled wait still cleans up
        let mut held = BlogLockGuard { blog_id, guard: None, map: self.inner.clone() };
        let lock = self.inner.lock().entry(blog_id).or_default().clone();
        held.guard = Some(lock.lock_owned().await);
        held
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
