//! Per-actor serialization.
//!
//! Each actor maps to a `Semaphore(1)`.  Tokio semaphores are fair, so
//! events from one actor are handled strictly in arrival order while
//! different actors run concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use rc_domain::error::{Error, Result};
use rc_domain::event::ActorId;

#[derive(Default)]
pub struct ActorLocks {
    locks: Mutex<HashMap<ActorId, Arc<Semaphore>>>,
}

impl ActorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the actor's turn.  The permit releases on drop.
    pub async fn acquire(&self, actor_id: ActorId) -> Result<OwnedSemaphorePermit> {
        let sem = {
            let mut locks = self.locks.lock();
            locks
                .entry(actor_id)
                .or_insert_with(|| Arc::new(Semaphore::new(1)))
                .clone()
        };

        sem.acquire_owned()
            .await
            .map_err(|_| Error::Other(format!("actor {actor_id} lock closed")))
    }

    /// Number of tracked actors.
    pub fn actor_count(&self) -> usize {
        self.locks.lock().len()
    }

    /// Drop locks nobody holds or waits on.
    pub fn prune_idle(&self) {
        let mut locks = self.locks.lock();
        locks.retain(|_, sem| Arc::strong_count(sem) > 1 || sem.available_permits() == 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn sequential_access() {
        let locks = ActorLocks::new();
        let p1 = locks.acquire(1).await.unwrap();
        drop(p1);
        let p2 = locks.acquire(1).await.unwrap();
        drop(p2);
    }

    #[tokio::test]
    async fn different_actors_run_concurrently() {
        let locks = ActorLocks::new();
        let p1 = locks.acquire(1).await.unwrap();
        let p2 = locks.acquire(2).await.unwrap();
        assert_eq!(locks.actor_count(), 2);
        drop(p1);
        drop(p2);
    }

    #[tokio::test]
    async fn same_actor_is_fifo() {
        let locks = Arc::new(ActorLocks::new());
        let order = Arc::new(Mutex::new(Vec::new()));
        let first = locks.acquire(7).await.unwrap();

        let mut handles = Vec::new();
        for n in 0..3 {
            let locks = locks.clone();
            let order = order.clone();
            handles.push(tokio::spawn(async move {
                let _permit = locks.acquire(7).await.unwrap();
                order.lock().push(n);
            }));
            // Let each waiter queue before the next one.
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        drop(first);
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn prune_keeps_held_locks() {
        let locks = ActorLocks::new();
        let held = locks.acquire(1).await.unwrap();
        drop(locks.acquire(2).await.unwrap());
        locks.prune_idle();
        assert_eq!(locks.actor_count(), 1);
        drop(held);
        locks.prune_idle();
        assert_eq!(locks.actor_count(), 0);
    }
}
