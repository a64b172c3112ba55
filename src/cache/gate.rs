//! Per-namespace mutual exclusion.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::CacheError;

/// Serializes every operation against one namespace directory.
///
/// The gate is held by the blocking I/O task itself, not by the caller's
/// future, so cancelling a caller mid-operation cannot release the gate while
/// the filesystem work is still running.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    inner: Arc<Mutex<()>>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the gate, then run `op` on the blocking pool while holding it.
    pub async fn run<F, R>(&self, op: F) -> Result<R, CacheError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let guard = self.inner.clone().lock_owned().await;
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            op()
        })
        .await
        .map_err(|e| CacheError::Task(e.to_string()))
    }

    #[cfg(test)]
    pub(crate) async fn hold(&self) -> tokio::sync::OwnedMutexGuard<()> {
        self.inner.clone().lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_returns_value() {
        let gate = Gate::new();
        assert_eq!(gate.run(|| 7).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_run_waits_for_holder() {
        let gate = Gate::new();
        let guard = gate.hold().await;

        let pending = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.run(|| 1).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!pending.is_finished());

        drop(guard);
        assert_eq!(pending.await.unwrap().unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_operations_never_overlap() {
        let gate = Gate::new();
        let active = Arc::new(AtomicUsize::new(0));
        let overlaps = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..32 {
            let gate = gate.clone();
            let active = active.clone();
            let overlaps = overlaps.clone();
            handles.push(tokio::spawn(async move {
                gate.run(move || {
                    if active.fetch_add(1, Ordering::SeqCst) != 0 {
                        overlaps.fetch_add(1, Ordering::SeqCst);
                    }
                    std::thread::sleep(Duration::from_millis(1));
                    active.fetch_sub(1, Ordering::SeqCst);
                })
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    }
}
