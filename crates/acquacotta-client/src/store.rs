//! Observable single-writer container.
//!
//! Each store owns one `Observable` and is the only code that writes to it.
//! Writes replace the whole snapshot; readers hold `Arc`s to old snapshots
//! without blocking the writer. Subscribers get a `watch::Receiver` that is
//! marked changed before `set` returns.

use std::sync::Arc;

use tokio::sync::watch;

pub struct Observable<T> {
    tx: watch::Sender<Arc<T>>,
}

impl<T> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx }
    }

    /// Current snapshot.
    pub fn get(&self) -> Arc<T> {
        self.tx.borrow().clone()
    }

    /// Replace the snapshot and notify every subscriber.
    pub fn set(&self, value: T) {
        self.tx.send_replace(Arc::new(value));
    }

    /// Replace the snapshot with `f(current)`.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.tx.send_modify(|current| {
            let next = f(current);
            *current = Arc::new(next);
        });
    }

    /// Replace the snapshot only if `f` produces a new value.
    ///
    /// Returns whether subscribers were notified.
    pub fn update_if(&self, f: impl FnOnce(&T) -> Option<T>) -> bool {
        self.tx.send_if_modified(|current| match f(current) {
            Some(next) => {
                *current = Arc::new(next);
                true
            }
            None => false,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<T>> {
        self.tx.subscribe()
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
