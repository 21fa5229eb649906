//! Page scroll lock service
//!
//! A reference-counted lock owned by the hosting application shell. Widgets
//! that want to freeze page scrolling while an overlay is open acquire a
//! [`ScrollLockGuard`]; the lock stays engaged while at least one guard is
//! alive and is released when the last guard drops.
//!
//! ```ignore
//! use sift_core::ScrollLock;
//!
//! let lock = ScrollLock::with_handler(|locked| page.set_overflow_hidden(locked));
//!
//! let guard = lock.acquire();   // handler(true)
//! drop(guard);                  // handler(false)
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Callback notified when the lock engages (`true`) or releases (`false`)
pub type ScrollLockHandler = Arc<dyn Fn(bool) + Send + Sync>;

struct ScrollLockInner {
    holders: usize,
    handler: Option<ScrollLockHandler>,
}

/// Shared page scroll lock
///
/// Cloning yields another handle to the same lock.
#[derive(Clone)]
pub struct ScrollLock {
    inner: Arc<Mutex<ScrollLockInner>>,
}

impl Default for ScrollLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLock")
            .field("holders", &self.holders())
            .finish()
    }
}

impl ScrollLock {
    /// Create a lock without a handler
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScrollLockInner {
                holders: 0,
                handler: None,
            })),
        }
    }

    /// Create a lock that reports engage/release transitions to `handler`
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let lock = Self::new();
        lock.state().handler = Some(Arc::new(handler));
        lock
    }

    fn state(&self) -> MutexGuard<'_, ScrollLockInner> {
        // A panicking handler must not wedge the lock for every other widget
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Acquire the lock, engaging it if this is the first holder
    pub fn acquire(&self) -> ScrollLockGuard {
        let handler = {
            let mut state = self.state();
            state.holders += 1;
            tracing::trace!(holders = state.holders, "scroll lock acquired");
            (state.holders == 1).then(|| state.handler.clone()).flatten()
        };
        if let Some(handler) = handler {
            handler(true);
        }
        ScrollLockGuard {
            lock: Some(self.clone()),
        }
    }

    fn release(&self) {
        let handler = {
            let mut state = self.state();
            state.holders = state.holders.saturating_sub(1);
            tracing::trace!(holders = state.holders, "scroll lock released");
            (state.holders == 0).then(|| state.handler.clone()).flatten()
        };
        if let Some(handler) = handler {
            handler(false);
        }
    }

    /// Whether any guard is currently alive
    pub fn is_locked(&self) -> bool {
        self.holders() > 0
    }

    /// Number of live guards
    pub fn holders(&self) -> usize {
        self.state().holders
    }
}

/// Scoped hold on a [`ScrollLock`]; releases on drop
#[must_use = "the scroll lock is released as soon as the guard is dropped"]
pub struct ScrollLockGuard {
    lock: Option<ScrollLock>,
}

impl ScrollLockGuard {
    /// Release explicitly (equivalent to dropping)
    pub fn release(mut self) {
        if let Some(lock) = self.lock.take() {
            lock.release();
        }
    }
}

impl fmt::Debug for ScrollLockGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLockGuard").finish_non_exhaustive()
    }
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        if let Some(lock) = self.lock.take() {
            lock.release();
        }
    }
}
