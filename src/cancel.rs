//! Cooperative cancellation for long-running background operations.
//!
//! A [`CancelToken`] is a mutex-guarded flag that a worker polls between units of
//! work. Cancelling never interrupts I/O that is already in progress.
//!
//! Only one long operation is live at a time. [`CancelSlot`] lives with the reactor
//! and is the single place tokens are issued: [`CancelSlot::reissue`] cancels the
//! token handed to the previous worker before minting the next one.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_TOKEN_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct Flag {
    id: u64,
    cancelled: Mutex<bool>,
}

/// Handle to one cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<Flag>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(Flag {
                id: NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed),
                cancelled: Mutex::new(false),
            }),
        }
    }

    pub fn cancel(&self) {
        *self.flag.cancelled.lock() = true;
    }

    pub fn is_cancelled(&self) -> bool {
        *self.flag.cancelled.lock()
    }

    /// Clear the flag so the token can be reused by its current holder.
    pub fn reset(&self) {
        *self.flag.cancelled.lock() = false;
    }

    /// Stable identifier, useful in diagnostics.
    pub fn id(&self) -> u64 {
        self.flag.id
    }

    /// True when both handles refer to the same flag.
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.flag, &other.flag)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of the one live token.
#[derive(Debug, Default)]
pub struct CancelSlot {
    current: Option<CancelToken>,
}

impl CancelSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever operation holds the current token and issue a fresh one.
    pub fn reissue(&mut self) -> CancelToken {
        self.cancel();
        let token = CancelToken::new();
        self.current = Some(token.clone());
        token
    }

    /// Cancel the current operation, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }

    /// True if `token` is the live one and has not been cancelled.
    pub fn is_current(&self, token: &CancelToken) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| current.same_as(token) && !current.is_cancelled())
    }

    /// Release the slot once the operation holding `token` has finished.
    pub fn release(&mut self, token: &CancelToken) {
        if self
            .current
            .as_ref()
            .is_some_and(|current| current.same_as(token))
        {
            self.current = None;
        }
    }
}
