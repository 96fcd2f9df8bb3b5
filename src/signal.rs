//! Cancellation tokens for in-flight searches.
//!
//! A controller hands out signals; aborting the controller flips every clone
//! of its signal. Long-running loops poll `aborted()` between steps.

use futures::future::AbortHandle;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SIGNAL_ID: AtomicU64 = AtomicU64::new(1);

/// Read side of an [`AbortController`].
#[derive(Clone)]
pub struct AbortSignal {
    id: u64,
    handle: AbortHandle,
}

impl AbortSignal {
    pub fn aborted(&self) -> bool {
        self.handle.is_aborted()
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl PartialEq for AbortSignal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("id", &self.id)
            .field("aborted", &self.aborted())
            .finish()
    }
}

/// Owns one signal and can abort it.
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    pub fn new() -> Self {
        // Only the shared aborted flag is used; the registration is not needed.
        let (handle, _registration) = AbortHandle::new_pair();
        Self {
            signal: AbortSignal {
                id: NEXT_SIGNAL_ID.fetch_add(1, Ordering::Relaxed),
                handle,
            },
        }
    }

    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Abort every clone of this controller's signal. Calling twice is a no-op.
    pub fn abort(&self) {
        self.signal.handle.abort();
    }
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_reaches_every_clone() {
        let controller = AbortController::new();
        let a = controller.signal();
        let b = a.clone();
        assert!(!a.aborted());
        controller.abort();
        controller.abort();
        assert!(a.aborted());
        assert!(b.aborted());
    }

    #[test]
    fn signals_from_different_controllers_differ() {
        let first = AbortController::new();
        let second = AbortController::new();
        assert_eq!(first.signal(), first.signal());
        assert_ne!(first.signal(), second.signal());
        assert!(second.signal().id() > first.signal().id());
    }
}
