//! Cooperative cancellation shared between the engine and its workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::{PiError, PiResult};

/// Flag a running computation polls between terms.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// `Err(PiError::Cancelled)` once [`cancel`](Self::cancel) has been called.
    pub fn check(&self) -> PiResult<()> {
        if self.is_cancelled() {
            Err(PiError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let token = CancellationToken::new();
        let worker_view = token.clone();
        assert!(worker_view.check().is_ok());

        token.cancel();
        assert!(worker_view.is_cancelled());
        assert_eq!(worker_view.check().unwrap_err(), PiError::Cancelled);
    }
}
