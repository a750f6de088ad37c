//! Operation context and cancellation
//!
//! Every lifecycle operation receives an [`OpContext`] from the host. The
//! host may cancel it from another thread; the harness checks the flag
//! before issuing the remote call.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cancellation flag shared between the host and an in-flight operation
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Context passed to resource and data source operations
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    cancel: CancelToken,
}

impl OpContext {
    /// Create a context that is never cancelled unless asked to
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context bound to a host-owned cancellation token
    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self { cancel }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}
