use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Cooperative stop signal for a running backfill. Clones share state.
///
/// Setting it keeps new records from starting; records already in flight run
/// to completion.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
