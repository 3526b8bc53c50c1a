//! Cooperative cancellation for long-running solves.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared cancel flag, checked at every propagator entry and at each
/// search branch boundary.
///
/// Cancelling is idempotent and there is no way to un-cancel: a solver that
/// should run again gets a fresh flag. Clones of a solver share the flag, so
/// cancelling the original stops in-flight work on its clones too.
///
/// ```
/// # use variant_solver_lib::solver::cancel::CancelFlag;
/// let flag = CancelFlag::new();
/// assert!(!flag.is_cancelled());
/// flag.cancel();
/// flag.cancel();
/// assert!(flag.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
