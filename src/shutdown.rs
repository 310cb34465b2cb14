//! Process-wide interrupt flag.
//! Set by the ctrlc handler on SIGINT/SIGTERM; the console turns a pending
//! interrupt into a cancel symbol at its next read.
//!
//! Notes:
//! - Relaxed atomics are sufficient for a one-way flag.
//! - `request()` is safe to call from signal handlers.
//!
use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Record an interrupt (idempotent).
#[inline]
pub fn request() {
    SHUTDOWN.store(true, Ordering::Relaxed);
}

/// Check whether an interrupt is pending.
#[inline]
pub fn is_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Consume a pending interrupt, returning whether one was set.
#[inline]
pub fn take_requested() -> bool {
    SHUTDOWN.swap(false, Ordering::Relaxed)
}

/// Drop any stale interrupt so it cannot cancel the next command.
#[inline]
pub fn reset() {
    SHUTDOWN.store(false, Ordering::Relaxed);
}
