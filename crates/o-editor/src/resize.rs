#![allow(unsafe_code)]
//! Terminal resize notification.
//!
//! A `SIGWINCH` handler sets a process-wide flag and does nothing else.
//! The session loop polls [`take`] between keys and schedules a full
//! redraw when it fires. Storing to an atomic is async-signal-safe, which
//! is all the handler is allowed to do.

use std::sync::atomic::{AtomicBool, Ordering};

/// Set by the signal handler, cleared by [`take`].
static RESIZED: AtomicBool = AtomicBool::new(false);

/// Install the `SIGWINCH` handler. Calling it again is harmless.
#[cfg(unix)]
pub fn install_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = on_sigwinch as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn on_sigwinch(_sig: libc::c_int) {
    RESIZED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
pub fn install_handler() {}

/// Whether a resize happened since the last call. Clears the flag.
#[inline]
#[must_use]
pub fn take() -> bool {
    RESIZED.swap(false, Ordering::Relaxed)
}

/// Raise the flag by hand, as the handler would.
#[inline]
pub fn notify() {
    RESIZED.store(true, Ordering::Relaxed);
}
