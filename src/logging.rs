//! Verbose switch for the `debug!` macro.

use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag for verbose output (set from args in main)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enable or disable verbose output globally.
pub fn set_verbose(value: bool) {
    VERBOSE.store(value, Ordering::Relaxed);
}

/// Check if verbose output is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}
