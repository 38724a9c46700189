#![deny(missing_docs)]
//! Shared logging utilities for the kiosk workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every line logged
//! through the macros is stamped with the frame tick of the calling thread so
//! that pipeline steps can be lined up against the frame loop.

use std::cell::Cell;

#[doc(hidden)]
pub use log;

thread_local! {
    /// Thread-local storage for the current frame tick count.
    static FRAME_TICK: Cell<u64> = const { Cell::new(0) };
}

/// Sets the frame tick count for the current thread.
/// The frame loop calls this once per tick.
pub fn set_frame_tick(tick: u64) {
    FRAME_TICK.with(|v| v.set(tick));
}

/// Advances the frame tick count for the current thread and returns the new value.
pub fn advance_frame_tick() -> u64 {
    FRAME_TICK.with(|v| {
        let next = v.get().wrapping_add(1);
        v.set(next);
        next
    })
}

/// Retrieves the frame tick count for the current thread.
/// Returns 0 if the frame loop has not started on this thread.
pub fn get_frame_tick() -> u64 {
    FRAME_TICK.with(|v| v.get())
}

/// Logs a trace-level message, prefixed with the frame tick.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!("[tick {}] {}", $crate::get_frame_tick(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message, prefixed with the frame tick.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        $crate::log::info!("[tick {}] {}", $crate::get_frame_tick(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message, prefixed with the frame tick.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!("[tick {}] {}", $crate::get_frame_tick(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message, prefixed with the frame tick.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!("[tick {}] {}", $crate::get_frame_tick(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message, prefixed with the frame tick.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        $crate::log::error!("[tick {}] {}", $crate::get_frame_tick(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
