//! Logging macros with verbosity level control.
//!
//! Logging is a single integer comparison when disabled (verbosity=0).
//! Levels:
//! - 0: SILENT (only errors)
//! - 1: CHANGES (results: project duration, conflicts, forced inclusions)
//! - 2: CHECKS (per-task decisions: dropped edges, budget accept/reject)
//! - 3: DEBUG (pass internals)
//!
//! Each line is prefixed with the module that emitted it, e.g.
//! `[reno_plan::optimizer] Excluding deck ($500.00 exceeds remaining $0.00)`.

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            eprintln!("[{}] {}", module_path!(), format_args!($($arg)*));
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!("[{}] {}", module_path!(), format_args!($($arg)*));
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!("[{}] {}", module_path!(), format_args!($($arg)*));
        }
    };
}
