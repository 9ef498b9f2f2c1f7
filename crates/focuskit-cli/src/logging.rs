//! Logging setup for the focuskit binary.
//!
//! Logs go to `.focuskit/focuskit.log` through a non-blocking writer so the
//! TUI screen is never written over. Commands that only read state log to
//! stderr and leave the directory alone. `FOCUSKIT_LOG` takes an
//! `EnvFilter` directive and defaults to `info` for the log file and `warn`
//! for stderr.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "FOCUSKIT_LOG";

/// Log file name inside the focuskit directory.
pub const LOG_FILE: &str = "focuskit.log";

/// Where logs may go when the log file is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Write to stderr.
    Stderr,
    /// Drop logs; stderr belongs to the terminal UI.
    Silent,
}

/// Build the filter from `FOCUSKIT_LOG`, defaulting to `default`.
fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize logging into `dir`.
///
/// Returns a `WorkerGuard` that must be held until exit so buffered lines
/// are flushed. Returns `None` when the file could not be used.
pub fn init(dir: &Path, fallback: Fallback) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        // No subscriber yet
        if fallback == Fallback::Stderr {
            eprintln!(
                "Failed to create log directory {}: {e}, using stderr",
                dir.display()
            );
            init_stderr_only();
        }
        return None;
    }

    let file_appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            if fallback == Fallback::Stderr {
                eprintln!("Failed to open log file in {}: {e}", dir.display());
                init_stderr_only();
            }
            return None;
        }
    };
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let initialized = tracing_subscriber::registry()
        .with(file_layer)
        .with(filter("info"))
        .try_init()
        .is_ok();

    if initialized {
        tracing::info!(
            log_file = %dir.join(LOG_FILE).display(),
            "focuskit logging initialized"
        );
    }

    Some(guard)
}

fn init_stderr_only() {
    let _ = stderr_subscriber("info").try_init();
    tracing::info!("focuskit logging initialized (stderr only)");
}

/// Initialize stderr logging for commands that never touch the focuskit
/// directory. Quiet unless `FOCUSKIT_LOG` asks for more.
pub fn init_stderr() {
    let _ = stderr_subscriber("warn").try_init();
}

fn stderr_subscriber(default: &str) -> impl SubscriberInitExt {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter(default))
}
