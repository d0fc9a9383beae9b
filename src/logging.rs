//! Tracing setup
//!
//! Configure via the RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=phrasemark::loader=debug` - module-level filtering
//!
//! One-shot commands log to stderr. The watch view owns the screen, so it
//! logs only to `<data dir>/phrasemark/logs/phrasemark.log` with daily
//! rotation.

use std::path::PathBuf;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Where log output should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Directory for log files
pub fn logs_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("phrasemark").join("logs"))
}

/// Initialize the global tracing subscriber
pub fn init(target: LogTarget) {
    let stderr_layer = (target == LogTarget::Stderr).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(filter("warn"))
    });

    let file_layer = match target {
        LogTarget::File => match logs_dir().map(|dir| std::fs::create_dir_all(&dir).map(|_| dir)) {
            Some(Ok(dir)) => {
                let appender = tracing_appender::rolling::daily(dir, "phrasemark.log");
                Some(
                    fmt::layer()
                        .with_writer(appender)
                        .with_ansi(false)
                        .with_target(true)
                        .with_line_number(true)
                        .with_filter(filter("info")),
                )
            }
            Some(Err(e)) => {
                eprintln!("Warning: Could not initialize file logging: {}", e);
                None
            }
            None => None,
        },
        LogTarget::Stderr => None,
    };

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}
