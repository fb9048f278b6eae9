//! Tracing subscriber setup.
//!
//! `RUST_LOG` always wins over the configured level so a single run can be
//! turned up to `turntable_core=trace` without touching the config file.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::TurntableResult;

fn filter_for(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber described by `config`.
///
/// When `config.file` is set, log lines are appended to that file instead of
/// stderr. Installing twice is harmless; the second call is ignored.
pub fn init_logging(config: &LoggingConfig) -> TurntableResult<()> {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter_for(config))
        .with_target(true)
        .with_thread_ids(false);

    match (&config.file, config.json) {
        (Some(path), json) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            if json {
                tracing::subscriber::set_global_default(builder.json().finish()).ok();
            } else {
                tracing::subscriber::set_global_default(builder.finish()).ok();
            }
        }
        (None, true) => {
            tracing::subscriber::set_global_default(builder.json().finish()).ok();
        }
        (None, false) => {
            let subscriber = builder.with_file(false).with_line_number(false).finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
    }

    Ok(())
}

/// Route logs through the test harness capture. Safe to call from every test.
pub fn init_test_logging() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
