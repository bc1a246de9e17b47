//! Tracing infrastructure for development diagnostics
//!
//! # Usage
//!
//! Configure via `LINE_GUTTER_LOG` (or `RUST_LOG` if that is unset):
//! - `LINE_GUTTER_LOG=debug` - everything, including fontdue and image
//! - `LINE_GUTTER_LOG=line_gutter::gutter=debug` - width changes per paint pass
//! - `LINE_GUTTER_LOG=line_gutter::gutter::paint=trace` - rows laid out per pass
//! - `LINE_GUTTER_LOG=line_gutter::schedule=trace` - notifications dropped while disabled
//!
//! # Log Files
//!
//! Logs are written to `~/.config/line-gutter/logs/line-gutter.log` with daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable read before `RUST_LOG`
pub const LOG_ENV: &str = "LINE_GUTTER_LOG";

/// Console default: skipped rows, host failures and runaway resizes
pub const CONSOLE_DIRECTIVES: &str = "warn";

/// File default: the gutter's own debug events, dependencies at warn
pub const FILE_DIRECTIVES: &str = "warn,line_gutter=debug";

/// Console filter from `LINE_GUTTER_LOG`, then `RUST_LOG`, then
/// [`CONSOLE_DIRECTIVES`]
fn console_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(CONSOLE_DIRECTIVES))
}

/// Initialize tracing subscriber with console and file logging
pub fn init() {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter());

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "line-gutter.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(FILE_DIRECTIVES)),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
