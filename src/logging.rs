//! Logging configuration and initialization for godw.
//!
//! Upload, delete and rejection events are logged by the file layer; the
//! `tower_http` trace layer adds one span per request. `RUST_LOG` still
//! overrides everything set here.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Parse a configured level name, defaulting to `INFO`.
fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Per-request spans are only emitted at debug or finer.
fn request_directive(level: Level) -> Option<Directive> {
    if level < Level::DEBUG {
        return None;
    }
    format!("tower_http={}", level.as_str().to_lowercase())
        .parse()
        .ok()
}

fn build_filter(level: Level) -> EnvFilter {
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    match request_directive(level) {
        Some(directive) => filter.add_directive(directive),
        None => filter,
    }
}

/// Initialize logging to stdout plus the configured log file.
///
/// The log file is opened in append mode so restarts keep history.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let level = parse_level(&config.level);

    let path = Path::new(&config.file);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let log_file = Arc::new(OpenOptions::new().create(true).append(true).open(path)?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout.and(log_file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(build_filter(level))
        .init();

    Ok(())
}

/// Initialize console-only logging.
///
/// Used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(build_filter(parse_level(level)))
        .init();
}
