//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over the configured level when it is set. Chatty
//! dependency targets are held at `warn` unless `RUST_LOG` names them.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Dependency targets that only log useful lines at `warn` and above.
const QUIET_TARGETS: &[&str] = &["sqlx", "hyper", "lettre"];

/// Normalize a configured level name, falling back to `info`.
fn level_name(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// Directive string for a configured level.
fn directives(level: &str) -> String {
    let mut out = level_name(level).to_string();
    for target in QUIET_TARGETS {
        out.push_str(&format!(",{target}=warn"));
    }
    out
}

fn build_filter(level: &str) -> EnvFilter {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(env) if !env.trim().is_empty() => EnvFilter::new(env),
        _ => EnvFilter::new(directives(level)),
    }
}

/// Install the global subscriber.
///
/// Writes to stdout and, when `config.file` is set, appends plain lines to
/// that file. Missing parent directories are created.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if config.file.is_empty() {
        init_console_only(&config.level);
        return Ok(());
    }

    let path = Path::new(&config.file);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = Arc::new(OpenOptions::new().create(true).append(true).open(path)?);

    tracing_subscriber::registry()
        .with(build_filter(&config.level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout.and(file))
                .with_ansi(false),
        )
        .init();

    Ok(())
}

/// Install a stdout-only subscriber.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
