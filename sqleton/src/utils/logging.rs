//! Logging utilities for sqleton
//!
//! Log output never goes to stdout, which may be carrying the DOT document.

use std::fs::File;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Level used when no logging configuration is given
const DEFAULT_LEVEL: Level = Level::WARN;

/// Initialize logging based on configuration
pub fn init_logging(config: &Option<LoggingConfig>) -> Result<()> {
    let level = config
        .as_ref()
        .map(|cfg| parse_level(&cfg.level))
        .unwrap_or(DEFAULT_LEVEL);

    let directive = format!("sqleton={}", level.as_str().to_lowercase())
        .parse::<Directive>()
        .map_err(|e| Error::ConfigError(format!("Invalid log directive: {}", e)))?;
    let env_filter = EnvFilter::from_default_env().add_directive(directive);

    let json = config
        .as_ref()
        .is_some_and(|cfg| cfg.format.eq_ignore_ascii_case("json"));
    let file = config.as_ref().and_then(|cfg| cfg.file.as_deref());

    if let Some(file_path) = file {
        if let Some(parent) = Path::new(file_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(file_path)?;

        if json {
            let subscriber = fmt::Subscriber::builder()
                .json()
                .with_env_filter(env_filter)
                .with_writer(file)
                .finish();
            set_global(subscriber)
        } else {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(file)
                .finish();
            set_global(subscriber)
        }
    } else if json {
        let subscriber = fmt::Subscriber::builder()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .finish();
        set_global(subscriber)
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .finish();
        set_global(subscriber)
    }
}

fn set_global<S>(subscriber: S) -> Result<()>
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::ConfigError(format!("Failed to install logger: {}", e)))
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => DEFAULT_LEVEL,
    }
}
