//! Gas Ticker Logging System
//!
//! Structured logging through the tracing crate, with a text or JSON
//! formatter writing to stdout or to a file.

use std::io;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Logging configuration options
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to output
    pub level: Level,
    /// Enable colored output
    pub color: bool,
    /// Show timestamps
    pub show_timestamps: bool,
    /// Show target/module name
    pub show_target: bool,
    /// Enable JSON format for machine parsing
    pub json_format: bool,
    /// Enable span events for tracing
    pub enable_spans: bool,
    /// Output to file instead of stdout
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            color: true,
            show_timestamps: true,
            show_target: false,
            json_format: false,
            enable_spans: false,
            file_output: None,
        }
    }
}

impl LoggingConfig {
    /// Create config from CLI arguments
    pub fn from_args(quiet: bool, verbose: bool, json: bool, is_terminal: bool) -> Self {
        let level = if verbose {
            Level::DEBUG
        } else if quiet {
            Level::ERROR
        } else {
            Level::INFO
        };

        Self {
            level,
            color: !json && is_terminal,
            show_timestamps: true,
            show_target: verbose,
            json_format: json,
            enable_spans: verbose,
            file_output: None,
        }
    }

    pub fn with_file(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.color = false;
        }
        self.file_output = path;
        self
    }

    /// Directive used when `RUST_LOG` is unset
    pub fn default_directive(&self) -> String {
        let level = self.level.to_string().to_lowercase();
        format!("gas_ticker={},tower_http={}", level, level)
    }
}

/// Initialize the logging system
pub fn init_logging(config: LoggingConfig) -> io::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let writer = match &config.file_output {
        Some(log_file) => BoxMakeWriter::new(file_writer(log_file)?),
        None => BoxMakeWriter::new(io::stdout),
    };

    let layer = if config.json_format {
        fmt::layer()
            .json()
            .with_current_span(config.enable_spans)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(writer)
            .boxed()
    } else {
        let text = fmt::layer()
            .with_target(config.show_target)
            .with_level(true)
            .with_ansi(config.color)
            .with_writer(writer);
        if config.show_timestamps {
            text.with_timer(fmt::time::ChronoUtc::rfc_3339()).boxed()
        } else {
            text.boxed()
        }
    };

    Registry::default().with(env_filter).with(layer).init();
    Ok(())
}

fn file_writer(log_file: &Path) -> io::Result<RollingFileAppender> {
    let dir = log_file
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid log file path"))?;
    let name = log_file
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid log file name"))?;
    Ok(tracing_appender::rolling::never(dir, name))
}
