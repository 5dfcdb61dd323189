//! Logging utilities for the Vasool client.
//!
//! Sets up the `tracing` subscriber shared by every crate: a formatted stdout
//! layer, an optional daily rolling file layer and, on Linux, an optional
//! journald layer.

use tracing::{error, info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};
use vasool_config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// File name prefix of the rolling log files.
const LOG_FILE_PREFIX: &str = "vasool.log";

/// Initialize the tracing subscriber at INFO.
///
/// # Examples
///
/// ```
/// use vasool_common::logging;
///
/// logging::init();
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
pub fn init_with_level(level: Level) {
    let _ = init_layers(level, None, false);
}

/// Initialize the tracing subscriber from the `[logging]` config section.
///
/// Returns the worker guard of the file writer when a log directory is
/// configured; it must be kept alive for as long as logs should be flushed.
pub fn init_from_config(config: Option<&LoggingConfig>) -> Option<WorkerGuard> {
    let level = config
        .and_then(|c| c.level.as_deref())
        .and_then(|l| l.parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    let directory = config.and_then(|c| c.directory.as_deref());
    let journald = config.map(|c| c.journald).unwrap_or(false);

    init_layers(level, directory, journald)
}

fn init_layers(level: Level, directory: Option<&str>, journald: bool) -> Option<WorkerGuard> {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()));
    if let Ok(directive) = format!("vasool={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    let mut layers: Vec<BoxedLayer> = vec![fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .boxed()];

    let mut guard = None;
    if let Some(directory) = directory {
        let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
        let (writer, worker_guard) = tracing_appender::non_blocking(appender);
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .boxed(),
        );
        guard = Some(worker_guard);
    }

    #[cfg(target_os = "linux")]
    if journald {
        match tracing_journald::layer() {
            Ok(layer) => layers.push(layer.boxed()),
            Err(e) => eprintln!("journald unavailable: {}", e),
        }
    }
    #[cfg(not(target_os = "linux"))]
    if journald {
        eprintln!("journald logging is only available on Linux");
    }

    // try_init: a global subscriber may already be set (tests, embedding hosts)
    let result = tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
        if let Some(directory) = directory {
            info!("Writing log files to {}", directory);
        }
    } else {
        warn!("Logging was already initialized");
    }

    guard
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result, allowing this function to be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}
