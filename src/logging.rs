//! Logger setup for the command-line tool.

use std::io::Write;

/// Padded label for a log level.
fn level_label(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    }
}

/// Default filter for the given verbosity flags. `debug` wins over `quiet`.
pub fn default_level(quiet: bool, debug: bool) -> &'static str {
    if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    }
}

/// Initialize logging to stderr. `RUST_LOG` overrides the flags.
///
/// Calling this more than once keeps the first logger.
pub fn init_logging(quiet: bool, debug: bool) {
    let env = env_logger::Env::default().default_filter_or(default_level(quiet, debug));
    let result = env_logger::Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                buf.timestamp_millis(),
                level_label(record.level()),
                record.args()
            )
        })
        .try_init();

    if result.is_err() {
        log::debug!("logger already initialized");
    }
}
