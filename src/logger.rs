//! Provides configuration of the logger.
use env_logger::Builder;
use log::LevelFilter;
use log::trace;
use std::io::Write;

/// Log level for a `-v` count
///
/// Warnings (skipped elements, unparsable projects) are always shown.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Configures the log with the specified verbosity.
///
/// Higher verbosity results in additional log messages
/// up to a maximum verbosity level. `QDSM_LOG` can refine the filter
/// with the usual env_logger syntax.
pub fn configure(verbosity: u8) {
    let log_level = level_for(verbosity);

    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            if record.level() <= log::Level::Warn {
                writeln!(buf, "{}: {}", record.level(), record.args())
            } else {
                writeln!(buf, "{}", record.args())
            }
        })
        .filter_level(log_level)
        .parse_env("QDSM_LOG");

    // A second initialization keeps the first logger
    if builder.try_init().is_ok() {
        trace!("Logger verbosity {log_level}");
    }
}
