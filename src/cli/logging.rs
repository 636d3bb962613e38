//! Module implementing logging for the application.
//!
//! This includes setting up log filtering given a verbosity value,
//! as well as defining how the logs are being formatted to stderr.

use std::env;
use std::io::{self, Write};

use ansi_term::{Colour, Style};
use log::SetLoggerError;
use slog::{self, Drain, FilterLevel, Level, Logger, OwnedKVList, Record};
use slog_envlogger::LogBuilder;
use slog_scope::GlobalLoggerGuard;


// Default logging level (verbosity of zero).
const DEFAULT_LEVEL: FilterLevel = FilterLevel::Info;

/// Format of the log timestamps.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";


/// Initialize logging with given verbosity.
/// The verbosity value has the same meaning as in args::Options::verbosity.
///
/// The returned guard has to be kept alive for as long as logging should work.
pub fn init(verbosity: isize) -> Result<GlobalLoggerGuard, SetLoggerError> {
    let istty = cfg!(unix) && isatty::stderr_isatty();
    let stderr = LogFormat{tty: istty};

    // Determine the log filtering level based on verbosity.
    // If the verbosity is excessive, an extra message is logged at the end.
    let level = match verbosity {
        v if v < -2 => FilterLevel::Off,
        -2 => FilterLevel::Error,
        -1 => FilterLevel::Warning,
        0 => DEFAULT_LEVEL,
        1 => FilterLevel::Debug,
        _ => FilterLevel::Trace,
    };
    let mut builder = LogBuilder::new(stderr).filter(None, level);
    // Include any additional config from environmental variables.
    // This will override the options above if necessary,
    // so e.g. it is still possible to get full debug output from a library.
    if let Ok(ref conf) = env::var("RUST_LOG") {
        builder = builder.parse(conf);
    }

    let drain = slog_async::Async::new(builder.build().ignore_res()).build().fuse();
    let logger = Logger::root(drain, slog::o!());
    let guard = slog_scope::set_global_logger(logger);
    slog_stdlog::init()?;

    if verbosity > 2 {
        warn!("-v/-q flag passed too many times, logging level {:?} assumed", level);
    }
    Ok(guard)
}


/// Drain formatting log records as human-readable lines on stderr.
struct LogFormat {
    tty: bool,
}

impl Drain for LogFormat {
    type Ok = ();
    type Err = io::Error;

    fn log(&self, record: &Record, _values: &OwnedKVList) -> io::Result<()> {
        let now = time::now();
        let timestamp = time::strftime(TIMESTAMP_FORMAT, &now)
            .unwrap_or_else(|_| now.rfc3339().to_string());

        let level = record.level();
        let level_str = format!("{:<5}", level.as_short_str());
        let origin = if record.tag().is_empty() { record.module() } else { record.tag() };

        let line = if self.tty {
            format!("{} {} {}: {}\n",
                Colour::Black.bold().paint(timestamp),
                self.level_style(level).paint(level_str),
                Style::new().dimmed().paint(origin),
                record.msg())
        } else {
            format!("[{}] {} {}: {}\n", timestamp, level_str, origin, record.msg())
        };

        let stderr = io::stderr();
        let mut stderr = stderr.lock();
        stderr.write_all(line.as_bytes())?;
        stderr.flush()
    }
}

impl LogFormat {
    fn level_style(&self, level: Level) -> Style {
        match level {
            Level::Critical | Level::Error => Colour::Red.bold(),
            Level::Warning => Colour::Yellow.bold(),
            Level::Info => Colour::Green.normal(),
            Level::Debug => Colour::Blue.normal(),
            Level::Trace => Colour::Purple.normal(),
        }
    }
}

