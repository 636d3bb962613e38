//!
//! lolzsh -- Memes in the shell
//!

             extern crate ansi_term;
             extern crate clap;
             extern crate exitcode;
             extern crate futures;
             extern crate isatty;
#[macro_use] extern crate lazy_static;
             extern crate lolz;
             extern crate serde_json;
             extern crate slog;
             extern crate slog_async;
             extern crate slog_envlogger;
             extern crate slog_scope;
             extern crate slog_stdlog;
             extern crate thiserror;
             extern crate time;

// `log` must be at the end of these declarations because we want to use
// the standard `log` macros, while slog's ones are only referred to by path.
#[macro_use] extern crate log;

#[cfg(test)] extern crate image;
#[cfg(test)] #[macro_use] extern crate spectral;
#[cfg(test)] extern crate tempfile;


mod args;
mod commands;
mod logging;


use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::exit;

use futures::Future;
use lolz::{Studio, StudioBuilder};

use crate::args::{ArgsError, Command, Options};


lazy_static! {
    /// Application / package name, as filled out by Cargo.
    static ref NAME: &'static str = option_env!("CARGO_PKG_NAME").unwrap_or("lolzsh");

    /// Application version, as filled out by Cargo.
    static ref VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
}


fn main() {
    let opts = args::parse().unwrap_or_else(|e| {
        let _ = print_args_error(e);
        exit(exitcode::USAGE);
    });
    // Logging has to be shut down (and flushed) before exiting.
    let code = run(opts);
    exit(code);
}

/// Print an error that may occur while parsing arguments.
fn print_args_error(e: ArgsError) -> io::Result<()> {
    match e {
        ArgsError::Parse(ref e) =>
            // In case of generic parse error,
            // message provided by the clap library will be the usage string.
            writeln!(&mut io::stderr(), "{}", e.message),
        e => {
            writeln!(&mut io::stderr(), "Failed to parse arguments: {}", e)
        },
    }
}


/// Run the application with given options, returning its exit code.
fn run(opts: Options) -> exitcode::ExitCode {
    let _guard = match logging::init(opts.verbosity) {
        Ok(guard) => guard,
        Err(e) => {
            let _ = writeln!(&mut io::stderr(), "Failed to initialize logging: {}", e);
            return exitcode::SOFTWARE;
        }
    };
    if cfg!(debug_assertions) {
        warn!("Debug mode! The program will likely be much slower.");
    }
    for (i, arg) in env::args().enumerate() {
        debug!("argv[{}] = {:?}", i, arg);
    }
    trace!("Options parsed from argv:\n{:#?}", opts);

    let studio = match StudioBuilder::new(&opts.data_dir).font_directory(&opts.fonts_dir).build() {
        Ok(studio) => studio,
        Err(e) => {
            error!("Failed to open data directory {}: {}", opts.data_dir.display(), e);
            let _ = writeln!(&mut io::stderr(), "{}: {}", *NAME, e.user_message());
            return exitcode::CANTCREAT;
        }
    };
    install_templates(&studio, &opts.assets_dir);

    if let Command::Render{output_path: None, ..} = opts.command {
        trace!("No --output given, using standard output");
        if isatty::stdout_isatty() {
            warn!("Standard output is a terminal.");
        }
    }

    let quiet = opts.quiet();
    let stdout = io::stdout();
    match commands::execute(&studio, opts.command, quiet, stdout.lock()) {
        Ok(()) => exitcode::OK,
        Err(e) => {
            error!("{}", e);
            let _ = writeln!(&mut io::stderr(), "{}: {}", *NAME, e.user_message());
            e.exit_code()
        }
    }
}

/// Install the bundled templates, if there are any.
fn install_templates(studio: &Studio, assets_dir: &Path) {
    if !assets_dir.is_dir() {
        debug!("No bundled templates found in {}", assets_dir.display());
        return;
    }
    match studio.install_templates(assets_dir).wait() {
        Ok(0) => trace!("All bundled templates already installed"),
        Ok(count) => debug!("Installed {} new template(s) from {}", count, assets_dir.display()),
        Err(e) => warn!("Failed to install templates from {}: {}", assets_dir.display(), e),
    }
}
