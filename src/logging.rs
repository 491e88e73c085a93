// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Logging setup for the command line tool.
//!
//! The library only emits `tracing` events; installing a subscriber is
//! the binary's business.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Console verbosity: `quiet` wins over `verbose`.
pub fn console_level(verbose: bool, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::WARN
    } else if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Send events to stderr at the level chosen by `verbose`/`quiet`, and,
/// when `log_file` is given, everything down to debug into that file.
/// Verbose console output also names the level and the emitting module.
pub fn setup_cli_logging(
    verbose: bool,
    quiet: bool,
    log_file: Option<&Path>,
) -> Result<(), failure::Error> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_level(verbose)
        .with_target(verbose)
        .with_filter(console_level(verbose, quiet));

    let file = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(Mutex::new(File::create(path)?))
                .with_ansi(false)
                .with_filter(LevelFilter::DEBUG),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_beats_verbose() {
        assert_eq!(console_level(true, true), LevelFilter::WARN);
        assert_eq!(console_level(true, false), LevelFilter::DEBUG);
        assert_eq!(console_level(false, false), LevelFilter::INFO);
    }
}
