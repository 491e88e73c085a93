// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use image::Rgb;
use seamcarver::logging::setup_cli_logging;
use seamcarver::{
    energy_to_image, CarveError, Direction, EnergyKind, FixedBatch, SeamCalculator, SeamCarver,
    HIGHLIGHT_COLOR,
};
use std::convert::TryFrom;
use std::path::Path;
use std::process;
use tracing::{error, info, warn};

fn cli() -> App<'static, 'static> {
    let image = Arg::with_name("image")
        .help("The image to carve")
        .required(true)
        .index(1);
    let direction = Arg::with_name("direction")
        .help("Which way the seams run")
        .required(true)
        .possible_values(&["vertical", "horizontal"])
        .index(2);
    let count = Arg::with_name("count")
        .help("How many seams")
        .default_value("1")
        .index(3);

    App::new("seamcarver")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Content-aware image resizing by seam carving")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("output")
                .help("Where to write the resulting image")
                .short("o")
                .long("output")
                .takes_value(true)
                .default_value("output.png"),
        )
        .arg(
            Arg::with_name("log-file")
                .help("Also write a debug-level log to this file")
                .long("log-file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .help("Report every carving step")
                .short("v")
                .long("verbose"),
        )
        .arg(
            Arg::with_name("quiet")
                .help("Only report warnings and errors")
                .short("q")
                .long("quiet"),
        )
        .arg(
            Arg::with_name("energy")
                .help("Energy method used to rank pixels")
                .short("e")
                .long("energy")
                .takes_value(true)
                .possible_values(&EnergyKind::NAMES)
                .default_value("gradient"),
        )
        .arg(
            Arg::with_name("batch")
                .help("Trace this many seams per energy computation instead of the width-based schedule")
                .long("batch")
                .takes_value(true),
        )
        .subcommand(
            SubCommand::with_name("resize")
                .about("Carve the image down to HEIGHT x WIDTH")
                .setting(AppSettings::AllowNegativeNumbers)
                .arg(image.clone())
                .arg(Arg::with_name("height").required(true).index(2))
                .arg(Arg::with_name("width").required(true).index(3)),
        )
        .subcommand(
            SubCommand::with_name("remove")
                .about("Remove seams from the image")
                .setting(AppSettings::AllowNegativeNumbers)
                .arg(image.clone())
                .arg(direction.clone())
                .arg(count.clone()),
        )
        .subcommand(
            SubCommand::with_name("highlight")
                .about("Paint seams over the image")
                .setting(AppSettings::AllowNegativeNumbers)
                .arg(image.clone())
                .arg(direction)
                .arg(count)
                .arg(
                    Arg::with_name("color")
                        .help("Seam colour as R,G,B")
                        .long("color")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("energy")
                .about("Write the energy map as a greyscale image")
                .arg(image),
        )
}

// Counts and sizes are parsed wide so that a negative number is
// reported as an unsupported target rather than a typo.
fn parse_count(name: &str, value: &str) -> Result<u32, CarveError> {
    let n: i64 = value.trim().parse().map_err(|_| CarveError::InvalidInput {
        reason: format!("{} must be a whole number, got '{}'", name, value),
    })?;
    if n < 0 {
        return Err(CarveError::UnsupportedTarget {
            reason: format!("{} cannot be negative ({}): seam carving only shrinks", name, n),
        });
    }
    u32::try_from(n).map_err(|_| CarveError::UnsupportedTarget {
        reason: format!("{} is too large ({})", name, n),
    })
}

fn parse_color(value: &str) -> Result<Rgb<u8>, CarveError> {
    let bad = || CarveError::InvalidInput {
        reason: format!("colour must be R,G,B with values 0-255, got '{}'", value),
    };
    let channels = value
        .split(',')
        .map(|c| c.trim().parse::<u8>().map_err(|_| bad()))
        .collect::<Result<Vec<_>, _>>()?;
    match channels.as_slice() {
        [r, g, b] => Ok(Rgb([*r, *g, *b])),
        _ => Err(bad()),
    }
}

fn load(matches: &ArgMatches, sub: &ArgMatches) -> Result<SeamCarver, CarveError> {
    let kind: EnergyKind = matches.value_of("energy").unwrap_or("gradient").parse()?;
    let mut calculator = SeamCalculator::new(kind.method());
    if let Some(batch) = matches.value_of("batch") {
        calculator = calculator.with_planner(FixedBatch(parse_count("batch", batch)?));
    }
    let path = sub.value_of("image").unwrap_or_default();
    let carver = SeamCarver::open(path)?
        .with_calculator(calculator)
        .verbose(matches.is_present("verbose"));
    let (width, height) = carver.dimensions();
    info!(path, width, height, energy = %kind, "loaded image");
    Ok(carver)
}

// A short count still leaves a carved image worth keeping: write it,
// then report the exhaustion.
fn finish(carver: &SeamCarver, output: &str, outcome: Result<u32, CarveError>) -> Result<(), failure::Error> {
    let exhausted = match outcome {
        Ok(_) => None,
        Err(err @ CarveError::SeamsExhausted { .. }) => Some(err),
        Err(err) => return Err(err.into()),
    };
    carver.save(output)?;
    let (width, height) = carver.dimensions();
    info!(output, width, height, "wrote image");
    match exhausted {
        Some(err) => {
            warn!("{}", err);
            Err(err.into())
        }
        None => Ok(()),
    }
}

fn direction_and_count(sub: &ArgMatches) -> Result<(Direction, u32), CarveError> {
    let direction = sub.value_of("direction").unwrap_or("vertical").parse()?;
    let count = parse_count("count", sub.value_of("count").unwrap_or("1"))?;
    Ok((direction, count))
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let output = matches.value_of("output").unwrap_or("output.png");
    match matches.subcommand() {
        ("resize", Some(sub)) => {
            let height = parse_count("height", sub.value_of("height").unwrap_or_default())?;
            let width = parse_count("width", sub.value_of("width").unwrap_or_default())?;
            let mut carver = load(matches, sub)?;
            let outcome = carver.resize(height, width).map(|_| 0);
            finish(&carver, output, outcome)
        }
        ("remove", Some(sub)) => {
            let (direction, count) = direction_and_count(sub)?;
            let mut carver = load(matches, sub)?;
            let outcome = carver.remove(direction, count);
            finish(&carver, output, outcome)
        }
        ("highlight", Some(sub)) => {
            let (direction, count) = direction_and_count(sub)?;
            let color = match sub.value_of("color") {
                Some(value) => parse_color(value)?,
                None => HIGHLIGHT_COLOR,
            };
            let mut carver = load(matches, sub)?;
            let outcome = carver.highlight(direction, count, color);
            finish(&carver, output, outcome)
        }
        ("energy", Some(sub)) => {
            let carver = load(matches, sub)?;
            energy_to_image(&carver.energy_map()?).save(output)?;
            info!(output, "wrote energy map");
            Ok(())
        }
        (other, _) => Err(failure::format_err!("unknown command '{}'", other)),
    }
}

fn exit_code(err: &failure::Error) -> i32 {
    match err.downcast_ref::<CarveError>() {
        Some(CarveError::InvalidInput { .. }) => 2,
        Some(CarveError::UnsupportedTarget { .. }) => 3,
        Some(CarveError::SeamsExhausted { .. }) => 4,
        Some(CarveError::ResourceExhaustion { .. }) => 5,
        _ => 1,
    }
}

fn main() {
    let matches = cli().get_matches();
    let verbose = matches.is_present("verbose");
    let quiet = matches.is_present("quiet");
    if let Err(err) = setup_cli_logging(verbose, quiet, matches.value_of("log-file").map(Path::new)) {
        eprintln!("seamcarver: cannot set up logging: {}", err);
        process::exit(1);
    }

    if let Err(err) = run(&matches) {
        error!("{}", err);
        process::exit(exit_code(&err));
    }
}
