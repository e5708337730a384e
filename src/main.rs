//! loopset - Set a 4-20 mA loop current through an SPI DAC
//!
//! Configures a Linux spidev bus (mode, bits per word, max speed), then
//! sends one 2-byte control frame carrying the loop current setpoint.
//!
//! # Flow
//!
//! 1. Parse the command line into a `BusConfig` and a setpoint. Bad flags
//!    print usage and exit with status 1 before the device is touched.
//! 2. Open the device and apply the configuration, reading every value
//!    back; the read-back values are what gets printed and used.
//! 3. Scale and clamp the setpoint, encode it, send it in one transfer and
//!    print the bytes.
//!
//! Any device error stops the run, prints `<context>: <error>` to stderr
//! and exits with a failure status. The device is closed on every path.

mod cli;
mod commands;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use cli::Cli;
use loopset_linux_spi::LinuxSpi;
use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

/// Exit status for an unusable command line
const USAGE_EXIT_STATUS: u8 = 1;

fn main() -> ExitCode {
    let cli = match parse_or_usage(std::env::args_os(), &mut std::io::stdout().lock()) {
        Ok(cli) => cli,
        Err(status) => return ExitCode::from(status),
    };

    // Initialize logger
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.bus_config();
    log::debug!("Requested configuration: {:?}", config);

    let mut spi = LinuxSpi::open(&config.device)?;
    log::info!("Opened {}", spi.path());

    let stdout = std::io::stdout();
    let frame = commands::run_set(&mut spi, &config, cli.current, &mut stdout.lock())?;
    log::debug!("Sent {:02X?} to {}", frame.as_bytes(), spi.path());

    Ok(())
}

/// Parse `args`, or print usage to `out` and return the exit status
///
/// `--help` and `--version` print to `out` and return status 0. Any other
/// parse failure prints the error to stderr, the full help to `out`, and
/// returns status 1.
fn parse_or_usage<I, T>(args: I, out: &mut impl Write) -> Result<Cli, u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = write!(out, "{}", e);
            Err(0)
        }
        Err(e) => {
            let _ = e.print();
            let _ = writeln!(out, "{}", Cli::command().render_help());
            Err(USAGE_EXIT_STATUS)
        }
    }
}
