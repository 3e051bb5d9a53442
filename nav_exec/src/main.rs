//! Navigation executable entry point.
//!
//! # Architecture
//!
//! The executable drives towards a single target position:
//!
//!     - Initialise the session, logging and parameters
//!     - Open the GNSS line source (serial port or replay file)
//!     - Main loop:
//!         - Scan the receiver output for the next valid fix
//!         - Navigation control processing
//!         - Report and archive the steering command
//!
//! The loop ends when the line source ends, when the target is reached (if `stop_on_arrival` is
//! set) or on any fatal error.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use structopt::StructOpt;

// Internal
use comms_if::tc::steer::SteeringCommand;
use nav_lib::{
    gnss::{self, FixReader, FixReaderError, GgaParser, LineSource, SentenceParser, SourceParams},
    nav_ctrl::{InputData, NavCtrl},
    params::{NavExecParams, Overrides},
};
use util::{
    archive::{Archived, Archiver},
    logger::{logger_init, LevelFilter},
    module::State,
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Point-and-go GNSS navigation.
#[derive(Debug, StructOpt)]
#[structopt(name = "nav_exec")]
struct Opt {
    /// Read sentences from a recorded file instead of the receiver
    #[structopt(long, parse(from_os_str))]
    replay: Option<PathBuf>,

    /// Serial port of the receiver, e.g. /dev/ttyUSB0 or COM10
    #[structopt(long)]
    port: Option<String>,

    /// Baud rate of the receiver's serial port
    #[structopt(long)]
    baud: Option<u32>,

    /// Maximum number of lines to scan for each fix
    #[structopt(long)]
    max_lines: Option<u64>,

    /// Maximum time in seconds to wait for each fix
    #[structopt(long)]
    timeout_s: Option<f64>,

    /// Target latitude in decimal degrees, requires --target-lon
    #[structopt(long, allow_hyphen_values = true)]
    target_lat: Option<f64>,

    /// Target longitude in decimal degrees, requires --target-lat
    #[structopt(long, allow_hyphen_values = true)]
    target_lon: Option<f64>,

    /// Log debug messages to the console
    #[structopt(short, long)]
    verbose: bool,
}

/// Archived record of each accepted fix.
#[derive(Serialize)]
struct FixRecord {
    time_s: f64,
    latitude_deg: f64,
    longitude_deg: f64,
    lines: u64,
    ignored: u64,
    decode_errors: u64,
    parse_errors: u64,
    no_fix: u64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("nav_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    let console_level = if opt.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logger_init(console_level, LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("GNSS Navigation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let mut exec_params: NavExecParams =
        util::params::load("nav_exec.toml").wrap_err("Could not load exec params")?;
    let mut gnss_params: gnss::Params =
        util::params::load("gnss.toml").wrap_err("Could not load GNSS params")?;

    Overrides {
        replay: opt.replay,
        port: opt.port,
        baud: opt.baud,
        max_lines: opt.max_lines,
        timeout_s: opt.timeout_s,
        target_lat: opt.target_lat,
        target_lon: opt.target_lon,
    }
    .apply(&mut exec_params, &mut gnss_params)
    .wrap_err("Invalid command line arguments")?;

    gnss_params
        .validate()
        .wrap_err("Invalid GNSS parameters")?;

    info!("Exec parameters loaded");
    info!("Target: {}", exec_params.target);

    // ---- INITIALISE MODULES ----

    let mut nav_ctrl = NavCtrl::default();
    nav_ctrl
        .init("nav_ctrl.toml", &session)
        .wrap_err("Failed to initialise NavCtrl")?;
    info!("NavCtrl init complete");

    // ---- OPEN LINE SOURCE ----

    match gnss_params.source {
        SourceParams::Serial {
            ref port,
            baud_rate,
            read_timeout_s,
        } => {
            let source =
                gnss::open_serial(port, baud_rate, Duration::from_secs_f64(read_timeout_s))
                    .wrap_err("Failed to open the GNSS receiver")?;
            let reader = FixReader::from_params(source, GgaParser::new(), &gnss_params);
            run(reader, &mut nav_ctrl, &exec_params, &session)
        }
        SourceParams::Replay { ref path } => {
            let source = gnss::open_replay(path).wrap_err("Failed to open the replay file")?;
            let reader = FixReader::from_params(source, GgaParser::new(), &gnss_params);
            run(reader, &mut nav_ctrl, &exec_params, &session)
        }
    }
}

/// Main navigation loop.
fn run<S, P>(
    mut reader: FixReader<S, P>,
    nav_ctrl: &mut NavCtrl,
    params: &NavExecParams,
    session: &Session,
) -> Result<(), Report>
where
    S: LineSource,
    P: SentenceParser,
{
    let mut arch_fix =
        Archiver::from_path(session, "gnss/fix.csv").wrap_err("Failed to create the fix archive")?;

    info!("Beginning main loop\n");

    loop {
        // ---- FIX ACQUISITION ----

        let current = match reader.next_fix() {
            Ok(p) => p,
            Err(FixReaderError::EndOfStream) => {
                info!("GNSS line source ended, stopping");
                return Ok(());
            }
            Err(e) if e.is_timeout() && params.retry_on_timeout => {
                warn!("{}, continuing to scan", e);
                continue;
            }
            Err(e) => return Err(e).wrap_err("Failed to acquire a GNSS fix"),
        };

        let stats = *reader.last_scan();
        arch_fix
            .serialise(FixRecord {
                time_s: session::get_elapsed_seconds(),
                latitude_deg: current.latitude(),
                longitude_deg: current.longitude(),
                lines: stats.lines,
                ignored: stats.ignored,
                decode_errors: stats.decode_errors,
                parse_errors: stats.parse_errors,
                no_fix: stats.no_fix,
            })
            .wrap_err("Failed to archive the GNSS fix")?;

        // ---- NAVIGATION CONTROL ----

        let (cmd, report) = nav_ctrl.proc(&InputData {
            current,
            target: params.target,
        })?;
        nav_ctrl.write().wrap_err("Failed to archive NavCtrl data")?;

        info!("Position: {}", current);
        info!("Command: {}", cmd);

        if report.target_reached && params.stop_on_arrival {
            info!("Target reached, stopping");
            info!("Command: {}", SteeringCommand::stop());
            return Ok(());
        }
    }
}
