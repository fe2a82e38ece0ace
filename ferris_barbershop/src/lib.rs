//! Ferris Barbershop is an application that simulates the sleeping barber problem.
//!
//! A generator sends customers to a shop with a bounded waiting room. Each customer
//! takes a free chair or leaves, and a single barber sleeps until someone arrives,
//! then serves the waiting customers one at a time in arrival order.
//!
//! The user can change the arrival speed or close the shop from the standard input
//! while the state of the shop is redrawn on the standard output.

pub mod barbershop;

use std::{error::Error, fmt, time::Duration};

use serde::Serialize;
use shared::model::{
    constants::{
        DEFAULT_BASELINE_MILLIS, DEFAULT_CAPACITY, DEFAULT_CUT_MILLIS, DEFAULT_SPEED,
        LOG_LVL_DEBUG, LOG_LVL_INFO, LOG_LVL_TRACE,
    },
    speed::SpeedLevel,
};
use tracing::{error, info, warn, Level};

const USAGE: &str = "Usage: cargo run -p ferris_barbershop -- -c <chairs> -d <haircut_millis> -b <baseline_arrival_millis> -s <speed 1-5> -l <info|debug|trace>";

#[derive(Debug)]
pub enum BarbershopError {
    ArgsParsingError(String),
    SpawnError(String),
    SystemError(String),
}

impl fmt::Display for BarbershopError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
impl Error for BarbershopError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShopConfig {
    pub capacity: usize,
    pub cut_duration: Duration,
    pub baseline_interval: Duration,
    pub initial_speed: SpeedLevel,
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            capacity: DEFAULT_CAPACITY,
            cut_duration: Duration::from_millis(DEFAULT_CUT_MILLIS),
            baseline_interval: Duration::from_millis(DEFAULT_BASELINE_MILLIS),
            initial_speed: SpeedLevel::try_from(DEFAULT_SPEED).unwrap_or(SpeedLevel::Steady),
        }
    }
}

fn init_logger(level: Level) {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn parse_log_level(value: &str) -> Option<Level> {
    match value {
        LOG_LVL_INFO => Some(Level::INFO),
        LOG_LVL_DEBUG => Some(Level::DEBUG),
        LOG_LVL_TRACE => Some(Level::TRACE),
        _ => None,
    }
}

/// Looks for the log level before the rest of the arguments are parsed, so that
/// parsing errors are already logged at the requested level.
fn log_level(args: &[String]) -> Level {
    args.chunks_exact(2)
        .find(|arg| arg[0] == "-l")
        .and_then(|arg| parse_log_level(&arg[1]))
        .unwrap_or(Level::INFO)
}

fn parse_positive(flag: &str, value: &str, what: &str) -> Result<u64, BarbershopError> {
    let parsed = value.parse::<u64>().map_err(|err| {
        error!("[Barbershop] Invalid {}: {}", what, err);
        BarbershopError::ArgsParsingError(format!("Invalid {} for {}", what, flag))
    })?;
    if parsed == 0 {
        error!("[Barbershop] Invalid {}: {}", what, parsed);
        return Err(BarbershopError::ArgsParsingError(format!(
            "The {} must be positive",
            what
        )));
    }
    Ok(parsed)
}

fn parse_args(args: &[String]) -> Result<ShopConfig, BarbershopError> {
    let mut config = ShopConfig::default();

    if args.is_empty() {
        info!(
            "[Barbershop] No arguments provided, using defaults: \n[CHAIRS: {}]  [HAIRCUT: {:?}]  [BASELINE: {:?}]  [SPEED: {}]",
            config.capacity, config.cut_duration, config.baseline_interval, config.initial_speed
        );
        return Ok(config);
    }

    if args.len() % 2 != 0 {
        error!("[Barbershop] Invalid arguments");
        warn!("{}", USAGE);
        return Err(BarbershopError::ArgsParsingError(String::from(
            "Invalid argument.",
        )));
    }

    for arg in args.chunks_exact(2) {
        let (flag, value) = (arg[0].as_str(), arg[1].as_str());
        match flag {
            "-c" => {
                info!("[Barbershop] Number of chairs: {}", value);
                config.capacity = parse_positive(flag, value, "number of chairs")? as usize;
            }
            "-d" => {
                info!("[Barbershop] Haircut duration (ms): {}", value);
                config.cut_duration =
                    Duration::from_millis(parse_positive(flag, value, "haircut duration")?);
            }
            "-b" => {
                info!("[Barbershop] Baseline arrival interval (ms): {}", value);
                config.baseline_interval =
                    Duration::from_millis(parse_positive(flag, value, "baseline interval")?);
            }
            "-s" => {
                info!("[Barbershop] Initial speed: {}", value);
                config.initial_speed = value.parse::<SpeedLevel>().map_err(|err| {
                    error!("[Barbershop] Invalid speed: {}", err);
                    BarbershopError::ArgsParsingError(String::from("Invalid speed, expected 1-5"))
                })?;
            }
            "-l" => {
                if parse_log_level(value).is_none() {
                    error!("[Barbershop] Invalid log level: {}", value);
                    return Err(BarbershopError::ArgsParsingError(String::from(
                        "Invalid log level",
                    )));
                }
            }
            _ => {
                error!("[Barbershop] Invalid argument: {}", flag);
                warn!("{}", USAGE);
                return Err(BarbershopError::ArgsParsingError(String::from(
                    "Invalid argument.",
                )));
            }
        }
    }

    Ok(config)
}

pub fn run() -> Result<(), BarbershopError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    init_logger(log_level(&args));
    let config = parse_args(&args)?;
    barbershop::handler::start(config)
}
