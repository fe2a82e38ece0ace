//! This module is responsible for setting up the input listener.
//!
//! It reads commands from the user, one per line, to change the arrival speed of
//! the customers or to close the shop.

use std::{
    error::Error,
    fmt,
    io::{self, BufRead},
    sync::Arc,
    thread::JoinHandle,
};

use shared::{
    customsync::shutdown::ShutdownToken,
    model::{
        constants::{EXIT_COMMAND, SPEED_COMMANDS},
        speed::SpeedLevel,
    },
};
use tracing::{info, warn};

use super::shop::SharedShop;

#[derive(Debug)]
pub enum InputError {
    ReadingInputError(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
impl Error for InputError {}

pub fn setup_input_listener(
    shop: Arc<SharedShop>,
    shutdown: ShutdownToken,
) -> JoinHandle<Result<(), InputError>> {
    std::thread::spawn(move || {
        info!("[InputHandler] Input listener thread started");
        listen(io::stdin().lock(), &shop, &shutdown)
    })
}

/// Handles commands until the exit command or the end of the input, then raises
/// the shutdown token. The token is raised even when reading fails.
pub fn listen<R: BufRead>(
    reader: R,
    shop: &SharedShop,
    shutdown: &ShutdownToken,
) -> Result<(), InputError> {
    let result = handle_commands(reader, shop);
    shutdown.raise();
    result
}

fn handle_commands<R: BufRead>(reader: R, shop: &SharedShop) -> Result<(), InputError> {
    for line in reader.lines() {
        let line = line.map_err(|err| InputError::ReadingInputError(err.to_string()))?;
        let command = line.trim();
        if command == EXIT_COMMAND {
            info!("[InputHandler] Exit command received");
            return Ok(());
        } else if SPEED_COMMANDS.contains(&command) {
            match SpeedLevel::try_from(command.chars().next().unwrap_or_default()) {
                Ok(speed) => shop.set_arrival_speed(speed),
                Err(err) => warn!("[InputHandler] Invalid speed {}: {}", command, err),
            }
        } else {
            warn!(
                "[InputHandler] Unknown command. Available commands: {}, {}.",
                SPEED_COMMANDS.join(", "),
                EXIT_COMMAND
            );
        }
    }
    info!("[InputHandler] Input closed, closing the shop");
    Ok(())
}
