//! This module contains the logic for opening and closing the barbershop.
//! It starts the barber, the customer generator, the renderer and the input listener,
//! waits until the user closes the shop and then winds every process down.

use super::{barber, generator, input_handler, renderer, shop::SharedShop};
use crate::{BarbershopError, ShopConfig};
use shared::customsync::shutdown::ShutdownToken;
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};
use tracing::{info, warn};

pub fn start(config: ShopConfig) -> Result<(), BarbershopError> {
    match serde_json::to_string(&config) {
        Ok(config) => info!("[Barbershop] Opening with config: {}", config),
        Err(err) => warn!("[Barbershop] Could not serialize config: {}", err),
    }

    let shop = Arc::new(SharedShop::new(
        config.capacity,
        config.cut_duration,
        config.initial_speed,
    ));
    let shutdown = ShutdownToken::new();

    let barber_handle = spawn_process("barber", {
        let shop = shop.clone();
        let shutdown = shutdown.clone();
        move || barber::run(shop, shutdown)
    })?;

    let generator_handle = spawn_process("generator", {
        let shop = shop.clone();
        let shutdown = shutdown.clone();
        let baseline = config.baseline_interval;
        move || generator::run(shop, shutdown, baseline)
    });
    let generator_handle = match generator_handle {
        Ok(handle) => handle,
        Err(err) => {
            shutdown.raise();
            let _ = barber_handle.join();
            return Err(err);
        }
    };

    let renderer_handle = renderer::setup_renderer(shop.clone(), shutdown.clone());
    let input_handle = input_handler::setup_input_listener(shop.clone(), shutdown.clone());

    let input_result = input_handle.join();
    shutdown.raise();
    info!("[Barbershop] Closing the shop");

    let closed = wind_down(&shop, barber_handle, generator_handle, renderer_handle);
    let input_result = input_result
        .map_err(|_| {
            BarbershopError::SystemError("Error joining input handler thread.".to_string())
        })?
        .map_err(|err| BarbershopError::SystemError(err.to_string()));
    closed.and(input_result)
}

/// Joins every process and reports the final state before surfacing the first
/// failed join, so a panicking process never hides the report.
fn wind_down(
    shop: &SharedShop,
    barber_handle: JoinHandle<()>,
    generator_handle: JoinHandle<u64>,
    renderer_handle: JoinHandle<()>,
) -> Result<(), BarbershopError> {
    let barber_joined = barber_handle.join();
    let generator_joined = generator_handle.join();
    let renderer_joined = renderer_handle.join();

    report(shop, generator_joined.as_ref().ok().copied());

    barber_joined.map_err(|_| {
        BarbershopError::SystemError("Error joining barber thread.".to_string())
    })?;
    generator_joined.map_err(|_| {
        BarbershopError::SystemError("Error joining generator thread.".to_string())
    })?;
    renderer_joined.map_err(|_| {
        BarbershopError::SystemError("Error joining renderer thread.".to_string())
    })?;
    Ok(())
}

fn spawn_process<T, F>(name: &str, process: F) -> Result<JoinHandle<T>, BarbershopError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(process)
        .map_err(|err| BarbershopError::SpawnError(format!("{}: {}", name, err)))
}

/// Logs the final state of the shop. `spawned` is `None` when the generator
/// thread panicked and its count was lost.
fn report(shop: &SharedShop, spawned: Option<u64>) {
    let snapshot = shop.snapshot();
    match spawned {
        Some(spawned) => info!(
            "[Barbershop] {} customers arrived, {} served, {} left",
            spawned, snapshot.served, snapshot.left
        ),
        None => info!(
            "[Barbershop] {} served, {} left",
            snapshot.served, snapshot.left
        ),
    }
    if let Err(violation) = shop.with_lock(|state| state.check_invariants()) {
        warn!("[Barbershop] Shop closed in an inconsistent state: {}", violation);
    }
    match serde_json::to_string(&snapshot) {
        Ok(report) => info!("[Barbershop] Final report: {}", report),
        Err(err) => warn!("[Barbershop] Could not serialize final report: {}", err),
    }
}
