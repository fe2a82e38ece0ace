//! The barber sleeps until a customer signals its arrival, takes the first one
//! from the waiting room and cuts its hair. It is the only process that moves
//! customers out of the queue and the only one that records a finished cut.

use std::{sync::Arc, time::Instant};

use shared::{customsync::shutdown::ShutdownToken, model::constants::POLL_INTERVAL};
use tracing::{debug, error, info, trace};

use super::shop::SharedShop;

pub fn run(shop: Arc<SharedShop>, shutdown: ShutdownToken) {
    info!("[Barber] Opening the shop");
    while !shutdown.is_raised() {
        if !shop.customer_arrived().acquire_timeout(POLL_INTERVAL) {
            shop.with_lock(|state| state.settle_idle());
            continue;
        }

        let Some(id) = shop.with_lock(|state| state.seat_next(Instant::now())) else {
            trace!("[Barber] Woke up but nobody is waiting");
            continue;
        };
        shop.barber_ready().release();
        debug!("[Barber] Cutting hair of customer {}", id);

        if !shutdown.sleep(shop.cut_duration()) {
            info!("[Barber] Shop closed in the middle of customer {}", id);
            break;
        }

        match shop.with_lock(|state| state.finish_cut(id)) {
            Ok(()) => debug!("[Barber] Finished with customer {}", id),
            Err(stale) => {
                error!(
                    "[Barber] Finished customer {} but the chair holds {:?}",
                    stale.finished, stale.in_chair
                );
                debug_assert_eq!(stale.in_chair, Some(stale.finished), "stale completion");
            }
        }
    }
    info!("[Barber] Going home");
}
