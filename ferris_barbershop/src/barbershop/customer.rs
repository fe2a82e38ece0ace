//! A customer walks in, takes a free chair or leaves, and waits for the barber.

use std::sync::Arc;

use shared::{
    customsync::shutdown::ShutdownToken,
    model::{
        constants::POLL_INTERVAL,
        shop_state::{Admission, CustomerId},
    },
};
use tracing::debug;

use super::shop::SharedShop;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// The barber called the customer to the chair.
    Seated,
    /// The waiting room was full.
    TurnedAway,
    /// The shop closed while the customer was still waiting.
    Interrupted,
}

pub fn visit(shop: Arc<SharedShop>, id: CustomerId, shutdown: ShutdownToken) -> Visit {
    let admission = shop.with_lock(|state| state.admit(id));
    if admission == Admission::TurnedAway {
        debug!("[Customer {}] Waiting room is full, leaving", id);
        return Visit::TurnedAway;
    }

    debug!("[Customer {}] Took a seat in the waiting room", id);
    shop.customer_arrived().release();

    while !shutdown.is_raised() {
        if shop.barber_ready().acquire_timeout(POLL_INTERVAL) {
            debug!("[Customer {}] Called to the barber chair", id);
            return Visit::Seated;
        }
    }
    debug!("[Customer {}] Shop closed while waiting", id);
    Visit::Interrupted
}
