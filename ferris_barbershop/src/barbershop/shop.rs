//! Handle to the shop shared by the barber, the generator and the customers.
//!
//! It bundles the lock-protected [`ShopState`] with the two signals used for the
//! customer/barber handshake. Every process receives an `Arc<SharedShop>` when it is
//! started; nothing in the crate reaches the shop through global state.

use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use shared::{
    customsync::custom_semaphore::Semaphore,
    model::{shop_state::ShopState, snapshot::ShopSnapshot, speed::SpeedLevel},
};
use tracing::info;

#[derive(Debug)]
pub struct SharedShop {
    state: Mutex<ShopState>,
    /// Released by a customer once it is queued, acquired by the barber.
    customer_arrived: Semaphore,
    /// Released by the barber once it took a customer from the queue.
    barber_ready: Semaphore,
    cut_duration: Duration,
}

impl SharedShop {
    pub fn new(capacity: usize, cut_duration: Duration, arrival_speed: SpeedLevel) -> Self {
        SharedShop {
            state: Mutex::new(ShopState::new(capacity, cut_duration, arrival_speed)),
            customer_arrived: Semaphore::new(0),
            barber_ready: Semaphore::new(0),
            cut_duration,
        }
    }

    /// Runs `f` with exclusive access to the state. The lock is released when `f`
    /// returns, so `f` must never block on a signal or sleep.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut ShopState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    pub fn snapshot(&self) -> ShopSnapshot {
        self.with_lock(|state| state.snapshot())
    }

    pub fn set_arrival_speed(&self, speed: SpeedLevel) {
        self.with_lock(|state| state.set_arrival_speed(speed));
        info!("[Shop] Arrival speed set to {}", speed);
    }

    pub fn customer_arrived(&self) -> &Semaphore {
        &self.customer_arrived
    }

    pub fn barber_ready(&self) -> &Semaphore {
        &self.barber_ready
    }

    pub fn cut_duration(&self) -> Duration {
        self.cut_duration
    }
}
