use std::time::{Duration, Instant};

use serde::Serialize;

use super::{
    shop_state::{BarberStatus, CustomerId},
    speed::SpeedLevel,
};

/// Immutable copy of the shop, taken under the lock and read without it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopSnapshot {
    pub capacity: usize,
    pub waiting: Vec<CustomerId>,
    pub served: u64,
    pub left: u64,
    pub arrivals: u64,
    pub barber_status: BarberStatus,
    pub current_customer: Option<CustomerId>,
    #[serde(skip)]
    pub cut_started_at: Option<Instant>,
    pub cut_duration: Duration,
    pub arrival_speed: SpeedLevel,
    pub recently_served: Vec<CustomerId>,
}

impl ShopSnapshot {
    /// Fraction of the current cut already done at `now`, in `[0, 1]`.
    /// `None` when nobody is in the chair.
    pub fn cut_progress(&self, now: Instant) -> Option<f64> {
        self.current_customer?;
        let started = self.cut_started_at?;
        if self.cut_duration.is_zero() {
            return Some(1.0);
        }
        let elapsed = now.saturating_duration_since(started);
        Some((elapsed.as_secs_f64() / self.cut_duration.as_secs_f64()).min(1.0))
    }
}
