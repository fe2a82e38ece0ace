//! Sends new customers to the shop at the pace given by the current arrival speed.

use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use shared::{
    customsync::shutdown::ShutdownToken,
    model::{constants::GENERATOR_SLICE, shop_state::CustomerId},
};
use tracing::{error, info, trace};

use super::{customer, shop::SharedShop};

/// Absolute time of the next arrival.
///
/// The next emission is computed from the previous scheduled one instead of from
/// the moment the generator woke up, so sleeping a little late does not push every
/// following arrival back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalSchedule {
    next_emit: Instant,
}

impl ArrivalSchedule {
    pub fn starting_at(first_emit: Instant) -> Self {
        ArrivalSchedule {
            next_emit: first_emit,
        }
    }

    pub fn next_emit(&self) -> Instant {
        self.next_emit
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_emit
    }

    pub fn time_until(&self, now: Instant) -> Duration {
        self.next_emit.saturating_duration_since(now)
    }

    /// Schedules the emission after the one just made. If the generator fell more
    /// than an interval behind, the next one is due right away but only once.
    pub fn advance(&mut self, now: Instant, interval: Duration) {
        self.next_emit = (self.next_emit + interval).max(now);
    }
}

/// Runs until shutdown and returns how many customers were sent in.
pub fn run(shop: Arc<SharedShop>, shutdown: ShutdownToken, baseline: Duration) -> u64 {
    info!("[Generator] Customers start arriving");
    let mut schedule = ArrivalSchedule::starting_at(Instant::now());
    let mut next_id: CustomerId = 1;

    while !shutdown.is_raised() {
        let speed = shop.with_lock(|state| state.arrival_speed());
        let now = Instant::now();
        if !schedule.is_due(now) {
            thread::sleep(schedule.time_until(now).min(GENERATOR_SLICE));
            continue;
        }

        trace!("[Generator] Customer {} arrives at speed {}", next_id, speed);
        spawn_customer(&shop, next_id, &shutdown);
        next_id += 1;
        schedule.advance(now, speed.interval(baseline));
    }

    let spawned = next_id - 1;
    info!("[Generator] No more customers, {} arrived", spawned);
    spawned
}

fn spawn_customer(shop: &Arc<SharedShop>, id: CustomerId, shutdown: &ShutdownToken) {
    let customer_shop = shop.clone();
    let customer_shutdown = shutdown.clone();
    let spawned = thread::Builder::new()
        .name(format!("customer-{}", id))
        .spawn(move || customer::visit(customer_shop, id, customer_shutdown));
    if let Err(err) = spawned {
        error!("[Generator] Could not send customer {}: {}", id, err);
        shop.with_lock(|state| state.turn_away());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barbershop::barber;
    use shared::model::{constants::POLL_INTERVAL, speed::SpeedLevel};

    const BASELINE: Duration = Duration::from_millis(1000);

    #[test]
    fn test_on_time_ticks_keep_a_fixed_grid() {
        let start = Instant::now();
        let mut schedule = ArrivalSchedule::starting_at(start);
        let interval = SpeedLevel::Steady.interval(BASELINE);

        // Wake up a bit late on every tick: the grid must not drift.
        for tick in 1..=4u32 {
            let woke_at = schedule.next_emit() + Duration::from_millis(20);
            schedule.advance(woke_at, interval);
            assert_eq!(schedule.next_emit(), start + interval * tick);
        }
    }

    #[test]
    fn test_speed_change_applies_from_next_emission_without_burst() {
        let start = Instant::now();
        let mut schedule = ArrivalSchedule::starting_at(start);
        let steady = SpeedLevel::Steady.interval(BASELINE);
        let rush = SpeedLevel::Rush.interval(BASELINE);

        schedule.advance(start, steady);
        let first = schedule.next_emit();
        assert_eq!(first, start + steady);

        // Speed goes from 3 to 5 between two emissions.
        schedule.advance(first, rush);
        let second = schedule.next_emit();
        assert_eq!(second - first, rush);
        assert!(!schedule.is_due(first));

        schedule.advance(second, rush);
        assert_eq!(schedule.next_emit() - second, rush);
    }

    #[test]
    fn test_late_generator_catches_up_once() {
        let start = Instant::now();
        let mut schedule = ArrivalSchedule::starting_at(start);
        let interval = Duration::from_millis(100);
        let woke_at = start + Duration::from_secs(2);

        schedule.advance(woke_at, interval);
        assert_eq!(schedule.next_emit(), woke_at);
        assert!(schedule.is_due(woke_at));

        schedule.advance(woke_at, interval);
        assert_eq!(schedule.next_emit(), woke_at + interval);
        assert!(!schedule.is_due(woke_at));
        assert_eq!(schedule.time_until(woke_at), interval);
    }

    #[test]
    fn test_generator_feeds_the_shop_and_stops_promptly() {
        let shop = Arc::new(SharedShop::new(5, Duration::from_millis(5), SpeedLevel::Rush));
        let shutdown = ShutdownToken::new();
        let barber = {
            let shop = shop.clone();
            let shutdown = shutdown.clone();
            thread::spawn(move || barber::run(shop, shutdown))
        };
        let generator = {
            let shop = shop.clone();
            let shutdown = shutdown.clone();
            thread::spawn(move || run(shop, shutdown, Duration::from_millis(80)))
        };

        // Rush with an 80ms baseline is one customer every 20ms.
        let sampling_until = Instant::now() + Duration::from_millis(500);
        let mut samples = 0;
        while Instant::now() < sampling_until {
            assert_eq!(shop.with_lock(|state| state.check_invariants()), Ok(()));
            samples += 1;
            thread::sleep(Duration::from_millis(1));
        }
        assert!(samples > 10, "only {} samples taken", samples);
        let raised_at = Instant::now();
        shutdown.raise();
        let spawned = generator.join().unwrap();
        barber.join().unwrap();
        assert!(raised_at.elapsed() <= POLL_INTERVAL * 5);

        assert!(spawned >= 5, "only {} customers arrived", spawned);
        assert!(spawned <= 40, "{} customers arrived, expected no burst", spawned);

        // Give every customer thread the chance to take its admission decision.
        let deadline = Instant::now() + Duration::from_secs(5);
        while shop.with_lock(|state| state.arrivals()) < spawned {
            assert!(Instant::now() < deadline, "some customers never decided");
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(shop.with_lock(|state| state.check_invariants()), Ok(()));
        assert!(shop.snapshot().served > 0);
    }
}
