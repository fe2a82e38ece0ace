//! State of the barbershop shared by the barber, the generator and every customer.
//!
//! A `ShopState` has no synchronization of its own: it is meant to live behind a
//! single lock, and every method here assumes the caller is holding it. Each method
//! leaves the state consistent, so any sequence of calls keeps the invariants checked
//! by [`ShopState::check_invariants`].

use std::{
    collections::VecDeque,
    fmt,
    time::{Duration, Instant},
};

use serde::Serialize;

use super::{constants::RECENTLY_SERVED_LEN, snapshot::ShopSnapshot, speed::SpeedLevel};

pub type CustomerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BarberStatus {
    Sleeping,
    Cutting,
}

impl fmt::Display for BarberStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BarberStatus::Sleeping => write!(f, "sleeping"),
            BarberStatus::Cutting => write!(f, "cutting"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    TurnedAway,
}

/// A completion was reported for a customer that is not the one in the chair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleCompletion {
    pub finished: CustomerId,
    pub in_chair: Option<CustomerId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    OverCapacity { waiting: usize, capacity: usize },
    ChairWithoutCut(CustomerId),
    WaitingAndInChair(CustomerId),
    UnaccountedCustomers { arrivals: u64, accounted: u64 },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
impl std::error::Error for InvariantViolation {}

#[derive(Debug, Clone)]
pub struct ShopState {
    capacity: usize,
    cut_duration: Duration,
    arrival_speed: SpeedLevel,

    waiting: VecDeque<CustomerId>,
    served: u64,
    left: u64,
    arrivals: u64,

    barber_status: BarberStatus,
    current_customer: Option<CustomerId>,
    cut_started_at: Option<Instant>,

    recently_served: VecDeque<CustomerId>,
}

impl ShopState {
    pub fn new(capacity: usize, cut_duration: Duration, arrival_speed: SpeedLevel) -> Self {
        ShopState {
            capacity,
            cut_duration,
            arrival_speed,
            waiting: VecDeque::new(),
            served: 0,
            left: 0,
            arrivals: 0,
            barber_status: BarberStatus::Sleeping,
            current_customer: None,
            cut_started_at: None,
            recently_served: VecDeque::with_capacity(RECENTLY_SERVED_LEN),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cut_duration(&self) -> Duration {
        self.cut_duration
    }

    pub fn arrival_speed(&self) -> SpeedLevel {
        self.arrival_speed
    }

    pub fn set_arrival_speed(&mut self, speed: SpeedLevel) {
        self.arrival_speed = speed;
    }

    pub fn waiting(&self) -> &VecDeque<CustomerId> {
        &self.waiting
    }

    pub fn served(&self) -> u64 {
        self.served
    }

    pub fn left(&self) -> u64 {
        self.left
    }

    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    pub fn barber_status(&self) -> BarberStatus {
        self.barber_status
    }

    pub fn current_customer(&self) -> Option<CustomerId> {
        self.current_customer
    }

    pub fn cut_started_at(&self) -> Option<Instant> {
        self.cut_started_at
    }

    pub fn recently_served(&self) -> &VecDeque<CustomerId> {
        &self.recently_served
    }

    /// The only place where a customer gets a seat: either it is queued or it leaves.
    pub fn admit(&mut self, id: CustomerId) -> Admission {
        self.arrivals += 1;
        if self.waiting.len() < self.capacity {
            self.waiting.push_back(id);
            Admission::Admitted
        } else {
            self.left += 1;
            Admission::TurnedAway
        }
    }

    /// Records a customer that never got to look at the waiting room.
    pub fn turn_away(&mut self) {
        self.arrivals += 1;
        self.left += 1;
    }

    /// Moves the first waiting customer to the chair and starts the cut.
    pub fn seat_next(&mut self, now: Instant) -> Option<CustomerId> {
        let id = self.waiting.pop_front()?;
        self.barber_status = BarberStatus::Cutting;
        self.current_customer = Some(id);
        self.cut_started_at = Some(now);
        Some(id)
    }

    /// Ends the cut of `id`. The barber keeps the `Cutting` status when someone is
    /// already waiting, so no idle gap is visible between two cuts.
    pub fn finish_cut(&mut self, id: CustomerId) -> Result<(), StaleCompletion> {
        if self.current_customer != Some(id) {
            return Err(StaleCompletion {
                finished: id,
                in_chair: self.current_customer,
            });
        }
        self.current_customer = None;
        self.cut_started_at = None;
        self.served += 1;
        if self.recently_served.len() == RECENTLY_SERVED_LEN {
            self.recently_served.pop_front();
        }
        self.recently_served.push_back(id);
        self.barber_status = if self.waiting.is_empty() {
            BarberStatus::Sleeping
        } else {
            BarberStatus::Cutting
        };
        Ok(())
    }

    /// Puts the barber to sleep when nobody is waiting and the chair is empty.
    pub fn settle_idle(&mut self) {
        if self.waiting.is_empty() && self.current_customer.is_none() {
            self.barber_status = BarberStatus::Sleeping;
        }
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.waiting.len() > self.capacity {
            return Err(InvariantViolation::OverCapacity {
                waiting: self.waiting.len(),
                capacity: self.capacity,
            });
        }
        if let Some(id) = self.current_customer {
            if self.barber_status != BarberStatus::Cutting {
                return Err(InvariantViolation::ChairWithoutCut(id));
            }
            if self.waiting.contains(&id) {
                return Err(InvariantViolation::WaitingAndInChair(id));
            }
        }
        let accounted = self.served
            + self.left
            + self.waiting.len() as u64
            + u64::from(self.current_customer.is_some());
        if accounted != self.arrivals {
            return Err(InvariantViolation::UnaccountedCustomers {
                arrivals: self.arrivals,
                accounted,
            });
        }
        Ok(())
    }

    pub fn snapshot(&self) -> ShopSnapshot {
        ShopSnapshot {
            capacity: self.capacity,
            waiting: self.waiting.iter().copied().collect(),
            served: self.served,
            left: self.left,
            arrivals: self.arrivals,
            barber_status: self.barber_status,
            current_customer: self.current_customer,
            cut_started_at: self.cut_started_at,
            cut_duration: self.cut_duration,
            arrival_speed: self.arrival_speed,
            recently_served: self.recently_served.iter().copied().collect(),
        }
    }
}
