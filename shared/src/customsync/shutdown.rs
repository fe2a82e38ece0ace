use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

/// Step used by [`ShutdownToken::sleep`] between two checks of the flag.
pub const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Cooperative cancellation flag shared by every long lived process of the shop.
///
/// Once raised it stays raised for the rest of the run.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    raised: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Sleeps for `duration` in slices of at most [`SLEEP_SLICE`].
    ///
    /// Returns `true` if the whole duration elapsed, `false` if the token was
    /// raised first.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_raised() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }
}
