use std::{
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

/// Counting semaphore built on a `Mutex<usize>` and a `Condvar`.
///
/// Besides the classic blocking `acquire`, it offers `acquire_timeout` so that
/// waiters can come back periodically and check whether they should stop.
#[derive(Debug)]
pub struct Semaphore {
    count_lock: Mutex<usize>,
    condv: Condvar,
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Semaphore {
    pub fn new(initial_value: usize) -> Self {
        Semaphore {
            count_lock: Mutex::new(initial_value),
            condv: Condvar::new(),
        }
    }

    fn count(&self) -> MutexGuard<'_, usize> {
        self.count_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn acquire(&self) {
        let mut count = self
            .condv
            .wait_while(self.count(), |count| *count == 0)
            .unwrap_or_else(PoisonError::into_inner);
        *count -= 1;
    }

    /// Waits at most `timeout` for a unit. Returns `false` if none became available,
    /// in which case the counter is left untouched.
    pub fn acquire_timeout(&self, timeout: Duration) -> bool {
        let (mut count, _) = self
            .condv
            .wait_timeout_while(self.count(), timeout, |count| *count == 0)
            .unwrap_or_else(PoisonError::into_inner);
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    pub fn release(&self) {
        *self.count() += 1;
        self.condv.notify_one();
    }

    pub fn available(&self) -> usize {
        *self.count()
    }
}

#[cfg(test)]
mod tests {
    use super::Semaphore;

    use std::{
        sync::{mpsc::channel, Arc},
        thread,
        time::{Duration, Instant},
    };

    #[test]
    fn test_sem_acquire_release() {
        let s = Semaphore::new(1);
        s.acquire();
        s.release();
        s.acquire();
        assert_eq!(s.available(), 0);
    }

    #[test]
    fn test_sem_as_cvar() {
        // Child waits and parent signals
        let (tx, rx) = channel();
        let s = Arc::new(Semaphore::new(0));
        let s2 = s.clone();
        let _t = thread::spawn(move || {
            s2.acquire();
            tx.send(()).unwrap();
        });
        s.release();
        let _ = rx.recv();

        // Parent waits and child signals
        let (tx, rx) = channel();
        let s = Arc::new(Semaphore::new(0));
        let s2 = s.clone();
        let _t = thread::spawn(move || {
            s2.release();
            let _ = rx.recv();
        });
        s.acquire();
        tx.send(()).unwrap();
    }

    #[test]
    fn test_acquire_timeout_expires_without_units() {
        let s = Semaphore::new(0);
        let start = Instant::now();
        assert!(!s.acquire_timeout(Duration::from_millis(50)));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(s.available(), 0);
    }

    #[test]
    fn test_acquire_timeout_takes_available_unit() {
        let s = Semaphore::new(2);
        assert!(s.acquire_timeout(Duration::from_millis(10)));
        assert_eq!(s.available(), 1);
    }

    #[test]
    fn test_acquire_timeout_wakes_on_release() {
        let s = Arc::new(Semaphore::new(0));
        let s2 = s.clone();
        let waiter = thread::spawn(move || s2.acquire_timeout(Duration::from_secs(5)));
        thread::sleep(Duration::from_millis(20));
        s.release();
        assert!(waiter.join().unwrap());
        assert_eq!(s.available(), 0);
    }

    #[test]
    fn test_each_release_wakes_exactly_one_waiter() {
        let s = Arc::new(Semaphore::new(0));
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let s = s.clone();
                thread::spawn(move || s.acquire_timeout(Duration::from_millis(300)))
            })
            .collect();
        s.release();
        s.release();
        let acquired = waiters
            .into_iter()
            .map(|w| w.join().unwrap())
            .filter(|acquired| *acquired)
            .count();
        assert_eq!(acquired, 2);
    }
}
