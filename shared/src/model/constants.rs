use std::time::Duration;

pub const DEFAULT_CAPACITY: usize = 5;
pub const DEFAULT_CUT_MILLIS: u64 = 1600;
pub const DEFAULT_BASELINE_MILLIS: u64 = 1000;
pub const DEFAULT_SPEED: u8 = 3;

/// How long the barber and the customers block on a signal before re-checking shutdown.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Upper bound for one sleep step of the generator while waiting for its next emission.
pub const GENERATOR_SLICE: Duration = Duration::from_millis(50);
pub const RENDER_INTERVAL: Duration = Duration::from_millis(100);

pub const RECENTLY_SERVED_LEN: usize = 8;

pub const LOG_LVL_INFO: &str = "info";
pub const LOG_LVL_DEBUG: &str = "debug";
pub const LOG_LVL_TRACE: &str = "trace";

// ==================== COMMANDS ====================
pub const EXIT_COMMAND: &str = "q";
pub const SPEED_COMMANDS: [&str; 5] = ["1", "2", "3", "4", "5"];
