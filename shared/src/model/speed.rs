use std::{fmt, time::Duration};

use serde::Serialize;

/// Arrival speed of new customers, from 1 (slowest) to 5 (fastest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SpeedLevel {
    Crawl = 1,
    Slow = 2,
    Steady = 3,
    Busy = 4,
    Rush = 5,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SpeedError {
    OutOfRange(u8),
    NotADigit(String),
}

impl fmt::Display for SpeedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
impl std::error::Error for SpeedError {}

impl SpeedLevel {
    pub const ALL: [SpeedLevel; 5] = [
        SpeedLevel::Crawl,
        SpeedLevel::Slow,
        SpeedLevel::Steady,
        SpeedLevel::Busy,
        SpeedLevel::Rush,
    ];

    pub fn level(self) -> u8 {
        self as u8
    }

    /// Time between two arrivals, as a fraction of `baseline`.
    pub fn interval(self, baseline: Duration) -> Duration {
        match self {
            SpeedLevel::Crawl => baseline * 2,
            SpeedLevel::Slow => baseline,
            SpeedLevel::Steady => baseline * 3 / 5,
            SpeedLevel::Busy => baseline * 2 / 5,
            SpeedLevel::Rush => baseline / 4,
        }
    }
}

impl TryFrom<u8> for SpeedLevel {
    type Error = SpeedError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(SpeedLevel::Crawl),
            2 => Ok(SpeedLevel::Slow),
            3 => Ok(SpeedLevel::Steady),
            4 => Ok(SpeedLevel::Busy),
            5 => Ok(SpeedLevel::Rush),
            other => Err(SpeedError::OutOfRange(other)),
        }
    }
}

impl TryFrom<char> for SpeedLevel {
    type Error = SpeedError;

    fn try_from(key: char) -> Result<Self, Self::Error> {
        let level = key
            .to_digit(10)
            .ok_or_else(|| SpeedError::NotADigit(key.to_string()))?;
        SpeedLevel::try_from(level as u8)
    }
}

impl std::str::FromStr for SpeedLevel {
    type Err = SpeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = s
            .trim()
            .parse::<u8>()
            .map_err(|_| SpeedError::NotADigit(s.to_string()))?;
        SpeedLevel::try_from(level)
    }
}

impl fmt::Display for SpeedLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_round_trip_through_integers() {
        for speed in SpeedLevel::ALL {
            assert_eq!(SpeedLevel::try_from(speed.level()), Ok(speed));
        }
        assert_eq!(SpeedLevel::try_from(0), Err(SpeedError::OutOfRange(0)));
        assert_eq!(SpeedLevel::try_from(6), Err(SpeedError::OutOfRange(6)));
    }

    #[test]
    fn test_parse_from_command() {
        assert_eq!("4".parse::<SpeedLevel>(), Ok(SpeedLevel::Busy));
        assert_eq!(" 1 ".parse::<SpeedLevel>(), Ok(SpeedLevel::Crawl));
        assert!("x".parse::<SpeedLevel>().is_err());
        assert!("9".parse::<SpeedLevel>().is_err());
    }

    #[test]
    fn test_convert_from_keyboard_key() {
        assert_eq!(SpeedLevel::try_from('1'), Ok(SpeedLevel::Crawl));
        assert_eq!(SpeedLevel::try_from('5'), Ok(SpeedLevel::Rush));
        assert_eq!(SpeedLevel::try_from('0'), Err(SpeedError::OutOfRange(0)));
        assert_eq!(
            SpeedLevel::try_from('q'),
            Err(SpeedError::NotADigit("q".to_string()))
        );
    }

    #[test]
    fn test_intervals_with_one_second_baseline() {
        let baseline = Duration::from_secs(1);
        assert_eq!(SpeedLevel::Crawl.interval(baseline), Duration::from_secs(2));
        assert_eq!(SpeedLevel::Slow.interval(baseline), Duration::from_secs(1));
        assert_eq!(
            SpeedLevel::Steady.interval(baseline),
            Duration::from_millis(600)
        );
        assert_eq!(SpeedLevel::Busy.interval(baseline), Duration::from_millis(400));
        assert_eq!(SpeedLevel::Rush.interval(baseline), Duration::from_millis(250));
    }

    #[test]
    fn test_faster_levels_have_shorter_intervals() {
        let baseline = Duration::from_millis(800);
        let intervals: Vec<Duration> = SpeedLevel::ALL
            .iter()
            .map(|speed| speed.interval(baseline))
            .collect();
        assert!(intervals.windows(2).all(|pair| pair[0] > pair[1]));
    }
}
