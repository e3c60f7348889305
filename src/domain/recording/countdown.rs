//! Countdown value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::error::ConfigError;

/// Default countdown length in seconds
pub const DEFAULT_COUNTDOWN_SECS: u32 = 5;

/// Interval between two countdown ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Fixed-length countdown that drives a recording.
///
/// A countdown of `n` seconds emits the values `n, n-1, ..., 0`, one per
/// [`TICK_INTERVAL`], starting immediately. That is `n + 1` ticks; the
/// recording stops when the next elapsed value would exceed `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Countdown {
    seconds: u32,
}

impl Countdown {
    pub const fn from_secs(seconds: u32) -> Self {
        Self { seconds }
    }

    pub const fn as_secs(&self) -> u32 {
        self.seconds
    }

    /// Whether a tick at `elapsed` seconds still belongs to the countdown.
    ///
    /// `elapsed` is wider than the countdown so the bound stays reachable
    /// for `u32::MAX` seconds.
    pub const fn is_running_at(&self, elapsed: u64) -> bool {
        elapsed <= self.seconds as u64
    }

    /// Remaining seconds shown at `elapsed` seconds
    pub fn remaining_at(&self, elapsed: u64) -> u32 {
        u32::try_from(u64::from(self.seconds).saturating_sub(elapsed)).unwrap_or(0)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::from_secs(DEFAULT_COUNTDOWN_SECS)
    }
}

impl FromStr for Countdown {
    type Err = ConfigError;

    /// Parse "5" or "5s"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let digits = input.strip_suffix('s').unwrap_or(&input);

        digits
            .parse::<u32>()
            .map(Self::from_secs)
            .map_err(|_| ConfigError::ValidationError {
                key: "countdown".to_string(),
                message: format!(
                    "\"{}\" is not a number of seconds (e.g. 5 or 5s)",
                    s
                ),
            })
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn displayed(countdown: Countdown) -> Vec<u32> {
        (0u64..)
            .take_while(|&elapsed| countdown.is_running_at(elapsed))
            .map(|elapsed| countdown.remaining_at(elapsed))
            .collect()
    }

    #[test]
    fn default_countdown_shows_six_values() {
        let countdown = Countdown::default();
        assert_eq!(countdown.as_secs(), 5);
        assert_eq!(displayed(countdown), vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn running_bound_is_inclusive() {
        let countdown = Countdown::from_secs(5);
        assert!(countdown.is_running_at(0));
        assert!(countdown.is_running_at(5));
        assert!(!countdown.is_running_at(6));
    }

    #[test]
    fn remaining_never_underflows() {
        let countdown = Countdown::from_secs(2);
        assert_eq!(countdown.remaining_at(0), 2);
        assert_eq!(countdown.remaining_at(2), 0);
        assert_eq!(countdown.remaining_at(9), 0);
    }

    #[test]
    fn zero_countdown_ticks_once() {
        assert_eq!(displayed(Countdown::from_secs(0)), vec![0]);
    }

    #[test]
    fn longest_countdown_still_elapses() {
        let countdown = Countdown::from_secs(u32::MAX);
        let last = u64::from(u32::MAX);
        assert!(countdown.is_running_at(last));
        assert_eq!(countdown.remaining_at(last), 0);
        assert_eq!(countdown.remaining_at(0), u32::MAX);
        assert!(!countdown.is_running_at(last + 1));
    }

    #[test]
    fn parse_plain_and_suffixed() {
        assert_eq!("5".parse::<Countdown>().unwrap().as_secs(), 5);
        assert_eq!(" 10S ".parse::<Countdown>().unwrap().as_secs(), 10);
        assert_eq!("0s".parse::<Countdown>().unwrap().as_secs(), 0);
    }

    #[test]
    fn parse_invalid() {
        assert!("".parse::<Countdown>().is_err());
        assert!("-1".parse::<Countdown>().is_err());
        assert!("1m".parse::<Countdown>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Countdown::from_secs(5).to_string(), "5s");
    }
}
