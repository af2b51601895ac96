//! Rate value object.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{QuotaError, Result};

/// Standard window lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    /// One second
    Second,
    /// One minute
    Minute,
    /// One hour
    Hour,
    /// One day
    Day,
}

impl Interval {
    /// Length of this interval in seconds.
    pub fn as_secs(&self) -> u64 {
        match self {
            Interval::Second => 1,
            Interval::Minute => 60,
            Interval::Hour => 3600,
            Interval::Day => 86400,
        }
    }

    /// Get the duration of this interval.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.as_secs())
    }
}

/// A quota: at most `operations` hits per `interval` seconds.
///
/// Both values are strictly positive; every constructor checks this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RateSpec")]
pub struct Rate {
    operations: u64,
    interval: u64,
}

impl Rate {
    /// Build a rate of `operations` per `interval` seconds.
    pub fn of(operations: u64, interval: u64) -> Result<Self> {
        if operations == 0 {
            return Err(QuotaError::InvalidArgument(
                "operations must be greater than zero".to_string(),
            ));
        }
        if interval == 0 {
            return Err(QuotaError::InvalidArgument(
                "interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            operations,
            interval,
        })
    }

    /// Build a rate over one of the standard intervals.
    pub fn per(operations: u64, interval: Interval) -> Result<Self> {
        Self::of(operations, interval.as_secs())
    }

    /// Build a rate of `operations` per second.
    pub fn per_second(operations: u64) -> Result<Self> {
        Self::per(operations, Interval::Second)
    }

    /// Build a rate of `operations` per minute.
    pub fn per_minute(operations: u64) -> Result<Self> {
        Self::per(operations, Interval::Minute)
    }

    /// Build a rate of `operations` per hour.
    pub fn per_hour(operations: u64) -> Result<Self> {
        Self::per(operations, Interval::Hour)
    }

    /// Build a rate of `operations` per day.
    pub fn per_day(operations: u64) -> Result<Self> {
        Self::per(operations, Interval::Day)
    }

    /// Operations allowed per window.
    pub fn operations(&self) -> u64 {
        self.operations
    }

    /// Window length in seconds.
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Get the window length as a [`Duration`].
    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}s", self.operations, self.interval)
    }
}

/// Serialized form of a [`Rate`].
///
/// Exactly one of `unit`, `interval_secs`, or its alias `interval` must be set.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateSpec {
    /// Operations allowed per window
    pub operations: u64,
    /// A standard interval
    #[serde(default)]
    pub unit: Option<Interval>,
    /// A custom interval in seconds
    #[serde(default)]
    pub interval_secs: Option<u64>,
    /// Alias for `interval_secs`, matching the serialized form of [`Rate`]
    #[serde(default)]
    pub interval: Option<u64>,
}

impl TryFrom<RateSpec> for Rate {
    type Error = QuotaError;

    fn try_from(spec: RateSpec) -> Result<Self> {
        let secs = match (spec.interval_secs, spec.interval) {
            (Some(_), Some(_)) => {
                return Err(QuotaError::InvalidArgument(
                    "rate must set either interval_secs or interval, not both".to_string(),
                ))
            }
            (secs, alias) => secs.or(alias),
        };
        let interval = match (spec.unit, secs) {
            (Some(unit), None) => unit.as_secs(),
            (None, Some(secs)) => secs,
            (Some(_), Some(_)) => {
                return Err(QuotaError::InvalidArgument(
                    "rate must set either unit or interval_secs, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(QuotaError::InvalidArgument(
                    "rate must set unit or interval_secs".to_string(),
                ))
            }
        };
        Rate::of(spec.operations, interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_duration() {
        assert_eq!(Interval::Second.duration(), Duration::from_secs(1));
        assert_eq!(Interval::Minute.duration(), Duration::from_secs(60));
        assert_eq!(Interval::Hour.duration(), Duration::from_secs(3600));
        assert_eq!(Interval::Day.duration(), Duration::from_secs(86400));
    }

    #[test]
    fn test_rate_of_rejects_zero() {
        assert!(matches!(
            Rate::of(0, 60),
            Err(QuotaError::InvalidArgument(_))
        ));
        assert!(matches!(
            Rate::of(5, 0),
            Err(QuotaError::InvalidArgument(_))
        ));
        assert!(matches!(
            Rate::per_hour(0),
            Err(QuotaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rate_of_round_trips() {
        let rate = Rate::of(5, 60).unwrap();
        assert_eq!(rate.operations(), 5);
        assert_eq!(rate.interval(), 60);
        assert_eq!(rate.interval_duration(), Duration::from_secs(60));
    }

    #[test]
    fn test_named_constructors() {
        assert_eq!(Rate::per_second(2).unwrap().interval(), 1);
        assert_eq!(Rate::per_minute(2).unwrap().interval(), 60);
        assert_eq!(Rate::per_hour(2).unwrap().interval(), 3600);
        assert_eq!(Rate::per_day(2).unwrap().interval(), 86400);
        assert_eq!(Rate::per_day(2).unwrap(), Rate::of(2, 86400).unwrap());
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(Rate::of(3, 10).unwrap().to_string(), "3/10s");
    }

    #[test]
    fn test_rate_deserialize_validates() {
        let rate: Rate = serde_yaml::from_str("operations: 5\nunit: minute\n").unwrap();
        assert_eq!(rate, Rate::per_minute(5).unwrap());

        let rate: Rate = serde_yaml::from_str("operations: 3\ninterval_secs: 10\n").unwrap();
        assert_eq!(rate, Rate::of(3, 10).unwrap());

        assert!(serde_yaml::from_str::<Rate>("operations: 0\nunit: second\n").is_err());
        assert!(serde_yaml::from_str::<Rate>("operations: 1\n").is_err());
        assert!(
            serde_yaml::from_str::<Rate>("operations: 1\nunit: hour\ninterval_secs: 5\n").is_err()
        );
        assert!(serde_yaml::from_str::<Rate>(
            "operations: 1\ninterval_secs: 5\ninterval: 10\n"
        )
        .is_err());

        let rate: Rate = serde_yaml::from_str("operations: 4\ninterval: 30\n").unwrap();
        assert_eq!(rate, Rate::of(4, 30).unwrap());
    }
}
