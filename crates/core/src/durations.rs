//! Durations

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Length of the fixed base appointment, in minutes.
pub const BASE_MINUTES: u32 = 30;

/// Longest additional duration a single line can carry, in minutes.
pub const MAX_ADDITIONAL_MINUTES: u32 = DurationBucket::TwentyFourHours.minutes();

/// Errors raised while parsing duration inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    /// The bucket key is not one of the known duration keys.
    #[error("unknown duration bucket: {0}")]
    UnknownBucket(String),

    /// The time unit is neither hours nor minutes.
    #[error("unknown time unit: {0}")]
    UnknownUnit(String),
}

/// A named, fixed duration option with its own price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DurationBucket {
    /// 1 minute
    OneMinute,

    /// 15 minutes
    FifteenMinutes,

    /// 45 minutes
    FortyFiveMinutes,

    /// 1 hour
    OneHour,

    /// 2 hours
    TwoHours,

    /// 3 hours
    ThreeHours,

    /// 6 hours
    SixHours,

    /// 12 hours
    TwelveHours,

    /// 24 hours
    TwentyFourHours,
}

impl DurationBucket {
    /// Every bucket, shortest first.
    pub const ALL: [DurationBucket; 9] = [
        DurationBucket::OneMinute,
        DurationBucket::FifteenMinutes,
        DurationBucket::FortyFiveMinutes,
        DurationBucket::OneHour,
        DurationBucket::TwoHours,
        DurationBucket::ThreeHours,
        DurationBucket::SixHours,
        DurationBucket::TwelveHours,
        DurationBucket::TwentyFourHours,
    ];

    /// Buckets offered to customers as preset buttons, in display order.
    pub const STOREFRONT: [DurationBucket; 7] = [
        DurationBucket::FifteenMinutes,
        DurationBucket::FortyFiveMinutes,
        DurationBucket::OneHour,
        DurationBucket::TwoHours,
        DurationBucket::SixHours,
        DurationBucket::TwelveHours,
        DurationBucket::TwentyFourHours,
    ];

    /// Duration of the bucket in minutes.
    #[must_use]
    pub const fn minutes(self) -> u32 {
        match self {
            Self::OneMinute => 1,
            Self::FifteenMinutes => 15,
            Self::FortyFiveMinutes => 45,
            Self::OneHour => 60,
            Self::TwoHours => 120,
            Self::ThreeHours => 180,
            Self::SixHours => 360,
            Self::TwelveHours => 720,
            Self::TwentyFourHours => 1440,
        }
    }

    /// Stable key used on the wire and in stored price field names.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::OneMinute => "1min",
            Self::FifteenMinutes => "15min",
            Self::FortyFiveMinutes => "45min",
            Self::OneHour => "1h",
            Self::TwoHours => "2h",
            Self::ThreeHours => "3h",
            Self::SixHours => "6h",
            Self::TwelveHours => "12h",
            Self::TwentyFourHours => "24h",
        }
    }

    /// Label shown next to the price input in the admin screens.
    #[must_use]
    pub const fn admin_label(self) -> &'static str {
        match self {
            Self::OneMinute => "1 Minute",
            Self::FifteenMinutes => "15 Minutes",
            Self::FortyFiveMinutes => "45 Minutes",
            Self::OneHour => "1 Hour",
            Self::TwoHours => "2 Hours",
            Self::ThreeHours => "3 Hours",
            Self::SixHours => "6 Hours",
            Self::TwelveHours => "12 Hours",
            Self::TwentyFourHours => "24 Hours",
        }
    }

    /// Label shown on the storefront preset button.
    #[must_use]
    pub const fn storefront_label(self) -> &'static str {
        match self {
            Self::TwentyFourHours => "24h(max)",
            other => other.key(),
        }
    }
}

impl fmt::Display for DurationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DurationBucket {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();

        Self::ALL
            .into_iter()
            .find(|bucket| bucket.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| DurationError::UnknownBucket(s.to_string()))
    }
}

impl Serialize for DurationBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for DurationBucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;

        key.parse().map_err(serde::de::Error::custom)
    }
}

/// Unit of a free-form duration entered by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Hours
    Hours,

    /// Minutes
    Minutes,
}

impl TimeUnit {
    /// Converts an amount in this unit into minutes, or `None` on overflow.
    #[must_use]
    pub fn to_minutes(self, amount: Decimal) -> Option<Decimal> {
        match self {
            Self::Hours => amount.checked_mul(Decimal::from(60)),
            Self::Minutes => Some(amount),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hours" | "hour" | "h" => Ok(Self::Hours),
            "minutes" | "minute" | "min" => Ok(Self::Minutes),
            _ => Err(DurationError::UnknownUnit(s.to_string())),
        }
    }
}

/// A free-form amount of extra time, as entered by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FreeFormDuration {
    amount: Decimal,
    unit: TimeUnit,
}

impl FreeFormDuration {
    /// Creates a free-form duration. Returns `None` when the amount is negative.
    #[must_use]
    pub fn new(amount: Decimal, unit: TimeUnit) -> Option<Self> {
        if amount < Decimal::ZERO {
            return None;
        }

        Some(Self {
            amount: amount.abs(),
            unit,
        })
    }

    /// The amount as entered.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The unit the amount was entered in.
    #[must_use]
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// The duration in minutes, which may be fractional.
    #[must_use]
    pub fn minutes(&self) -> Option<Decimal> {
        self.unit.to_minutes(self.amount)
    }

    /// The duration in whole minutes, or `None` when it is not a whole number
    /// of minutes or does not fit in a `u32`.
    #[must_use]
    pub fn whole_minutes(&self) -> Option<u32> {
        let minutes = self.minutes()?;

        if !minutes.fract().is_zero() {
            return None;
        }

        minutes.to_u32()
    }
}

/// Formats a number of minutes the way the storefront shows session lengths,
/// e.g. `"1 hour 30 minutes"`.
#[must_use]
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;

    match (hours, rest) {
        (0, rest) => plural(rest, "minute"),
        (hours, 0) => plural(hours, "hour"),
        (hours, rest) => format!("{} {}", plural(hours, "hour"), plural(rest, "minute")),
    }
}

fn plural(count: u32, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn bucket_minutes_are_ordered() {
        let minutes: Vec<u32> = DurationBucket::ALL.iter().map(|b| b.minutes()).collect();

        assert!(minutes.windows(2).all(|pair| pair.first() < pair.last()));
        assert_eq!(minutes.last(), Some(&1440));
    }

    #[test]
    fn bucket_keys_parse_back() -> TestResult {
        for bucket in DurationBucket::ALL {
            assert_eq!(bucket.key().parse::<DurationBucket>()?, bucket);
        }

        assert_eq!("1H".parse::<DurationBucket>()?, DurationBucket::OneHour);

        Ok(())
    }

    #[test]
    fn unknown_bucket_is_rejected() {
        assert_eq!(
            "30min".parse::<DurationBucket>(),
            Err(DurationError::UnknownBucket("30min".to_string()))
        );
    }

    #[test]
    fn storefront_labels_mark_the_maximum() {
        assert_eq!(DurationBucket::OneHour.storefront_label(), "1h");
        assert_eq!(DurationBucket::TwentyFourHours.storefront_label(), "24h(max)");
        assert!(!DurationBucket::STOREFRONT.contains(&DurationBucket::OneMinute));
        assert!(!DurationBucket::STOREFRONT.contains(&DurationBucket::ThreeHours));
    }

    #[test]
    fn time_units_parse() -> TestResult {
        assert_eq!("Hours".parse::<TimeUnit>()?, TimeUnit::Hours);
        assert_eq!("minutes".parse::<TimeUnit>()?, TimeUnit::Minutes);
        assert!("days".parse::<TimeUnit>().is_err());

        Ok(())
    }

    #[test]
    fn free_form_converts_hours_to_minutes() {
        let duration = FreeFormDuration::new(Decimal::new(15, 1), TimeUnit::Hours);

        assert_eq!(duration.and_then(|d| d.whole_minutes()), Some(90));
    }

    #[test]
    fn free_form_rejects_negative_amounts() {
        assert!(FreeFormDuration::new(Decimal::from(-1), TimeUnit::Minutes).is_none());
    }

    #[test]
    fn fractional_minutes_are_not_whole() {
        let duration = FreeFormDuration::new(Decimal::new(1, 2), TimeUnit::Hours);

        assert_eq!(duration.and_then(|d| d.whole_minutes()), None);
    }

    #[test]
    fn formats_minutes_like_the_storefront() {
        assert_eq!(format_minutes(0), "0 minutes");
        assert_eq!(format_minutes(1), "1 minute");
        assert_eq!(format_minutes(30), "30 minutes");
        assert_eq!(format_minutes(60), "1 hour");
        assert_eq!(format_minutes(90), "1 hour 30 minutes");
        assert_eq!(format_minutes(121), "2 hours 1 minute");
    }
}
