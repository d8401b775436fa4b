use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Time-of-day slot for an exam session, always rendered as zero-padded `HH:mm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourOfDay(NaiveTime);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid HH:mm hour")]
pub struct HourParseError(pub String);

fn hour_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").expect("hour pattern compiles")
    })
}

impl HourOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Accepts `H:mm` or `HH:mm`; the minute part must always have two digits.
    pub fn parse(raw: &str) -> Result<Self, HourParseError> {
        let trimmed = raw.trim();
        let captures = hour_pattern()
            .captures(trimmed)
            .ok_or_else(|| HourParseError(raw.to_string()))?;

        let hour = captures[1]
            .parse::<u32>()
            .map_err(|_| HourParseError(raw.to_string()))?;
        let minute = captures[2]
            .parse::<u32>()
            .map_err(|_| HourParseError(raw.to_string()))?;

        Self::new(hour, minute).ok_or_else(|| HourParseError(raw.to_string()))
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    pub fn as_time(self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for HourOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for HourOfDay {
    type Err = HourParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HourOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HourOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_single_digit_hours() {
        let hour = HourOfDay::parse("9:05").expect("valid hour");
        assert_eq!(hour.to_string(), "09:05");
        assert_eq!(HourOfDay::parse(" 23:59 ").expect("valid").to_string(), "23:59");
        assert_eq!(HourOfDay::parse("00:00").expect("valid").to_string(), "00:00");
    }

    #[test]
    fn rejects_malformed_hours() {
        for raw in ["9:5", "24:00", "12:60", "1205", "", "ab:cd", "123:00", "12:5a"] {
            assert!(HourOfDay::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn orders_chronologically() {
        let early = HourOfDay::parse("8:30").expect("valid");
        let late = HourOfDay::parse("14:00").expect("valid");
        assert!(early < late);
    }

    #[test]
    fn serde_uses_padded_string() {
        let hour: HourOfDay = serde_json::from_str("\"7:45\"").expect("deserializes");
        assert_eq!(serde_json::to_string(&hour).expect("serializes"), "\"07:45\"");
        assert!(serde_json::from_str::<HourOfDay>("\"7:4\"").is_err());
    }
}
