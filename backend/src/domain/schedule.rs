//! Feed schedule entity and its validation rules.
//!
//! A schedule is a daily recurring feed trigger time. The store assigns
//! identifiers; the device only ever receives the full list of enabled
//! schedules, never a delta.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Hard cap on stored schedules, enforced at creation only.
pub const MAX_SCHEDULES: usize = 5;

/// Dispense duration sent with every schedule entry, in milliseconds.
pub const SCHEDULE_DURATION_MS: u32 = 30_000;

/// Flag value sent with every schedule entry; the device treats non-zero
/// as "armed".
pub const SCHEDULE_FLAG: u32 = 1;

/// Validation failures for [`ScheduleTime`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleTimeError {
    /// The value is not of the form `HH:mm`.
    #[error("schedule time must be of the form HH:mm, got {value:?}")]
    Malformed { value: String },
    /// Hour or minute is outside its valid range.
    #[error("schedule time {value:?} is out of range")]
    OutOfRange { value: String },
}

/// A 24-hour `HH:mm` time of day.
///
/// Stored and serialised as the original dashboard string form; the device
/// command encoding uses the numeric parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleTime {
    hour: u8,
    minute: u8,
}

impl ScheduleTime {
    /// Build a time from parts, validating ranges.
    pub fn from_parts(hour: u8, minute: u8) -> Result<Self, ScheduleTimeError> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleTimeError::OutOfRange {
                value: format!("{hour:02}:{minute:02}"),
            });
        }
        Ok(Self { hour, minute })
    }

    /// Hour component (0..=23).
    pub fn hour(self) -> u8 {
        self.hour
    }

    /// Minute component (0..=59).
    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ScheduleTime {
    type Err = ScheduleTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ScheduleTimeError::Malformed { value: s.to_owned() };
        let (hour_str, minute_str) = s.split_once(':').ok_or_else(malformed)?;
        if hour_str.len() != 2 || minute_str.len() != 2 {
            return Err(malformed());
        }
        let hour: u8 = hour_str.parse().map_err(|_| malformed())?;
        let minute: u8 = minute_str.parse().map_err(|_| malformed())?;
        Self::from_parts(hour, minute).map_err(|_| ScheduleTimeError::OutOfRange {
            value: s.to_owned(),
        })
    }
}

impl Serialize for ScheduleTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScheduleTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A persisted feed schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Store-assigned identifier.
    pub id: i32,
    /// Trigger time of day.
    #[schema(value_type = String, example = "08:30")]
    pub time: ScheduleTime,
    /// Whether this schedule is pushed to the device.
    pub enabled: bool,
    /// Optional day selector; stored and echoed, not interpreted here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<String>,
}

impl Schedule {
    /// Encode this schedule as the device wire tuple
    /// `(hour, minute, duration_ms, flag)`.
    pub fn to_command_tuple(&self) -> (u8, u8, u32, u32) {
        (
            self.time.hour(),
            self.time.minute(),
            SCHEDULE_DURATION_MS,
            SCHEDULE_FLAG,
        )
    }
}

/// Input payload for creating a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDraft {
    /// Trigger time of day.
    #[schema(value_type = String, example = "08:30")]
    pub time: ScheduleTime,
    /// Whether this schedule is pushed to the device.
    pub enabled: bool,
    /// Optional day selector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<String>,
}

/// Partial update for a schedule; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePatch {
    /// Replacement trigger time.
    #[schema(value_type = Option<String>, example = "19:00")]
    pub time: Option<ScheduleTime>,
    /// Replacement enabled flag.
    pub enabled: Option<bool>,
    /// Replacement day selector.
    pub days: Option<String>,
}

impl SchedulePatch {
    /// True when the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.time.is_none() && self.enabled.is_none() && self.days.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("00:00", 0, 0)]
    #[case("08:30", 8, 30)]
    #[case("23:59", 23, 59)]
    fn parses_valid_times(#[case] raw: &str, #[case] hour: u8, #[case] minute: u8) {
        let time: ScheduleTime = raw.parse().expect("valid time");
        assert_eq!(time.hour(), hour);
        assert_eq!(time.minute(), minute);
        assert_eq!(time.to_string(), raw);
    }

    #[rstest]
    #[case("24:00")]
    #[case("12:60")]
    #[case("8:30")]
    #[case("08-30")]
    #[case("")]
    #[case("ab:cd")]
    fn rejects_invalid_times(#[case] raw: &str) {
        assert!(raw.parse::<ScheduleTime>().is_err());
    }

    #[test]
    fn time_orders_chronologically() {
        let early: ScheduleTime = "06:15".parse().expect("valid time");
        let late: ScheduleTime = "18:05".parse().expect("valid time");
        assert!(early < late);
    }

    #[test]
    fn command_tuple_uses_fixed_duration_and_flag() {
        let schedule = Schedule {
            id: 1,
            time: "07:45".parse().expect("valid time"),
            enabled: true,
            days: None,
        };
        assert_eq!(schedule.to_command_tuple(), (7, 45, 30_000, 1));
    }

    #[test]
    fn time_round_trips_through_json() {
        let schedule = Schedule {
            id: 3,
            time: "21:00".parse().expect("valid time"),
            enabled: false,
            days: Some("daily".into()),
        };
        let json = serde_json::to_value(&schedule).expect("serialise");
        assert_eq!(json["time"], "21:00");
        let back: Schedule = serde_json::from_value(json).expect("deserialise");
        assert_eq!(back, schedule);
    }
}
