//! Outbound device command encodings.
//!
//! The feeder's protocol is a stateless JSON contract: a fixed feed action
//! and a full desired-state schedule list. Encoding lives in the domain so
//! the MQTT adapter stays a dumb byte pipe.

use serde_json::{json, Value};

use super::schedule::Schedule;

/// The fixed manual-feed command, `{"action":"feed"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedCommand;

impl FeedCommand {
    /// Wire payload for the feed-command topic.
    pub fn encode(self) -> String {
        json!({ "action": "feed" }).to_string()
    }
}

/// Full-state schedule push, `{"schedules":[[hour,minute,durationMs,flag],...]}`.
///
/// Always carries every enabled schedule; the device replaces its whole
/// table on receipt, so deltas are deliberately not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSetCommand {
    entries: Vec<(u8, u8, u32, u32)>,
}

impl ScheduleSetCommand {
    /// Build the command from a schedule list, keeping only enabled rows
    /// in their given order.
    pub fn from_schedules<'a>(schedules: impl IntoIterator<Item = &'a Schedule>) -> Self {
        Self {
            entries: schedules
                .into_iter()
                .filter(|schedule| schedule.enabled)
                .map(Schedule::to_command_tuple)
                .collect(),
        }
    }

    /// Number of entries the device will receive.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no schedule is enabled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wire payload for the schedule-set topic.
    pub fn encode(&self) -> String {
        let entries: Vec<Value> = self
            .entries
            .iter()
            .map(|(hour, minute, duration_ms, flag)| json!([hour, minute, duration_ms, flag]))
            .collect();
        json!({ "schedules": entries }).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::Schedule;
    use serde_json::Value;

    fn schedule(id: i32, time: &str, enabled: bool) -> Schedule {
        Schedule {
            id,
            time: time.parse().expect("valid time"),
            enabled,
            days: None,
        }
    }

    #[test]
    fn feed_command_is_the_fixed_action() {
        let value: Value = serde_json::from_str(&FeedCommand.encode()).expect("valid json");
        assert_eq!(value, serde_json::json!({ "action": "feed" }));
    }

    #[test]
    fn schedule_set_keeps_only_enabled_rows_in_order() {
        let schedules = [
            schedule(1, "06:00", true),
            schedule(2, "12:30", false),
            schedule(3, "19:15", true),
        ];
        let command = ScheduleSetCommand::from_schedules(&schedules);
        assert_eq!(command.len(), 2);

        let value: Value = serde_json::from_str(&command.encode()).expect("valid json");
        assert_eq!(
            value,
            serde_json::json!({
                "schedules": [[6, 0, 30_000, 1], [19, 15, 30_000, 1]]
            })
        );
    }

    #[test]
    fn empty_set_still_encodes_a_list() {
        let command = ScheduleSetCommand::from_schedules(&[]);
        assert!(command.is_empty());
        assert_eq!(command.encode(), r#"{"schedules":[]}"#);
    }
}
