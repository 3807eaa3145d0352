//! In-memory device state.
//!
//! The server keeps a single best-known snapshot of the physical feeder,
//! fed by classified inbound MQTT messages and read by the status
//! endpoint. The original dashboard kept this in an unguarded global and
//! could serve torn reads; here the state lives behind one mutex and every
//! reader gets a consistent copy.

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};
use std::sync::{Mutex, MutexGuard, PoisonError};
use utoipa::ToSchema;

/// How long the device may stay silent before a snapshot read reports it
/// offline. Two variants of the original disagreed on this; we keep the
/// timeout.
pub const ONLINE_TIMEOUT_SECS: i64 = 60;

/// A classified inbound device message.
///
/// Produced by the MQTT classifier; consumed by [`StatusBoard`] and the
/// feed-log synthesis in `FeedService::ingest`. Missing payload fields are
/// already defaulted by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// Top-level status report, possibly signalling a completed feed.
    StatusReport { event: String, source: String },
    /// Connectivity announcement (LWT or boot message).
    ConnectionReport {
        state: String,
        reason: String,
        ip: String,
    },
    /// In-progress dispense update.
    ProgressReport {
        event: String,
        source: String,
        elapsed_ms: u64,
        total_ms: u64,
    },
}

fn serialize_last_seen<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(ts) => serializer.collect_str(&ts.to_rfc3339()),
        None => serializer.serialize_str(""),
    }
}

/// Consistent copy of the device state as served to the dashboard.
///
/// Wire keys follow the original dashboard contract exactly, including the
/// snake_case progress durations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSnapshot {
    /// Whether the device is considered reachable.
    pub online: bool,
    /// Last IP address the device reported.
    pub ip: String,
    /// Last offline/online reason the device reported.
    pub reason: String,
    /// Label of the dispense step currently in progress.
    pub progress: String,
    /// When any message was last received, RFC 3339; empty before the
    /// first message.
    #[serde(serialize_with = "serialize_last_seen")]
    #[schema(value_type = String, example = "2026-01-05T08:30:00+00:00")]
    pub last_seen: Option<DateTime<Utc>>,
    /// Source of the in-progress dispense.
    pub source: String,
    /// Elapsed dispense duration in milliseconds.
    #[serde(rename = "elapsed_ms")]
    pub elapsed_ms: u64,
    /// Total dispense duration in milliseconds.
    #[serde(rename = "total_ms")]
    pub total_ms: u64,
    /// Whether the server's own broker link is up.
    pub mqtt_connected: bool,
}

#[derive(Debug, Default)]
struct BoardState {
    online: bool,
    ip: String,
    reason: String,
    progress: String,
    source: String,
    elapsed_ms: u64,
    total_ms: u64,
    last_seen: Option<DateTime<Utc>>,
    mqtt_connected: bool,
}

/// Process-wide device status aggregator.
///
/// Field groups are overwritten independently by whichever message last
/// touched them; there is deliberately no reconciliation between groups.
/// The single lock only guarantees that readers never observe a write in
/// progress.
#[derive(Debug, Default)]
pub struct StatusBoard {
    inner: Mutex<BoardState>,
}

impl StatusBoard {
    /// Create an empty board: offline, no addresses, no progress.
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, BoardState> {
        // A poisoned lock only means a panicking writer; the plain-data
        // state is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a top-level status report. Receiving anything on the status
    /// topic implies the device is up.
    pub fn record_status(&self, _source: &str, _event: &str) {
        let mut state = self.guard();
        state.online = true;
        state.last_seen = Some(Utc::now());
    }

    /// Record a connectivity announcement.
    pub fn record_connection(&self, state_text: &str, reason: &str, ip: &str) {
        let mut state = self.guard();
        state.online = state_text == "online";
        state.reason = reason.to_owned();
        state.ip = ip.to_owned();
        state.last_seen = Some(Utc::now());
    }

    /// Record an in-progress dispense update.
    pub fn record_progress(&self, event: &str, source: &str, elapsed_ms: u64, total_ms: u64) {
        let mut state = self.guard();
        state.progress = event.to_owned();
        state.source = source.to_owned();
        state.elapsed_ms = elapsed_ms;
        state.total_ms = total_ms;
        state.last_seen = Some(Utc::now());
    }

    /// Track the server's own broker link; this is not device state and
    /// does not stamp `last_seen`.
    pub fn set_broker_connected(&self, connected: bool) {
        self.guard().mqtt_connected = connected;
    }

    /// Apply the board-relevant part of a classified event.
    pub fn apply(&self, event: &DeviceEvent) {
        match event {
            DeviceEvent::StatusReport { event, source } => self.record_status(source, event),
            DeviceEvent::ConnectionReport { state, reason, ip } => {
                self.record_connection(state, reason, ip);
            }
            DeviceEvent::ProgressReport {
                event,
                source,
                elapsed_ms,
                total_ms,
            } => self.record_progress(event, source, *elapsed_ms, *total_ms),
        }
    }

    /// Consistent snapshot with the staleness policy applied at `now`.
    ///
    /// The stored state is never mutated by reads; a device that went
    /// silent simply reads as offline until it speaks again.
    pub fn snapshot_at(&self, now: DateTime<Utc>) -> DeviceSnapshot {
        let state = self.guard();
        let fresh = state
            .last_seen
            .is_some_and(|seen| now - seen <= Duration::seconds(ONLINE_TIMEOUT_SECS));
        DeviceSnapshot {
            online: state.online && fresh,
            ip: state.ip.clone(),
            reason: state.reason.clone(),
            progress: state.progress.clone(),
            last_seen: state.last_seen,
            source: state.source.clone(),
            elapsed_ms: state.elapsed_ms,
            total_ms: state.total_ms,
            mqtt_connected: state.mqtt_connected,
        }
    }

    /// Consistent snapshot as of the current time.
    pub fn snapshot(&self) -> DeviceSnapshot {
        self.snapshot_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_board_reads_offline_with_empty_fields() {
        let board = StatusBoard::new();
        let snapshot = board.snapshot();
        assert!(!snapshot.online);
        assert!(!snapshot.mqtt_connected);
        assert_eq!(snapshot.ip, "");
        assert_eq!(snapshot.last_seen, None);
    }

    #[rstest]
    #[case("online", true)]
    #[case("offline", false)]
    #[case("rebooting", false)]
    #[case("", false)]
    fn connection_state_sets_online_flag(#[case] state: &str, #[case] expected: bool) {
        let board = StatusBoard::new();
        board.record_connection(state, "power cycle", "192.168.1.40");
        let snapshot = board.snapshot();
        assert_eq!(snapshot.online, expected);
        assert_eq!(snapshot.ip, "192.168.1.40");
        assert_eq!(snapshot.reason, "power cycle");
        assert!(snapshot.last_seen.is_some());
    }

    #[test]
    fn status_report_marks_online() {
        let board = StatusBoard::new();
        board.record_status("manual", "feeding done");
        assert!(board.snapshot().online);
    }

    #[test]
    fn progress_overwrites_only_its_field_group() {
        let board = StatusBoard::new();
        board.record_connection("online", "-", "10.0.0.7");
        board.record_progress("dispensing", "schedule", 1_500, 30_000);
        let snapshot = board.snapshot();
        assert_eq!(snapshot.progress, "dispensing");
        assert_eq!(snapshot.source, "schedule");
        assert_eq!(snapshot.elapsed_ms, 1_500);
        assert_eq!(snapshot.total_ms, 30_000);
        // The connection group is untouched.
        assert_eq!(snapshot.ip, "10.0.0.7");
        assert!(snapshot.online);
    }

    #[test]
    fn silence_beyond_timeout_reads_offline_without_mutating_state() {
        let board = StatusBoard::new();
        board.record_connection("online", "-", "10.0.0.7");
        let seen = board.snapshot().last_seen.expect("stamped");

        let later = seen + Duration::seconds(ONLINE_TIMEOUT_SECS + 1);
        assert!(!board.snapshot_at(later).online);

        // A read within the window still reports online: reads do not
        // decay the stored flag.
        let shortly = seen + Duration::seconds(1);
        assert!(board.snapshot_at(shortly).online);
    }

    #[test]
    fn broker_flag_is_independent_of_device_liveness() {
        let board = StatusBoard::new();
        board.set_broker_connected(true);
        let snapshot = board.snapshot();
        assert!(snapshot.mqtt_connected);
        assert!(!snapshot.online);
        assert_eq!(snapshot.last_seen, None);
    }

    #[test]
    fn snapshot_serialises_original_wire_keys() {
        let board = StatusBoard::new();
        board.record_progress("dispensing", "manual", 10, 20);
        let value = serde_json::to_value(board.snapshot()).expect("serialise");
        for key in [
            "online",
            "ip",
            "reason",
            "progress",
            "lastSeen",
            "source",
            "elapsed_ms",
            "total_ms",
            "mqttConnected",
        ] {
            assert!(value.get(key).is_some(), "missing wire key {key}");
        }
    }

    #[test]
    fn last_seen_serialises_empty_before_first_message() {
        let value = serde_json::to_value(StatusBoard::new().snapshot()).expect("serialise");
        assert_eq!(value["lastSeen"], "");
    }
}
