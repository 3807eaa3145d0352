//! Inbound message classifier.
//!
//! Maps (topic, JSON payload) pairs onto typed [`DeviceEvent`]s. There is
//! no schema validation beyond the JSON parse: missing fields default the
//! same way the original dashboard defaulted them, and unparsable payloads
//! are dropped with a warning.

use serde::Deserialize;
use tracing::warn;

use super::TopicSet;
use crate::domain::DeviceEvent;

fn dash() -> String {
    "-".to_owned()
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    #[serde(default)]
    event: String,
    #[serde(default)]
    source: String,
}

#[derive(Debug, Deserialize)]
struct ConnectionPayload {
    #[serde(default)]
    state: String,
    #[serde(default = "dash")]
    reason: String,
    #[serde(default = "dash")]
    ip: String,
}

#[derive(Debug, Deserialize)]
struct ProgressPayload {
    #[serde(default = "dash")]
    event: String,
    #[serde(default = "dash")]
    source: String,
    #[serde(default)]
    elapsed_ms: u64,
    #[serde(default)]
    total_ms: u64,
}

fn parse<'a, T: Deserialize<'a>>(topic: &str, payload: &'a [u8]) -> Option<T> {
    match serde_json::from_slice(payload) {
        Ok(parsed) => Some(parsed),
        Err(parse_err) => {
            warn!(topic, error = %parse_err, "dropping unparsable mqtt payload");
            None
        }
    }
}

/// Classify one inbound publish, or `None` when the topic is not ours or
/// the payload is not JSON.
pub fn classify(topics: &TopicSet, topic: &str, payload: &[u8]) -> Option<DeviceEvent> {
    if topic == topics.status {
        let parsed: StatusPayload = parse(topic, payload)?;
        Some(DeviceEvent::StatusReport {
            event: parsed.event,
            source: parsed.source,
        })
    } else if topic == topics.connection {
        let parsed: ConnectionPayload = parse(topic, payload)?;
        Some(DeviceEvent::ConnectionReport {
            state: parsed.state,
            reason: parsed.reason,
            ip: parsed.ip,
        })
    } else if topic == topics.progress {
        let parsed: ProgressPayload = parse(topic, payload)?;
        Some(DeviceEvent::ProgressReport {
            event: parsed.event,
            source: parsed.source,
            elapsed_ms: parsed.elapsed_ms,
            total_ms: parsed.total_ms,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn topics() -> TopicSet {
        TopicSet::default()
    }

    #[test]
    fn status_topic_classifies_a_status_report() {
        let event = classify(
            &topics(),
            "fishfeeder/01/status",
            br#"{"event":"feeding done","source":"manual"}"#,
        );
        assert_eq!(
            event,
            Some(DeviceEvent::StatusReport {
                event: "feeding done".into(),
                source: "manual".into(),
            })
        );
    }

    #[test]
    fn connection_topic_defaults_missing_fields_to_dashes() {
        let event = classify(
            &topics(),
            "fishfeeder/01/status/connection",
            br#"{"state":"online"}"#,
        );
        assert_eq!(
            event,
            Some(DeviceEvent::ConnectionReport {
                state: "online".into(),
                reason: "-".into(),
                ip: "-".into(),
            })
        );
    }

    #[test]
    fn progress_topic_defaults_durations_to_zero() {
        let event = classify(&topics(), "fishfeeder/01/status/progress", b"{}");
        assert_eq!(
            event,
            Some(DeviceEvent::ProgressReport {
                event: "-".into(),
                source: "-".into(),
                elapsed_ms: 0,
                total_ms: 0,
            })
        );
    }

    #[rstest]
    #[case::wrong_topic("fishfeeder/01/cmd/feed", br#"{"action":"feed"}"#.as_slice())]
    #[case::not_json("fishfeeder/01/status", b"feeding done".as_slice())]
    #[case::empty_payload("fishfeeder/01/status/connection", b"".as_slice())]
    fn junk_is_dropped(#[case] topic: &str, #[case] payload: &[u8]) {
        assert_eq!(classify(&topics(), topic, payload), None);
    }

    #[test]
    fn status_with_missing_fields_defaults_to_empty_strings() {
        let event = classify(&topics(), "fishfeeder/01/status", b"{}");
        assert_eq!(
            event,
            Some(DeviceEvent::StatusReport {
                event: String::new(),
                source: String::new(),
            })
        );
    }
}
