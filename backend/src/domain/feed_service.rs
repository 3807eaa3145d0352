//! Feed use-cases: manual triggering, history, and inbound event ingestion.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::device::{DeviceEvent, StatusBoard};
use crate::domain::error::Error;
use crate::domain::feed_log::{FeedLog, FeedStatus, FeedType, NewFeedLog};
use crate::domain::ports::{CommandPublisher, FeedLogRepository, FeedLogRepositoryError};

/// Maximum number of rows the history listing returns.
pub const FEED_LOG_LIMIT: i64 = 50;

/// Status-report event text that marks a completed feed.
pub const FEED_DONE_EVENT: &str = "feeding done";

/// Response body for a manual feed request.
///
/// Acknowledges transport acceptance only; actual execution is reported
/// asynchronously by the device, if at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FeedAck {
    pub success: bool,
    pub message: String,
}

/// Feed service orchestrating the log store, the command port, and the
/// status board.
#[derive(Clone)]
pub struct FeedService {
    logs: Arc<dyn FeedLogRepository>,
    publisher: Arc<dyn CommandPublisher>,
    board: Arc<StatusBoard>,
}

fn map_log_error(error: FeedLogRepositoryError) -> Error {
    match error {
        FeedLogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("feed log store unavailable: {message}"))
        }
        FeedLogRepositoryError::Query { message } => {
            Error::internal(format!("feed log store error: {message}"))
        }
    }
}

impl FeedService {
    /// Create a service over the given ports.
    pub fn new(
        logs: Arc<dyn FeedLogRepository>,
        publisher: Arc<dyn CommandPublisher>,
        board: Arc<StatusBoard>,
    ) -> Self {
        Self {
            logs,
            publisher,
            board,
        }
    }

    /// The device status board backing the status endpoint.
    pub fn board(&self) -> &StatusBoard {
        &self.board
    }

    /// Trigger a manual feed.
    ///
    /// Exactly one log row is written per request: `PENDING` when the
    /// transport accepted the command, `FAILED` with the diagnostic when
    /// it did not. Either way the outcome is recorded before responding.
    pub async fn manual_feed(&self) -> Result<FeedAck, Error> {
        match self.publisher.publish_feed().await {
            Ok(()) => {
                self.append_log(NewFeedLog {
                    status: FeedStatus::Pending,
                    feed_type: FeedType::Manual,
                    message: Some("Command sent to device".into()),
                })
                .await?;
                info!("manual feed command accepted by transport");
                Ok(FeedAck {
                    success: true,
                    message: "Feed command sent".into(),
                })
            }
            Err(publish_err) => {
                self.append_log(NewFeedLog {
                    status: FeedStatus::Failed,
                    feed_type: FeedType::Manual,
                    message: Some("Failed to publish MQTT command".into()),
                })
                .await?;
                Err(Error::internal(format!(
                    "Failed to send command: {publish_err}"
                )))
            }
        }
    }

    /// The most recent history entries, newest first, capped at
    /// [`FEED_LOG_LIMIT`].
    pub async fn recent_logs(&self) -> Result<Vec<FeedLog>, Error> {
        self.logs
            .recent(FEED_LOG_LIMIT)
            .await
            .map_err(map_log_error)
    }

    /// Append a history entry directly (manual/test insertion path).
    pub async fn append_log(&self, entry: NewFeedLog) -> Result<FeedLog, Error> {
        self.logs.append(&entry).await.map_err(map_log_error)
    }

    /// Apply a classified inbound device event.
    ///
    /// Status reports additionally synthesize a history entry: `SUCCESS`
    /// when the event text is the done marker, `PENDING` otherwise, typed
    /// by the reported source. Log-store failures here are logged and
    /// swallowed so a database hiccup never takes down the MQTT loop.
    pub async fn ingest(&self, event: DeviceEvent) {
        self.board.apply(&event);
        if let DeviceEvent::StatusReport { event, source } = event {
            let status = if event == FEED_DONE_EVENT {
                FeedStatus::Success
            } else {
                FeedStatus::Pending
            };
            let message = if event.is_empty() {
                "Feed successful".to_owned()
            } else {
                event
            };
            let entry = NewFeedLog {
                status,
                feed_type: FeedType::from_reported_source(&source),
                message: Some(message),
            };
            if let Err(log_err) = self.logs.append(&entry).await {
                warn!(error = %log_err, "dropping feed log for device status report");
            }
        }
    }
}
