use async_trait::async_trait;

use super::macros::define_port_error;
use crate::domain::command::ScheduleSetCommand;

define_port_error! {
    /// Failures raised by the outbound command transport.
    pub enum PublishError {
        /// The broker client rejected or could not accept the message.
        Transport { message: String } => "command publish failed: {message}",
    }
}

/// Outbound command port towards the feeder device.
///
/// Fire-and-forget: success means the transport accepted the message, not
/// that the device executed it. Completion, if any, arrives later as an
/// inbound status report. There are no retries at this layer.
#[async_trait]
pub trait CommandPublisher: Send + Sync {
    /// Emit the fixed manual-feed command.
    async fn publish_feed(&self) -> Result<(), PublishError>;

    /// Emit the full enabled-schedule list as one message.
    async fn publish_schedule_set(&self, command: &ScheduleSetCommand) -> Result<(), PublishError>;
}
