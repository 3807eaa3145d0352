//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they only depend on
//! domain services and remain testable against in-memory ports.

use std::sync::Arc;

use crate::domain::{FeedService, ScheduleService, StatusBoard};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub schedules: Arc<ScheduleService>,
    pub feeds: Arc<FeedService>,
    pub board: Arc<StatusBoard>,
}

impl HttpState {
    /// Bundle the services the REST surface needs.
    pub fn new(
        schedules: Arc<ScheduleService>,
        feeds: Arc<FeedService>,
        board: Arc<StatusBoard>,
    ) -> Self {
        Self {
            schedules,
            feeds,
            board,
        }
    }
}

/// State wired over in-memory fixture ports, for handler tests.
///
/// Also returns the fixture log store and publisher so tests can assert on
/// rows and published commands.
#[cfg(test)]
pub fn test_state() -> (
    HttpState,
    Arc<crate::domain::ports::MemoryFeedLogRepository>,
    Arc<crate::domain::ports::RecordingCommandPublisher>,
) {
    use crate::domain::ports::{MemoryFeedLogRepository, MemoryScheduleRepository, RecordingCommandPublisher};

    let publisher = Arc::new(RecordingCommandPublisher::new());
    let logs = Arc::new(MemoryFeedLogRepository::new());
    let board = Arc::new(StatusBoard::new());
    let schedules = Arc::new(ScheduleService::new(
        Arc::new(MemoryScheduleRepository::new()),
        Arc::clone(&publisher) as _,
    ));
    let feeds = Arc::new(FeedService::new(
        Arc::clone(&logs) as _,
        Arc::clone(&publisher) as _,
        Arc::clone(&board),
    ));
    (
        HttpState::new(schedules, feeds, board),
        logs,
        publisher,
    )
}
