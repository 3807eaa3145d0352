//! Feed log API handlers.
//!
//! ```text
//! GET  /api/feed-logs
//! POST /api/feed-logs   {"status":"PENDING","type":"MANUAL","message":"..."}
//! ```
//!
//! The POST path exists for manual/test insertion when no device is
//! around; normal rows are written by the feed service.

use actix_web::{get, post, web, HttpResponse};

use crate::domain::{Error, FeedLog, NewFeedLog};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// List the most recent feed history entries, newest first.
#[utoipa::path(
    get,
    path = "/api/feed-logs",
    responses(
        (status = 200, description = "At most 50 entries, newest first", body = [FeedLog]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feed-logs"],
    operation_id = "listFeedLogs"
)]
#[get("/feed-logs")]
pub async fn list_feed_logs(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<FeedLog>>> {
    Ok(web::Json(state.feeds.recent_logs().await?))
}

/// Append a feed history entry directly.
#[utoipa::path(
    post,
    path = "/api/feed-logs",
    request_body = NewFeedLog,
    responses(
        (status = 201, description = "Stored entry", body = FeedLog),
        (status = 400, description = "Malformed input", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feed-logs"],
    operation_id = "createFeedLog"
)]
#[post("/feed-logs")]
pub async fn create_feed_log(
    state: web::Data<HttpState>,
    payload: web::Json<NewFeedLog>,
) -> ApiResult<HttpResponse> {
    let stored = state.feeds.append_log(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(stored))
}
