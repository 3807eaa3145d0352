//! Device API handlers.
//!
//! ```text
//! GET  /api/device/status
//! POST /api/device/feed
//! ```

use actix_web::{get, post, web};

use crate::domain::{DeviceSnapshot, Error, FeedAck};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Current best-known device state.
#[utoipa::path(
    get,
    path = "/api/device/status",
    responses(
        (status = 200, description = "Device snapshot", body = DeviceSnapshot)
    ),
    tags = ["device"],
    operation_id = "deviceStatus"
)]
#[get("/device/status")]
pub async fn device_status(state: web::Data<HttpState>) -> web::Json<DeviceSnapshot> {
    web::Json(state.board.snapshot())
}

/// Trigger a manual feed now.
///
/// Success only means the transport accepted the command; one PENDING
/// history row is written either way the attempt went.
#[utoipa::path(
    post,
    path = "/api/device/feed",
    responses(
        (status = 200, description = "Command accepted by transport", body = FeedAck),
        (status = 500, description = "Command publish failed", body = Error)
    ),
    tags = ["device"],
    operation_id = "manualFeed"
)]
#[post("/device/feed")]
pub async fn manual_feed(state: web::Data<HttpState>) -> ApiResult<web::Json<FeedAck>> {
    Ok(web::Json(state.feeds.manual_feed().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::state::test_state;
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use serde_json::Value;

    fn app_with(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api")
                .service(device_status)
                .service(manual_feed),
        )
    }

    #[actix_web::test]
    async fn status_serves_the_board_snapshot() {
        let (state, _, _) = test_state();
        state.board.record_connection("online", "-", "192.168.1.23");
        let app = actix_test::init_service(app_with(state)).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/device/status")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["online"], true);
        assert_eq!(body["ip"], "192.168.1.23");
        assert_eq!(body["mqttConnected"], false);
    }

    #[actix_web::test]
    async fn manual_feed_acks_and_logs_exactly_once() {
        let (state, logs, _) = test_state();
        let app = actix_test::init_service(app_with(state)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/device/feed")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Feed command sent");
        assert_eq!(logs.len(), 1);
    }

    #[actix_web::test]
    async fn failed_publish_is_500_with_redacted_body_and_one_log() {
        let (state, logs, publisher) = test_state();
        let app = actix_test::init_service(app_with(state)).await;

        publisher.fail_next();
        let request = actix_test::TestRequest::post()
            .uri("/api/device/feed")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "internal_error");
        assert_eq!(body["message"], "Internal server error");
        assert_eq!(logs.len(), 1);
    }
}
