//! Server assembly: configuration, migrations, adapter wiring, and routes.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use diesel::pg::PgConnection;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

use crate::domain::{FeedService, ScheduleService, StatusBoard};
use crate::inbound::http::device::{device_status, manual_feed};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::feed_logs::{create_feed_log, list_feed_logs};
use crate::inbound::http::schedules::{
    create_schedule, delete_schedule, list_schedules, update_schedule,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::mqtt::TopicSet;
use crate::middleware::trace::Trace;
use crate::outbound::mqtt::{BrokerConfig, MqttCommandPublisher};
use crate::outbound::persistence::{
    DbPool, DieselFeedLogRepository, DieselScheduleRepository, PoolConfig,
};

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Build the Actix application around a prepared [`HttpState`].
pub fn build_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api")
        .service(list_schedules)
        .service(create_schedule)
        .service(update_schedule)
        .service(delete_schedule)
        .service(list_feed_logs)
        .service(create_feed_log)
        .service(device_status)
        .service(manual_feed);

    let app = App::new()
        .app_data(state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(api);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Apply pending schema migrations over a blocking connection.
///
/// Runs once at startup before the pool serves requests.
fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|e| std::io::Error::other(format!("database connection failed: {e}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
    info!(count = applied.len(), "schema migrations applied");
    Ok(())
}

/// Bootstrap adapters and serve HTTP until shutdown.
///
/// Connects PostgreSQL and the MQTT broker, wires the domain services,
/// spawns the broker event loop, and binds the listener.
///
/// # Errors
/// Returns [`std::io::Error`] when `DATABASE_URL` is missing, the pool or
/// migrations fail, or the socket cannot be bound.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let database_url = config
        .database_url
        .clone()
        .ok_or_else(|| std::io::Error::other("DATABASE_URL must be set"))?;

    run_migrations(&database_url)?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|e| std::io::Error::other(format!("pool setup failed: {}", e.message())))?;

    let topics = TopicSet::for_prefix(&config.topic_prefix);
    let broker = BrokerConfig::from_url(&config.broker_url, config.mqtt_client_id.clone());
    let (client, eventloop) = crate::outbound::mqtt::connect(&broker);

    let publisher = Arc::new(MqttCommandPublisher::new(client.clone(), topics.clone()));
    let board = Arc::new(StatusBoard::new());
    let schedules = Arc::new(ScheduleService::new(
        Arc::new(DieselScheduleRepository::new(pool.clone())),
        Arc::clone(&publisher) as _,
    ));
    let feeds = Arc::new(FeedService::new(
        Arc::new(DieselFeedLogRepository::new(pool.clone())),
        Arc::clone(&publisher) as _,
        Arc::clone(&board),
    ));

    tokio::spawn(crate::inbound::mqtt::run(
        client,
        eventloop,
        topics,
        Arc::clone(&feeds),
    ));

    let state = web::Data::new(HttpState::new(schedules, feeds, board));
    info!(addr = %config.bind_addr, broker = %config.broker_url, "starting server");
    HttpServer::new(move || build_app(state.clone()))
        .bind(config.bind_addr)?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    //! Routing smoke tests over the assembled application.

    use actix_web::{http::StatusCode, test, web};

    use super::build_app;
    use crate::inbound::http::state::test_state;

    #[actix_web::test]
    async fn api_scope_serves_device_status() {
        let (state, _logs, _publisher) = test_state();
        let app = test::init_service(build_app(web::Data::new(state))).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/device/status").to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn unknown_route_is_not_found() {
        let (state, _logs, _publisher) = test_state();
        let app = test::init_service(build_app(web::Data::new(state))).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/nope").to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn malformed_json_body_yields_invalid_request() {
        let (state, _logs, _publisher) = test_state();
        let app = test::init_service(build_app(web::Data::new(state))).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/schedules")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
