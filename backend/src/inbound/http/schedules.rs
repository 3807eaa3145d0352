//! Schedules API handlers.
//!
//! ```text
//! GET    /api/schedules
//! POST   /api/schedules        {"time":"08:30","enabled":true,"days":"daily"}
//! PATCH  /api/schedules/{id}   partial fields
//! DELETE /api/schedules/{id}
//! ```

use actix_web::{delete, get, patch, post, web, HttpResponse};

use crate::domain::{Error, Schedule, ScheduleDraft, SchedulePatch};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// List all schedules, ordered by time of day.
#[utoipa::path(
    get,
    path = "/api/schedules",
    responses(
        (status = 200, description = "Schedules ordered by time", body = [Schedule]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["schedules"],
    operation_id = "listSchedules"
)]
#[get("/schedules")]
pub async fn list_schedules(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Schedule>>> {
    Ok(web::Json(state.schedules.list().await?))
}

/// Create a schedule; at most 5 may exist.
#[utoipa::path(
    post,
    path = "/api/schedules",
    request_body = ScheduleDraft,
    responses(
        (status = 201, description = "Created schedule", body = Schedule),
        (status = 400, description = "Malformed input or schedule limit reached", body = Error),
        (status = 500, description = "Command publish failed", body = Error)
    ),
    tags = ["schedules"],
    operation_id = "createSchedule"
)]
#[post("/schedules")]
pub async fn create_schedule(
    state: web::Data<HttpState>,
    payload: web::Json<ScheduleDraft>,
) -> ApiResult<HttpResponse> {
    let created = state.schedules.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Partially update a schedule.
#[utoipa::path(
    patch,
    path = "/api/schedules/{id}",
    request_body = SchedulePatch,
    params(("id" = i32, Path, description = "Schedule identifier")),
    responses(
        (status = 200, description = "Updated schedule", body = Schedule),
        (status = 400, description = "Malformed input", body = Error),
        (status = 404, description = "Unknown schedule", body = Error),
        (status = 500, description = "Command publish failed", body = Error)
    ),
    tags = ["schedules"],
    operation_id = "updateSchedule"
)]
#[patch("/schedules/{id}")]
pub async fn update_schedule(
    state: web::Data<HttpState>,
    id: web::Path<i32>,
    payload: web::Json<SchedulePatch>,
) -> ApiResult<web::Json<Schedule>> {
    let updated = state
        .schedules
        .update(id.into_inner(), payload.into_inner())
        .await?;
    Ok(web::Json(updated))
}

/// Delete a schedule.
#[utoipa::path(
    delete,
    path = "/api/schedules/{id}",
    params(("id" = i32, Path, description = "Schedule identifier")),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 404, description = "Unknown schedule", body = Error),
        (status = 500, description = "Command publish failed", body = Error)
    ),
    tags = ["schedules"],
    operation_id = "deleteSchedule"
)]
#[delete("/schedules/{id}")]
pub async fn delete_schedule(
    state: web::Data<HttpState>,
    id: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state.schedules.delete(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
