use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    editor::DayConfigEditor,
    models::{
        Calendar, DayConfig, NewScheduleForm, ScheduleHrefResponse, ScheduleSummary, YearMonth, YearMonthQuery,
    },
    AppError, AppResult, AppState,
};

fn parse_year_month(raw: &str) -> AppResult<YearMonth> {
    raw.parse()
        .map_err(|e: crate::models::ParseYearMonthError| AppError::BadRequest(e.to_string()))
}

/// GET /api/schedules
#[utoipa::path(
    get,
    path = "/api/schedules",
    responses(
        (status = 200, description = "Every schedule, newest month first", body = Vec<ScheduleSummary>),
        (status = 502, description = "Scheduler API failure")
    ),
    tag = "schedules"
)]
pub async fn list_schedules(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<ScheduleSummary>>> {
    tracing::info!("Request to get the schedule summaries");

    let mut schedules = state.scheduler.list_schedules().await?;
    ScheduleSummary::sort_newest_first(&mut schedules);

    Ok(Json(schedules))
}

/// GET /api/schedules/new?yearMonth=
#[utoipa::path(
    get,
    path = "/api/schedules/new",
    params(YearMonthQuery),
    responses(
        (status = 200, description = "Default day configurations for the month", body = NewScheduleForm),
        (status = 400, description = "Invalid yearMonth"),
        (status = 502, description = "Scheduler API failure")
    ),
    tag = "schedules"
)]
pub async fn new_schedule_form(
    State(state): State<Arc<AppState>>,
    Query(query): Query<YearMonthQuery>,
) -> AppResult<Json<NewScheduleForm>> {
    let year_month = query.year_month;
    tracing::info!(%year_month, "Request for the new schedule form");

    let doctors = state.scheduler.available_doctors().await?;
    tracing::debug!(doctors = doctors.len(), "Adding available doctors");

    let editor = DayConfigEditor::new(year_month, state.config.day_defaults);

    Ok(Json(NewScheduleForm {
        year_month,
        start_date: year_month.first_day(),
        end_date: year_month.last_day(),
        doctors,
        day_confs: editor.build_submission(),
    }))
}

/// POST /api/schedules/new?yearMonth=
#[utoipa::path(
    post,
    path = "/api/schedules/new",
    params(YearMonthQuery),
    request_body = Vec<DayConfig>,
    responses(
        (status = 200, description = "Schedule generated", body = ScheduleHrefResponse),
        (status = 400, description = "Days do not match the month"),
        (status = 422, description = "A staff member is both wanted and unwanted on a day"),
        (status = 502, description = "Scheduler API failure")
    ),
    tag = "schedules"
)]
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Query(query): Query<YearMonthQuery>,
    Json(day_confs): Json<Vec<DayConfig>>,
) -> AppResult<Json<ScheduleHrefResponse>> {
    let year_month = query.year_month;
    tracing::info!(%year_month, days = day_confs.len(), "Request to create a schedule");

    // Normalises order and rejects gaps, duplicates and conflicting preferences
    let editor = DayConfigEditor::from_day_configs(year_month, day_confs)?;
    let calendar = Calendar::new(year_month, editor.build_submission());
    tracing::debug!(?calendar, "Calendar built from submission");

    let schedule_href = state.scheduler.generate_schedule(&calendar).await?;

    Ok(Json(ScheduleHrefResponse { schedule_href }))
}

/// GET /api/schedules/{yearMonth}
#[utoipa::path(
    get,
    path = "/api/schedules/{yearMonth}",
    params(("yearMonth" = String, Path, description = "Month as YYYY-MM")),
    responses(
        (status = 200, description = "Schedule as returned by the scheduler API"),
        (status = 404, description = "No schedule for the month")
    ),
    tag = "schedules"
)]
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Path(year_month): Path<String>,
) -> AppResult<Json<Value>> {
    let year_month = parse_year_month(&year_month)?;
    tracing::info!(%year_month, "Request to get schedule");

    state
        .scheduler
        .get_schedule(year_month)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No schedule for {}", year_month)))
}

/// POST /api/schedules/{yearMonth}/confirm
#[utoipa::path(
    post,
    path = "/api/schedules/{yearMonth}/confirm",
    params(("yearMonth" = String, Path, description = "Month as YYYY-MM")),
    responses(
        (status = 200, description = "The confirmed schedule"),
        (status = 404, description = "No schedule for the month"),
        (status = 502, description = "Scheduler API failure")
    ),
    tag = "schedules"
)]
pub async fn confirm_schedule(
    State(state): State<Arc<AppState>>,
    Path(year_month): Path<String>,
) -> AppResult<Json<Value>> {
    let year_month = parse_year_month(&year_month)?;
    tracing::info!(%year_month, "Request to confirm schedule");

    state
        .scheduler
        .confirm_schedule(year_month)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No schedule for {}", year_month)))
}
