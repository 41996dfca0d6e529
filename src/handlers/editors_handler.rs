use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    editor::{DayConfigEditor, EditorEvent, EditorView},
    models::{Calendar, ScheduleHrefResponse, YearMonthQuery},
    AppError, AppResult, AppState,
};

pub type EditorHandle = Arc<Mutex<DayConfigEditor>>;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditorSessionResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub view: EditorView,
}

async fn find_editor(state: &AppState, id: Uuid) -> AppResult<EditorHandle> {
    state
        .editors
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Editor session {} not found", id)))
}

/// POST /api/editors?yearMonth=
#[utoipa::path(
    post,
    path = "/api/editors",
    params(YearMonthQuery),
    responses(
        (status = 201, description = "Editor session created with the month's defaults", body = EditorSessionResponse)
    ),
    tag = "editors"
)]
pub async fn create_editor(
    State(state): State<Arc<AppState>>,
    Query(query): Query<YearMonthQuery>,
) -> AppResult<(StatusCode, Json<EditorSessionResponse>)> {
    let id = Uuid::new_v4();
    let editor = DayConfigEditor::new(query.year_month, state.config.day_defaults);
    let view = editor.view();

    state.editors.insert(id, Arc::new(Mutex::new(editor))).await;
    tracing::info!(%id, year_month = %query.year_month, "Editor session created");

    Ok((StatusCode::CREATED, Json(EditorSessionResponse { id, view })))
}

/// GET /api/editors/{id}
#[utoipa::path(
    get,
    path = "/api/editors/{id}",
    params(("id" = Uuid, Path, description = "Editor session id")),
    responses(
        (status = 200, description = "Current editor view", body = EditorSessionResponse),
        (status = 404, description = "Unknown or expired session")
    ),
    tag = "editors"
)]
pub async fn get_editor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EditorSessionResponse>> {
    let editor = find_editor(&state, id).await?;
    let view = editor.lock().await.view();

    Ok(Json(EditorSessionResponse { id, view }))
}

/// POST /api/editors/{id}/events
#[utoipa::path(
    post,
    path = "/api/editors/{id}/events",
    params(("id" = Uuid, Path, description = "Editor session id")),
    request_body = EditorEvent,
    responses(
        (status = 200, description = "Event applied", body = EditorSessionResponse),
        (status = 400, description = "Day or date outside the month"),
        (status = 404, description = "Unknown or expired session"),
        (status = 409, description = "Editor already open, or not open"),
        (status = 422, description = "A staff member is both wanted and unwanted")
    ),
    tag = "editors"
)]
pub async fn apply_editor_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(event): Json<EditorEvent>,
) -> AppResult<Json<EditorSessionResponse>> {
    let editor = find_editor(&state, id).await?;
    let mut editor = editor.lock().await;

    tracing::debug!(%id, ?event, "Applying editor event");
    editor.apply(event)?;

    Ok(Json(EditorSessionResponse {
        id,
        view: editor.view(),
    }))
}

/// POST /api/editors/{id}/submit
#[utoipa::path(
    post,
    path = "/api/editors/{id}/submit",
    params(("id" = Uuid, Path, description = "Editor session id")),
    responses(
        (status = 200, description = "Schedule generated; the session is closed", body = ScheduleHrefResponse),
        (status = 404, description = "Unknown or expired session, or already submitted"),
        (status = 502, description = "Scheduler API failure; the session is kept")
    ),
    tag = "editors"
)]
pub async fn submit_editor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ScheduleHrefResponse>> {
    // Taken out of the cache so a concurrent submit of the same session finds nothing
    let handle = state
        .editors
        .remove(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Editor session {} not found", id)))?;

    let calendar = {
        let editor = handle.lock().await;
        tracing::info!(%id, year_month = %editor.year_month(), "Submitting editor session");
        Calendar::new(editor.year_month(), editor.build_submission())
    };

    match state.scheduler.generate_schedule(&calendar).await {
        Ok(schedule_href) => Ok(Json(ScheduleHrefResponse { schedule_href })),
        Err(e) => {
            tracing::warn!(%id, error = %e, "Submission failed, keeping editor session");
            state.editors.insert(id, handle).await;
            Err(e)
        }
    }
}
