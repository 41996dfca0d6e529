use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Guardians Web API",
        version = "0.1.0",
        description = "Month schedule configuration for the guardians doctor scheduler"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // Health
        crate::handlers::health::health_check,

        // Schedules
        crate::handlers::schedules_handler::list_schedules,
        crate::handlers::schedules_handler::new_schedule_form,
        crate::handlers::schedules_handler::create_schedule,
        crate::handlers::schedules_handler::get_schedule,
        crate::handlers::schedules_handler::confirm_schedule,

        // Editor sessions
        crate::handlers::editors_handler::create_editor,
        crate::handlers::editors_handler::get_editor,
        crate::handlers::editors_handler::apply_editor_event,
        crate::handlers::editors_handler::submit_editor,
    ),
    components(
        schemas(
            crate::models::DayConfig,
            crate::models::StaffRef,
            crate::models::Doctor,
            crate::models::ScheduleSummary,
            crate::models::Calendar,
            crate::models::NewScheduleForm,
            crate::models::ScheduleHrefResponse,
            crate::editor::DayEdit,
            crate::editor::EditForm,
            crate::editor::EditorEvent,
            crate::editor::EditorView,
            crate::handlers::editors_handler::EditorSessionResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "schedules", description = "Month schedule configuration and generation"),
        (name = "editors", description = "Day configuration editor sessions"),
    )
)]
pub struct ApiDoc;
