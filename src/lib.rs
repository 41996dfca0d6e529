pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod startup;

use moka::future::Cache;
use std::sync::Arc;
use uuid::Uuid;

pub use client::ScheduleBackend;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use handlers::editors_handler::EditorHandle;
pub use handlers::MetricsState;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub scheduler: Arc<dyn ScheduleBackend>,
    pub editors: Cache<Uuid, EditorHandle>, // session id → editor, expires when idle
    pub metrics: Arc<MetricsState>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        scheduler: Arc<dyn ScheduleBackend>,
        metrics: Arc<MetricsState>,
    ) -> Self {
        let editors = Cache::builder()
            .time_to_idle(config.editor_session_ttl)
            .max_capacity(1_000)
            .build();

        Self {
            config,
            scheduler,
            editors,
            metrics,
        }
    }
}
