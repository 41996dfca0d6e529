pub mod debug;
pub mod editors_handler;
pub mod health;
pub mod metrics;
pub mod schedules_handler;

pub use health::health_check;
pub use self::metrics::{setup_metrics_recorder, MetricsState};
