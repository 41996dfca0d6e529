pub mod scheduler_api;
pub mod submitter;

pub use scheduler_api::{schedule_href, ScheduleBackend, SchedulerApi};
pub use submitter::{ConfirmPrompt, ScheduleSubmitter, SubmitError, SubmitOutcome, SubmitState};
