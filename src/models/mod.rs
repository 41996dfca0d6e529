pub mod calendar;
pub mod day_config;
pub mod doctor;
pub mod schedule;

pub use calendar::{Calendar, ParseYearMonthError, YearMonth};
pub use day_config::{DayConfig, StaffId, StaffIdSet, StaffRef};
pub use doctor::Doctor;
pub use schedule::{
    NewScheduleForm, ScheduleHrefResponse, ScheduleStatus, ScheduleSummary, YearMonthQuery,
};
