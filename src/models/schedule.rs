use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{DayConfig, Doctor, YearMonth};

/// `?yearMonth=YYYY-MM`
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct YearMonthQuery {
    #[serde(rename = "yearMonth")]
    #[param(value_type = String, example = "2020-06")]
    pub year_month: YearMonth,
}

/// Initial state of the new-schedule form for one month
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduleForm {
    #[schema(value_type = String, example = "2020-06")]
    pub year_month: YearMonth,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Staff that can be picked as wanted or unwanted
    pub doctors: Vec<Doctor>,
    pub day_confs: Vec<DayConfig>,
}

/// Response to an accepted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleHrefResponse {
    pub schedule_href: String,
}

/// Generation status reported by the scheduler API
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleStatus {
    pub status: String,
}

impl ScheduleStatus {
    pub const BEING_GENERATED: &'static str = "BEING_GENERATED";

    pub fn is_being_generated(&self) -> bool {
        self.status == Self::BEING_GENERATED
    }
}

/// One row of the schedule list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleSummary {
    pub month: u32,
    pub year: i32,
    pub status: String,
}

impl ScheduleSummary {
    /// Newest month first
    pub fn sort_newest_first(schedules: &mut [ScheduleSummary]) {
        schedules.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summaries_sorted_newest_first() {
        let summary = |year, month| ScheduleSummary {
            month,
            year,
            status: "CONFIRMED".to_string(),
        };
        let mut schedules = vec![summary(2019, 12), summary(2020, 2), summary(2020, 11), summary(2018, 1)];

        ScheduleSummary::sort_newest_first(&mut schedules);

        let order: Vec<(i32, u32)> = schedules.iter().map(|s| (s.year, s.month)).collect();
        assert_eq!(order, vec![(2020, 11), (2020, 2), (2019, 12), (2018, 1)]);
    }
}
