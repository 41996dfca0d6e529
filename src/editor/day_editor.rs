use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use utoipa::ToSchema;

use crate::models::{DayConfig, StaffId, StaffIdSet, YearMonth};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("Day {day} is not part of a month with {days_in_month} days")]
    DayOutOfRange { day: u32, days_in_month: u32 },

    #[error("Date {date} is not in {year_month}")]
    DateOutsideMonth { date: NaiveDate, year_month: YearMonth },

    #[error("Day {0} is already being edited")]
    AlreadyOpen(u32),

    #[error("No day is being edited")]
    NotOpen,

    #[error("Staff {staff_id} is both wanted and unwanted on day {day}")]
    ConflictingPreference { day: u32, staff_id: StaffId },

    #[error("Day {0} is configured more than once")]
    DuplicateDay(u32),

    #[error("Day {0} has no configuration")]
    MissingDay(u32),
}

/// Minimum staffing applied to days of a fresh month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayDefaults {
    pub num_shifts: u32,
    pub num_consultations: u32,
}

/// Values submitted from the edit form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayEdit {
    pub num_shifts: u32,
    pub num_consultations: u32,
    #[serde(default)]
    #[schema(value_type = Vec<crate::models::StaffRef>)]
    pub wanted_shifts: StaffIdSet,
    #[serde(default)]
    #[schema(value_type = Vec<crate::models::StaffRef>)]
    pub unwanted_shifts: StaffIdSet,
}

/// Edit form pre-filled from the stored state of the open day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditForm {
    pub day: u32,
    #[serde(flatten)]
    pub values: DayEdit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorState {
    #[default]
    Closed,
    Open(EditForm),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DayPlan {
    num_shifts: u32,
    num_consultations: u32,
    wanted: StaffIdSet,
    unwanted: StaffIdSet,
}

impl DayPlan {
    fn to_edit(&self) -> DayEdit {
        DayEdit {
            num_shifts: self.num_shifts,
            num_consultations: self.num_consultations,
            wanted_shifts: self.wanted.clone(),
            unwanted_shifts: self.unwanted.clone(),
        }
    }
}

impl From<DayEdit> for DayPlan {
    fn from(edit: DayEdit) -> Self {
        Self {
            num_shifts: edit.num_shifts,
            num_consultations: edit.num_consultations,
            wanted: edit.wanted_shifts,
            unwanted: edit.unwanted_shifts,
        }
    }
}

/// Per-day staffing configuration of one month.
///
/// Stored day state is only changed through [`confirm_edit`](Self::confirm_edit);
/// the working flag lives separately in the non-working selection so that
/// toggling a day never touches its minimums or preferences. A single edit
/// form can be open at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayConfigEditor {
    year_month: YearMonth,
    days: BTreeMap<u32, DayPlan>,
    non_working: BTreeSet<u32>,
    state: EditorState,
}

impl DayConfigEditor {
    /// Fresh month: weekdays working, weekends not, every day at `defaults`
    pub fn new(year_month: YearMonth, defaults: DayDefaults) -> Self {
        let days = (1..=year_month.days_in_month())
            .map(|day| {
                let plan = DayPlan {
                    num_shifts: defaults.num_shifts,
                    num_consultations: defaults.num_consultations,
                    wanted: StaffIdSet::new(),
                    unwanted: StaffIdSet::new(),
                };
                (day, plan)
            })
            .collect();

        let non_working = (1..=year_month.days_in_month())
            .filter(|day| year_month.is_weekend(*day))
            .collect();

        Self {
            year_month,
            days,
            non_working,
            state: EditorState::Closed,
        }
    }

    /// Load an already rendered month. Every day 1..N must appear exactly
    /// once (in any order) and no day may want and avoid the same staff.
    pub fn from_day_configs(
        year_month: YearMonth,
        day_configs: Vec<DayConfig>,
    ) -> Result<Self, EditorError> {
        let days_in_month = year_month.days_in_month();
        let mut days = BTreeMap::new();
        let mut non_working = BTreeSet::new();

        for config in day_configs {
            if !year_month.contains_day(config.day) {
                return Err(EditorError::DayOutOfRange {
                    day: config.day,
                    days_in_month,
                });
            }
            if let Some(staff_id) = config.conflicting_staff() {
                return Err(EditorError::ConflictingPreference {
                    day: config.day,
                    staff_id,
                });
            }
            if !config.is_working_day {
                non_working.insert(config.day);
            }
            let plan = DayPlan {
                num_shifts: config.num_shifts,
                num_consultations: config.num_consultations,
                wanted: config.wanted_shifts,
                unwanted: config.unwanted_shifts,
            };
            if days.insert(config.day, plan).is_some() {
                return Err(EditorError::DuplicateDay(config.day));
            }
        }

        if let Some(missing) = (1..=days_in_month).find(|day| !days.contains_key(day)) {
            return Err(EditorError::MissingDay(missing));
        }

        Ok(Self {
            year_month,
            days,
            non_working,
            state: EditorState::Closed,
        })
    }

    pub fn year_month(&self) -> YearMonth {
        self.year_month
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn open_day(&self) -> Option<u32> {
        match &self.state {
            EditorState::Open(form) => Some(form.day),
            EditorState::Closed => None,
        }
    }

    pub fn non_working_days(&self) -> impl Iterator<Item = u32> + '_ {
        self.non_working.iter().copied()
    }

    pub fn is_working_day(&self, day: u32) -> bool {
        !self.non_working.contains(&day)
    }

    fn check_day(&self, day: u32) -> Result<(), EditorError> {
        if self.year_month.contains_day(day) {
            Ok(())
        } else {
            Err(EditorError::DayOutOfRange {
                day,
                days_in_month: self.year_month.days_in_month(),
            })
        }
    }

    /// Open the edit form on `day`, pre-filled with its stored values
    pub fn open_editor(&mut self, day: u32) -> Result<EditForm, EditorError> {
        if let Some(open) = self.open_day() {
            return Err(EditorError::AlreadyOpen(open));
        }
        self.check_day(day)?;
        let plan = self.days.get(&day).ok_or(EditorError::MissingDay(day))?;

        let form = EditForm {
            day,
            values: plan.to_edit(),
        };
        self.state = EditorState::Open(form.clone());
        Ok(form)
    }

    /// Close the edit form, discarding whatever it holds
    pub fn cancel(&mut self) {
        self.state = EditorState::Closed;
    }

    /// Store `edit` on the open day and close the form. On a preference
    /// conflict nothing is stored and the form stays open.
    pub fn confirm_edit(&mut self, edit: DayEdit) -> Result<u32, EditorError> {
        let day = self.open_day().ok_or(EditorError::NotOpen)?;

        if let Some(staff_id) = edit.wanted_shifts.first_shared(&edit.unwanted_shifts) {
            return Err(EditorError::ConflictingPreference { day, staff_id });
        }

        self.days.insert(day, edit.into());
        self.state = EditorState::Closed;
        Ok(day)
    }

    /// Replace the non-working selection with `selected_dates`. Either every
    /// date belongs to this month and the selection is replaced, or nothing
    /// changes.
    pub fn toggle_non_working_days<I>(&mut self, selected_dates: I) -> Result<(), EditorError>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let year_month = self.year_month;
        let selection = selected_dates
            .into_iter()
            .map(|date| {
                year_month
                    .day_of(date)
                    .ok_or(EditorError::DateOutsideMonth { date, year_month })
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        self.non_working = selection;
        Ok(())
    }

    /// Flip the working flag of a single day; returns the new flag
    pub fn toggle_day(&mut self, day: u32) -> Result<bool, EditorError> {
        self.check_day(day)?;
        if self.non_working.remove(&day) {
            Ok(true)
        } else {
            self.non_working.insert(day);
            Ok(false)
        }
    }

    /// One record per day of the month, in calendar order
    pub fn build_submission(&self) -> Vec<DayConfig> {
        self.days
            .iter()
            .map(|(&day, plan)| DayConfig {
                day,
                is_working_day: self.is_working_day(day),
                num_shifts: plan.num_shifts,
                num_consultations: plan.num_consultations,
                wanted_shifts: plan.wanted.clone(),
                unwanted_shifts: plan.unwanted.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DEFAULTS: DayDefaults = DayDefaults {
        num_shifts: 2,
        num_consultations: 1,
    };

    fn june_2020() -> YearMonth {
        YearMonth::new(2020, 6).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 6, day).unwrap()
    }

    fn edit(num_shifts: u32, wanted: &[StaffId], unwanted: &[StaffId]) -> DayEdit {
        DayEdit {
            num_shifts,
            num_consultations: 1,
            wanted_shifts: wanted.iter().copied().collect(),
            unwanted_shifts: unwanted.iter().copied().collect(),
        }
    }

    #[test]
    fn test_submission_covers_every_day_in_order() {
        for (year, month) in [(2020, 1), (2020, 2), (2021, 2), (2020, 4), (2020, 6), (2020, 12)] {
            let ym = YearMonth::new(year, month).unwrap();
            let editor = DayConfigEditor::new(ym, DEFAULTS);
            let days: Vec<u32> = editor.build_submission().iter().map(|d| d.day).collect();
            let expected: Vec<u32> = (1..=ym.days_in_month()).collect();
            assert_eq!(days, expected, "{}", ym);
        }
    }

    #[test]
    fn test_fresh_month_marks_weekends_non_working() {
        let editor = DayConfigEditor::new(june_2020(), DEFAULTS);
        let submission = editor.build_submission();

        // June 2020 starts on a Monday
        assert!(submission[0].is_working_day);
        assert!(!submission[5].is_working_day);
        assert!(!submission[6].is_working_day);
        assert!(submission.iter().all(|d| d.num_shifts == 2 && d.num_consultations == 1));
    }

    #[test]
    fn test_open_prefills_stored_values() {
        let mut editor = DayConfigEditor::new(june_2020(), DEFAULTS);
        editor.open_editor(3).unwrap();
        editor.confirm_edit(edit(4, &[1, 2], &[5])).unwrap();

        let form = editor.open_editor(3).unwrap();
        assert_eq!(form.day, 3);
        assert_eq!(form.values, edit(4, &[1, 2], &[5]));
    }

    #[test]
    fn test_open_rejects_days_outside_month() {
        let mut editor = DayConfigEditor::new(june_2020(), DEFAULTS);
        assert_eq!(
            editor.open_editor(31).unwrap_err(),
            EditorError::DayOutOfRange { day: 31, days_in_month: 30 }
        );
        assert_eq!(
            editor.open_editor(0).unwrap_err(),
            EditorError::DayOutOfRange { day: 0, days_in_month: 30 }
        );
        assert_eq!(editor.state(), &EditorState::Closed);
    }

    #[test]
    fn test_single_open_editor() {
        let mut editor = DayConfigEditor::new(june_2020(), DEFAULTS);
        editor.open_editor(10).unwrap();
        assert_eq!(editor.open_editor(11).unwrap_err(), EditorError::AlreadyOpen(10));
        assert_eq!(editor.open_day(), Some(10));
    }

    #[test]
    fn test_cancel_leaves_state_untouched() {
        let mut editor = DayConfigEditor::new(june_2020(), DEFAULTS);
        let before = editor.build_submission();

        editor.open_editor(12).unwrap();
        editor.cancel();

        assert_eq!(editor.state(), &EditorState::Closed);
        assert_eq!(editor.build_submission(), before);
    }

    #[test]
    fn test_confirm_requires_open_editor() {
        let mut editor = DayConfigEditor::new(june_2020(), DEFAULTS);
        assert_eq!(editor.confirm_edit(edit(3, &[], &[])).unwrap_err(), EditorError::NotOpen);
    }

    #[test]
    fn test_confirm_is_idempotent() {
        let mut once = DayConfigEditor::new(june_2020(), DEFAULTS);
        once.open_editor(8).unwrap();
        once.confirm_edit(edit(5, &[3], &[4])).unwrap();

        let mut twice = once.clone();
        twice.open_editor(8).unwrap();
        twice.confirm_edit(edit(5, &[3], &[4])).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once.build_submission(), twice.build_submission());
    }

    #[test]
    fn test_confirm_rejects_conflicting_preferences() {
        let mut editor = DayConfigEditor::new(june_2020(), DEFAULTS);
        let before = editor.build_submission();

        editor.open_editor(9).unwrap();
        let err = editor.confirm_edit(edit(3, &[2, 6], &[6])).unwrap_err();

        assert_eq!(err, EditorError::ConflictingPreference { day: 9, staff_id: 6 });
        assert_eq!(editor.open_day(), Some(9));
        assert_eq!(editor.build_submission(), before);
    }

    #[test]
    fn test_toggle_round_trip_keeps_other_fields() {
        let mut editor = DayConfigEditor::new(june_2020(), DEFAULTS);
        editor.open_editor(15).unwrap();
        editor.confirm_edit(edit(6, &[3, 7], &[9])).unwrap();
        let before = editor.build_submission()[14].clone();

        editor.toggle_non_working_days([date(15)]).unwrap();
        let toggled = editor.build_submission()[14].clone();
        assert!(!toggled.is_working_day);
        assert_eq!(
            DayConfig { is_working_day: before.is_working_day, ..toggled },
            before
        );

        editor.toggle_non_working_days(Vec::new()).unwrap();
        assert!(editor.build_submission()[14].is_working_day);

        assert!(!editor.toggle_day(15).unwrap());
        assert!(editor.toggle_day(15).unwrap());
        assert_eq!(editor.build_submission()[14], before);
    }

    #[test]
    fn test_toggle_rejects_dates_outside_month() {
        let mut editor = DayConfigEditor::new(june_2020(), DEFAULTS);
        let before: Vec<u32> = editor.non_working_days().collect();
        let july = NaiveDate::from_ymd_opt(2020, 7, 1).unwrap();

        let err = editor.toggle_non_working_days([date(2), july]).unwrap_err();
        assert_eq!(
            err,
            EditorError::DateOutsideMonth { date: july, year_month: june_2020() }
        );
        assert_eq!(editor.non_working_days().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_day_fifteen_serialization() {
        let mut editor = DayConfigEditor::new(june_2020(), DEFAULTS);
        editor.open_editor(15).unwrap();
        editor.confirm_edit(edit(2, &[7, 3], &[9])).unwrap();
        editor.toggle_non_working_days([date(15)]).unwrap();

        let submission = editor.build_submission();
        assert_eq!(submission.len(), 30);
        assert_eq!(
            serde_json::to_value(&submission[14]).unwrap(),
            json!({
                "day": 15,
                "isWorkingDay": false,
                "numShifts": 2,
                "numConsultations": 1,
                "wantedShifts": [{"id": 3}, {"id": 7}],
                "unwantedShifts": [{"id": 9}]
            })
        );
    }

    #[test]
    fn test_unedited_day_keeps_rendered_minimums() {
        let rendered: Vec<DayConfig> = (1..=30)
            .map(|day| DayConfig {
                day,
                is_working_day: true,
                num_shifts: if day == 20 { 5 } else { 2 },
                num_consultations: 1,
                wanted_shifts: StaffIdSet::new(),
                unwanted_shifts: StaffIdSet::new(),
            })
            .collect();
        let mut editor = DayConfigEditor::from_day_configs(june_2020(), rendered.clone()).unwrap();

        editor.open_editor(3).unwrap();
        editor.confirm_edit(edit(9, &[], &[])).unwrap();

        let submission = editor.build_submission();
        assert_eq!(submission[19], rendered[19]);
        assert_eq!(submission[19].num_shifts, 5);
        assert_eq!(submission[2].num_shifts, 9);
    }

    #[test]
    fn test_empty_selection_means_all_working() {
        let mut editor = DayConfigEditor::new(june_2020(), DEFAULTS);
        editor.toggle_non_working_days(Vec::new()).unwrap();
        assert!(editor.build_submission().iter().all(|d| d.is_working_day));
    }

    #[test]
    fn test_from_day_configs_validates_month() {
        let full = DayConfigEditor::new(june_2020(), DEFAULTS).build_submission();

        let mut missing = full.clone();
        missing.remove(4);
        assert_eq!(
            DayConfigEditor::from_day_configs(june_2020(), missing).unwrap_err(),
            EditorError::MissingDay(5)
        );

        let mut duplicated = full.clone();
        duplicated[4].day = 4;
        assert_eq!(
            DayConfigEditor::from_day_configs(june_2020(), duplicated).unwrap_err(),
            EditorError::DuplicateDay(4)
        );

        let mut extra = full.clone();
        extra.push(DayConfig { day: 31, ..full[0].clone() });
        assert!(matches!(
            DayConfigEditor::from_day_configs(june_2020(), extra),
            Err(EditorError::DayOutOfRange { day: 31, .. })
        ));

        let mut reversed = full.clone();
        reversed.reverse();
        let editor = DayConfigEditor::from_day_configs(june_2020(), reversed).unwrap();
        assert_eq!(editor.build_submission(), full);
    }

    #[test]
    fn test_from_day_configs_rejects_conflicts() {
        let mut days = DayConfigEditor::new(june_2020(), DEFAULTS).build_submission();
        days[1].wanted_shifts.insert(4);
        days[1].unwanted_shifts.insert(4);

        assert_eq!(
            DayConfigEditor::from_day_configs(june_2020(), days).unwrap_err(),
            EditorError::ConflictingPreference { day: 2, staff_id: 4 }
        );
    }
}
