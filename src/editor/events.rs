use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{DayConfigEditor, DayEdit, EditForm, EditorError, EditorState};
use crate::models::{DayConfig, StaffIdSet, StaffRef, YearMonth};

/// A view gesture forwarded to the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    /// Right-click / long-press on a calendar cell
    Open { day: u32 },
    Confirm {
        #[serde(rename = "numShifts")]
        num_shifts: u32,
        #[serde(rename = "numConsultations")]
        num_consultations: u32,
        #[serde(rename = "wantedShifts", default)]
        #[schema(value_type = Vec<StaffRef>)]
        wanted_shifts: StaffIdSet,
        #[serde(rename = "unwantedShifts", default)]
        #[schema(value_type = Vec<StaffRef>)]
        unwanted_shifts: StaffIdSet,
    },
    Cancel,
    /// Current selection of the calendar widget
    SelectNonWorkingDays { dates: Vec<NaiveDate> },
    ToggleDay { day: u32 },
}

impl From<DayEdit> for EditorEvent {
    fn from(edit: DayEdit) -> Self {
        EditorEvent::Confirm {
            num_shifts: edit.num_shifts,
            num_consultations: edit.num_consultations,
            wanted_shifts: edit.wanted_shifts,
            unwanted_shifts: edit.unwanted_shifts,
        }
    }
}

/// Everything a view needs to render the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    #[schema(value_type = String, example = "2020-06")]
    pub year_month: YearMonth,
    /// The open edit form, `null` while the editor is closed
    pub editing: Option<EditForm>,
    pub non_working_days: Vec<u32>,
    pub days: Vec<DayConfig>,
}

impl DayConfigEditor {
    pub fn apply(&mut self, event: EditorEvent) -> Result<(), EditorError> {
        match event {
            EditorEvent::Open { day } => self.open_editor(day).map(|_| ()),
            EditorEvent::Confirm {
                num_shifts,
                num_consultations,
                wanted_shifts,
                unwanted_shifts,
            } => {
                let edit = DayEdit {
                    num_shifts,
                    num_consultations,
                    wanted_shifts,
                    unwanted_shifts,
                };
                self.confirm_edit(edit).map(|_| ())
            }
            EditorEvent::Cancel => {
                self.cancel();
                Ok(())
            }
            EditorEvent::SelectNonWorkingDays { dates } => self.toggle_non_working_days(dates),
            EditorEvent::ToggleDay { day } => self.toggle_day(day).map(|_| ()),
        }
    }

    pub fn view(&self) -> EditorView {
        let editing = match self.state() {
            EditorState::Open(form) => Some(form.clone()),
            EditorState::Closed => None,
        };

        EditorView {
            year_month: self.year_month(),
            editing,
            non_working_days: self.non_working_days().collect(),
            days: self.build_submission(),
        }
    }
}
