pub mod day_editor;
pub mod events;

pub use day_editor::{DayConfigEditor, DayDefaults, DayEdit, EditForm, EditorError, EditorState};
pub use events::{EditorEvent, EditorView};
