//! Additional notes stage: two free-text fields.

use crate::models::{AdditionalNotes, AdditionalNotesPatch, NotesField, StageId};
use crate::store::ReportStore;

use super::{EditOutcome, FieldGroup, FieldView, StageEdit, StageError, StageView};

pub fn view(notes: &AdditionalNotes) -> StageView {
    StageView {
        stage: StageId::AdditionalNotes,
        title: "Additional Notes",
        groups: vec![FieldGroup::new(
            "Additional Notes",
            vec![
                FieldView::text_area("notes", "Notes", &notes.notes),
                FieldView::text_area("recommendations", "Recommendations", &notes.recommendations),
            ],
        )],
        pages: None,
    }
}

pub(crate) fn apply(store: &mut ReportStore, edit: StageEdit) -> Result<EditOutcome, StageError> {
    if let StageEdit::SetNotesField { field, value } = edit {
        let patch = match field {
            NotesField::Notes => AdditionalNotesPatch {
                notes: Some(value),
                ..Default::default()
            },
            NotesField::Recommendations => AdditionalNotesPatch {
                recommendations: Some(value),
                ..Default::default()
            },
        };
        store.update_additional_notes(patch);
    }
    Ok(EditOutcome::default())
}
