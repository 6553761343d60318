//! Annotations stage: timestamped notes with optional EEG strip images.

use crate::imaging::EmbeddedImage;
use crate::models::{Annotation, AnnotationField, Annotations, AnnotationsPatch, StageId};
use crate::store::{with_record_edit, without_record, ReportStore};

use super::{EditOutcome, FieldGroup, FieldView, StageEdit, StageError, StageView};

fn annotation_group(index: usize, annotation: &Annotation) -> FieldGroup {
    FieldGroup::record(
        format!("Annotation #{}", index + 1),
        annotation.id,
        vec![
            FieldView::text("timestamp", "Timestamp", &annotation.timestamp),
            FieldView::text_area("description", "Description", &annotation.description),
            FieldView::image("image", "EEG Strip", annotation.image.as_ref()),
        ],
    )
}

pub fn view(annotations: &Annotations) -> StageView {
    StageView {
        stage: StageId::Annotations,
        title: "Annotations",
        groups: annotations
            .annotations
            .iter()
            .enumerate()
            .map(|(i, a)| annotation_group(i, a))
            .collect(),
        pages: None,
    }
}

pub(crate) fn apply(store: &mut ReportStore, edit: StageEdit) -> Result<EditOutcome, StageError> {
    let annotations = &store.report().annotations.annotations;
    let mut outcome = EditOutcome::default();

    let updated = match edit {
        StageEdit::AddAnnotation => {
            let annotation = Annotation::new_default();
            outcome.created = Some(annotation.id);
            let mut updated = annotations.clone();
            updated.push(annotation);
            updated
        }
        StageEdit::RemoveAnnotation { id } => without_record(annotations, id, "annotation")?,
        StageEdit::SetAnnotationField { id, field, value } => {
            with_record_edit(annotations, id, "annotation", |a| match field {
                AnnotationField::Timestamp => a.timestamp = value,
                AnnotationField::Description => a.description = value,
            })?
        }
        StageEdit::AttachAnnotationImage { id, upload } => {
            // a rejected upload leaves the annotation's image as it was
            let image = EmbeddedImage::from_upload(&upload)?;
            tracing::debug!(annotation = %id, mime = %image.mime_type, "Annotation image attached");
            with_record_edit(annotations, id, "annotation", |a| a.image = Some(image))?
        }
        StageEdit::ClearAnnotationImage { id } => {
            with_record_edit(annotations, id, "annotation", |a| a.image = None)?
        }
        _ => return Ok(outcome),
    };

    store.update_annotations(AnnotationsPatch {
        annotations: Some(updated),
    });
    Ok(outcome)
}
