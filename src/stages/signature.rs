//! Signature stage: signing doctor and an optional signature image.

use crate::imaging::EmbeddedImage;
use crate::models::{Signature, SignatureField, SignaturePatch, StageId};
use crate::store::ReportStore;

use super::{EditOutcome, FieldGroup, FieldView, StageEdit, StageError, StageView};

pub fn view(signature: &Signature) -> StageView {
    StageView {
        stage: StageId::Signature,
        title: "Signature",
        groups: vec![FieldGroup::new(
            "Signature",
            vec![
                FieldView::text("doctorName", "Doctor Name", &signature.doctor_name),
                FieldView::text("designation", "Designation", &signature.designation),
                FieldView::date("date", "Date", &signature.date),
                FieldView::image("signature", "Signature", signature.signature.as_ref()),
            ],
        )],
        pages: None,
    }
}

pub(crate) fn apply(store: &mut ReportStore, edit: StageEdit) -> Result<EditOutcome, StageError> {
    let patch = match edit {
        StageEdit::SetSignatureField { field, value } => {
            let mut patch = SignaturePatch::default();
            match field {
                SignatureField::DoctorName => patch.doctor_name = Some(value),
                SignatureField::Designation => patch.designation = Some(value),
                SignatureField::Date => patch.date = Some(value),
            }
            patch
        }
        StageEdit::AttachSignature { upload } => {
            let image = EmbeddedImage::from_upload(&upload)?;
            tracing::debug!(mime = %image.mime_type, "Signature image attached");
            SignaturePatch {
                signature: Some(Some(image)),
                ..Default::default()
            }
        }
        StageEdit::ClearSignature => SignaturePatch {
            signature: Some(None),
            ..Default::default()
        },
        _ => return Ok(EditOutcome::default()),
    };

    store.update_signature(patch);
    Ok(EditOutcome::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ImageUpload;
    use crate::stages::{apply_edit, FieldValue};

    #[test]
    fn attach_then_clear_signature() {
        let mut store = ReportStore::seeded("r");
        apply_edit(
            &mut store,
            StageEdit::AttachSignature {
                upload: ImageUpload {
                    file_name: "sig.jpg".into(),
                    content_type: None,
                    data: "/9j/4AAQ".into(),
                },
            },
        )
        .unwrap();

        let image = store.report().signature.signature.clone().unwrap();
        assert_eq!(image.mime_type, "image/jpeg");

        let view = view(&store.report().signature);
        let field = view.group("Signature").unwrap().field("signature").unwrap();
        assert_eq!(field.value, FieldValue::Image(Some(image)));

        apply_edit(&mut store, StageEdit::ClearSignature).unwrap();
        assert!(store.report().signature.signature.is_none());
    }

    #[test]
    fn field_edit_keeps_other_fields() {
        let mut store = ReportStore::seeded("r");
        apply_edit(
            &mut store,
            StageEdit::SetSignatureField {
                field: SignatureField::Date,
                value: "2026-10-19".into(),
            },
        )
        .unwrap();

        let signature = &store.report().signature;
        assert_eq!(signature.date, "2026-10-19");
        assert_eq!(signature.doctor_name, "Dr. Sarah Johnson");
        assert_eq!(signature.designation, "Neurologist");
    }
}
