//! Wizard stages.
//!
//! A stage is a pure function of its report section: `view` describes the
//! fields the browser should draw (labels, options, current values and
//! which conditional fields are visible), and `apply_edit` turns one user
//! edit into a section update on the store.
//!
//! Edit patterns:
//! - scalar / single-select field: merge `{field: value}` into the section
//! - tag toggle: add the tag if checked and absent, remove it if unchecked
//! - record lists: add with stage defaults, remove by id, edit by id

pub mod additional_notes;
pub mod annotations;
pub mod eeg_findings;
pub mod patient;
pub mod preview;
pub mod seizure_findings;
pub mod signature;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::imaging::{EmbeddedImage, ImageError, ImageUpload};
use crate::models::{
    AnnotationField, BackgroundField, EegTagGroup, NotesField, PatientField, PatternField,
    Report, SeizureField, SeizureTagGroup, SignatureField, StageId,
};
use crate::store::{ReportStore, StoreError};

use self::preview::ReportPage;

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Image upload rejected: {0}")]
    Image(#[from] ImageError),
    #[error("{value:?} is not an option of {field}")]
    UnknownOption { field: &'static str, value: String },
}

/// Checkbox groups only hold values their checkboxes offer.
pub(crate) fn ensure_option(
    field: &'static str,
    options: &[&str],
    value: &str,
) -> Result<(), StageError> {
    if options.contains(&value) {
        Ok(())
    } else {
        Err(StageError::UnknownOption {
            field,
            value: value.to_string(),
        })
    }
}

// ═══════════════════════════════════════════════════════════
// Stage views
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    TextArea,
    Date,
    Select,
    CheckboxGroup,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Tags(Vec<String>),
    Image(Option<EmbeddedImage>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: FieldValue,
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [&'static str],
    pub visible: bool,
}

fn no_options(options: &&'static [&'static str]) -> bool {
    options.is_empty()
}

impl FieldView {
    pub fn text(name: &'static str, label: &'static str, value: &str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            value: FieldValue::Text(value.to_string()),
            options: &[],
            visible: true,
        }
    }

    pub fn text_area(name: &'static str, label: &'static str, value: &str) -> Self {
        Self {
            kind: FieldKind::TextArea,
            ..Self::text(name, label, value)
        }
    }

    pub fn date(name: &'static str, label: &'static str, value: &str) -> Self {
        Self {
            kind: FieldKind::Date,
            ..Self::text(name, label, value)
        }
    }

    pub fn select(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
        value: &str,
    ) -> Self {
        Self {
            kind: FieldKind::Select,
            options,
            ..Self::text(name, label, value)
        }
    }

    pub fn checkboxes(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
        value: &[String],
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::CheckboxGroup,
            value: FieldValue::Tags(value.to_vec()),
            options,
            visible: true,
        }
    }

    pub fn image(name: &'static str, label: &'static str, value: Option<&EmbeddedImage>) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Image,
            value: FieldValue::Image(value.cloned()),
            options: &[],
            visible: true,
        }
    }

    pub fn shown_if(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// A card on the stage: either a fixed group of fields or one record of a
/// record list (then `record_id` is set).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroup {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<Uuid>,
    pub fields: Vec<FieldView>,
}

impl FieldGroup {
    pub fn new(title: impl Into<String>, fields: Vec<FieldView>) -> Self {
        Self {
            title: title.into(),
            record_id: None,
            fields,
        }
    }

    pub fn record(title: impl Into<String>, id: Uuid, fields: Vec<FieldView>) -> Self {
        Self {
            title: title.into(),
            record_id: Some(id),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageView {
    pub stage: StageId,
    pub title: &'static str,
    pub groups: Vec<FieldGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<ReportPage>>,
}

impl StageView {
    pub fn group(&self, title: &str) -> Option<&FieldGroup> {
        self.groups.iter().find(|g| g.title == title)
    }
}

/// Build the view for `stage` from the current report.
pub fn view(report: &Report, stage: StageId) -> StageView {
    match stage {
        StageId::Patient => patient::view(&report.patient),
        StageId::EegFindings => eeg_findings::view(&report.eeg_findings),
        StageId::SeizureFindings => seizure_findings::view(&report.seizure_findings),
        StageId::Annotations => annotations::view(&report.annotations),
        StageId::AdditionalNotes => additional_notes::view(&report.additional_notes),
        StageId::Signature => signature::view(&report.signature),
        StageId::Preview => preview::view(report),
    }
}

// ═══════════════════════════════════════════════════════════
// Stage edits
// ═══════════════════════════════════════════════════════════

/// One user edit, as sent by the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StageEdit {
    SetPatientField { field: PatientField, value: String },
    ToggleMedication { tag: String, checked: bool },

    SetBackgroundField { field: BackgroundField, value: String },
    ToggleEegTag { group: EegTagGroup, tag: String, checked: bool },
    AddPattern,
    RemovePattern { id: Uuid },
    SetPatternField { id: Uuid, field: PatternField, value: String },

    AddSeizure,
    RemoveSeizure { id: Uuid },
    SetSeizureField { id: Uuid, field: SeizureField, value: String },
    ToggleSeizureTag { id: Uuid, group: SeizureTagGroup, tag: String, checked: bool },

    AddAnnotation,
    RemoveAnnotation { id: Uuid },
    SetAnnotationField { id: Uuid, field: AnnotationField, value: String },
    AttachAnnotationImage { id: Uuid, upload: ImageUpload },
    ClearAnnotationImage { id: Uuid },

    SetNotesField { field: NotesField, value: String },

    SetSignatureField { field: SignatureField, value: String },
    AttachSignature { upload: ImageUpload },
    ClearSignature,
}

impl StageEdit {
    /// The stage this edit belongs to.
    pub fn stage(&self) -> StageId {
        use StageEdit::*;
        match self {
            SetPatientField { .. } | ToggleMedication { .. } => StageId::Patient,
            SetBackgroundField { .. }
            | ToggleEegTag { .. }
            | AddPattern
            | RemovePattern { .. }
            | SetPatternField { .. } => StageId::EegFindings,
            AddSeizure
            | RemoveSeizure { .. }
            | SetSeizureField { .. }
            | ToggleSeizureTag { .. } => StageId::SeizureFindings,
            AddAnnotation
            | RemoveAnnotation { .. }
            | SetAnnotationField { .. }
            | AttachAnnotationImage { .. }
            | ClearAnnotationImage { .. } => StageId::Annotations,
            SetNotesField { .. } => StageId::AdditionalNotes,
            SetSignatureField { .. } | AttachSignature { .. } | ClearSignature => {
                StageId::Signature
            }
        }
    }
}

/// Result of an applied edit. `created` is the id of a record added by
/// an `Add*` edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Uuid>,
}

/// Apply one edit to the store through its stage.
pub fn apply_edit(store: &mut ReportStore, edit: StageEdit) -> Result<EditOutcome, StageError> {
    let stage = edit.stage();
    tracing::debug!(report_id = store.report_id(), stage = stage.as_str(), "Applying stage edit");

    match stage {
        StageId::Patient => patient::apply(store, edit),
        StageId::EegFindings => eeg_findings::apply(store, edit),
        StageId::SeizureFindings => seizure_findings::apply(store, edit),
        StageId::Annotations => annotations::apply(store, edit),
        StageId::AdditionalNotes => additional_notes::apply(store, edit),
        StageId::Signature => signature::apply(store, edit),
        StageId::Preview => Ok(EditOutcome::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_deserializes_from_tagged_json() {
        let edit: StageEdit = serde_json::from_str(
            r#"{"action":"set_patient_field","field":"recentCTScan","value":"No"}"#,
        )
        .unwrap();
        assert!(matches!(
            edit,
            StageEdit::SetPatientField { field: PatientField::RecentCtScan, ref value } if value == "No"
        ));
        assert_eq!(edit.stage(), StageId::Patient);
    }

    #[test]
    fn unit_edit_deserializes() {
        let edit: StageEdit = serde_json::from_str(r#"{"action":"add_seizure"}"#).unwrap();
        assert_eq!(edit.stage(), StageId::SeizureFindings);
    }

    #[test]
    fn unknown_field_name_is_rejected() {
        let result: Result<StageEdit, _> = serde_json::from_str(
            r#"{"action":"set_patient_field","field":"bloodType","value":"O+"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn every_stage_has_a_view() {
        let report = Report::seeded("r");
        for stage in StageId::ALL {
            let view = view(&report, *stage);
            assert_eq!(view.stage, *stage);
        }
    }

    #[test]
    fn field_view_serializes_for_browser() {
        let field = FieldView::select("gender", "Gender", patient::GENDERS, "Male");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["kind"], "select");
        assert_eq!(json["value"], "Male");
        assert_eq!(json["options"][1], "Female");
        assert_eq!(json["visible"], true);
    }
}
