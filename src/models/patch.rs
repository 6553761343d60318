//! Partial section updates.
//!
//! Each patch mirrors one section with every field optional. Applying a
//! patch replaces the fields that are `Some` and leaves the rest alone:
//! a shallow merge, so nested EEG records are replaced whole.

use serde::{Deserialize, Serialize};

use super::report::{
    AdditionalNotes, Annotation, Annotations, BackgroundActivity, EegFindings,
    InterictalFindings, PatientData, Seizure, SeizureFindings, Signature, SleepAndDrowsiness,
};
use crate::imaging::EmbeddedImage;

/// Generates a patch struct whose fields are `Option<T>` versions of the
/// section's fields, plus the merge that applies it.
macro_rules! section_patch {
    ($patch:ident => $section:ident { $($(#[$meta:meta])* $field:ident : $ty:ty),+ $(,)? }) => {
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $patch {
            $($(#[$meta])* pub $field: Option<$ty>),+
        }

        impl $patch {
            pub fn apply_to(self, target: &mut $section) {
                $(
                    if let Some(value) = self.$field {
                        target.$field = value;
                    }
                )+
            }

            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())+
            }
        }
    };
}

section_patch!(PatientPatch => PatientData {
    name: String,
    uhid: String,
    age: String,
    gender: String,
    dob: String,
    abha_id: String,
    height: String,
    weight: String,
    address: String,
    referring_doctor: String,
    department: String,
    clinical_indication: String,
    last_episode: String,
    episode_frequency: String,
    current_medications: Vec<String>,
    medication_frequency: String,
    patient_history: String,
    #[serde(rename = "recentCTScan")]
    recent_ct_scan: String,
    #[serde(rename = "ctScanResult")]
    ct_scan_result: String,
    #[serde(rename = "ctScanComment")]
    ct_scan_comment: String,
    #[serde(rename = "recentMRIScan")]
    recent_mri_scan: String,
    #[serde(rename = "mriScanResult")]
    mri_scan_result: String,
    #[serde(rename = "mriScanComment")]
    mri_scan_comment: String,
});

section_patch!(EegFindingsPatch => EegFindings {
    background_activity: BackgroundActivity,
    sleep_and_drowsiness: SleepAndDrowsiness,
    interictal_findings: InterictalFindings,
});

section_patch!(SeizureFindingsPatch => SeizureFindings {
    seizures: Vec<Seizure>,
});

section_patch!(AnnotationsPatch => Annotations {
    annotations: Vec<Annotation>,
});

section_patch!(AdditionalNotesPatch => AdditionalNotes {
    notes: String,
    recommendations: String,
});

section_patch!(SignaturePatch => Signature {
    doctor_name: String,
    designation: String,
    date: String,
    signature: Option<EmbeddedImage>,
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Report;

    #[test]
    fn unset_fields_keep_prior_values() {
        let mut report = Report::seeded("r");
        let before = report.patient.clone();

        PatientPatch {
            name: Some("A".into()),
            ..Default::default()
        }
        .apply_to(&mut report.patient);

        assert_eq!(report.patient.name, "A");
        assert_eq!(report.patient.uhid, before.uhid);
        assert_eq!(report.patient.current_medications, before.current_medications);
    }

    #[test]
    fn nested_record_is_replaced_whole() {
        let mut report = Report::seeded("r");
        let mut background = report.eeg_findings.background_activity.clone();
        background.amplitude = "High".into();
        background.eeg_elements.clear();

        EegFindingsPatch {
            background_activity: Some(background),
            ..Default::default()
        }
        .apply_to(&mut report.eeg_findings);

        assert_eq!(report.eeg_findings.background_activity.amplitude, "High");
        assert!(report.eeg_findings.background_activity.eeg_elements.is_empty());
        assert_eq!(report.eeg_findings.sleep_and_drowsiness.sleep_stages, vec!["NREM 2"]);
    }

    #[test]
    fn signature_image_can_be_cleared() {
        let mut report = Report::seeded("r");
        report.signature.signature = Some(EmbeddedImage::from_bytes("image/png", b"png"));

        SignaturePatch {
            signature: Some(None),
            ..Default::default()
        }
        .apply_to(&mut report.signature);

        assert!(report.signature.signature.is_none());
    }

    #[test]
    fn patch_deserializes_from_partial_json() {
        let patch: PatientPatch =
            serde_json::from_str(r#"{"uhid":"B","recentCTScan":"No"}"#).unwrap();
        assert_eq!(patch.uhid.as_deref(), Some("B"));
        assert_eq!(patch.recent_ct_scan.as_deref(), Some("No"));
        assert!(patch.name.is_none());
        assert!(!patch.is_empty());
        assert!(PatientPatch::default().is_empty());
    }
}
