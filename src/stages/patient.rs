//! Patient stage: demographics and clinical information.

use crate::models::{PatientData, PatientField, PatientPatch, StageId};
use crate::store::{toggle_tag, ReportStore};

use super::{ensure_option, EditOutcome, FieldGroup, FieldView, StageEdit, StageError, StageView};

pub const GENDERS: &[&str] = &["Male", "Female", "Other"];
pub const DEPARTMENTS: &[&str] = &["Neurology", "Cardiology", "Internal Medicine", "Pediatrics"];
pub const CLINICAL_INDICATIONS: &[&str] = &["Headache", "Fever", "Fall", "Seizures", "Others"];
pub const EPISODE_TIMINGS: &[&str] = &[
    "Unknown", "Ongoing", "<1 hr", "<1 day", "<1 month", ">1 month", ">1 year",
];
pub const MEDICATIONS: &[&str] = &["Midazolam", "Benzodiazepine"];
pub const MEDICATION_FREQUENCIES: &[&str] = &["Daily", "Weekly", "Monthly", "Yearly"];
pub const YES_NO: &[&str] = &["Yes", "No"];
pub const SCAN_RESULTS: &[&str] = &["Normal", "Abnormal", "Unknown"];

pub const BASIC_DETAILS: &str = "Basic Patient Details";
pub const CLINICAL_INFORMATION: &str = "Clinical Information";

/// Which conditional patient fields are relevant for the current values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatientVisibility {
    pub episode_details: bool,
    pub medication_frequency: bool,
    pub ct_details: bool,
    pub mri_details: bool,
}

pub fn visibility(patient: &PatientData) -> PatientVisibility {
    PatientVisibility {
        episode_details: patient.clinical_indication == "Seizures",
        medication_frequency: !patient.current_medications.is_empty(),
        ct_details: patient.recent_ct_scan == "Yes",
        mri_details: patient.recent_mri_scan == "Yes",
    }
}

pub fn field_value(patient: &PatientData, field: PatientField) -> &str {
    match field {
        PatientField::Name => &patient.name,
        PatientField::Uhid => &patient.uhid,
        PatientField::Age => &patient.age,
        PatientField::Gender => &patient.gender,
        PatientField::Dob => &patient.dob,
        PatientField::AbhaId => &patient.abha_id,
        PatientField::Height => &patient.height,
        PatientField::Weight => &patient.weight,
        PatientField::Address => &patient.address,
        PatientField::ReferringDoctor => &patient.referring_doctor,
        PatientField::Department => &patient.department,
        PatientField::ClinicalIndication => &patient.clinical_indication,
        PatientField::LastEpisode => &patient.last_episode,
        PatientField::EpisodeFrequency => &patient.episode_frequency,
        PatientField::MedicationFrequency => &patient.medication_frequency,
        PatientField::PatientHistory => &patient.patient_history,
        PatientField::RecentCtScan => &patient.recent_ct_scan,
        PatientField::CtScanResult => &patient.ct_scan_result,
        PatientField::CtScanComment => &patient.ct_scan_comment,
        PatientField::RecentMriScan => &patient.recent_mri_scan,
        PatientField::MriScanResult => &patient.mri_scan_result,
        PatientField::MriScanComment => &patient.mri_scan_comment,
    }
}

/// `{field: value}` as a patient patch.
pub fn field_patch(field: PatientField, value: String) -> PatientPatch {
    let mut patch = PatientPatch::default();
    let slot = match field {
        PatientField::Name => &mut patch.name,
        PatientField::Uhid => &mut patch.uhid,
        PatientField::Age => &mut patch.age,
        PatientField::Gender => &mut patch.gender,
        PatientField::Dob => &mut patch.dob,
        PatientField::AbhaId => &mut patch.abha_id,
        PatientField::Height => &mut patch.height,
        PatientField::Weight => &mut patch.weight,
        PatientField::Address => &mut patch.address,
        PatientField::ReferringDoctor => &mut patch.referring_doctor,
        PatientField::Department => &mut patch.department,
        PatientField::ClinicalIndication => &mut patch.clinical_indication,
        PatientField::LastEpisode => &mut patch.last_episode,
        PatientField::EpisodeFrequency => &mut patch.episode_frequency,
        PatientField::MedicationFrequency => &mut patch.medication_frequency,
        PatientField::PatientHistory => &mut patch.patient_history,
        PatientField::RecentCtScan => &mut patch.recent_ct_scan,
        PatientField::CtScanResult => &mut patch.ct_scan_result,
        PatientField::CtScanComment => &mut patch.ct_scan_comment,
        PatientField::RecentMriScan => &mut patch.recent_mri_scan,
        PatientField::MriScanResult => &mut patch.mri_scan_result,
        PatientField::MriScanComment => &mut patch.mri_scan_comment,
    };
    *slot = Some(value);
    patch
}

pub fn view(patient: &PatientData) -> StageView {
    let shown = visibility(patient);

    let basic = FieldGroup::new(
        BASIC_DETAILS,
        vec![
            FieldView::text("name", "Patient Name", &patient.name),
            FieldView::text("uhid", "UHID", &patient.uhid),
            FieldView::text("age", "Age", &patient.age),
            FieldView::select("gender", "Gender", GENDERS, &patient.gender),
            FieldView::date("dob", "Date of Birth", &patient.dob),
            FieldView::text("abhaId", "ABHA ID", &patient.abha_id),
            FieldView::text("height", "Height (cm)", &patient.height),
            FieldView::text("weight", "Weight (kg)", &patient.weight),
            FieldView::text_area("address", "Address", &patient.address),
        ],
    );

    let clinical = FieldGroup::new(
        CLINICAL_INFORMATION,
        vec![
            FieldView::text("referringDoctor", "Referring Doctor", &patient.referring_doctor),
            FieldView::select("department", "Department", DEPARTMENTS, &patient.department),
            FieldView::select(
                "clinicalIndication",
                "Clinical Indication for EEG",
                CLINICAL_INDICATIONS,
                &patient.clinical_indication,
            ),
            FieldView::select("lastEpisode", "Last Episode", EPISODE_TIMINGS, &patient.last_episode)
                .shown_if(shown.episode_details),
            FieldView::select(
                "episodeFrequency",
                "Episode Frequency",
                EPISODE_TIMINGS,
                &patient.episode_frequency,
            )
            .shown_if(shown.episode_details),
            FieldView::checkboxes(
                "currentMedications",
                "Current Medications",
                MEDICATIONS,
                &patient.current_medications,
            ),
            FieldView::select(
                "medicationFrequency",
                "Medication Frequency",
                MEDICATION_FREQUENCIES,
                &patient.medication_frequency,
            )
            .shown_if(shown.medication_frequency),
            FieldView::text_area("patientHistory", "Patient History", &patient.patient_history),
            FieldView::select("recentCTScan", "Recent CT Scan", YES_NO, &patient.recent_ct_scan),
            FieldView::select("ctScanResult", "CT Scan Result", SCAN_RESULTS, &patient.ct_scan_result)
                .shown_if(shown.ct_details),
            FieldView::text_area("ctScanComment", "CT Scan Comment", &patient.ct_scan_comment)
                .shown_if(shown.ct_details),
            FieldView::select("recentMRIScan", "Recent MRI Scan", YES_NO, &patient.recent_mri_scan),
            FieldView::select(
                "mriScanResult",
                "MRI Scan Result",
                SCAN_RESULTS,
                &patient.mri_scan_result,
            )
            .shown_if(shown.mri_details),
            FieldView::text_area("mriScanComment", "MRI Scan Comment", &patient.mri_scan_comment)
                .shown_if(shown.mri_details),
        ],
    );

    StageView {
        stage: StageId::Patient,
        title: "Patient Details",
        groups: vec![basic, clinical],
        pages: None,
    }
}

pub(crate) fn apply(store: &mut ReportStore, edit: StageEdit) -> Result<EditOutcome, StageError> {
    match edit {
        StageEdit::SetPatientField { field, value } => {
            store.update_patient(field_patch(field, value));
        }
        StageEdit::ToggleMedication { tag, checked } => {
            ensure_option("currentMedications", MEDICATIONS, &tag)?;
            let medications = toggle_tag(&store.report().patient.current_medications, &tag, checked);
            store.update_patient(PatientPatch {
                current_medications: Some(medications),
                ..Default::default()
            });
        }
        _ => {}
    }
    Ok(EditOutcome::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::{apply_edit, FieldValue};

    #[test]
    fn field_patch_round_trips_every_field() {
        let mut patient = crate::models::Report::seeded("r").patient;
        for field in PatientField::ALL {
            field_patch(*field, format!("v-{}", field.as_str())).apply_to(&mut patient);
        }
        for field in PatientField::ALL {
            assert_eq!(field_value(&patient, *field), format!("v-{}", field.as_str()));
        }
    }

    #[test]
    fn episode_fields_follow_clinical_indication() {
        let mut store = ReportStore::seeded("r");
        assert!(visibility(&store.report().patient).episode_details);

        apply_edit(
            &mut store,
            StageEdit::SetPatientField {
                field: PatientField::ClinicalIndication,
                value: "Headache".into(),
            },
        )
        .unwrap();

        let view = view(&store.report().patient);
        let clinical = view.group(CLINICAL_INFORMATION).unwrap();
        assert!(!clinical.field("lastEpisode").unwrap().visible);
        assert!(!clinical.field("episodeFrequency").unwrap().visible);
        // hidden fields keep their values
        assert_eq!(store.report().patient.last_episode, "<1 month");
    }

    #[test]
    fn scan_details_hidden_when_no_recent_scan() {
        let mut store = ReportStore::seeded("r");
        apply_edit(
            &mut store,
            StageEdit::SetPatientField {
                field: PatientField::RecentMriScan,
                value: "No".into(),
            },
        )
        .unwrap();

        let shown = visibility(&store.report().patient);
        assert!(shown.ct_details);
        assert!(!shown.mri_details);
    }

    #[test]
    fn medication_frequency_hidden_once_all_unchecked() {
        let mut store = ReportStore::seeded("r");
        apply_edit(
            &mut store,
            StageEdit::ToggleMedication {
                tag: "Midazolam".into(),
                checked: false,
            },
        )
        .unwrap();

        assert!(store.report().patient.current_medications.is_empty());
        assert!(!visibility(&store.report().patient).medication_frequency);
    }

    #[test]
    fn medication_toggle_appends() {
        let mut store = ReportStore::seeded("r");
        apply_edit(
            &mut store,
            StageEdit::ToggleMedication {
                tag: "Benzodiazepine".into(),
                checked: true,
            },
        )
        .unwrap();

        let view = view(&store.report().patient);
        let meds = view
            .group(CLINICAL_INFORMATION)
            .unwrap()
            .field("currentMedications")
            .unwrap();
        assert_eq!(
            meds.value,
            FieldValue::Tags(vec!["Midazolam".into(), "Benzodiazepine".into()])
        );
    }
}
