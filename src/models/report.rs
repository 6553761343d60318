use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::imaging::EmbeddedImage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub report_id: String,
    pub patient: PatientData,
    pub eeg_findings: EegFindings,
    pub seizure_findings: SeizureFindings,
    pub annotations: Annotations,
    pub additional_notes: AdditionalNotes,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientData {
    pub name: String,
    pub uhid: String,
    pub age: String,
    pub gender: String,
    pub dob: String,
    pub abha_id: String,
    pub height: String,
    pub weight: String,
    pub address: String,
    pub referring_doctor: String,
    pub department: String,
    pub clinical_indication: String,
    pub last_episode: String,
    pub episode_frequency: String,
    pub current_medications: Vec<String>,
    pub medication_frequency: String,
    pub patient_history: String,
    #[serde(rename = "recentCTScan")]
    pub recent_ct_scan: String,
    #[serde(rename = "ctScanResult")]
    pub ct_scan_result: String,
    #[serde(rename = "ctScanComment")]
    pub ct_scan_comment: String,
    #[serde(rename = "recentMRIScan")]
    pub recent_mri_scan: String,
    #[serde(rename = "mriScanResult")]
    pub mri_scan_result: String,
    #[serde(rename = "mriScanComment")]
    pub mri_scan_comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EegFindings {
    pub background_activity: BackgroundActivity,
    pub sleep_and_drowsiness: SleepAndDrowsiness,
    pub interictal_findings: InterictalFindings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundActivity {
    pub eeg_elements: Vec<String>,
    pub other_elements: String,
    pub amplitude: String,
    pub symmetry: String,
    pub reactivity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepAndDrowsiness {
    pub sleep_stages: Vec<String>,
    pub sleep_characteristics: Vec<String>,
    pub sleep_abnormalities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterictalFindings {
    pub abnormal_patterns: Vec<AbnormalPattern>,
    pub eeg_artifacts: EegArtifacts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EegArtifacts {
    pub biological: Vec<String>,
    pub non_biological: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbnormalPattern {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub pattern_type: String,
    pub subtype: String,
    pub rhythmic: String,
    pub periodic: String,
    pub prevalence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeizureFindings {
    pub seizures: Vec<Seizure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seizure {
    pub id: Uuid,
    pub classification: String,
    pub subtype: String,
    pub duration: String,
    pub clinical_signs: Vec<String>,
    pub eeg_pattern: Vec<String>,
    pub postictal_signs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotations {
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: Uuid,
    pub timestamp: String,
    pub description: String,
    pub image: Option<EmbeddedImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalNotes {
    pub notes: String,
    pub recommendations: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub doctor_name: String,
    pub designation: String,
    pub date: String,
    pub signature: Option<EmbeddedImage>,
}

/// Records addressed by a stable id rather than by list position.
pub trait Keyed {
    fn id(&self) -> Uuid;
}

impl Keyed for AbnormalPattern {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Seizure {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Annotation {
    fn id(&self) -> Uuid {
        self.id
    }
}

// ─── New-record defaults ─────────────────────────────────────────────────────

impl AbnormalPattern {
    /// Pattern appended by "Add Pattern".
    pub fn new_default() -> Self {
        Self {
            id: Uuid::new_v4(),
            pattern_type: "Epileptiform Discharges".into(),
            subtype: "Spikes".into(),
            rhythmic: String::new(),
            periodic: String::new(),
            prevalence: "Rare (<1%)".into(),
        }
    }
}

impl Seizure {
    /// Seizure appended by "Add Seizure".
    pub fn new_default() -> Self {
        Self {
            id: Uuid::new_v4(),
            classification: "Generalised Onset".into(),
            subtype: "Tonic Clonic".into(),
            duration: "<30 sec".into(),
            clinical_signs: Vec::new(),
            eeg_pattern: Vec::new(),
            postictal_signs: Vec::new(),
        }
    }
}

impl Annotation {
    pub fn new_default() -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: String::new(),
            description: String::new(),
            image: None,
        }
    }
}

// ─── Seeded report ───────────────────────────────────────────────────────────

fn tags(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Report {
    /// A fresh report for a new wizard session, pre-filled with
    /// illustrative values so every stage has something to show.
    pub fn seeded(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            patient: PatientData {
                name: "John Doe".into(),
                uhid: "UHID12345".into(),
                age: "45".into(),
                gender: "Male".into(),
                dob: "1980-05-15".into(),
                abha_id: "ABHA98765".into(),
                height: "175".into(),
                weight: "70".into(),
                address: "123 Medical Lane, Healthcare City".into(),
                referring_doctor: "Dr. Sarah Johnson".into(),
                department: "Neurology".into(),
                clinical_indication: "Seizures".into(),
                last_episode: "<1 month".into(),
                episode_frequency: "<1 month".into(),
                current_medications: tags(&["Midazolam"]),
                medication_frequency: "Daily".into(),
                patient_history: "Patient has a history of epilepsy for the past 5 years.".into(),
                recent_ct_scan: "Yes".into(),
                ct_scan_result: "Normal".into(),
                ct_scan_comment: String::new(),
                recent_mri_scan: "Yes".into(),
                mri_scan_result: "Normal".into(),
                mri_scan_comment: String::new(),
            },
            eeg_findings: EegFindings {
                background_activity: BackgroundActivity {
                    eeg_elements: tags(&["Posterior Dominant Rhythm (PDR)", "Alpha Rhythm"]),
                    other_elements: String::new(),
                    amplitude: "Medium".into(),
                    symmetry: "Symmetric".into(),
                    reactivity: "Yes".into(),
                },
                sleep_and_drowsiness: SleepAndDrowsiness {
                    sleep_stages: tags(&["NREM 2"]),
                    sleep_characteristics: tags(&["Sleep Spindle", "K-Complexes"]),
                    sleep_abnormalities: Vec::new(),
                },
                interictal_findings: InterictalFindings {
                    abnormal_patterns: vec![AbnormalPattern {
                        id: Uuid::new_v4(),
                        pattern_type: "Epileptiform Discharges".into(),
                        subtype: "Spikes".into(),
                        rhythmic: "Generalised".into(),
                        periodic: String::new(),
                        prevalence: "Occasional (1-9%)".into(),
                    }],
                    eeg_artifacts: EegArtifacts {
                        biological: tags(&["Eye Movement"]),
                        non_biological: tags(&["50/60 Hz Electrical Interference"]),
                    },
                },
            },
            seizure_findings: SeizureFindings {
                seizures: vec![Seizure {
                    id: Uuid::new_v4(),
                    classification: "Generalised Onset".into(),
                    subtype: "Tonic Clonic".into(),
                    duration: "<30 sec".into(),
                    clinical_signs: tags(&["Motor Symptoms"]),
                    eeg_pattern: tags(&["Polyspikes"]),
                    postictal_signs: tags(&["Confusion"]),
                }],
            },
            annotations: Annotations {
                annotations: vec![Annotation {
                    id: Uuid::new_v4(),
                    timestamp: "00:05:23".into(),
                    description: "Spike and wave discharges observed".into(),
                    image: None,
                }],
            },
            additional_notes: AdditionalNotes {
                notes: "The EEG shows abnormal activity consistent with epilepsy.".into(),
                recommendations: "Continue current medication regimen. Follow up in 3 months."
                    .into(),
            },
            signature: Signature {
                doctor_name: "Dr. Sarah Johnson".into(),
                designation: "Neurologist".into(),
                date: "2025-04-01".into(),
                signature: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_report_carries_id_and_defaults() {
        let report = Report::seeded("abc-123");
        assert_eq!(report.report_id, "abc-123");
        assert_eq!(report.patient.name, "John Doe");
        assert_eq!(report.patient.current_medications, vec!["Midazolam"]);
        assert_eq!(report.eeg_findings.interictal_findings.abnormal_patterns.len(), 1);
        assert_eq!(report.seizure_findings.seizures.len(), 1);
        assert!(report.signature.signature.is_none());
    }

    #[test]
    fn seeded_records_get_distinct_ids() {
        let a = Report::seeded("a");
        let b = Report::seeded("b");
        assert_ne!(
            a.seizure_findings.seizures[0].id,
            b.seizure_findings.seizures[0].id
        );
    }

    #[test]
    fn patient_serializes_with_wizard_field_names() {
        let report = Report::seeded("r1");
        let json = serde_json::to_value(&report.patient).unwrap();
        assert_eq!(json["abhaId"], "ABHA98765");
        assert_eq!(json["recentCTScan"], "Yes");
        assert_eq!(json["mriScanResult"], "Normal");
        assert!(json["currentMedications"].is_array());
    }

    #[test]
    fn pattern_type_serializes_as_type() {
        let pattern = AbnormalPattern::new_default();
        let json = serde_json::to_value(&pattern).unwrap();
        assert_eq!(json["type"], "Epileptiform Discharges");
        assert_eq!(json["prevalence"], "Rare (<1%)");
    }
}
