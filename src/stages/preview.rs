//! Preview stage: the whole report laid out as three printable pages.
//!
//! Page 1 carries patient, clinical and background/sleep findings; page 2
//! interictal findings, seizures and annotations; page 3 notes,
//! recommendations and the signature block. Optional lines are left out
//! when their source is empty.

use serde::Serialize;

use crate::imaging::EmbeddedImage;
use crate::models::{Report, StageId};

use super::StageView;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageBlock {
    Heading { level: u8, text: String },
    Field { label: String, value: String },
    Bullet { text: String },
    Paragraph { text: String },
    Placeholder { text: String },
    Image { caption: String, image: EmbeddedImage },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPage {
    pub number: usize,
    pub title: String,
    /// Identification lines printed under the title.
    pub header: Vec<String>,
    pub blocks: Vec<PageBlock>,
}

#[derive(Default)]
struct PageBuilder {
    blocks: Vec<PageBlock>,
}

impl PageBuilder {
    fn heading(&mut self, level: u8, text: &str) -> &mut Self {
        self.blocks.push(PageBlock::Heading {
            level,
            text: text.to_string(),
        });
        self
    }

    fn field(&mut self, label: &str, value: impl Into<String>) -> &mut Self {
        self.blocks.push(PageBlock::Field {
            label: label.to_string(),
            value: value.into(),
        });
        self
    }

    fn field_if(&mut self, present: bool, label: &str, value: impl Into<String>) -> &mut Self {
        if present {
            self.field(label, value);
        }
        self
    }

    fn tags(&mut self, label: &str, tags: &[String]) -> &mut Self {
        self.field_if(!tags.is_empty(), label, tags.join(", "))
    }

    fn paragraph(&mut self, text: &str) -> &mut Self {
        self.blocks.push(PageBlock::Paragraph {
            text: text.to_string(),
        });
        self
    }

    fn paragraph_or(&mut self, text: &str, placeholder: &str) -> &mut Self {
        let block = if text.is_empty() {
            PageBlock::Placeholder {
                text: placeholder.to_string(),
            }
        } else {
            PageBlock::Paragraph {
                text: text.to_string(),
            }
        };
        self.blocks.push(block);
        self
    }

    fn finish(self, number: usize, title: &str, header: Vec<String>) -> ReportPage {
        ReportPage {
            number,
            title: title.to_string(),
            header,
            blocks: self.blocks,
        }
    }
}

fn continued_header(report: &Report) -> Vec<String> {
    vec![
        format!("Patient: {}", report.patient.name),
        format!("UHID: {}", report.patient.uhid),
    ]
}

fn first_page(report: &Report) -> ReportPage {
    let patient = &report.patient;
    let background = &report.eeg_findings.background_activity;
    let sleep = &report.eeg_findings.sleep_and_drowsiness;
    let mut page = PageBuilder::default();

    page.heading(2, "Patient Information")
        .field("Name", &patient.name)
        .field("UHID", &patient.uhid)
        .field("Age/Gender", format!("{} years, {}", patient.age, patient.gender))
        .field("DOB", &patient.dob)
        .field("ABHA ID", &patient.abha_id)
        .field("Height", format!("{} cm", patient.height))
        .field("Weight", format!("{} kg", patient.weight))
        .field("Address", &patient.address);

    let shown = super::patient::visibility(patient);
    page.heading(2, "Clinical Information")
        .field("Referring Doctor", &patient.referring_doctor)
        .field("Department", &patient.department)
        .field("Clinical Indication", &patient.clinical_indication)
        .field_if(shown.episode_details, "Last Episode", &patient.last_episode)
        .field_if(shown.episode_details, "Episode Frequency", &patient.episode_frequency)
        .tags("Current Medications", &patient.current_medications)
        .field_if(shown.medication_frequency, "Medication Frequency", &patient.medication_frequency)
        .field_if(shown.ct_details, "CT Scan", &patient.ct_scan_result)
        .field_if(shown.mri_details, "MRI Scan", &patient.mri_scan_result)
        .field_if(!patient.patient_history.is_empty(), "Patient History", &patient.patient_history);

    page.heading(2, "EEG Findings")
        .heading(3, "Background Activity")
        .tags("EEG Elements", &background.eeg_elements)
        .field("Amplitude", &background.amplitude)
        .field("Symmetry", &background.symmetry)
        .field("Reactivity to Eye Opening", &background.reactivity)
        .heading(3, "Sleep & Drowsiness")
        .tags("Sleep Stages", &sleep.sleep_stages)
        .tags("Sleep Characteristics", &sleep.sleep_characteristics)
        .tags("Sleep Abnormalities", &sleep.sleep_abnormalities);

    page.finish(
        1,
        "EEG Report",
        vec![
            format!("Report ID: {}", report.report_id),
            format!("Date: {}", report.signature.date),
        ],
    )
}

/// One-line summary of an abnormal pattern, e.g.
/// `Epileptiform Discharges - Spikes (Rhythmic: Generalised) - Rare (<1%)`.
pub fn pattern_summary(pattern: &crate::models::AbnormalPattern) -> String {
    let mut line = pattern.pattern_type.clone();
    if !pattern.subtype.is_empty() {
        line.push_str(&format!(" - {}", pattern.subtype));
    }
    if !pattern.rhythmic.is_empty() {
        line.push_str(&format!(" (Rhythmic: {})", pattern.rhythmic));
    }
    if !pattern.periodic.is_empty() {
        line.push_str(&format!(" (Periodic: {})", pattern.periodic));
    }
    if !pattern.prevalence.is_empty() {
        line.push_str(&format!(" - {}", pattern.prevalence));
    }
    line
}

fn second_page(report: &Report) -> ReportPage {
    let interictal = &report.eeg_findings.interictal_findings;
    let mut page = PageBuilder::default();

    page.heading(3, "Interictal Findings");
    if !interictal.abnormal_patterns.is_empty() {
        page.heading(4, "Abnormal Patterns:");
        for pattern in &interictal.abnormal_patterns {
            page.blocks.push(PageBlock::Bullet {
                text: pattern_summary(pattern),
            });
        }
    }
    page.heading(4, "EEG Artifacts:")
        .tags("Biological", &interictal.eeg_artifacts.biological)
        .tags("Non-Biological", &interictal.eeg_artifacts.non_biological);

    page.heading(2, "Seizure Findings");
    if report.seizure_findings.seizures.is_empty() {
        page.paragraph_or("", "No seizures recorded during the EEG.");
    }
    for (i, seizure) in report.seizure_findings.seizures.iter().enumerate() {
        page.heading(3, &format!("Seizure #{}", i + 1))
            .field("Classification", &seizure.classification)
            .field_if(!seizure.subtype.is_empty(), "Subtype", &seizure.subtype)
            .field("Duration", &seizure.duration)
            .tags("Clinical Signs", &seizure.clinical_signs)
            .tags("EEG Pattern", &seizure.eeg_pattern)
            .tags("Postictal Signs", &seizure.postictal_signs);
    }

    page.heading(2, "Annotations");
    if report.annotations.annotations.is_empty() {
        page.paragraph_or("", "No annotations added.");
    }
    for annotation in &report.annotations.annotations {
        let value = if annotation.description.is_empty() {
            annotation.timestamp.clone()
        } else {
            format!("{} - {}", annotation.timestamp, annotation.description)
        };
        page.field("Timestamp", value);
        if let Some(image) = &annotation.image {
            page.blocks.push(PageBlock::Image {
                caption: format!("EEG Strip at {}", annotation.timestamp),
                image: image.clone(),
            });
        }
    }

    page.finish(2, "EEG Report (Continued)", continued_header(report))
}

fn third_page(report: &Report) -> ReportPage {
    let notes = &report.additional_notes;
    let signature = &report.signature;
    let mut page = PageBuilder::default();

    page.heading(2, "Additional Notes")
        .paragraph_or(&notes.notes, "No additional notes.")
        .heading(2, "Recommendations")
        .paragraph_or(&notes.recommendations, "No recommendations provided.");

    if let Some(image) = &signature.signature {
        page.blocks.push(PageBlock::Image {
            caption: "Doctor's Signature".into(),
            image: image.clone(),
        });
    }
    page.paragraph(&signature.doctor_name)
        .paragraph(&signature.designation)
        .field("Date", &signature.date);

    page.finish(3, "EEG Report (Continued)", continued_header(report))
}

/// Lay out the full report into its printable pages, in order.
pub fn layout(report: &Report) -> Vec<ReportPage> {
    vec![first_page(report), second_page(report), third_page(report)]
}

pub fn view(report: &Report) -> StageView {
    StageView {
        stage: StageId::Preview,
        title: "Preview Report",
        groups: Vec::new(),
        pages: Some(layout(report)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientPatch;
    use crate::store::ReportStore;

    fn fields(page: &ReportPage) -> Vec<(&str, &str)> {
        page.blocks
            .iter()
            .filter_map(|b| match b {
                PageBlock::Field { label, value } => Some((label.as_str(), value.as_str())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn layout_has_three_numbered_pages() {
        let pages = layout(&Report::seeded("rep-9"));
        assert_eq!(pages.len(), 3);
        assert_eq!(
            pages.iter().map(|p| p.number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(pages[0].header[0], "Report ID: rep-9");
        assert_eq!(pages[1].header, vec!["Patient: John Doe", "UHID: UHID12345"]);
    }

    #[test]
    fn first_page_includes_conditional_clinical_lines() {
        let pages = layout(&Report::seeded("r"));
        let first = fields(&pages[0]);
        assert!(first.contains(&("Age/Gender", "45 years, Male")));
        assert!(first.contains(&("Last Episode", "<1 month")));
        assert!(first.contains(&("Current Medications", "Midazolam")));
        assert!(first.contains(&("CT Scan", "Normal")));
        assert!(!first.iter().any(|(l, _)| *l == "Sleep Abnormalities"));
    }

    #[test]
    fn hidden_clinical_lines_are_omitted() {
        let mut store = ReportStore::seeded("r");
        store.update_patient(PatientPatch {
            clinical_indication: Some("Fever".into()),
            recent_ct_scan: Some("No".into()),
            current_medications: Some(Vec::new()),
            ..Default::default()
        });

        let pages = layout(store.report());
        let first = fields(&pages[0]);
        let labels: Vec<&str> = first.iter().map(|(l, _)| *l).collect();
        assert!(!labels.contains(&"Last Episode"));
        assert!(!labels.contains(&"CT Scan"));
        assert!(!labels.contains(&"Medication Frequency"));
        assert!(labels.contains(&"MRI Scan"));
    }

    #[test]
    fn pattern_summary_skips_empty_parts() {
        let report = Report::seeded("r");
        let pattern = &report.eeg_findings.interictal_findings.abnormal_patterns[0];
        assert_eq!(
            pattern_summary(pattern),
            "Epileptiform Discharges - Spikes (Rhythmic: Generalised) - Occasional (1-9%)"
        );
    }

    #[test]
    fn empty_lists_show_placeholders() {
        let mut report = Report::seeded("r");
        report.seizure_findings.seizures.clear();
        report.annotations.annotations.clear();
        report.additional_notes.notes.clear();

        let pages = layout(&report);
        let placeholders: Vec<&str> = pages
            .iter()
            .flat_map(|p| p.blocks.iter())
            .filter_map(|b| match b {
                PageBlock::Placeholder { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            placeholders,
            vec![
                "No seizures recorded during the EEG.",
                "No annotations added.",
                "No additional notes."
            ]
        );
    }

    #[test]
    fn last_page_closes_with_signature_block() {
        let pages = layout(&Report::seeded("r"));
        let blocks = &pages[2].blocks;
        assert_eq!(
            blocks[blocks.len() - 3..],
            [
                PageBlock::Paragraph {
                    text: "Dr. Sarah Johnson".into()
                },
                PageBlock::Paragraph {
                    text: "Neurologist".into()
                },
                PageBlock::Field {
                    label: "Date".into(),
                    value: "2025-04-01".into()
                },
            ]
        );
    }

    #[test]
    fn preview_view_carries_pages() {
        let view = view(&Report::seeded("r"));
        assert_eq!(view.stage, StageId::Preview);
        assert_eq!(view.pages.unwrap().len(), 3);
        assert!(view.groups.is_empty());
    }
}
