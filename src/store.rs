//! Report store: the single owned holder of a session's report.
//!
//! One update per section, each a shallow merge of a patch into the
//! section. No validation and no conflict detection: last write wins.
//! Every non-empty update bumps that section's revision so readers can
//! tell a section changed since they last looked.

use std::collections::{BTreeMap, HashMap};

use uuid::Uuid;

use crate::models::{
    AdditionalNotesPatch, AnnotationsPatch, EegFindingsPatch, Keyed, PatientPatch, Report,
    SeizureFindingsPatch, Section, SignaturePatch,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found: {kind} with id {id}")]
    RecordNotFound { kind: &'static str, id: Uuid },
}

#[derive(Debug, Clone)]
pub struct ReportStore {
    report: Report,
    revisions: HashMap<Section, u64>,
}

impl ReportStore {
    pub fn new(report: Report) -> Self {
        Self {
            report,
            revisions: HashMap::new(),
        }
    }

    /// A store seeded with the default report for `report_id`.
    pub fn seeded(report_id: impl Into<String>) -> Self {
        Self::new(Report::seeded(report_id))
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn report_id(&self) -> &str {
        &self.report.report_id
    }

    /// Number of updates applied to `section` so far.
    pub fn revision(&self, section: Section) -> u64 {
        self.revisions.get(&section).copied().unwrap_or(0)
    }

    /// Revision of every section, keyed by its wire name.
    pub fn revisions(&self) -> BTreeMap<&'static str, u64> {
        Section::ALL
            .iter()
            .map(|s| (s.as_str(), self.revision(*s)))
            .collect()
    }

    fn touch(&mut self, section: Section) {
        *self.revisions.entry(section).or_insert(0) += 1;
        tracing::trace!(section = section.as_str(), "Section updated");
    }

    pub fn update_patient(&mut self, patch: PatientPatch) {
        if patch.is_empty() {
            return;
        }
        patch.apply_to(&mut self.report.patient);
        self.touch(Section::Patient);
    }

    pub fn update_eeg_findings(&mut self, patch: EegFindingsPatch) {
        if patch.is_empty() {
            return;
        }
        patch.apply_to(&mut self.report.eeg_findings);
        self.touch(Section::EegFindings);
    }

    pub fn update_seizure_findings(&mut self, patch: SeizureFindingsPatch) {
        if patch.is_empty() {
            return;
        }
        patch.apply_to(&mut self.report.seizure_findings);
        self.touch(Section::SeizureFindings);
    }

    pub fn update_annotations(&mut self, patch: AnnotationsPatch) {
        if patch.is_empty() {
            return;
        }
        patch.apply_to(&mut self.report.annotations);
        self.touch(Section::Annotations);
    }

    pub fn update_additional_notes(&mut self, patch: AdditionalNotesPatch) {
        if patch.is_empty() {
            return;
        }
        patch.apply_to(&mut self.report.additional_notes);
        self.touch(Section::AdditionalNotes);
    }

    pub fn update_signature(&mut self, patch: SignaturePatch) {
        if patch.is_empty() {
            return;
        }
        patch.apply_to(&mut self.report.signature);
        self.touch(Section::Signature);
    }
}

// ─── Tag lists ───────────────────────────────────────────────────────────────

/// Checkbox semantics: checking appends the tag if absent, unchecking
/// removes it. Returns the new list; the input is left untouched.
pub fn toggle_tag(tags: &[String], tag: &str, checked: bool) -> Vec<String> {
    let mut updated = tags.to_vec();
    if checked {
        if !updated.iter().any(|t| t == tag) {
            updated.push(tag.to_string());
        }
    } else {
        updated.retain(|t| t != tag);
    }
    updated
}

// ─── Record lists ────────────────────────────────────────────────────────────

/// Position of the record with `id`.
pub fn position_of<T: Keyed>(records: &[T], id: Uuid) -> Option<usize> {
    records.iter().position(|r| r.id() == id)
}

/// Id of the record currently at `index`.
pub fn id_at<T: Keyed>(records: &[T], index: usize) -> Option<Uuid> {
    records.get(index).map(Keyed::id)
}

/// Copy of `records` without the record `id`; later records shift down one.
pub fn without_record<T: Keyed + Clone>(
    records: &[T],
    id: Uuid,
    kind: &'static str,
) -> Result<Vec<T>, StoreError> {
    let index = position_of(records, id).ok_or(StoreError::RecordNotFound { kind, id })?;
    let mut updated = records.to_vec();
    updated.remove(index);
    Ok(updated)
}

/// Copy of `records` with `edit` applied to record `id` only.
pub fn with_record_edit<T, F>(
    records: &[T],
    id: Uuid,
    kind: &'static str,
    edit: F,
) -> Result<Vec<T>, StoreError>
where
    T: Keyed + Clone,
    F: FnOnce(&mut T),
{
    let index = position_of(records, id).ok_or(StoreError::RecordNotFound { kind, id })?;
    let mut updated = records.to_vec();
    edit(&mut updated[index]);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AbnormalPattern, InterictalFindings, Seizure};

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sequential_patient_updates_merge() {
        let mut store = ReportStore::seeded("r1");
        let defaults = store.report().patient.clone();

        store.update_patient(PatientPatch {
            name: Some("A".into()),
            ..Default::default()
        });
        store.update_patient(PatientPatch {
            uhid: Some("B".into()),
            ..Default::default()
        });

        let patient = &store.report().patient;
        assert_eq!(patient.name, "A");
        assert_eq!(patient.uhid, "B");
        assert_eq!(patient.age, defaults.age);
        assert_eq!(patient.address, defaults.address);
        assert_eq!(patient.current_medications, defaults.current_medications);
        assert_eq!(patient.recent_mri_scan, defaults.recent_mri_scan);
    }

    #[test]
    fn applying_same_patch_twice_is_idempotent() {
        let patch = AdditionalNotesPatch {
            notes: Some("Repeat EEG".into()),
            ..Default::default()
        };

        let mut once = ReportStore::seeded("r");
        once.update_additional_notes(patch.clone());

        let mut twice = once.clone();
        twice.update_additional_notes(patch);

        assert_eq!(once.report().additional_notes, twice.report().additional_notes);
    }

    #[test]
    fn updates_bump_only_their_section_revision() {
        let mut store = ReportStore::seeded("r");
        assert_eq!(store.revision(Section::Signature), 0);

        store.update_signature(SignaturePatch {
            designation: Some("Consultant".into()),
            ..Default::default()
        });
        store.update_signature(SignaturePatch {
            doctor_name: Some("Dr. A".into()),
            ..Default::default()
        });

        assert_eq!(store.revision(Section::Signature), 2);
        assert_eq!(store.revision(Section::Patient), 0);
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut store = ReportStore::seeded("r");
        let before = store.report().clone();
        store.update_patient(PatientPatch::default());

        assert_eq!(store.report(), &before);
        assert_eq!(store.revision(Section::Patient), 0);
        assert_eq!(store.revisions()["patient"], 0);
        assert_eq!(store.revisions().len(), 6);
    }

    #[test]
    fn toggle_on_then_off_restores_list() {
        let original = tags(&["NREM 2"]);
        let on = toggle_tag(&original, "REM", true);
        assert_eq!(on, tags(&["NREM 2", "REM"]));
        let off = toggle_tag(&on, "REM", false);
        assert_eq!(off, original);
    }

    #[test]
    fn toggle_never_duplicates() {
        let list = toggle_tag(&tags(&["ECG"]), "ECG", true);
        assert_eq!(list, tags(&["ECG"]));
    }

    #[test]
    fn uncheck_of_absent_tag_is_noop() {
        let list = toggle_tag(&tags(&["Sweat"]), "Pulse", false);
        assert_eq!(list, tags(&["Sweat"]));
    }

    #[test]
    fn checked_set_reflects_checks_minus_unchecks() {
        let mut list = Vec::new();
        for (tag, checked) in [
            ("Sweat", true),
            ("Pulse", true),
            ("Sweat", false),
            ("EMG", true),
            ("Pulse", true),
        ] {
            list = toggle_tag(&list, tag, checked);
        }
        let mut sorted = list.clone();
        sorted.sort();
        assert_eq!(sorted, tags(&["EMG", "Pulse"]));
    }

    #[test]
    fn removal_shifts_later_records_down() {
        let records: Vec<Seizure> = (0..4).map(|_| Seizure::new_default()).collect();
        let removed = records[1].id;

        let updated = without_record(&records, removed, "seizure").unwrap();

        assert_eq!(updated.len(), 3);
        assert_eq!(updated[0], records[0]);
        assert_eq!(updated[1], records[2]);
        assert_eq!(updated[2], records[3]);
        assert_eq!(position_of(&updated, records[3].id), Some(2));
    }

    #[test]
    fn add_then_remove_first_pattern_leaves_second_at_zero() {
        let mut store = ReportStore::seeded("r");
        let mut interictal: InterictalFindings =
            store.report().eeg_findings.interictal_findings.clone();
        interictal.abnormal_patterns.push(AbnormalPattern::new_default());
        store.update_eeg_findings(EegFindingsPatch {
            interictal_findings: Some(interictal),
            ..Default::default()
        });

        let patterns = &store.report().eeg_findings.interictal_findings.abnormal_patterns;
        assert_eq!(patterns.len(), 2);
        let second = patterns[1].clone();
        let first_id = id_at(patterns, 0).unwrap();

        let mut interictal = store.report().eeg_findings.interictal_findings.clone();
        interictal.abnormal_patterns =
            without_record(&interictal.abnormal_patterns, first_id, "pattern").unwrap();
        store.update_eeg_findings(EegFindingsPatch {
            interictal_findings: Some(interictal),
            ..Default::default()
        });

        let patterns = &store.report().eeg_findings.interictal_findings.abnormal_patterns;
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0], second);
    }

    #[test]
    fn edit_targets_record_by_id_after_reorder() {
        let records: Vec<Seizure> = (0..3).map(|_| Seizure::new_default()).collect();
        let target = records[2].id;
        let shifted = without_record(&records, records[0].id, "seizure").unwrap();

        let edited = with_record_edit(&shifted, target, "seizure", |s| {
            s.duration = "<10 sec".into();
        })
        .unwrap();

        assert_eq!(edited[1].id, target);
        assert_eq!(edited[1].duration, "<10 sec");
        assert_eq!(edited[0].duration, "<30 sec");
    }

    #[test]
    fn unknown_record_id_is_an_error() {
        let records = vec![Seizure::new_default()];
        let err = without_record(&records, Uuid::new_v4(), "seizure").unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound { kind: "seizure", .. }));
    }
}
