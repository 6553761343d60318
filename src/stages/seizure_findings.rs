//! Seizure findings stage: one card per recorded seizure.

use crate::models::{
    Seizure, SeizureField, SeizureFindings, SeizureFindingsPatch, SeizureTagGroup, StageId,
};
use crate::store::{toggle_tag, with_record_edit, without_record, ReportStore};

use super::{ensure_option, EditOutcome, FieldGroup, FieldView, StageEdit, StageError, StageView};

pub const CLASSIFICATIONS: &[&str] = &["Generalised Onset", "Focal Onset", "Unknown Onset"];
pub const GENERALISED_SUBTYPES: &[&str] = &["Tonic Clonic", "Absence", "Myoclonic"];
pub const FOCAL_SUBTYPES: &[&str] = &["Aware", "Impaired Awareness", "Motor", "Non-Motor"];
pub const DURATIONS: &[&str] = &["<10 sec", "<30 sec", "<1 min", "> 1 min"];
pub const CLINICAL_SIGNS: &[&str] = &["Automatisms", "Motor Symptoms", "Sensory Symptoms"];
pub const EEG_PATTERNS: &[&str] = &[
    "Polyspikes",
    "Low Voltage Fast Activity",
    "Electrodecrement",
    "Unknown",
];
pub const POSTICTAL_SIGNS: &[&str] = &["Confusion", "Postictal Sleep", "Unconscious", "Todd's Paralysis"];

/// Subtype choices for a classification; empty means no subtype field.
pub fn subtype_options(classification: &str) -> &'static [&'static str] {
    match classification {
        "Generalised Onset" => GENERALISED_SUBTYPES,
        "Focal Onset" => FOCAL_SUBTYPES,
        _ => &[],
    }
}

pub fn tag_options(group: SeizureTagGroup) -> &'static [&'static str] {
    match group {
        SeizureTagGroup::ClinicalSigns => CLINICAL_SIGNS,
        SeizureTagGroup::EegPattern => EEG_PATTERNS,
        SeizureTagGroup::PostictalSigns => POSTICTAL_SIGNS,
    }
}

fn seizure_group(index: usize, seizure: &Seizure) -> FieldGroup {
    let subtypes = subtype_options(&seizure.classification);
    FieldGroup::record(
        format!("Seizure #{}", index + 1),
        seizure.id,
        vec![
            FieldView::select(
                "classification",
                "Classification",
                CLASSIFICATIONS,
                &seizure.classification,
            ),
            FieldView::select("subtype", "Subtype", subtypes, &seizure.subtype)
                .shown_if(!subtypes.is_empty()),
            FieldView::select("duration", "Duration", DURATIONS, &seizure.duration),
            FieldView::checkboxes(
                "clinicalSigns",
                "Clinical Signs",
                CLINICAL_SIGNS,
                &seizure.clinical_signs,
            ),
            FieldView::checkboxes("eegPattern", "EEG Pattern", EEG_PATTERNS, &seizure.eeg_pattern),
            FieldView::checkboxes(
                "postictalSigns",
                "Postictal Signs",
                POSTICTAL_SIGNS,
                &seizure.postictal_signs,
            ),
        ],
    )
}

pub fn view(findings: &SeizureFindings) -> StageView {
    StageView {
        stage: StageId::SeizureFindings,
        title: "Seizure Findings",
        groups: findings
            .seizures
            .iter()
            .enumerate()
            .map(|(i, s)| seizure_group(i, s))
            .collect(),
        pages: None,
    }
}

pub(crate) fn apply(store: &mut ReportStore, edit: StageEdit) -> Result<EditOutcome, StageError> {
    let seizures = &store.report().seizure_findings.seizures;
    let mut outcome = EditOutcome::default();

    let updated = match edit {
        StageEdit::AddSeizure => {
            let seizure = Seizure::new_default();
            outcome.created = Some(seizure.id);
            let mut updated = seizures.clone();
            updated.push(seizure);
            updated
        }
        StageEdit::RemoveSeizure { id } => without_record(seizures, id, "seizure")?,
        StageEdit::SetSeizureField { id, field, value } => {
            with_record_edit(seizures, id, "seizure", |s| match field {
                SeizureField::Classification => s.classification = value,
                SeizureField::Subtype => s.subtype = value,
                SeizureField::Duration => s.duration = value,
            })?
        }
        StageEdit::ToggleSeizureTag {
            id,
            group,
            tag,
            checked,
        } => {
            ensure_option(group.as_str(), tag_options(group), &tag)?;
            with_record_edit(seizures, id, "seizure", |s| {
                let list = match group {
                    SeizureTagGroup::ClinicalSigns => &mut s.clinical_signs,
                    SeizureTagGroup::EegPattern => &mut s.eeg_pattern,
                    SeizureTagGroup::PostictalSigns => &mut s.postictal_signs,
                };
                *list = toggle_tag(list, &tag, checked);
            })?
        }
        _ => return Ok(outcome),
    };

    store.update_seizure_findings(SeizureFindingsPatch {
        seizures: Some(updated),
    });
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::apply_edit;

    fn seizures(store: &ReportStore) -> &[Seizure] {
        &store.report().seizure_findings.seizures
    }

    #[test]
    fn subtype_choices_follow_classification() {
        assert_eq!(subtype_options("Generalised Onset"), GENERALISED_SUBTYPES);
        assert_eq!(subtype_options("Focal Onset"), FOCAL_SUBTYPES);
        assert!(subtype_options("Unknown Onset").is_empty());
    }

    #[test]
    fn unknown_onset_hides_subtype() {
        let mut store = ReportStore::seeded("r");
        let id = seizures(&store)[0].id;
        apply_edit(
            &mut store,
            StageEdit::SetSeizureField {
                id,
                field: SeizureField::Classification,
                value: "Unknown Onset".into(),
            },
        )
        .unwrap();

        let view = view(&store.report().seizure_findings);
        let card = view.group("Seizure #1").unwrap();
        assert_eq!(card.record_id, Some(id));
        assert!(!card.field("subtype").unwrap().visible);
    }

    #[test]
    fn add_seizure_starts_without_signs() {
        let mut store = ReportStore::seeded("r");
        let created = apply_edit(&mut store, StageEdit::AddSeizure)
            .unwrap()
            .created
            .unwrap();

        let added = seizures(&store).last().unwrap();
        assert_eq!(added.id, created);
        assert_eq!(added.classification, "Generalised Onset");
        assert_eq!(added.subtype, "Tonic Clonic");
        assert!(added.clinical_signs.is_empty());
        assert!(added.eeg_pattern.is_empty());
        assert!(added.postictal_signs.is_empty());
    }

    #[test]
    fn tag_toggle_touches_only_target_seizure() {
        let mut store = ReportStore::seeded("r");
        let created = apply_edit(&mut store, StageEdit::AddSeizure)
            .unwrap()
            .created
            .unwrap();

        apply_edit(
            &mut store,
            StageEdit::ToggleSeizureTag {
                id: created,
                group: SeizureTagGroup::PostictalSigns,
                tag: "Todd's Paralysis".into(),
                checked: true,
            },
        )
        .unwrap();

        assert_eq!(seizures(&store)[0].postictal_signs, vec!["Confusion"]);
        assert_eq!(seizures(&store)[1].postictal_signs, vec!["Todd's Paralysis"]);
    }

    #[test]
    fn unknown_seizure_tag_is_rejected() {
        let mut store = ReportStore::seeded("r");
        let id = seizures(&store)[0].id;
        let before = seizures(&store)[0].clone();

        let result = apply_edit(
            &mut store,
            StageEdit::ToggleSeizureTag {
                id,
                group: SeizureTagGroup::ClinicalSigns,
                tag: "Hiccups".into(),
                checked: true,
            },
        );

        assert!(matches!(result, Err(StageError::UnknownOption { .. })));
        assert_eq!(seizures(&store)[0], before);
    }

    #[test]
    fn removing_all_seizures_leaves_empty_view() {
        let mut store = ReportStore::seeded("r");
        let id = seizures(&store)[0].id;
        apply_edit(&mut store, StageEdit::RemoveSeizure { id }).unwrap();

        assert!(seizures(&store).is_empty());
        assert!(view(&store.report().seizure_findings).groups.is_empty());
    }

    #[test]
    fn removing_unknown_seizure_fails_without_change() {
        let mut store = ReportStore::seeded("r");
        let result = apply_edit(
            &mut store,
            StageEdit::RemoveSeizure {
                id: uuid::Uuid::new_v4(),
            },
        );
        assert!(matches!(result, Err(StageError::Store(_))));
        assert_eq!(seizures(&store).len(), 1);
    }
}
