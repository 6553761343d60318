//! EEG findings stage: background activity, sleep, interictal findings.

use crate::models::{
    AbnormalPattern, BackgroundField, EegFindings, EegFindingsPatch, EegTagGroup, PatternField,
    StageId,
};
use crate::store::{toggle_tag, with_record_edit, without_record, ReportStore};

use super::{ensure_option, EditOutcome, FieldGroup, FieldView, StageEdit, StageError, StageView};

pub const EEG_ELEMENTS: &[&str] = &[
    "Posterior Dominant Rhythm (PDR)",
    "Mu Rhythm",
    "Delta Rhythm",
    "Theta Rhythm",
    "Alpha Rhythm",
    "Beta Rhythm",
];
pub const AMPLITUDES: &[&str] = &["Low", "Medium", "High"];
pub const SYMMETRIES: &[&str] = &["Symmetric", "Left < Right", "Right < Left"];
pub const REACTIVITY: &[&str] = &["Yes", "No"];
pub const SLEEP_STAGES: &[&str] = &["NREM 1", "NREM 2", "NREM 3", "REM"];
pub const SLEEP_CHARACTERISTICS: &[&str] = &["Sleep Spindle", "K-Complexes", "Sawtooth Waves"];
pub const SLEEP_ABNORMALITIES: &[&str] = &["Asymmetry", "Absence of Physiological Sleep Features"];
pub const PATTERN_TYPES: &[&str] = &[
    "Epileptiform Discharges",
    "High Frequency Oscillations",
    "Slowing",
];
pub const EPILEPTIFORM_SUBTYPES: &[&str] = &["Spikes", "Polyspikes", "Sharp", "Slow", "Unknown"];
pub const SLOWING_SUBTYPES: &[&str] = &["Focal", "Generalised"];
pub const DISTRIBUTIONS: &[&str] = &["Generalised", "Lateralized", "Bilateral", "Unknown"];
pub const PREVALENCES: &[&str] = &[
    "Rare (<1%)",
    "Occasional (1-9%)",
    "Frequent (10-49%)",
    "Abundant (50-89%)",
];
pub const BIOLOGICAL_ARTIFACTS: &[&str] = &[
    "Eye Movement",
    "Sweat",
    "Chewing",
    "Respiration",
    "Pulse",
    "ECG",
    "EMG",
];
pub const NON_BIOLOGICAL_ARTIFACTS: &[&str] = &["50/60 Hz Electrical Interference", "Electrode Pop"];

pub const BACKGROUND_ACTIVITY: &str = "Background Activity";
pub const SLEEP_AND_DROWSINESS: &str = "Sleep & Drowsiness";
pub const EEG_ARTIFACTS: &str = "EEG Artifacts";

pub fn tag_options(group: EegTagGroup) -> &'static [&'static str] {
    match group {
        EegTagGroup::EegElements => EEG_ELEMENTS,
        EegTagGroup::SleepStages => SLEEP_STAGES,
        EegTagGroup::SleepCharacteristics => SLEEP_CHARACTERISTICS,
        EegTagGroup::SleepAbnormalities => SLEEP_ABNORMALITIES,
        EegTagGroup::BiologicalArtifacts => BIOLOGICAL_ARTIFACTS,
        EegTagGroup::NonBiologicalArtifacts => NON_BIOLOGICAL_ARTIFACTS,
    }
}

/// Conditional fields of one abnormal pattern, derived from its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternVisibility {
    /// Empty when the type has no subtype.
    pub subtype_options: &'static [&'static str],
    pub rhythmic: bool,
    pub periodic: bool,
}

pub fn pattern_visibility(pattern: &AbnormalPattern) -> PatternVisibility {
    match pattern.pattern_type.as_str() {
        "Epileptiform Discharges" => PatternVisibility {
            subtype_options: EPILEPTIFORM_SUBTYPES,
            rhythmic: true,
            periodic: true,
        },
        "Slowing" => PatternVisibility {
            subtype_options: SLOWING_SUBTYPES,
            rhythmic: false,
            periodic: false,
        },
        _ => PatternVisibility {
            subtype_options: &[],
            rhythmic: false,
            periodic: false,
        },
    }
}

fn tags_mut(findings: &mut EegFindings, group: EegTagGroup) -> &mut Vec<String> {
    match group {
        EegTagGroup::EegElements => &mut findings.background_activity.eeg_elements,
        EegTagGroup::SleepStages => &mut findings.sleep_and_drowsiness.sleep_stages,
        EegTagGroup::SleepCharacteristics => &mut findings.sleep_and_drowsiness.sleep_characteristics,
        EegTagGroup::SleepAbnormalities => &mut findings.sleep_and_drowsiness.sleep_abnormalities,
        EegTagGroup::BiologicalArtifacts => {
            &mut findings.interictal_findings.eeg_artifacts.biological
        }
        EegTagGroup::NonBiologicalArtifacts => {
            &mut findings.interictal_findings.eeg_artifacts.non_biological
        }
    }
}

fn set_pattern_field(pattern: &mut AbnormalPattern, field: PatternField, value: String) {
    match field {
        PatternField::Type => pattern.pattern_type = value,
        PatternField::Subtype => pattern.subtype = value,
        PatternField::Rhythmic => pattern.rhythmic = value,
        PatternField::Periodic => pattern.periodic = value,
        PatternField::Prevalence => pattern.prevalence = value,
    }
}

fn pattern_group(index: usize, pattern: &AbnormalPattern) -> FieldGroup {
    let shown = pattern_visibility(pattern);
    let subtype_label = if pattern.pattern_type == "Slowing" {
        "Slowing Type"
    } else {
        "Subtype"
    };

    FieldGroup::record(
        format!("Abnormal Pattern #{}", index + 1),
        pattern.id,
        vec![
            FieldView::select("type", "Type of Abnormal Pattern", PATTERN_TYPES, &pattern.pattern_type),
            FieldView::select("subtype", subtype_label, shown.subtype_options, &pattern.subtype)
                .shown_if(!shown.subtype_options.is_empty()),
            FieldView::select("rhythmic", "If Rhythmic", DISTRIBUTIONS, &pattern.rhythmic)
                .shown_if(shown.rhythmic),
            FieldView::select("periodic", "If Periodic", DISTRIBUTIONS, &pattern.periodic)
                .shown_if(shown.periodic),
            FieldView::select("prevalence", "Prevalence", PREVALENCES, &pattern.prevalence),
        ],
    )
}

pub fn view(findings: &EegFindings) -> StageView {
    let background = &findings.background_activity;
    let sleep = &findings.sleep_and_drowsiness;
    let interictal = &findings.interictal_findings;

    let mut groups = vec![
        FieldGroup::new(
            BACKGROUND_ACTIVITY,
            vec![
                FieldView::checkboxes("eegElements", "EEG Elements", EEG_ELEMENTS, &background.eeg_elements),
                FieldView::text("otherElements", "Other Elements", &background.other_elements),
                FieldView::select("amplitude", "Amplitude", AMPLITUDES, &background.amplitude),
                FieldView::select("symmetry", "Symmetry", SYMMETRIES, &background.symmetry),
                FieldView::select(
                    "reactivity",
                    "Reactivity to Eye Opening",
                    REACTIVITY,
                    &background.reactivity,
                ),
            ],
        ),
        FieldGroup::new(
            SLEEP_AND_DROWSINESS,
            vec![
                FieldView::checkboxes("sleepStages", "Sleep Stages", SLEEP_STAGES, &sleep.sleep_stages),
                FieldView::checkboxes(
                    "sleepCharacteristics",
                    "Sleep Characteristics",
                    SLEEP_CHARACTERISTICS,
                    &sleep.sleep_characteristics,
                ),
                FieldView::checkboxes(
                    "sleepAbnormalities",
                    "Sleep Abnormalities",
                    SLEEP_ABNORMALITIES,
                    &sleep.sleep_abnormalities,
                ),
            ],
        ),
    ];

    groups.extend(
        interictal
            .abnormal_patterns
            .iter()
            .enumerate()
            .map(|(i, p)| pattern_group(i, p)),
    );

    groups.push(FieldGroup::new(
        EEG_ARTIFACTS,
        vec![
            FieldView::checkboxes(
                "biological",
                "Biological",
                BIOLOGICAL_ARTIFACTS,
                &interictal.eeg_artifacts.biological,
            ),
            FieldView::checkboxes(
                "nonBiological",
                "Non-Biological",
                NON_BIOLOGICAL_ARTIFACTS,
                &interictal.eeg_artifacts.non_biological,
            ),
        ],
    ));

    StageView {
        stage: StageId::EegFindings,
        title: "EEG Findings",
        groups,
        pages: None,
    }
}

pub(crate) fn apply(store: &mut ReportStore, edit: StageEdit) -> Result<EditOutcome, StageError> {
    let findings = &store.report().eeg_findings;
    let mut outcome = EditOutcome::default();

    let patch = match edit {
        StageEdit::SetBackgroundField { field, value } => {
            let mut background = findings.background_activity.clone();
            match field {
                BackgroundField::OtherElements => background.other_elements = value,
                BackgroundField::Amplitude => background.amplitude = value,
                BackgroundField::Symmetry => background.symmetry = value,
                BackgroundField::Reactivity => background.reactivity = value,
            }
            EegFindingsPatch {
                background_activity: Some(background),
                ..Default::default()
            }
        }
        StageEdit::ToggleEegTag { group, tag, checked } => {
            ensure_option(group.as_str(), tag_options(group), &tag)?;
            let mut updated = findings.clone();
            let list = tags_mut(&mut updated, group);
            *list = toggle_tag(list, &tag, checked);
            // only the nested record that owns the group is merged back
            match group {
                EegTagGroup::EegElements => EegFindingsPatch {
                    background_activity: Some(updated.background_activity),
                    ..Default::default()
                },
                EegTagGroup::SleepStages
                | EegTagGroup::SleepCharacteristics
                | EegTagGroup::SleepAbnormalities => EegFindingsPatch {
                    sleep_and_drowsiness: Some(updated.sleep_and_drowsiness),
                    ..Default::default()
                },
                EegTagGroup::BiologicalArtifacts | EegTagGroup::NonBiologicalArtifacts => {
                    EegFindingsPatch {
                        interictal_findings: Some(updated.interictal_findings),
                        ..Default::default()
                    }
                }
            }
        }
        StageEdit::AddPattern => {
            let pattern = AbnormalPattern::new_default();
            outcome.created = Some(pattern.id);
            let mut interictal = findings.interictal_findings.clone();
            interictal.abnormal_patterns.push(pattern);
            EegFindingsPatch {
                interictal_findings: Some(interictal),
                ..Default::default()
            }
        }
        StageEdit::RemovePattern { id } => {
            let mut interictal = findings.interictal_findings.clone();
            interictal.abnormal_patterns =
                without_record(&interictal.abnormal_patterns, id, "abnormal pattern")?;
            EegFindingsPatch {
                interictal_findings: Some(interictal),
                ..Default::default()
            }
        }
        StageEdit::SetPatternField { id, field, value } => {
            let mut interictal = findings.interictal_findings.clone();
            interictal.abnormal_patterns = with_record_edit(
                &interictal.abnormal_patterns,
                id,
                "abnormal pattern",
                |p| set_pattern_field(p, field, value),
            )?;
            EegFindingsPatch {
                interictal_findings: Some(interictal),
                ..Default::default()
            }
        }
        _ => return Ok(outcome),
    };

    store.update_eeg_findings(patch);
    Ok(outcome)
}
