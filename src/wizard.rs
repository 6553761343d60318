//! Wizard navigation over the fixed stage order.
//!
//! `next`/`previous` saturate at the ends; `set_active` jumps anywhere.
//! No transition is gated on the data entered so far.

use serde::Serialize;

use crate::models::StageId;

impl StageId {
    /// Stage order shown in the tab bar.
    pub const ORDER: &'static [StageId] = StageId::ALL;

    pub fn position(self) -> usize {
        Self::ORDER
            .iter()
            .position(|s| *s == self)
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            StageId::Patient => "Patient",
            StageId::EegFindings => "EEG Findings",
            StageId::SeizureFindings => "Seizure Findings",
            StageId::Annotations => "Annotations",
            StageId::AdditionalNotes => "Additional Notes",
            StageId::Signature => "Signature",
            StageId::Preview => "Preview",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == StageId::Preview
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardNavigator {
    active: StageId,
}

impl Default for WizardNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardNavigator {
    pub fn new() -> Self {
        Self {
            active: StageId::Patient,
        }
    }

    pub fn active(&self) -> StageId {
        self.active
    }

    pub fn has_next(&self) -> bool {
        self.active.position() + 1 < StageId::ORDER.len()
    }

    pub fn has_previous(&self) -> bool {
        self.active.position() > 0
    }

    /// Advance one stage. No-op on the last stage.
    pub fn next(&mut self) -> StageId {
        if self.has_next() {
            self.active = StageId::ORDER[self.active.position() + 1];
        }
        self.active
    }

    /// Go back one stage. No-op on the first stage.
    pub fn previous(&mut self) -> StageId {
        if self.has_previous() {
            self.active = StageId::ORDER[self.active.position() - 1];
        }
        self.active
    }

    /// Jump straight to `stage` (tab selection).
    pub fn set_active(&mut self, stage: StageId) -> StageId {
        self.active = stage;
        self.active
    }

    pub fn state(&self) -> NavigationState {
        NavigationState {
            active: self.active,
            label: self.active.label(),
            has_next: self.has_next(),
            has_previous: self.has_previous(),
            tabs: StageId::ORDER
                .iter()
                .map(|s| StageTab {
                    id: *s,
                    label: s.label(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTab {
    pub id: StageId,
    pub label: &'static str,
}

/// Navigation snapshot for the tab bar and Next/Previous buttons.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub active: StageId,
    pub label: &'static str,
    pub has_next: bool,
    pub has_previous: bool,
    pub tabs: Vec<StageTab>,
}
