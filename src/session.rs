//! One wizard session: the report being edited, where the user is in the
//! wizard, and whether an export is in flight.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::export::ExportError;
use crate::models::{Report, StageId};
use crate::stages::{self, EditOutcome, StageEdit, StageError, StageView};
use crate::store::ReportStore;
use crate::wizard::{NavigationState, WizardNavigator};

pub struct ReportSession {
    pub store: ReportStore,
    pub navigator: WizardNavigator,
    exporting: Arc<AtomicBool>,
    last_touched: Instant,
}

/// Report plus navigation, as returned to the browser.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub report: Report,
    pub navigation: NavigationState,
    /// Per-section update counters.
    pub revisions: BTreeMap<&'static str, u64>,
}

impl ReportSession {
    /// A fresh session over the seeded sample report, starting at the
    /// patient stage.
    pub fn new(report_id: impl Into<String>) -> Self {
        Self::with_store(ReportStore::seeded(report_id))
    }

    pub fn with_store(store: ReportStore) -> Self {
        Self {
            store,
            navigator: WizardNavigator::new(),
            exporting: Arc::new(AtomicBool::new(false)),
            last_touched: Instant::now(),
        }
    }

    pub fn report_id(&self) -> &str {
        self.store.report_id()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            report: self.store.report().clone(),
            navigation: self.navigator.state(),
            revisions: self.store.revisions(),
        }
    }

    pub fn view(&self, stage: StageId) -> StageView {
        stages::view(self.store.report(), stage)
    }

    pub fn active_view(&self) -> StageView {
        self.view(self.navigator.active())
    }

    pub fn apply(&mut self, edit: StageEdit) -> Result<EditOutcome, StageError> {
        stages::apply_edit(&mut self.store, edit)
    }

    /// Mark an export as running. Fails if one already is; the flag clears
    /// when the returned guard drops.
    pub fn begin_export(&self) -> Result<ExportGuard, ExportError> {
        self.exporting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::AlreadyRunning)?;
        Ok(ExportGuard {
            flag: Arc::clone(&self.exporting),
        })
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    pub fn touch(&mut self) {
        self.last_touched = Instant::now();
    }

    /// Untouched for at least `max_idle` and not exporting.
    pub fn is_idle(&self, max_idle: Duration) -> bool {
        !self.is_exporting() && self.last_touched.elapsed() >= max_idle
    }
}

/// Held for the duration of one export.
#[derive(Debug)]
pub struct ExportGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
