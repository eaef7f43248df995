//! Steri-milk data-entry forms.
//!
//! Each form is a [`WizardDraft`](crate::wizard::WizardDraft) plus a builder
//! wiring it to its store and reference lists.

pub mod steri_milk_process_log;
pub mod steri_milk_test_report;

use std::sync::Arc;
use std::time::Duration;

use crate::store::ResourceStore;
use crate::wizard::{
    CachedProvider, FallbackProvider, ReferenceDataProvider, ReferenceOption, Referenceable,
    StoreReferenceProvider,
};

pub use steri_milk_process_log::{
    process_log_form, ProcessLogBasicInfo, ProcessLogDraft, ProcessLogForm, ReadingDraft,
};
pub use steri_milk_test_report::{
    test_report_form, IncubationDraft, OrganolepticDraft, ReportBasicInfo, SampleDetailsDraft,
    SignOffDraft, TestReportDraft, TestReportForm,
};

/// Reference list names.
pub const USERS: &str = "users";
pub const FILMATIC_FORMS: &str = "filmatic_forms";
pub const PROCESS_LOGS: &str = "process_logs";

/// Store-backed list, cached for `ttl`, with placeholders when loading fails.
pub(crate) fn reference_provider<T: Referenceable>(
    name: &str,
    store: &Arc<ResourceStore<T>>,
    ttl: Duration,
    placeholders: Vec<ReferenceOption>,
) -> Arc<dyn ReferenceDataProvider> {
    let live = StoreReferenceProvider::new(name, Arc::clone(store));
    Arc::new(FallbackProvider::new(
        CachedProvider::new(live, ttl),
        placeholders,
    ))
}

pub(crate) fn placeholder_users() -> Vec<ReferenceOption> {
    vec![ReferenceOption::new("unassigned", "Unassigned")]
}
