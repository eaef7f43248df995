//! Generic multi-step form.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::error::WizardError;
use super::reference::{ReferenceDataProvider, ReferenceOption, ReferenceSet};
use super::validation::{FieldErrors, StepSchema};
use crate::api::ListFilters;
use crate::broadcast::ToastBroadcaster;
use crate::entities::{Record, ResourceSpec};
use crate::store::{ResourceStore, StoreError};

/// The editable state behind one kind of wizard.
///
/// Each step owns one top-level key of the serialized draft; see [`StepSchema`].
pub trait WizardDraft: Default + Clone + Serialize + Send + Sync + 'static {
    type Spec: ResourceSpec;

    /// Human name used in notifications, e.g. "Process log".
    const TITLE: &'static str;

    fn steps() -> Vec<StepSchema>;

    /// Seeds a draft from an existing record for editing.
    fn from_record(record: &Record<Self::Spec>) -> Self;

    /// Fills defaults derived from step `step` (1-based) after it validated.
    fn apply_derived(&mut self, _step: usize) {}

    fn into_spec(self) -> Result<Self::Spec, WizardError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode<T> {
    Create,
    Edit(Record<T>),
}

pub struct WizardForm<D: WizardDraft> {
    store: Arc<ResourceStore<D::Spec>>,
    toasts: ToastBroadcaster,
    providers: Vec<Arc<dyn ReferenceDataProvider>>,
    refresh_delay: Duration,
    steps: Vec<StepSchema>,
    draft: D,
    mode: FormMode<D::Spec>,
    step: usize,
    open: bool,
    errors: FieldErrors,
    references: ReferenceSet,
    session: CancellationToken,
    pending_refresh: Option<JoinHandle<()>>,
}

impl<D: WizardDraft> WizardForm<D> {
    pub fn new(
        store: Arc<ResourceStore<D::Spec>>,
        toasts: ToastBroadcaster,
        refresh_delay: Duration,
    ) -> Self {
        Self {
            store,
            toasts,
            providers: Vec::new(),
            refresh_delay,
            steps: D::steps(),
            draft: D::default(),
            mode: FormMode::Create,
            step: 1,
            open: false,
            errors: FieldErrors::default(),
            references: ReferenceSet::default(),
            session: CancellationToken::new(),
            pending_refresh: None,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn ReferenceDataProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step_schema(&self, step: usize) -> Option<&StepSchema> {
        step.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    pub fn is_final_step(&self) -> bool {
        self.step == self.steps.len()
    }

    pub fn mode(&self) -> &FormMode<D::Spec> {
        &self.mode
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    /// Starts a session: fresh or seeded draft, step 1, reference lists reloaded
    /// through every provider's cache.
    pub async fn open(&mut self, mode: FormMode<D::Spec>) {
        self.session.cancel();
        self.session = CancellationToken::new();

        self.draft = match &mode {
            FormMode::Create => D::default(),
            FormMode::Edit(record) => D::from_record(record),
        };
        self.mode = mode;
        self.step = 1;
        self.errors.clear();
        self.open = true;

        for provider in &self.providers {
            provider.invalidate();
        }
        self.references = ReferenceSet::load(&self.providers, &self.session).await;
        debug!(
            "Opened {} form with {} reference lists",
            D::TITLE,
            self.providers.len()
        );
    }

    /// Searches reference list `name` through its provider. Unknown lists yield nothing.
    pub async fn search_references(
        &self,
        name: &str,
        query: &str,
    ) -> Result<Vec<ReferenceOption>, StoreError> {
        match self.providers.iter().find(|provider| provider.name() == name) {
            Some(provider) => provider.search(query, &self.session).await,
            None => Ok(Vec::new()),
        }
    }

    /// Discards the draft and cancels anything the session still has in flight.
    pub fn close(&mut self) {
        self.session.cancel();
        self.open = false;
        self.draft = D::default();
        self.mode = FormMode::Create;
        self.step = 1;
        self.errors.clear();
    }

    /// Validates step `step`. Passing the current step applies its derived
    /// defaults and moves forward, unless it is the last one.
    pub fn validate_step(&mut self, step: usize) -> Result<(), WizardError> {
        if !self.open {
            return Err(WizardError::Closed);
        }
        let total = self.steps.len();
        let schema = self
            .step_schema(step)
            .ok_or(WizardError::StepOutOfRange { step, total })?;

        let value = serde_json::to_value(&self.draft)?;
        if let Err(errors) = schema.validate(&value) {
            debug!("{} step {} failed validation: {}", D::TITLE, step, errors);
            self.errors = errors.clone();
            return Err(WizardError::Validation { step, errors });
        }
        self.errors.clear();

        if step == self.step {
            self.draft.apply_derived(step);
            if self.step < total {
                self.step += 1;
            }
        }
        Ok(())
    }

    pub fn next(&mut self) -> Result<(), WizardError> {
        self.validate_step(self.step)
    }

    /// One step back without validating. Stays on step 1.
    pub fn go_back(&mut self) {
        if self.step > 1 {
            self.step -= 1;
        }
    }

    /// Validates the final step and sends the record to the store.
    ///
    /// On success the form closes and a list refresh is scheduled after the
    /// configured delay. On failure the form stays open with its draft.
    pub async fn submit(&mut self) -> Result<Record<D::Spec>, WizardError> {
        if !self.open {
            return Err(WizardError::Closed);
        }
        let total = self.steps.len();
        if self.step != total {
            return Err(WizardError::NotFinalStep {
                current: self.step,
                total,
            });
        }
        self.validate_step(total)?;

        // Earlier steps can be edited through `draft_mut` after they validated.
        if let Some((step, errors)) = self.first_invalid_step()? {
            warn!("{} step {} became invalid before submit: {}", D::TITLE, step, errors);
            self.step = step;
            self.errors = errors.clone();
            self.toasts
                .error(D::TITLE, &format!("Please review step {}: {}", step, errors));
            return Err(WizardError::Validation { step, errors });
        }

        let spec = match self.draft.clone().into_spec() {
            Ok(spec) => spec,
            Err(e) => {
                warn!("{} could not be assembled: {}", D::TITLE, e);
                self.toasts.error(D::TITLE, &e.to_string());
                return Err(e);
            }
        };
        let result = match &self.mode {
            FormMode::Create => self.store.create(spec, &self.session).await,
            FormMode::Edit(record) => {
                let record = Record {
                    id: record.id.clone(),
                    created_at: record.created_at,
                    updated_at: record.updated_at,
                    spec,
                };
                self.store.update(record, &self.session).await
            }
        };

        let verb = match self.mode {
            FormMode::Create => "created",
            FormMode::Edit(_) => "updated",
        };

        match result {
            Ok(record) => {
                info!("{} {} ({})", D::TITLE, verb, record.id);
                self.toasts
                    .success(D::TITLE, &format!("{} {} successfully", D::TITLE, verb));
                self.close();
                self.schedule_refresh();
                Ok(record)
            }
            Err(e) => {
                if !e.is_cancelled() {
                    self.toasts.error(D::TITLE, &e.user_message());
                }
                Err(WizardError::Submit(e))
            }
        }
    }

    fn first_invalid_step(&self) -> Result<Option<(usize, FieldErrors)>, WizardError> {
        let value = serde_json::to_value(&self.draft)?;
        Ok(self
            .steps
            .iter()
            .enumerate()
            .find_map(|(i, schema)| schema.validate(&value).err().map(|errors| (i + 1, errors))))
    }

    /// Handle of the refresh scheduled by the last successful submit.
    pub fn take_pending_refresh(&mut self) -> Option<JoinHandle<()>> {
        self.pending_refresh.take()
    }

    fn schedule_refresh(&mut self) {
        let store = Arc::clone(&self.store);
        let delay = self.refresh_delay;
        self.pending_refresh = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.invalidate();
            if let Err(e) = store
                .fetch_all(&ListFilters::new(), &CancellationToken::new())
                .await
            {
                warn!("Refresh after submit failed: {}", e);
            }
        }));
    }
}

impl<D: WizardDraft> Drop for WizardForm<D> {
    fn drop(&mut self) {
        self.session.cancel();
    }
}
