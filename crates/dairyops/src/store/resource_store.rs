//! Generic CRUD store over one backend resource.

use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};
use tokio_util::sync::CancellationToken;
use tracing::{info_span, Instrument};

use super::error::StoreError;
use super::state::{Operation, OperationLoading, ResourceState};
use crate::api::{ApiClient, ApiError, ListFilters, ResourceApi, RestResource};
use crate::broadcast::{OperationPhase, StoreEvent, StoreEventBroadcaster};
use crate::entities::{NewRecord, Record, ResourceKind, ResourceSpec, StorePolicy};

/// Client-side cache of one resource with async CRUD operations.
///
/// State only changes after the server confirms an operation. Every operation
/// takes a cancellation token; once it fires the operation commits nothing.
pub struct ResourceStore<T: ResourceSpec> {
    api: Arc<dyn ResourceApi<T>>,
    state: RwLock<ResourceState<T>>,
    policy: StorePolicy,
    cache_window: Duration,
    events: StoreEventBroadcaster,
}

impl<T: ResourceSpec> ResourceStore<T> {
    pub fn new(
        api: Arc<dyn ResourceApi<T>>,
        cache_window: Duration,
        events: StoreEventBroadcaster,
    ) -> Self {
        Self {
            api,
            state: RwLock::new(ResourceState::default()),
            policy: T::KIND.default_policy(),
            cache_window,
            events,
        }
    }

    /// Store backed by the HTTP binding for `T`.
    pub fn from_client(
        client: &ApiClient,
        cache_window: Duration,
        events: StoreEventBroadcaster,
    ) -> Self {
        Self::new(
            Arc::new(RestResource::<T>::new(client.clone())),
            cache_window,
            events,
        )
    }

    pub fn with_policy(mut self, policy: StorePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn kind(&self) -> ResourceKind {
        T::KIND
    }

    pub fn policy(&self) -> StorePolicy {
        self.policy
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ResourceState<T>> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("{} store lock was poisoned, recovering", T::KIND);
                poisoned.into_inner()
            }
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ResourceState<T>> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("{} store lock was poisoned, recovering", T::KIND);
                poisoned.into_inner()
            }
        }
    }

    // ─── Reads ──────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> ResourceState<T> {
        self.read_state().clone()
    }

    pub fn items(&self) -> Vec<Record<T>> {
        self.read_state().items.clone()
    }

    pub fn selected(&self) -> Option<Record<T>> {
        self.read_state().selected.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.read_state().error.clone()
    }

    pub fn operation_loading(&self) -> OperationLoading {
        self.read_state().operation_loading
    }

    pub fn find(&self, id: &str) -> Option<Record<T>> {
        self.read_state().find(id).cloned()
    }

    // ─── Local mutations ────────────────────────────────────────────────────

    /// Marks a cached record as selected. Returns it, or `None` if it is not cached.
    pub fn select(&self, id: &str) -> Option<Record<T>> {
        let mut state = self.write_state();
        let found = state.find(id).cloned();
        state.selected = found.clone();
        found
    }

    pub fn clear_selected(&self) {
        self.write_state().selected = None;
    }

    pub fn clear_error(&self) {
        self.write_state().error = None;
    }

    /// Forces the next unfiltered fetch to go to the network.
    pub fn invalidate(&self) {
        self.write_state().invalidate();
    }

    // ─── Remote operations ──────────────────────────────────────────────────

    /// Lists the resource. An unfiltered call inside the cache window returns the
    /// cached items without a request.
    pub async fn fetch_all(
        &self,
        filters: &ListFilters,
        cancel: &CancellationToken,
    ) -> Result<Vec<Record<T>>, StoreError> {
        if filters.is_empty() {
            let cached = {
                let state = self.read_state();
                state
                    .is_fresh(Utc::now(), self.cache_window)
                    .then(|| state.items.clone())
            };
            if let Some(items) = cached {
                debug!("Serving {} {} from cache", items.len(), T::KIND.plural());
                return Ok(items);
            }
        }

        let filtered = !filters.is_empty();
        self.run(
            Operation::Fetch,
            None,
            cancel,
            self.api.list(filters),
            move |state, items: &Vec<Record<T>>| {
                state.replace_items(items.clone(), Utc::now(), filtered);
            },
        )
        .await
    }

    /// Loads one record into `selected`.
    pub async fn fetch_one(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Record<T>, StoreError> {
        self.run(
            Operation::FetchOne,
            Some(id),
            cancel,
            self.api.get(id),
            |state, record: &Record<T>| {
                state.selected = Some(record.clone());
            },
        )
        .await
    }

    /// Creates a record from `spec`, stamping both timestamps client-side.
    pub async fn create(
        &self,
        spec: T,
        cancel: &CancellationToken,
    ) -> Result<Record<T>, StoreError> {
        let draft = NewRecord::stamped(spec);
        let policy = self.policy;
        self.run(
            Operation::Create,
            None,
            cancel,
            self.api.create(&draft),
            move |state, record: &Record<T>| {
                state.insert(record.clone(), policy.insert_position);
                if policy.invalidate_on_create {
                    state.invalidate();
                }
            },
        )
        .await
    }

    /// Sends `record` with a fresh `updated_at` and stores the server's version.
    pub async fn update(
        &self,
        record: Record<T>,
        cancel: &CancellationToken,
    ) -> Result<Record<T>, StoreError> {
        let record = record.restamped();
        self.run(
            Operation::Update,
            Some(record.id.as_str()),
            cancel,
            self.api.update(&record),
            |state, updated: &Record<T>| state.replace(updated),
        )
        .await
    }

    pub async fn delete(&self, id: &str, cancel: &CancellationToken) -> Result<(), StoreError> {
        self.run(
            Operation::Delete,
            Some(id),
            cancel,
            self.api.delete(id),
            |state, _: &()| state.remove(id),
        )
        .await
    }

    /// Drives one operation through pending → fulfilled | rejected | cancelled.
    async fn run<R, F, C>(
        &self,
        operation: Operation,
        record_id: Option<&str>,
        cancel: &CancellationToken,
        request: F,
        commit: C,
    ) -> Result<R, StoreError>
    where
        F: Future<Output = Result<R, ApiError>>,
        C: FnOnce(&mut ResourceState<T>, &R),
    {
        let kind = T::KIND;
        let span = info_span!("store_operation", kind = %kind, operation = %operation);

        async move {
            self.write_state().begin(operation);
            self.emit(operation, OperationPhase::Pending, record_id, None);

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = request => Some(result),
            };

            match outcome {
                None => self.abort(operation, record_id),
                Some(Err(source)) => {
                    let message = source.user_message(&operation.fallback_message(kind));
                    warn!("Failed to {} {}: {}", operation, kind.plural(), message);
                    self.write_state().fail(operation, message.clone());
                    self.emit(
                        operation,
                        OperationPhase::Rejected,
                        record_id,
                        Some(message.clone()),
                    );
                    Err(StoreError::Request {
                        kind,
                        operation,
                        message,
                        source,
                    })
                }
                Some(Ok(value)) => {
                    if cancel.is_cancelled() {
                        return self.abort(operation, record_id);
                    }
                    {
                        let mut state = self.write_state();
                        commit(&mut *state, &value);
                        state.finish(operation);
                    }
                    debug!("{} {} fulfilled", operation, kind);
                    self.emit(operation, OperationPhase::Fulfilled, record_id, None);
                    Ok(value)
                }
            }
        }
        .instrument(span)
        .await
    }

    fn abort<R>(&self, operation: Operation, record_id: Option<&str>) -> Result<R, StoreError> {
        debug!("{} {} cancelled before commit", operation, T::KIND);
        self.write_state().finish(operation);
        self.emit(operation, OperationPhase::Cancelled, record_id, None);
        Err(StoreError::Cancelled {
            kind: T::KIND,
            operation,
        })
    }

    fn emit(
        &self,
        operation: Operation,
        phase: OperationPhase,
        record_id: Option<&str>,
        message: Option<String>,
    ) {
        let mut event = StoreEvent::new(T::KIND, operation, phase);
        if let Some(id) = record_id {
            event = event.with_record(id);
        }
        if let Some(message) = message {
            event = event.with_message(message);
        }
        self.events.send(event);
    }
}
