//! Reference data for form pickers.
//!
//! Forms never call the API directly for their dropdowns. Each list comes from a
//! [`ReferenceDataProvider`]; the usual one reads through a resource store so
//! the store's soft cache applies.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use log::{debug, warn};
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::api::ListFilters;
use crate::entities::{
    FilmaticLinesFormSpec, Record, ResourceSpec, SteriMilkProcessLogSpec, TankerSpec, UserSpec,
};
use crate::store::{ResourceStore, StoreError};

/// One selectable entry; `value` is the referenced record's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

impl ReferenceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Case-insensitive match on label or description. A blank query matches.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.label.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

fn filter_options(options: Vec<ReferenceOption>, query: &str) -> Vec<ReferenceOption> {
    options
        .into_iter()
        .filter(|option| option.matches(query))
        .collect()
}

#[async_trait]
pub trait ReferenceDataProvider: Send + Sync {
    /// Key under which the options appear in a [`ReferenceSet`].
    fn name(&self) -> &str;

    async fn options(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ReferenceOption>, StoreError>;

    /// Options matching `query`, for searchable selects.
    async fn search(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ReferenceOption>, StoreError> {
        let options = self.options(cancel).await?;
        Ok(filter_options(options, query))
    }

    /// Drops cached results so the next call reads through.
    fn invalidate(&self) {}
}

/// How a record shows up in a picker.
pub trait Referenceable: ResourceSpec {
    fn reference_label(record: &Record<Self>) -> String;

    fn reference_description(_record: &Record<Self>) -> String {
        String::new()
    }

    fn reference_option(record: &Record<Self>) -> ReferenceOption {
        ReferenceOption::new(record.id.clone(), Self::reference_label(record))
            .with_description(Self::reference_description(record))
    }
}

impl Referenceable for UserSpec {
    fn reference_label(record: &Record<Self>) -> String {
        record.spec.full_name()
    }

    fn reference_description(record: &Record<Self>) -> String {
        record.spec.email.clone()
    }
}

impl Referenceable for TankerSpec {
    fn reference_label(record: &Record<Self>) -> String {
        record.spec.reg_number.clone()
    }

    fn reference_description(record: &Record<Self>) -> String {
        format!("{} L", record.spec.capacity)
    }
}

impl Referenceable for FilmaticLinesFormSpec {
    fn reference_label(record: &Record<Self>) -> String {
        format!("Filmatic lines form {}", record.spec.date)
    }

    fn reference_description(record: &Record<Self>) -> String {
        if record.spec.approved {
            "Approved".to_string()
        } else {
            "Pending approval".to_string()
        }
    }
}

impl Referenceable for SteriMilkProcessLogSpec {
    fn reference_label(record: &Record<Self>) -> String {
        format!("Batch {}", record.spec.batch.batch_number)
    }

    fn reference_description(record: &Record<Self>) -> String {
        format!("Filling started {}", record.spec.batch.times.filling_start)
    }
}

/// Options read through a resource store.
pub struct StoreReferenceProvider<T: ResourceSpec> {
    name: String,
    store: Arc<ResourceStore<T>>,
}

impl<T: Referenceable> StoreReferenceProvider<T> {
    pub fn new(name: impl Into<String>, store: Arc<ResourceStore<T>>) -> Self {
        Self {
            name: name.into(),
            store,
        }
    }
}

#[async_trait]
impl<T: Referenceable> ReferenceDataProvider for StoreReferenceProvider<T> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn options(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ReferenceOption>, StoreError> {
        let records = self.store.fetch_all(&ListFilters::new(), cancel).await?;
        Ok(records.iter().map(T::reference_option).collect())
    }
}

/// Serves a fixed placeholder list when the inner provider fails.
pub struct FallbackProvider<P> {
    inner: P,
    placeholders: Vec<ReferenceOption>,
}

impl<P: ReferenceDataProvider> FallbackProvider<P> {
    pub fn new(inner: P, placeholders: Vec<ReferenceOption>) -> Self {
        Self {
            inner,
            placeholders,
        }
    }
}

#[async_trait]
impl<P: ReferenceDataProvider> ReferenceDataProvider for FallbackProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn options(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ReferenceOption>, StoreError> {
        match self.inner.options(cancel).await {
            Ok(options) => Ok(options),
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                warn!(
                    "Loading {} options failed, using placeholders: {}",
                    self.inner.name(),
                    e
                );
                Ok(self.placeholders.clone())
            }
        }
    }

    async fn search(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ReferenceOption>, StoreError> {
        match self.inner.search(query, cancel).await {
            Ok(options) => Ok(options),
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                warn!(
                    "Searching {} options failed, using placeholders: {}",
                    self.inner.name(),
                    e
                );
                Ok(filter_options(self.placeholders.clone(), query))
            }
        }
    }

    fn invalidate(&self) {
        self.inner.invalidate();
    }
}

/// Keeps successful results for a fixed time, the full list and each search
/// query under their own key.
pub struct CachedProvider<P> {
    inner: P,
    cache: Cache<String, Vec<ReferenceOption>>,
}

impl<P: ReferenceDataProvider> CachedProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder().max_capacity(16).time_to_live(ttl).build(),
        }
    }

    fn search_key(&self, query: &str) -> String {
        format!("{}?{}", self.inner.name(), query.trim().to_lowercase())
    }
}

#[async_trait]
impl<P: ReferenceDataProvider> ReferenceDataProvider for CachedProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn options(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ReferenceOption>, StoreError> {
        let key = self.inner.name().to_string();
        if let Some(options) = self.cache.get(&key) {
            debug!("Reference cache hit for {}", key);
            return Ok(options);
        }
        let options = self.inner.options(cancel).await?;
        self.cache.insert(key, options.clone());
        Ok(options)
    }

    async fn search(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ReferenceOption>, StoreError> {
        let key = self.search_key(query);
        if let Some(options) = self.cache.get(&key) {
            debug!("Reference cache hit for {}", key);
            return Ok(options);
        }
        let options = self.inner.search(query, cancel).await?;
        self.cache.insert(key, options.clone());
        Ok(options)
    }

    fn invalidate(&self) {
        self.cache.invalidate_all();
        self.inner.invalidate();
    }
}

/// Every reference list a form loaded, by provider name.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    options: BTreeMap<String, Vec<ReferenceOption>>,
    failures: BTreeMap<String, String>,
}

impl ReferenceSet {
    /// Loads all providers concurrently. A failing provider yields an empty list
    /// and a recorded failure; it never blocks the others.
    pub async fn load(
        providers: &[Arc<dyn ReferenceDataProvider>],
        cancel: &CancellationToken,
    ) -> Self {
        let results = join_all(providers.iter().map(|provider| async move {
            (provider.name().to_string(), provider.options(cancel).await)
        }))
        .await;

        let mut set = Self::default();
        for (name, result) in results {
            match result {
                Ok(options) => {
                    set.options.insert(name, options);
                }
                Err(e) => {
                    warn!("Failed to load {} options: {}", name, e);
                    set.failures.insert(name.clone(), e.user_message());
                    set.options.insert(name, Vec::new());
                }
            }
        }
        set
    }

    pub fn get(&self, name: &str) -> &[ReferenceOption] {
        self.options.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Loaded options of list `name` matching `query`.
    pub fn search(&self, name: &str, query: &str) -> Vec<&ReferenceOption> {
        self.get(name)
            .iter()
            .filter(|option| option.matches(query))
            .collect()
    }

    pub fn label_for(&self, name: &str, value: &str) -> Option<&str> {
        self.get(name)
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
    }

    pub fn failure(&self, name: &str) -> Option<&str> {
        self.failures.get(name).map(String::as_str)
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
