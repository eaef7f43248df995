//! Per-resource CRUD bindings.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use log::warn;

use super::client::ApiClient;
use super::error::ApiError;
use crate::entities::{NewRecord, Record, ResourceSpec};

/// Query parameters for a filtered list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters(BTreeMap<String, String>);

impl ListFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

/// CRUD capability for one resource.
#[async_trait]
pub trait ResourceApi<T: ResourceSpec>: Send + Sync {
    async fn list(&self, filters: &ListFilters) -> Result<Vec<Record<T>>, ApiError>;
    async fn get(&self, id: &str) -> Result<Record<T>, ApiError>;
    async fn create(&self, draft: &NewRecord<T>) -> Result<Record<T>, ApiError>;
    async fn update(&self, record: &Record<T>) -> Result<Record<T>, ApiError>;
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// `ResourceApi` over HTTP: `/<resource>` for lists and creates, `/<resource>/<id>` otherwise.
pub struct RestResource<T> {
    client: ApiClient,
    _spec: PhantomData<fn() -> T>,
}

impl<T: ResourceSpec> RestResource<T> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _spec: PhantomData,
        }
    }
}

#[async_trait]
impl<T: ResourceSpec> ResourceApi<T> for RestResource<T> {
    async fn list(&self, filters: &ListFilters) -> Result<Vec<Record<T>>, ApiError> {
        let kind = T::KIND;

        let url = if filters.is_empty() {
            self.client.url(&[kind.segment()])?
        } else if kind.supports_filter() {
            let mut url = self.client.url(&[kind.segment(), "filter"])?;
            url.query_pairs_mut().extend_pairs(filters.iter());
            url
        } else {
            warn!("{} has no filter endpoint, ignoring filters {:?}", kind, filters);
            self.client.url(&[kind.segment()])?
        };

        self.client.get(url).await
    }

    async fn get(&self, id: &str) -> Result<Record<T>, ApiError> {
        let url = self.client.url(&[T::KIND.segment(), id])?;
        self.client.get(url).await
    }

    async fn create(&self, draft: &NewRecord<T>) -> Result<Record<T>, ApiError> {
        let url = self.client.url(&[T::KIND.segment()])?;
        self.client.post(url, draft).await
    }

    async fn update(&self, record: &Record<T>) -> Result<Record<T>, ApiError> {
        let url = self.client.url(&[T::KIND.segment(), &record.id])?;
        self.client.patch(url, record).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.client.url(&[T::KIND.segment(), id])?;
        self.client.delete(url).await
    }
}
