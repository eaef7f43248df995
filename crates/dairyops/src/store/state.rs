//! Resource store state and its reducers.
//!
//! Mutations here only ever run after the server has confirmed an operation;
//! pending transitions touch nothing but the loading flags and the error slot.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{InsertPosition, Record, ResourceKind};

/// A store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Fetch,
    FetchOne,
    Create,
    Update,
    Delete,
}

impl Operation {
    const COUNT: usize = 5;

    fn index(&self) -> usize {
        match self {
            Operation::Fetch => 0,
            Operation::FetchOne => 1,
            Operation::Create => 2,
            Operation::Update => 3,
            Operation::Delete => 4,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Operation::Fetch | Operation::FetchOne => "fetch",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Message shown when the failure carries nothing better.
    pub fn fallback_message(&self, kind: ResourceKind) -> String {
        format!("Failed to {} {}", self.verb(), kind.plural())
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::FetchOne => write!(f, "fetch one"),
            other => write!(f, "{}", other.verb()),
        }
    }
}

/// Independent loading flags, one per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationLoading {
    pub fetch: bool,
    pub fetch_one: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl OperationLoading {
    pub fn get(&self, operation: Operation) -> bool {
        match operation {
            Operation::Fetch => self.fetch,
            Operation::FetchOne => self.fetch_one,
            Operation::Create => self.create,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }

    fn set(&mut self, operation: Operation, value: bool) {
        let flag = match operation {
            Operation::Fetch => &mut self.fetch,
            Operation::FetchOne => &mut self.fetch_one,
            Operation::Create => &mut self.create,
            Operation::Update => &mut self.update,
            Operation::Delete => &mut self.delete,
        };
        *flag = value;
    }

    pub fn any(&self) -> bool {
        self.fetch || self.fetch_one || self.create || self.update || self.delete
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceState<T> {
    pub items: Vec<Record<T>>,
    pub selected: Option<Record<T>>,
    /// Mirrors the bulk fetch flag.
    pub loading: bool,
    pub operation_loading: OperationLoading,
    pub error: Option<String>,
    pub last_fetched: Option<DateTime<Utc>>,
    pub is_initialized: bool,
    /// Operations started but not yet finished, per operation. A flag only
    /// drops once its count reaches zero.
    #[serde(skip)]
    in_flight: [usize; Operation::COUNT],
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            loading: false,
            operation_loading: OperationLoading::default(),
            error: None,
            last_fetched: None,
            is_initialized: false,
            in_flight: [0; Operation::COUNT],
        }
    }
}

impl<T: Clone> ResourceState<T> {
    /// True when an unfiltered list fetch can be served from `items`.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        if !self.is_initialized {
            return false;
        }
        let Some(last) = self.last_fetched else {
            return false;
        };
        match chrono::Duration::from_std(window) {
            Ok(window) => now.signed_duration_since(last) < window,
            Err(_) => true,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Record<T>> {
        self.items.iter().find(|item| item.id == id)
    }

    pub(crate) fn begin(&mut self, operation: Operation) {
        self.in_flight[operation.index()] += 1;
        self.sync_flag(operation);
        self.error = None;
    }

    pub(crate) fn finish(&mut self, operation: Operation) {
        let count = &mut self.in_flight[operation.index()];
        *count = count.saturating_sub(1);
        self.sync_flag(operation);
    }

    fn sync_flag(&mut self, operation: Operation) {
        let active = self.in_flight[operation.index()] > 0;
        self.operation_loading.set(operation, active);
        if operation == Operation::Fetch {
            self.loading = active;
        }
    }

    pub(crate) fn fail(&mut self, operation: Operation, message: String) {
        self.finish(operation);
        self.error = Some(message);
    }

    /// Replaces the list with the server's answer. Filtered answers do not count as a
    /// fresh full list.
    pub(crate) fn replace_items(
        &mut self,
        items: Vec<Record<T>>,
        fetched_at: DateTime<Utc>,
        filtered: bool,
    ) {
        self.items = items;
        self.is_initialized = true;
        self.last_fetched = if filtered { None } else { Some(fetched_at) };
    }

    /// Adds a created record, dropping any stale copy with the same id first.
    pub(crate) fn insert(&mut self, record: Record<T>, position: InsertPosition) {
        self.items.retain(|item| item.id != record.id);
        match position {
            InsertPosition::Prepend => self.items.insert(0, record),
            InsertPosition::Append => self.items.push(record),
        }
    }

    pub(crate) fn replace(&mut self, record: &Record<T>) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == record.id) {
            *item = record.clone();
        }
        if self
            .selected
            .as_ref()
            .is_some_and(|selected| selected.id == record.id)
        {
            self.selected = Some(record.clone());
        }
    }

    pub(crate) fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
        if self.selected.as_ref().is_some_and(|selected| selected.id == id) {
            self.selected = None;
        }
    }

    pub(crate) fn invalidate(&mut self) {
        self.last_fetched = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> Record<String> {
        Record::new(id, name.to_string())
    }

    fn state_with(ids: &[&str]) -> ResourceState<String> {
        let mut state = ResourceState::default();
        state.replace_items(
            ids.iter().map(|id| record(id, id)).collect(),
            Utc::now(),
            false,
        );
        state
    }

    #[test]
    fn test_begin_clears_error_and_sets_flag() {
        let mut state: ResourceState<String> = ResourceState::default();
        state.error = Some("old".to_string());

        state.begin(Operation::Fetch);
        assert!(state.loading);
        assert!(state.operation_loading.fetch);
        assert!(state.error.is_none());

        state.fail(Operation::Fetch, "boom".to_string());
        assert!(!state.loading);
        assert!(!state.operation_loading.any());
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_flag_stays_up_while_another_operation_runs() {
        let mut state: ResourceState<String> = ResourceState::default();
        state.begin(Operation::Fetch);
        state.begin(Operation::Fetch);

        state.finish(Operation::Fetch);
        assert!(state.loading);
        assert!(state.operation_loading.fetch);

        state.fail(Operation::Fetch, "boom".to_string());
        assert!(!state.loading);
        assert!(!state.operation_loading.fetch);

        state.finish(Operation::Fetch);
        assert!(!state.loading);
    }

    #[test]
    fn test_fetch_one_flag_is_independent() {
        let mut state: ResourceState<String> = ResourceState::default();
        state.begin(Operation::FetchOne);
        assert!(state.operation_loading.fetch_one);
        assert!(!state.loading);
        assert!(!state.operation_loading.fetch);
    }

    #[test]
    fn test_freshness_window() {
        let state = state_with(&["a"]);
        let last = state.last_fetched.unwrap();

        assert!(state.is_fresh(last + chrono::Duration::seconds(4), Duration::from_secs(5)));
        assert!(!state.is_fresh(last + chrono::Duration::seconds(5), Duration::from_secs(5)));
        assert!(!ResourceState::<String>::default().is_fresh(last, Duration::from_secs(5)));
    }

    #[test]
    fn test_filtered_replace_is_not_fresh() {
        let mut state = state_with(&["a"]);
        state.replace_items(vec![record("b", "b")], Utc::now(), true);
        assert!(state.is_initialized);
        assert!(state.last_fetched.is_none());
        assert!(!state.is_fresh(Utc::now(), Duration::from_secs(5)));
    }

    #[test]
    fn test_insert_positions() {
        let mut state = state_with(&["a", "b"]);
        state.insert(record("c", "c"), InsertPosition::Prepend);
        state.insert(record("d", "d"), InsertPosition::Append);
        let ids: Vec<_> = state.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_insert_never_duplicates() {
        let mut state = state_with(&["a", "b"]);
        state.insert(record("b", "fresh"), InsertPosition::Prepend);
        assert_eq!(state.items.iter().filter(|r| r.id == "b").count(), 1);
        assert_eq!(state.items[0].spec, "fresh");
    }

    #[test]
    fn test_replace_updates_item_and_selection() {
        let mut state = state_with(&["a", "b"]);
        state.selected = Some(record("b", "b"));

        state.replace(&record("b", "renamed"));
        assert_eq!(state.find("b").unwrap().spec, "renamed");
        assert_eq!(state.selected.as_ref().unwrap().spec, "renamed");

        state.replace(&record("a", "also renamed"));
        assert_eq!(state.selected.as_ref().unwrap().id, "b");
    }

    #[test]
    fn test_remove_clears_matching_selection() {
        let mut state = state_with(&["a", "b"]);
        state.selected = Some(record("a", "a"));

        state.remove("b");
        assert!(state.selected.is_some());

        state.remove("a");
        assert!(state.items.is_empty());
        assert!(state.selected.is_none());
    }
}
