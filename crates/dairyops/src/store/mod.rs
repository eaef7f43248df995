//! Client-side resource stores.
//!
//! - `state`: per-resource state and the reducers that mutate it
//! - `resource_store`: async CRUD over a `ResourceApi` with a soft list cache
//! - `registry`: one store per backend resource
//! - `coordinator`: process log + test report workflow with compensation

pub mod coordinator;
pub mod error;
pub mod registry;
pub mod resource_store;
pub mod state;

pub use coordinator::{BatchRecords, Compensation, CoordinatorError, SteriMilkBatchCoordinator};
pub use error::StoreError;
pub use registry::Stores;
pub use resource_store::ResourceStore;
pub use state::{Operation, OperationLoading, ResourceState};
