//! REST backend access.
//!
//! - `client`: JSON client with fixed headers and envelope unwrapping
//! - `resource`: the `ResourceApi` capability and its HTTP implementation
//! - `envelope`: `{ statusCode, message, data }` / bare body adapter
//! - `error`: `ApiError` and the user-message chain

pub mod client;
pub mod envelope;
pub mod error;
pub mod resource;

pub use client::ApiClient;
pub use envelope::Envelope;
pub use error::ApiError;
pub use resource::{ListFilters, ResourceApi, RestResource};
