//! Shared test utilities for dairyops integration tests.
//!
//! This module provides:
//! - `TestBackend`: a wiremock server with an `AppContext` pointed at it
//! - Builders for backend JSON rows and filled-in form drafts

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{wrapped, TestBackend};
