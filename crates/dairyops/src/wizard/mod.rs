//! Multi-step data-entry forms.
//!
//! A [`WizardForm`] walks a [`WizardDraft`] through its steps, validating each
//! before moving on, and submits once from the final step.

pub mod error;
pub mod form;
pub mod reference;
pub mod signature;
pub mod validation;

pub use error::WizardError;
pub use form::{FormMode, WizardDraft, WizardForm};
pub use reference::{
    CachedProvider, FallbackProvider, ReferenceDataProvider, ReferenceOption, ReferenceSet,
    Referenceable, StoreReferenceProvider,
};
pub use signature::normalize_signature;
pub use validation::{parse_numeric_input, FieldErrors, FieldSchema, Rule, StepSchema};
