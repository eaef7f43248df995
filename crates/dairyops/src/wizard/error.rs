use thiserror::Error;

use super::validation::FieldErrors;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Step {step} has invalid fields: {errors}")]
    Validation { step: usize, errors: FieldErrors },

    #[error("Only the final step can be submitted (on step {current} of {total})")]
    NotFinalStep { current: usize, total: usize },

    #[error("Step {step} does not exist (form has {total} steps)")]
    StepOutOfRange { step: usize, total: usize },

    #[error("Form is not open")]
    Closed,

    #[error("Missing value for {0}")]
    MissingField(&'static str),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Failed to encode form draft: {0}")]
    Draft(#[from] serde_json::Error),

    #[error(transparent)]
    Submit(#[from] StoreError),
}

impl WizardError {
    /// Field messages when this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            WizardError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}
