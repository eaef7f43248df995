//! Signature capture normalization.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::error::WizardError;

/// Turns a captured signature into plain base64.
///
/// Accepts a `data:image/...;base64,` URL or bare base64. The payload must
/// decode to at least one byte.
pub fn normalize_signature(input: &str) -> Result<String, WizardError> {
    let input = input.trim();
    let payload = match input.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest.split_once(',').ok_or_else(|| {
                WizardError::InvalidSignature("data URL has no payload".to_string())
            })?;
            if !header.ends_with(";base64") {
                return Err(WizardError::InvalidSignature(format!(
                    "data URL is not base64 encoded ({})",
                    header
                )));
            }
            data
        }
        None => input,
    };

    let decoded = STANDARD
        .decode(payload)
        .map_err(|e| WizardError::InvalidSignature(e.to_string()))?;
    if decoded.is_empty() {
        return Err(WizardError::InvalidSignature("signature is empty".to_string()));
    }

    Ok(payload.to_string())
}
