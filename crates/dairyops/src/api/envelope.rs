//! Response envelope normalization.
//!
//! Most endpoints wrap their payload as `{ statusCode, message, data }`; a few older
//! ones return the bare body. Both shapes are accepted here so nothing above the
//! client ever branches on the shape.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wrapped<T> {
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped(Wrapped<T>),
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> T {
        match self {
            Envelope::Wrapped(wrapped) => wrapped.data,
            Envelope::Bare(data) => data,
        }
    }

    /// Server message, only present on wrapped responses.
    pub fn message(&self) -> Option<&str> {
        match self {
            Envelope::Wrapped(wrapped) if !wrapped.message.is_empty() => Some(&wrapped.message),
            _ => None,
        }
    }
}
