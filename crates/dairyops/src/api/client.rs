//! Thin JSON client over the REST backend.

use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::envelope::Envelope;
use super::error::ApiError;
use crate::config::ApiSettings;

/// Maximum length of a response body echoed into debug logs.
const MAX_LOGGED_BODY_LENGTH: usize = 500;

fn truncate_for_log(body: &str) -> String {
    if body.len() > MAX_LOGGED_BODY_LENGTH {
        let mut end = MAX_LOGGED_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated)", &body[..end])
    } else {
        body.to_string()
    }
}

/// JSON client bound to one backend base URL.
///
/// Every request carries `Content-Type` and `Accept` set to `application/json`.
/// No cookie store is configured, so no credentials leave the client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", settings.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(settings.base_url.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(settings.connect_timeout())
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let request = self.client.request(Method::GET, url.clone());
        self.send_json(request, url).await
    }

    pub async fn post<B, T>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.request(Method::POST, url.clone()).json(body);
        self.send_json(request, url).await
    }

    pub async fn patch<B, T>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.request(Method::PATCH, url.clone()).json(body);
        self.send_json(request, url).await
    }

    /// Sends a DELETE without a body; whatever the server answers on success is ignored.
    pub async fn delete(&self, url: Url) -> Result<(), ApiError> {
        let request = self.client.request(Method::DELETE, url.clone());
        self.send(request, &url).await.map(|_| ())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: Url,
    ) -> Result<T, ApiError> {
        let body_text = self.send(request, &url).await?;

        match serde_json::from_str::<Envelope<T>>(&body_text) {
            Ok(envelope) => {
                if let Some(message) = envelope.message() {
                    debug!("{} answered: {}", url, message);
                }
                Ok(envelope.into_data())
            }
            Err(e) => {
                warn!("Failed to decode response from {}: {}", url, e);
                debug!("Response body was: {}", truncate_for_log(&body_text));
                Err(ApiError::Decode {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// Sends the request and returns the body text of a 2xx response.
    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<String, ApiError> {
        debug!("Sending request to {}", url);

        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        let body_text = response.text().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            warn!("Request to {} failed with status {}", url, status);
            debug!("Error body was: {}", truncate_for_log(&body_text));
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: serde_json::from_str(&body_text).ok(),
                url: url.to_string(),
            });
        }

        Ok(body_text)
    }
}
