//! REST client for the retail backend.
//!
//! One [`ApiClient`] wraps a cookie-enabled `reqwest::Client`; the backend
//! sets a JWT `token` cookie on login and every later call carries it. The
//! client is cheap to clone and is moved into spawned tasks by the UI.
//!
//! Endpoint wrappers live in one submodule per resource.

mod auth;
mod coupon;
mod employee;
mod kassa;
mod order;
mod product;
mod role;
mod stock;
mod vacation;

use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url, cookie::Jar};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;

/// Typed client for `<base_url>/<resource>/...` endpoints.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client with its own cookie jar.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_root().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the API root.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// URL built from path segments; each segment is percent-encoded.
    ///
    /// Used for paths that embed user input such as coupon names or EANs.
    pub fn endpoint_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| AppError::config(format!("Invalid server URL '{}': {e}", self.base_url)))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| AppError::config(format!("Server URL cannot have a path: {}", self.base_url)))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("{method} {path}");
        self.client.request(method, self.endpoint(path))
    }

    fn request_url(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!("{method} {}", url.path());
        self.client.request(method, url)
    }

    /// Send and turn non-success statuses into errors.
    async fn execute(&self, builder: RequestBuilder, path: &str) -> Result<Response> {
        let response = builder.send().await.inspect_err(|e| {
            tracing::warn!("Request to {path} failed: {e}");
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = error_for_status(status, &body);
        tracing::warn!("{path} answered {status}: {err}");
        Err(err)
    }

    /// GET a JSON body; 204 is treated as an error by callers that need data.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_optional(path)
            .await?
            .ok_or_else(|| AppError::not_found(path.to_string()))
    }

    /// GET a JSON body, `None` on 204 No Content.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let response = self.execute(self.request(Method::GET, path), path).await?;
        decode_optional(response).await
    }

    /// GET a JSON body from dynamic path segments, `None` on 204.
    async fn get_optional_at<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Option<T>> {
        let url = self.endpoint_url(segments)?;
        let path = url.path().to_string();
        let response = self.execute(self.request_url(Method::GET, url), &path).await?;
        decode_optional(response).await
    }

    /// GET a JSON list, empty on 204 No Content.
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        Ok(self.get_optional(path).await?.unwrap_or_default())
    }

    /// GET with query parameters, `None` on 204.
    async fn get_optional_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path).query(query);
        let response = self.execute(builder, path).await?;
        decode_optional(response).await
    }

    /// Send a JSON body and return the plain-text response.
    ///
    /// Write endpoints answer with status messages ("Product updated
    /// successfully") or IDs rather than JSON.
    async fn send_json<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> Result<String> {
        let builder = self.request(method, path).json(body);
        let response = self.execute(builder, path).await?;
        Ok(response.text().await?)
    }

    /// Send a request without body and return the plain-text response.
    async fn send_empty(&self, method: Method, path: &str) -> Result<String> {
        let response = self.execute(self.request(method, path), path).await?;
        Ok(response.text().await?)
    }

    /// Send a request without body to dynamic path segments.
    async fn send_empty_at(&self, method: Method, segments: &[&str]) -> Result<String> {
        let url = self.endpoint_url(segments)?;
        let path = url.path().to_string();
        let response = self.execute(self.request_url(method, url), &path).await?;
        Ok(response.text().await?)
    }

    /// Check that the backend answers at all.
    ///
    /// Any HTTP response (even 401) counts as reachable; only transport
    /// errors fail.
    pub async fn test_connection(&self) -> Result<StatusCode> {
        let response = self
            .request(Method::POST, "auth/cookie-validation")
            .send()
            .await?;
        Ok(response.status())
    }
}

async fn decode_optional<T: DeserializeOwned>(response: Response) -> Result<Option<T>> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Map a non-success status to an error.
pub(crate) fn error_for_status(status: StatusCode, body: &str) -> AppError {
    let message = extract_message(body);
    match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized,
        StatusCode::FORBIDDEN => AppError::Forbidden(if message.is_empty() {
            "Keine Berechtigung".to_string()
        } else {
            message
        }),
        _ => AppError::Api { status, message },
    }
}

/// Pull a readable message out of an error body.
///
/// The backend uses `{"success":false,"error":"..."}`, `{"message":"..."}`
/// or plain text depending on the controller.
pub(crate) fn extract_message(body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["error", "message"] {
            if let Some(serde_json::Value::String(msg)) = map.get(key) {
                return msg.clone();
            }
        }
    }
    trimmed.to_string()
}

/// ISO-8601 timestamp as expected by `@DateTimeFormat(iso = DATE_TIME)`.
pub(crate) fn iso_query(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
