use log::debug;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;

use super::error::ApiError;

/// Thin HTTP wrapper bound to one base URL. Every helper issues exactly one
/// request: no retries, no timeouts beyond the transport defaults.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from explicit configuration. Headers from the config
    /// are attached to every request next to `Content-Type: application/json`.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &config.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value);
        }

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|source| ApiError::Transport {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a path such as `/books/3` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let text = self.execute(Method::GET, &url, self.http.get(&url))?;
        serde_json::from_str(&text).map_err(|source| ApiError::Decode { url, source })
    }

    pub(crate) fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let url = self.url(path);
        let text = self.execute(Method::POST, &url, self.http.post(&url).json(body))?;
        decode_body(url, &text)
    }

    pub(crate) fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let url = self.url(path);
        let text = self.execute(Method::PUT, &url, self.http.put(&url).json(body))?;
        decode_body(url, &text)
    }

    pub(crate) fn delete(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path);
        let text = self.execute(Method::DELETE, &url, self.http.delete(&url))?;
        decode_body(url, &text)
    }

    fn execute(&self, method: Method, url: &str, request: RequestBuilder) -> Result<String, ApiError> {
        debug!("{method} {url}");
        let response = request.send().map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        let text = response.text().map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(ApiError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

/// Mutation responses are passed through untyped. An empty body (common for
/// `204 No Content`) becomes `null`.
fn decode_body(url: String, text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|source| ApiError::Decode { url, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_without_doubling_slashes() {
        let config = ClientConfig {
            base_url: "http://localhost:3000/api/".into(),
            ..ClientConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/books"), "http://localhost:3000/api/books");
        assert_eq!(client.url("stores/2/books"), "http://localhost:3000/api/stores/2/books");
    }

    #[test]
    fn rejects_unusable_header_names() {
        let mut config = ClientConfig::default();
        config.headers.insert("bad header".into(), "x".into());
        let err = ApiClient::new(&config).unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader(name) if name == "bad header"));
    }

    #[test]
    fn empty_mutation_body_is_null() {
        assert_eq!(decode_body("u".into(), "  ").unwrap(), Value::Null);
    }
}
