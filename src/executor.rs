//! Single round-trip request execution and outcome classification.

use crate::config::ClientConfig;
use crate::error::{ApiError, Error, Result};
use crate::transport::{HttpRequest, Transport, Verb};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::time::timeout;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Sends one request per call and turns the outcome into bytes or an
/// [`Error`].
///
/// Holds no per-call state, so clones can be used from any number of tasks
/// at once.
#[derive(Clone)]
pub struct RequestExecutor {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    headers: HeaderMap,
}

impl RequestExecutor {
    /// Create an executor. Fails if the API key or user agent cannot be used
    /// as a header value.
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        user_agent: &str,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(config.api_key())
            .map_err(|_| Error::validation("API key contains invalid header characters"))?;
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|_| Error::validation("User agent contains invalid header characters"))?;
        headers.insert(USER_AGENT, user_agent);

        Ok(Self {
            config: Arc::new(config),
            transport,
            headers,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform one request against `base_url + path`.
    ///
    /// A body is only sent for `POST`. Responses with status >= 400 become
    /// [`Error::Api`]; failures without any response (including the timeout
    /// expiring) become [`Error::Connection`]. Success bodies are returned
    /// untouched.
    pub async fn execute(&self, verb: Verb, path: &str, body: Option<&Value>) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.config.base_url(), path);

        let body = match (verb, body) {
            (Verb::Post, Some(b)) => Some(serde_json::to_vec(b)?),
            _ => None,
        };

        let request = HttpRequest {
            verb,
            url,
            headers: self.headers.clone(),
            body,
        };

        let response = match timeout(self.config.timeout(), self.transport.send(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(Error::connection(e.message())),
            Err(_) => {
                return Err(Error::connection(format!(
                    "request timed out after {:?}",
                    self.config.timeout()
                )))
            }
        };

        if response.status >= 400 {
            return Err(ApiError::from_response(response.status, &response.body).into());
        }

        Ok(response.body)
    }
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
