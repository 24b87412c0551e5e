//! Main SnapAPI client implementation.

use crate::config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::{Error, Result};
use crate::executor::RequestExecutor;
use crate::operation::{Operation, ResponseShape};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::*;
use crate::version::build_user_agent;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable read by [`ClientBuilder::from_env`] for the API key.
pub const API_KEY_ENV: &str = "SNAPAPI_KEY";
/// Environment variable read by [`ClientBuilder::from_env`] for the base URL.
pub const BASE_URL_ENV: &str = "SNAPAPI_BASE_URL";

/// Builder for constructing a [`Client`].
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    user_agent_suffix: Option<String>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Create a new client builder with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent_suffix: None,
            transport: None,
        }
    }

    /// Create a builder from `SNAPAPI_KEY` and, if set, `SNAPAPI_BASE_URL`.
    ///
    /// A missing key surfaces as a validation error from [`build`](Self::build).
    pub fn from_env() -> Self {
        let builder = Self::new(std::env::var(API_KEY_ENV).unwrap_or_default());
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.is_empty() => builder.base_url(url),
            _ => builder,
        }
    }

    /// Set the API base URL. Trailing slashes are ignored.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the timeout for a whole request, connect through body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent suffix.
    pub fn user_agent_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent_suffix = Some(suffix.into());
        self
    }

    /// Send requests through a custom transport instead of `reqwest`.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client. Performs no network activity.
    pub fn build(self) -> Result<Client> {
        let config = ClientConfig::new(self.api_key, &self.base_url, self.timeout)?;

        // Warn about insecure connections
        if !config.base_url().starts_with("https://") {
            warn!(
                base_url = %config.base_url(),
                "API base URL is not using HTTPS. This is insecure."
            );
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                // Redirects are returned as-is; the API key never follows one.
                let http_client = reqwest::Client::builder()
                    .timeout(config.timeout())
                    .redirect(reqwest::redirect::Policy::none())
                    .build()
                    .map_err(|e| Error::Config(e.to_string()))?;
                Arc::new(ReqwestTransport::new(http_client))
            }
        };

        let user_agent = build_user_agent(self.user_agent_suffix.as_deref());
        let executor = RequestExecutor::new(config, transport, &user_agent)?;

        Ok(Client { executor })
    }
}

/// The main SnapAPI SDK client.
///
/// Cheap to clone; clones share the same configuration and transport.
///
/// # Example
///
/// ```rust,no_run
/// use snapapi::{Client, ScreenshotOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), snapapi::Error> {
///     let client = Client::builder("sk_live_xxx").build()?;
///
///     let image = client
///         .screenshot(ScreenshotOptions {
///             url: Some("https://example.com".into()),
///             full_page: Some(true),
///             ..Default::default()
///         })
///         .await?;
///
///     std::fs::write("example.png", image.into_bytes()).unwrap();
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    executor: RequestExecutor,
}

impl Client {
    /// Create a new client builder.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Create a client with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    pub fn config(&self) -> &ClientConfig {
        self.executor.config()
    }

    /// The underlying executor, for endpoints this client has no method for.
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Check that the API is reachable.
    pub async fn ping(&self) -> Result<Value> {
        self.fetch(Operation::Ping, None).await
    }

    // === Screenshots ===

    /// Capture a screenshot of a URL, HTML document or Markdown document.
    ///
    /// Returns the image bytes, or parsed JSON when `response_type` is
    /// `Json` or `Base64`.
    pub async fn screenshot(&self, options: ScreenshotOptions) -> Result<Output> {
        self.render(Operation::Screenshot, &options).await
    }

    /// Render raw HTML to an image.
    pub async fn screenshot_from_html(&self, html: impl Into<String>) -> Result<Output> {
        self.screenshot(ScreenshotOptions {
            html: Some(html.into()),
            ..Default::default()
        })
        .await
    }

    /// Render Markdown to an image.
    pub async fn screenshot_from_markdown(&self, markdown: impl Into<String>) -> Result<Output> {
        self.screenshot(ScreenshotOptions {
            markdown: Some(markdown.into()),
            ..Default::default()
        })
        .await
    }

    /// Capture a URL as seen on a device preset (see [`get_devices`](Self::get_devices)).
    pub async fn screenshot_device(
        &self,
        url: impl Into<String>,
        device: impl Into<String>,
    ) -> Result<Output> {
        self.screenshot(ScreenshotOptions {
            url: Some(url.into()),
            device: Some(device.into()),
            ..Default::default()
        })
        .await
    }

    /// Queue a screenshot and return the job without waiting for it.
    ///
    /// Poll [`get_screenshot_status`](Self::get_screenshot_status) until
    /// [`Job::is_terminal`].
    pub async fn screenshot_async(&self, options: ScreenshotOptions) -> Result<Job> {
        self.submit(Operation::ScreenshotAsync, &options).await
    }

    /// Get the status of an async screenshot job.
    pub async fn get_screenshot_status(&self, job_id: &str) -> Result<Job> {
        self.fetch(Operation::ScreenshotStatus, Some(job_id)).await
    }

    // === Documents and video ===

    /// Render a URL or HTML document to PDF.
    pub async fn pdf(&self, options: PdfOptions) -> Result<Output> {
        self.render(Operation::Pdf, &options).await
    }

    /// Render raw HTML to PDF.
    pub async fn pdf_from_html(&self, html: impl Into<String>) -> Result<Output> {
        self.pdf(PdfOptions {
            html: Some(html.into()),
            ..Default::default()
        })
        .await
    }

    /// Record a video of a page.
    pub async fn video(&self, options: VideoOptions) -> Result<Output> {
        self.render(Operation::Video, &options).await
    }

    // === Batch ===

    /// Submit screenshots of several URLs as one job.
    pub async fn batch(&self, options: BatchOptions) -> Result<Job> {
        self.submit(Operation::Batch, &options).await
    }

    /// Get the status and results of a batch job.
    pub async fn get_batch_status(&self, job_id: &str) -> Result<Job> {
        self.fetch(Operation::BatchStatus, Some(job_id)).await
    }

    // === Content ===

    /// Extract content from a page.
    pub async fn extract(&self, options: ExtractOptions) -> Result<Value> {
        self.submit(Operation::Extract, &options).await
    }

    /// Ask a vision model about a page.
    pub async fn analyze(&self, options: AnalyzeOptions) -> Result<Value> {
        self.submit(Operation::Analyze, &options).await
    }

    // === Account ===

    /// Get usage for the current billing period.
    pub async fn get_usage(&self) -> Result<Usage> {
        self.fetch(Operation::Usage, None).await
    }

    /// List device presets.
    pub async fn get_devices(&self) -> Result<Value> {
        self.fetch(Operation::Devices, None).await
    }

    /// List API capabilities for the current plan.
    pub async fn get_capabilities(&self) -> Result<Value> {
        self.fetch(Operation::Capabilities, None).await
    }

    /// Run any operation from a raw options map.
    ///
    /// The map is sent as-is (plus the operation's fixed options) after the
    /// same input checks the typed methods perform.
    pub async fn call(
        &self,
        operation: Operation,
        options: Option<Map<String, Value>>,
        job_id: Option<&str>,
    ) -> Result<Output> {
        let response_type = ResponseType::from_options(options.as_ref());
        let body = self.dispatch(operation, options, job_id).await?;
        decode_output(operation.route().response, response_type, body)
    }

    // === Internal methods ===

    async fn render<O: Serialize>(&self, operation: Operation, options: &O) -> Result<Output> {
        self.call(operation, Some(to_options(options)?), None).await
    }

    async fn submit<T: DeserializeOwned, O: Serialize>(
        &self,
        operation: Operation,
        options: &O,
    ) -> Result<T> {
        let body = self
            .dispatch(operation, Some(to_options(options)?), None)
            .await?;
        serde_json::from_slice(&body).map_err(Error::Json)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: Operation,
        job_id: Option<&str>,
    ) -> Result<T> {
        let body = self.dispatch(operation, None, job_id).await?;
        serde_json::from_slice(&body).map_err(Error::Json)
    }

    async fn dispatch(
        &self,
        operation: Operation,
        options: Option<Map<String, Value>>,
        job_id: Option<&str>,
    ) -> Result<Vec<u8>> {
        let route = operation.route();

        let options = options.map(|mut o| {
            route.apply_fixed(&mut o);
            o
        });
        route.check(options.as_ref(), job_id)?;

        let path = route.resolve_path(job_id);
        debug!(operation = %operation, verb = %route.verb, path = %path, "Sending request");

        let body = options.map(Value::Object);
        self.executor
            .execute(route.verb, &path, body.as_ref())
            .await
            .inspect_err(|e| {
                debug!(
                    operation = %operation,
                    code = e.code(),
                    status = e.status(),
                    "Request failed"
                )
            })
    }
}

fn to_options<O: Serialize>(options: &O) -> Result<Map<String, Value>> {
    match serde_json::to_value(options)? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::validation("Options must serialize to a JSON object")),
    }
}

fn decode_output(
    shape: ResponseShape,
    response_type: ResponseType,
    body: Vec<u8>,
) -> Result<Output> {
    match shape {
        ResponseShape::Artifact if !response_type.is_json() => Ok(Output::Binary(body)),
        _ => Ok(Output::Json(serde_json::from_slice(&body)?)),
    }
}
