//! API types for the SnapAPI SDK.
//!
//! Every options struct carries an `extra` map that is flattened into the
//! request body, so fields the service adds later can be sent without an SDK
//! release.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// How the service should deliver a rendered artifact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Raw file bytes.
    #[default]
    Binary,
    /// JSON document wrapping the artifact and metadata.
    Json,
    /// JSON document with a base64 encoded artifact.
    Base64,
}

impl ResponseType {
    /// Read the reserved `responseType` key of a request body. Missing or
    /// unrecognized values mean [`ResponseType::Binary`].
    pub fn from_options(options: Option<&Map<String, Value>>) -> Self {
        match options
            .and_then(|o| o.get("responseType"))
            .and_then(Value::as_str)
        {
            Some("json") => ResponseType::Json,
            Some("base64") => ResponseType::Base64,
            _ => ResponseType::Binary,
        }
    }

    /// Whether the response body is a JSON document.
    pub fn is_json(self) -> bool {
        !matches!(self, ResponseType::Binary)
    }
}

/// Result of a render operation (screenshot, PDF, video).
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// The rendered file itself.
    Binary(Vec<u8>),
    /// Parsed JSON, for `responseType` `json` or `base64`.
    Json(Value),
}

impl Output {
    /// Raw bytes, if this is a binary output.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Output::Binary(bytes) => Some(bytes.as_slice()),
            Output::Json(_) => None,
        }
    }

    /// Parsed JSON, if this is a JSON output.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Output::Binary(_) => None,
            Output::Json(value) => Some(value),
        }
    }

    /// Consume into raw bytes; JSON outputs are re-serialized.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Output::Binary(bytes) => bytes,
            Output::Json(value) => value.to_string().into_bytes(),
        }
    }
}

/// Image format for screenshots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
    Avif,
}

/// Container format for videos.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    Mp4,
    Webm,
    Gif,
}

/// What to extract from a page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtractFormat {
    Html,
    Text,
    Markdown,
    Article,
    Links,
    Images,
    Metadata,
    Structured,
}

/// Cookie set before the page loads.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Thumbnail generated next to the full screenshot.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Thumbnail {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Options for `screenshot` and `screenshot_async`.
///
/// One of `url`, `html` or `markdown` must be set.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotOptions {
    /// Page to capture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Raw HTML to render instead of a URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Markdown to render instead of a URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Device preset name, e.g. `iphone-15-pro`. See `get_devices`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_page: Option<bool>,
    /// JPEG/WebP quality, 1-100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    /// Device scale factor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Milliseconds to wait after load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    /// Server-side navigation timeout in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<bool>,
    /// Capture only the element matching this CSS selector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_selector: Option<String>,
    /// Script run before capture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javascript: Option<String>,
    /// Stylesheet injected before capture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_ads: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_trackers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_cookie_banners: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_chat_widgets: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_cookie_banners: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Vec<Cookie>>,
    /// Extra request headers sent by the browser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_metadata: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,
    /// Additional fields sent verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Page layout for PDF rendering.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PdfPageOptions {
    /// Paper size, e.g. `a4` or `letter`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landscape: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_background: Option<bool>,
    /// CSS length, e.g. `20mm`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

/// Options for `pdf`. One of `url` or `html` must be set.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PdfOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_options: Option<PdfPageOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,
    /// Additional fields sent verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options for `video`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VideoOptions {
    /// Page to record. Required.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<VideoFormat>,
    /// Recording length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    /// Scroll through the page while recording.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrolling: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_ads: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,
    /// Additional fields sent verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options for `batch`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchOptions {
    /// Pages to capture. Must not be empty.
    pub urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_page: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_ads: Option<bool>,
    /// Called by the service when the batch finishes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Additional fields sent verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options for `extract`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOptions {
    /// Page to extract from. Required.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ExtractFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_selector: Option<String>,
    /// Truncate extracted text to this many characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Additional fields sent verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options for `analyze`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOptions {
    /// Page to analyze. Required.
    pub url: String,
    /// Question or instruction for the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Additional fields sent verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A batch or async screenshot job, as returned on submission and by the
/// status endpoints.
///
/// Wraps the response JSON as sent; any valid JSON is accepted and the
/// accessors read what they can.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Job {
    raw: Value,
}

impl Job {
    /// The job identifier under `jobId` or `id`, string or number.
    pub fn job_id(&self) -> Option<String> {
        ["jobId", "id"]
            .iter()
            .filter_map(|key| self.raw.get(*key))
            .find_map(|id| match id {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }

    /// `pending`, `processing`, `completed` or `failed`.
    pub fn status(&self) -> Option<&str> {
        self.raw.get("status").and_then(Value::as_str)
    }

    pub fn is_completed(&self) -> bool {
        self.status() == Some("completed")
    }

    pub fn is_failed(&self) -> bool {
        self.status() == Some("failed")
    }

    /// Terminal = won't change anymore (completed or failed).
    pub fn is_terminal(&self) -> bool {
        self.is_completed() || self.is_failed()
    }

    /// Any field of the response (results, progress, timestamps).
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// The full response JSON.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_value(self) -> Value {
        self.raw
    }
}

/// Usage for the current billing period.
///
/// Counters are read as numbers of any kind; a negative `limit` is how the
/// service reports an unlimited plan.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Usage {
    raw: Value,
}

impl Usage {
    pub fn used(&self) -> Option<f64> {
        self.raw.get("used").and_then(Value::as_f64)
    }

    pub fn limit(&self) -> Option<f64> {
        self.raw.get("limit").and_then(Value::as_f64)
    }

    pub fn remaining(&self) -> Option<f64> {
        self.raw.get("remaining").and_then(Value::as_f64)
    }

    /// When the counter resets (ISO 8601).
    pub fn reset_at(&self) -> Option<&str> {
        self.raw.get("resetAt").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// The full response JSON.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_value(self) -> Value {
        self.raw
    }
}
