//! Rust SDK for the SnapAPI service.
//!
//! SnapAPI renders web pages to screenshots, PDFs and videos, and extracts
//! or analyzes page content. Each client method maps to one HTTP call.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use snapapi::{Client, ImageFormat, ScreenshotOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), snapapi::Error> {
//!     let client = Client::builder("sk_live_xxx").build()?;
//!
//!     let image = client.screenshot(ScreenshotOptions {
//!         url: Some("https://example.com".into()),
//!         format: Some(ImageFormat::Png),
//!         ..Default::default()
//!     }).await?;
//!
//!     if let Some(bytes) = image.as_bytes() {
//!         println!("{} bytes", bytes.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Every failure is an [`Error`]: validation problems are caught before a
//! request is sent, transport failures surface as [`Error::Connection`] with
//! status 0, and error responses become [`Error::Api`] carrying the server's
//! code, message and details. Nothing is retried.

mod client;
mod config;
mod error;
mod executor;
mod operation;
mod transport;
mod types;
mod version;

pub use client::{Client, ClientBuilder, API_KEY_ENV, BASE_URL_ENV};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{
    ApiError, Error, Result, CONNECTION_ERROR, HTTP_ERROR, UNKNOWN_ERROR, VALIDATION_ERROR,
};
pub use executor::{RequestExecutor, API_KEY_HEADER};
pub use operation::{Operation, ResponseShape, Route};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError, Verb};
pub use types::*;
pub use version::SDK_VERSION;
