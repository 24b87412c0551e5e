//! Static routing table: which verb, path and fixed options each logical
//! operation uses, what input it requires and how its response is read.

use crate::error::{Error, Result};
use crate::transport::Verb;
use serde_json::{Map, Value};
use std::fmt;

/// A client-facing API action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Ping,
    Screenshot,
    ScreenshotAsync,
    ScreenshotStatus,
    Pdf,
    Video,
    Batch,
    BatchStatus,
    Extract,
    Analyze,
    Usage,
    Devices,
    Capabilities,
}

/// How a successful response body is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Rendered artifact: raw bytes unless `responseType` asks for JSON.
    Artifact,
    /// Always parsed as JSON.
    Json,
}

/// Pre-flight input check, evaluated against the serialized options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Requirement {
    None,
    /// At least one of these keys holds a non-empty value.
    AnyOf(&'static [&'static str], &'static str),
    /// The key holds a non-empty array.
    NonEmptyArray(&'static str, &'static str),
    /// The path template needs a job id.
    JobId,
}

/// Literal value forced into the options before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fixed {
    Bool(bool),
}

impl Fixed {
    fn to_value(self) -> Value {
        match self {
            Fixed::Bool(b) => Value::Bool(b),
        }
    }
}

/// One row of the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub operation: Operation,
    pub verb: Verb,
    /// Path relative to the base URL; `{id}` is replaced by the job id.
    pub path: &'static str,
    pub response: ResponseShape,
    pub(crate) requirement: Requirement,
    pub(crate) fixed: &'static [(&'static str, Fixed)],
}

const SCREENSHOT_SOURCES: &[&str] = &["url", "html", "markdown"];
const PDF_SOURCES: &[&str] = &["url", "html"];
const URL_ONLY: &[&str] = &["url"];

const URL_REQUIRED: &str = "URL is required";

// Indexed by `Operation as usize`; keep in declaration order.
static ROUTES: [Route; 13] = [
    Route {
        operation: Operation::Ping,
        verb: Verb::Get,
        path: "/v1/ping",
        response: ResponseShape::Json,
        requirement: Requirement::None,
        fixed: &[],
    },
    Route {
        operation: Operation::Screenshot,
        verb: Verb::Post,
        path: "/v1/screenshot",
        response: ResponseShape::Artifact,
        requirement: Requirement::AnyOf(
            SCREENSHOT_SOURCES,
            "One of url, html, or markdown is required",
        ),
        fixed: &[],
    },
    Route {
        operation: Operation::ScreenshotAsync,
        verb: Verb::Post,
        path: "/v1/screenshot",
        response: ResponseShape::Json,
        requirement: Requirement::AnyOf(
            SCREENSHOT_SOURCES,
            "One of url, html, or markdown is required",
        ),
        fixed: &[("async", Fixed::Bool(true))],
    },
    Route {
        operation: Operation::ScreenshotStatus,
        verb: Verb::Get,
        path: "/v1/screenshot/jobs/{id}",
        response: ResponseShape::Json,
        requirement: Requirement::JobId,
        fixed: &[],
    },
    Route {
        operation: Operation::Pdf,
        verb: Verb::Post,
        path: "/v1/pdf",
        response: ResponseShape::Artifact,
        requirement: Requirement::AnyOf(PDF_SOURCES, "One of url or html is required"),
        fixed: &[],
    },
    Route {
        operation: Operation::Video,
        verb: Verb::Post,
        path: "/v1/video",
        response: ResponseShape::Artifact,
        requirement: Requirement::AnyOf(URL_ONLY, URL_REQUIRED),
        fixed: &[],
    },
    Route {
        operation: Operation::Batch,
        verb: Verb::Post,
        path: "/v1/screenshot/batch",
        response: ResponseShape::Json,
        requirement: Requirement::NonEmptyArray("urls", "URLs array is required"),
        fixed: &[],
    },
    Route {
        operation: Operation::BatchStatus,
        verb: Verb::Get,
        path: "/v1/screenshot/batch/{id}",
        response: ResponseShape::Json,
        requirement: Requirement::JobId,
        fixed: &[],
    },
    Route {
        operation: Operation::Extract,
        verb: Verb::Post,
        path: "/v1/extract",
        response: ResponseShape::Json,
        requirement: Requirement::AnyOf(URL_ONLY, URL_REQUIRED),
        fixed: &[],
    },
    Route {
        operation: Operation::Analyze,
        verb: Verb::Post,
        path: "/v1/analyze",
        response: ResponseShape::Json,
        requirement: Requirement::AnyOf(URL_ONLY, URL_REQUIRED),
        fixed: &[],
    },
    Route {
        operation: Operation::Usage,
        verb: Verb::Get,
        path: "/v1/usage",
        response: ResponseShape::Json,
        requirement: Requirement::None,
        fixed: &[],
    },
    Route {
        operation: Operation::Devices,
        verb: Verb::Get,
        path: "/v1/devices",
        response: ResponseShape::Json,
        requirement: Requirement::None,
        fixed: &[],
    },
    Route {
        operation: Operation::Capabilities,
        verb: Verb::Get,
        path: "/v1/capabilities",
        response: ResponseShape::Json,
        requirement: Requirement::None,
        fixed: &[],
    },
];

impl Operation {
    /// Every operation, in table order.
    pub const ALL: [Operation; 13] = [
        Operation::Ping,
        Operation::Screenshot,
        Operation::ScreenshotAsync,
        Operation::ScreenshotStatus,
        Operation::Pdf,
        Operation::Video,
        Operation::Batch,
        Operation::BatchStatus,
        Operation::Extract,
        Operation::Analyze,
        Operation::Usage,
        Operation::Devices,
        Operation::Capabilities,
    ];

    /// The routing table row for this operation.
    pub fn route(self) -> &'static Route {
        &ROUTES[self as usize]
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Ping => "ping",
            Operation::Screenshot => "screenshot",
            Operation::ScreenshotAsync => "screenshot_async",
            Operation::ScreenshotStatus => "screenshot_status",
            Operation::Pdf => "pdf",
            Operation::Video => "video",
            Operation::Batch => "batch",
            Operation::BatchStatus => "batch_status",
            Operation::Extract => "extract",
            Operation::Analyze => "analyze",
            Operation::Usage => "usage",
            Operation::Devices => "devices",
            Operation::Capabilities => "capabilities",
        };
        f.write_str(name)
    }
}

impl Route {
    /// Force the fixed options of this route into `options`.
    pub(crate) fn apply_fixed(&self, options: &mut Map<String, Value>) {
        for (key, value) in self.fixed {
            options.insert((*key).to_string(), value.to_value());
        }
    }

    /// Check the route's input requirement. Performs no I/O.
    pub(crate) fn check(
        &self,
        options: Option<&Map<String, Value>>,
        job_id: Option<&str>,
    ) -> Result<()> {
        match self.requirement {
            Requirement::None => Ok(()),
            Requirement::AnyOf(keys, message) => {
                let present = options
                    .map(|o| keys.iter().any(|k| o.get(*k).is_some_and(is_filled)))
                    .unwrap_or(false);
                if present {
                    Ok(())
                } else {
                    Err(Error::validation(message))
                }
            }
            Requirement::NonEmptyArray(key, message) => {
                match options.and_then(|o| o.get(key)) {
                    Some(Value::Array(items)) if !items.is_empty() => Ok(()),
                    _ => Err(Error::validation(message)),
                }
            }
            Requirement::JobId => match job_id {
                Some(id) if is_path_segment(id) => Ok(()),
                Some(id) if !id.is_empty() => {
                    Err(Error::validation(format!("Invalid job ID: {}", id)))
                }
                _ => Err(Error::validation("Job ID is required")),
            },
        }
    }

    /// Path with the job id substituted into the template.
    pub(crate) fn resolve_path(&self, job_id: Option<&str>) -> String {
        match job_id {
            Some(id) => self.path.replace("{id}", id),
            None => self.path.to_string(),
        }
    }
}

/// A single path segment that resolves to itself.
fn is_path_segment(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '?', '#'])
}

fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_table_order_matches_enum() {
        for (i, op) in Operation::ALL.iter().enumerate() {
            assert_eq!(*op as usize, i);
            assert_eq!(op.route().operation, *op);
        }
    }

    #[test]
    fn test_routes() {
        let cases = [
            (Operation::Screenshot, Verb::Post, "/v1/screenshot"),
            (Operation::Pdf, Verb::Post, "/v1/pdf"),
            (Operation::Video, Verb::Post, "/v1/video"),
            (Operation::Batch, Verb::Post, "/v1/screenshot/batch"),
            (Operation::BatchStatus, Verb::Get, "/v1/screenshot/batch/{id}"),
            (Operation::Extract, Verb::Post, "/v1/extract"),
            (Operation::Analyze, Verb::Post, "/v1/analyze"),
            (Operation::Usage, Verb::Get, "/v1/usage"),
            (Operation::Devices, Verb::Get, "/v1/devices"),
            (Operation::Capabilities, Verb::Get, "/v1/capabilities"),
        ];
        for (op, verb, path) in cases {
            assert_eq!(op.route().verb, verb, "{}", op);
            assert_eq!(op.route().path, path, "{}", op);
        }
    }

    #[test]
    fn test_only_render_operations_return_artifacts() {
        let artifacts: Vec<_> = Operation::ALL
            .iter()
            .filter(|op| op.route().response == ResponseShape::Artifact)
            .copied()
            .collect();
        assert_eq!(
            artifacts,
            vec![Operation::Screenshot, Operation::Pdf, Operation::Video]
        );
    }

    #[test]
    fn test_screenshot_requires_a_source() {
        let route = Operation::Screenshot.route();
        assert!(route.check(None, None).is_err());
        assert!(route.check(Some(&options(json!({"url": ""}))), None).is_err());
        assert!(route
            .check(Some(&options(json!({"format": "png"}))), None)
            .is_err());
        assert!(route
            .check(Some(&options(json!({"markdown": "# hi"}))), None)
            .is_ok());
    }

    #[test]
    fn test_pdf_ignores_markdown() {
        let route = Operation::Pdf.route();
        let err = route
            .check(Some(&options(json!({"markdown": "# hi"}))), None)
            .unwrap_err();
        assert_eq!(err.message(), "One of url or html is required");
        assert!(route
            .check(Some(&options(json!({"html": "<p>x</p>"}))), None)
            .is_ok());
    }

    #[test]
    fn test_batch_requires_url_array() {
        let route = Operation::Batch.route();
        for bad in [json!({}), json!({"urls": []}), json!({"urls": "https://a.test"})] {
            let err = route.check(Some(&options(bad)), None).unwrap_err();
            assert_eq!(err.message(), "URLs array is required");
        }
        assert!(route
            .check(Some(&options(json!({"urls": ["https://a.test"]}))), None)
            .is_ok());
    }

    #[test]
    fn test_job_id_checks() {
        let route = Operation::BatchStatus.route();
        assert!(route.check(None, None).is_err());
        assert!(route.check(None, Some("")).is_err());
        assert!(route.check(None, Some("a/b")).is_err());
        assert!(route.check(None, Some(".")).is_err());
        assert!(route.check(None, Some("..")).is_err());
        assert!(route.check(None, Some("v1..2")).is_ok());
        assert!(route.check(None, Some("job_123")).is_ok());
        assert_eq!(
            route.resolve_path(Some("job_123")),
            "/v1/screenshot/batch/job_123"
        );
    }

    #[test]
    fn test_async_sets_flag() {
        let mut opts = options(json!({"url": "https://a.test", "async": false}));
        Operation::ScreenshotAsync.route().apply_fixed(&mut opts);
        assert_eq!(opts.get("async"), Some(&json!(true)));

        let mut opts = options(json!({"url": "https://a.test"}));
        Operation::Screenshot.route().apply_fixed(&mut opts);
        assert!(!opts.contains_key("async"));
    }
}
