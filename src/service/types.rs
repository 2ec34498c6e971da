//! Request and response types for the PDF generation API.
//!
//! These types are shared between the service functions in
//! [`pdf`](super::pdf) and the HTTP handlers in the integrations module.
//!
//! # JSON Shapes
//!
//! ```text
//! POST /pdf/generate-from-html
//! { "html": "<h1>Hi</h1>", "css": "h1 { color: navy; }" }
//!
//! POST /pdf/generate-from-html-with-options
//! { "html": "<h1>Hi</h1>", "options": { "format": "Letter", "landscape": true } }
//!
//! Error (400 / 500)
//! { "message": "Error generating PDF from HTML", "error": "Failed to generate PDF from HTML: ..." }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RenderError;
use crate::options::RenderOptions;

/// Filename suggested to clients in `Content-Disposition`.
pub const DEFAULT_FILENAME: &str = "generated.pdf";

/// Top-level message for render failures.
pub const RENDER_FAILED_MESSAGE: &str = "Error generating PDF from HTML";

/// Top-level message for bodies that do not parse.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

// ============================================================================
// Request Types
// ============================================================================

/// Body of `POST /pdf/generate-from-html`.
///
/// # Examples
///
/// ```rust
/// use html2pdf_service::service::GenerateFromHtmlRequest;
///
/// let request: GenerateFromHtmlRequest =
///     serde_json::from_str(r#"{"html": "<p>hi</p>"}"#).unwrap();
///
/// assert_eq!(request.html, "<p>hi</p>");
/// assert!(request.css.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateFromHtmlRequest {
    /// HTML fragment placed inside `<body>`. May be empty.
    pub html: String,

    /// Stylesheet placed inside `<head>`.
    #[serde(default)]
    pub css: Option<String>,
}

impl GenerateFromHtmlRequest {
    /// Options this route renders with: the stylesheet and nothing else.
    pub fn options(&self) -> RenderOptions {
        RenderOptions::with_css(self.css.clone())
    }
}

/// Body of `POST /pdf/generate-from-html-with-options`.
///
/// An absent `options` object behaves exactly like an empty one. The object
/// is kept as raw JSON until [`options_or_default`](Self::options_or_default)
/// so that a bad option value fails the render like a bad margin does,
/// instead of failing the whole body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateWithOptionsRequest {
    /// HTML fragment placed inside `<body>`. May be empty.
    pub html: String,

    /// Render options, all fields optional.
    #[serde(default)]
    pub options: Option<Value>,
}

impl GenerateWithOptionsRequest {
    /// Request carrying typed options.
    pub fn new(html: impl Into<String>, options: &RenderOptions) -> Self {
        Self {
            html: html.into(),
            options: serde_json::to_value(options).ok(),
        }
    }

    /// The options to render with, defaulted when absent.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidOptions`] when the object does not
    /// describe valid options, e.g. an unknown paper format.
    pub fn options_or_default(&self) -> Result<RenderOptions, RenderError> {
        match &self.options {
            None | Some(Value::Null) => Ok(RenderOptions::default()),
            Some(raw) => RenderOptions::deserialize(raw)
                .map_err(|e| RenderError::InvalidOptions(e.to_string())),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// A generated PDF ready to be sent to the client.
#[derive(Debug, Clone)]
pub struct PdfResponse {
    /// Raw PDF bytes. Valid output starts with `%PDF-`.
    pub data: Vec<u8>,

    /// Suggested download name.
    pub filename: String,
}

impl PdfResponse {
    /// Wrap rendered bytes with the default filename.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            filename: DEFAULT_FILENAME.to_string(),
        }
    }

    /// `Content-Disposition` header value. Always an attachment.
    ///
    /// ```rust
    /// use html2pdf_service::service::PdfResponse;
    ///
    /// let response = PdfResponse::new(b"%PDF-1.7".to_vec());
    /// assert_eq!(response.content_disposition(), "attachment; filename=generated.pdf");
    /// ```
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.filename)
    }

    /// Size of the PDF in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// JSON error body used by every failing PDF route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Fixed, human-readable summary.
    pub message: String,

    /// Underlying cause.
    pub error: String,
}

impl ErrorResponse {
    /// Error body for a failed render.
    ///
    /// ```rust
    /// use html2pdf_service::RenderError;
    /// use html2pdf_service::service::ErrorResponse;
    ///
    /// let body = ErrorResponse::render_failed(&RenderError::Launch("no such file".into()));
    /// assert_eq!(body.message, "Error generating PDF from HTML");
    /// assert_eq!(
    ///     body.error,
    ///     "Failed to generate PDF from HTML: Failed to launch browser: no such file"
    /// );
    /// ```
    pub fn render_failed(err: &RenderError) -> Self {
        Self {
            message: RENDER_FAILED_MESSAGE.to_string(),
            error: format!("Failed to generate PDF from HTML: {}", err),
        }
    }

    /// Error body for a request that could not be parsed.
    pub fn invalid_body(detail: impl Into<String>) -> Self {
        Self {
            message: INVALID_BODY_MESSAGE.to_string(),
            error: detail.into(),
        }
    }
}

impl From<&RenderError> for ErrorResponse {
    fn from(err: &RenderError) -> Self {
        Self::render_failed(err)
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` when the endpoint answers.
    pub status: String,

    /// Service name.
    pub service: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "html2pdf-service".to_string(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
