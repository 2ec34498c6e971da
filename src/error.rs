//! Error types for rendering.
//!
//! This module provides [`RenderError`], the single error type returned by
//! every render step, and a convenient [`Result`] type alias.
//!
//! Variants name the stage that failed so logs stay useful, but callers are
//! not expected to branch on them: the HTTP layer maps every variant to the
//! same `500` response.
//!
//! # Example
//!
//! ```rust
//! use html2pdf_service::{RenderError, Result};
//!
//! fn render() -> Result<Vec<u8>> {
//!     Err(RenderError::Launch("executable not found".to_string()))
//! }
//!
//! match render() {
//!     Ok(pdf) => println!("Generated {} bytes", pdf.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

/// Errors that can occur while rendering HTML to PDF.
///
/// Every variant carries the underlying cause as a message.
///
/// # Example
///
/// ```rust
/// use html2pdf_service::RenderError;
///
/// let error = RenderError::Print("printToPDF returned no data".to_string());
/// assert_eq!(error.to_string(), "PDF printing failed: printToPDF returned no data");
/// assert_eq!(error.error_code(), "PRINT_FAILED");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The browser process could not be started.
    ///
    /// # Common Causes
    ///
    /// - Executable path does not exist or is not a Chrome/Chromium binary
    /// - Insufficient permissions to execute the binary
    /// - System resource limits exceeded (e.g., too many processes)
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    /// A page could not be opened in the running browser.
    #[error("Failed to open page: {0}")]
    Page(String),

    /// The assembled document could not be loaded.
    #[error("Failed to load content: {0}")]
    Navigation(String),

    /// The document never settled within the navigation timeout.
    ///
    /// Either the load event never fired or resources kept arriving for the
    /// whole wait.
    #[error("Navigation timeout: {0}")]
    NavigationTimeout(String),

    /// The engine failed to produce PDF output.
    #[error("PDF printing failed: {0}")]
    Print(String),

    /// Render options could not be mapped to print parameters.
    ///
    /// Raised for unparsable or negative margin lengths.
    #[error("Invalid render options: {0}")]
    InvalidOptions(String),

    /// The whole render call exceeded its time budget.
    #[error("Render timeout: {0}")]
    Timeout(String),

    /// Invalid configuration provided.
    ///
    /// Use [`RendererConfigBuilder`](crate::RendererConfigBuilder) which
    /// validates configuration at build time.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unexpected failure outside the engine (e.g. a panicked worker task).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RenderError {
    /// Machine-readable code for logs and metrics.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Launch(_) => "LAUNCH_FAILED",
            Self::Page(_) => "PAGE_FAILED",
            Self::Navigation(_) => "NAVIGATION_FAILED",
            Self::NavigationTimeout(_) => "NAVIGATION_TIMEOUT",
            Self::Print(_) => "PRINT_FAILED",
            Self::InvalidOptions(_) => "INVALID_OPTIONS",
            Self::Timeout(_) => "TIMEOUT",
            Self::Configuration(_) => "CONFIGURATION",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Convenience conversion from [`String`] to [`RenderError::Configuration`].
///
/// Config builders report validation failures as plain strings; this lets
/// `?` lift them into the crate error.
///
/// # Example
///
/// ```rust
/// use html2pdf_service::RenderError;
///
/// let error: RenderError = "invalid configuration".to_string().into();
/// assert!(matches!(error, RenderError::Configuration(_)));
/// ```
impl From<String> for RenderError {
    fn from(msg: String) -> Self {
        RenderError::Configuration(msg)
    }
}

/// Convenience conversion from `&str` to [`RenderError::Configuration`].
impl From<&str> for RenderError {
    fn from(msg: &str) -> Self {
        RenderError::Configuration(msg.to_string())
    }
}

/// Result type alias using [`RenderError`].
pub type Result<T> = std::result::Result<T, RenderError>;

// ============================================================================
// Unit Tests
// ============================================================================
