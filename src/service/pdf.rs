//! Core PDF generation functions.
//!
//! Each public HTTP route maps to one function here. The functions only
//! translate requests into [`RenderOptions`](crate::RenderOptions) and
//! wrap the bytes; concurrency, timeouts and engine teardown all live in
//! [`Renderer`].
//!
//! # Route Mapping
//!
//! | Function | Route | Options used |
//! |----------|-------|--------------|
//! | [`generate_pdf_from_html`] | `POST /pdf/generate-from-html` | `css` only |
//! | [`generate_pdf_from_html_with_options`] | `POST /pdf/generate-from-html-with-options` | all, defaulted |
//! | [`get_render_stats`] | `GET /stats` | n/a |

use std::time::Instant;

use super::types::{GenerateFromHtmlRequest, GenerateWithOptionsRequest, PdfResponse};
use crate::error::RenderError;
use crate::options::RenderOptions;
use crate::renderer::Renderer;
use crate::stats::RenderStats;

/// Render an HTML fragment with an optional stylesheet.
///
/// Every other option takes its default: A4, portrait, backgrounds on,
/// `20px` margins.
///
/// # Example
///
/// ```rust,ignore
/// let request = GenerateFromHtmlRequest {
///     html: "<h1>Invoice #42</h1>".to_string(),
///     css: Some("h1 { color: navy; }".to_string()),
/// };
///
/// let response = generate_pdf_from_html(&renderer, request).await?;
/// assert!(response.data.starts_with(b"%PDF-"));
/// ```
pub async fn generate_pdf_from_html(
    renderer: &Renderer,
    request: GenerateFromHtmlRequest,
) -> Result<PdfResponse, RenderError> {
    let options = request.options();
    render_to_response(renderer, request.html, options).await
}

/// Render an HTML fragment with full options.
///
/// Options left out of the request get their defaults during resolution.
/// An options object that does not parse fails with
/// [`RenderError::InvalidOptions`], the same as an invalid margin.
pub async fn generate_pdf_from_html_with_options(
    renderer: &Renderer,
    request: GenerateWithOptionsRequest,
) -> Result<PdfResponse, RenderError> {
    let options = request.options_or_default().map_err(|e| {
        log::warn!("❌ PDF generation rejected: {}", e);
        e
    })?;
    render_to_response(renderer, request.html, options).await
}

/// Current renderer statistics.
pub fn get_render_stats(renderer: &Renderer) -> RenderStats {
    renderer.stats()
}

async fn render_to_response(
    renderer: &Renderer,
    html: String,
    options: RenderOptions,
) -> Result<PdfResponse, RenderError> {
    let started = Instant::now();
    let input_len = html.len();

    match renderer.render(html, options).await {
        Ok(data) => {
            log::info!(
                "✅ PDF generated from HTML ({} bytes input → {} bytes output) in {:?}",
                input_len,
                data.len(),
                started.elapsed()
            );
            Ok(PdfResponse::new(data))
        }
        Err(e) => {
            log::error!(
                "❌ PDF generation failed after {:?}: {}",
                started.elapsed(),
                e
            );
            Err(e)
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
