//! PDF generation service module.
//!
//! This module is the **framework-agnostic core** of the HTTP API: the
//! request and response types and the functions each route calls.
//!
//! # Module Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  service module (this module)                │
//! │                                                              │
//! │  ┌──────────────────────────────┐  ┌───────────────────────┐ │
//! │  │          types.rs            │  │        pdf.rs         │ │
//! │  │  GenerateFromHtmlRequest     │  │  generate_pdf_from_   │ │
//! │  │  GenerateWithOptionsRequest  │  │    html[_with_options]│ │
//! │  │  PdfResponse                 │  │  get_render_stats     │ │
//! │  │  ErrorResponse               │  │                       │ │
//! │  │  HealthResponse              │  │                       │ │
//! │  └──────────────────────────────┘  └───────────────────────┘ │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ used by
//!                                ▼
//!                 integrations::axum (handlers, router)
//! ```
//!
//! # Design Philosophy
//!
//! This module follows the **"thin handler, thick service"** pattern:
//!
//! | Layer | Responsibility | This Module? |
//! |-------|----------------|--------------|
//! | **Service** | Request → options mapping, rendering, logging | ✅ Yes |
//! | **Handler** | HTTP status, headers, CORS, body parsing | ❌ No (integrations) |
//!
//! # Error Mapping
//!
//! Every [`RenderError`](crate::RenderError) becomes the same response:
//!
//! ```text
//! 500 {"message": "Error generating PDF from HTML",
//!      "error": "Failed to generate PDF from HTML: <cause>"}
//! ```
//!
//! Bodies that do not parse never reach this module; the handler answers
//! them with `400` and [`INVALID_BODY_MESSAGE`].

mod pdf;
mod types;

pub use pdf::{generate_pdf_from_html, generate_pdf_from_html_with_options, get_render_stats};
pub use types::{
    DEFAULT_FILENAME, ErrorResponse, GenerateFromHtmlRequest, GenerateWithOptionsRequest,
    HealthResponse, INVALID_BODY_MESSAGE, PdfResponse, RENDER_FAILED_MESSAGE,
};
