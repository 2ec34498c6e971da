//! # html2pdf-service
//!
//! HTML to PDF rendering over HTTP, backed by headless Chrome.
//!
//! A caller posts an HTML fragment, an optional stylesheet and optional page
//! options; the service wraps them into a complete document, loads it into a
//! freshly launched browser, waits for the network to go idle, prints the
//! page and returns the PDF bytes.
//!
//! ## Features
//!
//! - **Isolated Renders**: one browser per render, always shut down afterwards
//! - **Bounded Concurrency**: a configurable number of engines at once
//! - **Bounded Duration**: navigation and whole-render timeouts
//! - **RAII Teardown**: the engine is closed on success, error and panic
//! - **Page Options**: paper format, orientation, margins, backgrounds
//! - **Web Framework Integration**: ready-made Axum router
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │         HTTP (integrations::axum)           │
//! │   POST /pdf/generate-from-html[-with-...]   │
//! └─────────────────┬───────────────────────────┘
//!                   │ service::generate_pdf_*
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │                Renderer                     │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │  Slots (Semaphore) + render timeout     │ │
//! │ └─────────────────────────────────────────┘ │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │  resolve options → assemble document    │ │
//! │ │  → launch → load → idle → print         │ │
//! │ └─────────────────────────────────────────┘ │
//! └─────────────────┬───────────────────────────┘
//!                   │ BrowserFactory / BrowserSession
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │        Headless Chrome (one per render)     │
//! │     (managed by headless_chrome crate)      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use html2pdf_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let renderer = Renderer::from_config(
//!         RendererConfigBuilder::new()
//!             .max_concurrent_renders(2)
//!             .build()?,
//!     );
//!
//!     let options = RenderOptions {
//!         format: Some(PageFormat::Letter),
//!         landscape: Some(true),
//!         ..Default::default()
//!     };
//!
//!     let pdf = renderer.render("<h1>Report</h1>".to_string(), options).await?;
//!     std::fs::write("report.pdf", pdf)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Configuration
//!
//! When the `env-config` feature is enabled, the renderer and server can be
//! configured from an `app.env` file or the process environment:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CHROME_PATH` | `/usr/bin/chromium-browser` | Engine executable (alias `PUPPETEER_EXECUTABLE_PATH`) |
//! | `RENDER_NAVIGATION_TIMEOUT_SECONDS` | 30 | Bound on load and network-idle wait |
//! | `RENDER_NETWORK_IDLE_MS` | 500 | Quiet window |
//! | `RENDER_TIMEOUT_SECONDS` | 60 | Bound on one whole render |
//! | `RENDER_MAX_CONCURRENT` | 5 | Simultaneous engines |
//! | `BASE_STYLESHEET_PATH` | unset | CSS file injected before the caller's |
//! | `SERVER_ADDR` | `0.0.0.0:3000` | Listen address |
//! | `CORS_ALLOW_ORIGIN` | `*` | CORS origin, `none` disables |
//! | `MAX_BODY_BYTES` | 10485760 | Request body limit |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `env-config` | Environment-based configuration |
//! | `axum-integration` | Axum router |
//! | `server` | The `html2pdf-service` binary (default) |
//! | `test-utils` | Mock engine for testing |
//!
//! ## Trust Boundary
//!
//! HTML and CSS are not sanitized; see [`document`].
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, RenderError>`](Result). The
//! variant names the step that failed:
//!
//! ```rust,ignore
//! match renderer.render(html, options).await {
//!     Ok(pdf) => { /* send it */ }
//!     Err(RenderError::Launch(msg)) => { /* executable missing or broken */ }
//!     Err(RenderError::Timeout(msg)) => { /* took longer than render_timeout */ }
//!     Err(e) => log::error!("[{}] {}", e.error_code(), e),
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod options;
pub mod prelude;
pub mod renderer;
pub mod service;
pub mod session;
pub mod stats;

// ============================================================================
// Feature-gated modules
// ============================================================================

/// Web framework integrations.
///
/// Enable `axum-integration` to use them.
#[cfg(feature = "axum-integration")]
pub mod integrations;

// ============================================================================
// Re-exports (Public API)
// ============================================================================

// Core types
pub use config::{RendererConfig, RendererConfigBuilder, ServerConfig, ServerConfigBuilder};
pub use document::assemble_document;
pub use engine::{BrowserFactory, BrowserSession, ChromeBrowserFactory, LoadWait};
pub use error::{RenderError, Result};
pub use options::{CssLength, PageFormat, PageMargins, PrintSettings, RenderOptions};
pub use renderer::{Renderer, RendererBuilder};
pub use session::SessionGuard;
pub use stats::RenderStats;

// Feature-gated re-exports
#[cfg(feature = "env-config")]
pub use config::env::{chrome_path_from_env, renderer_from_env, server_from_env};

#[cfg(feature = "env-config")]
pub use renderer::init_renderer;
