//! Convenient imports for common usage patterns.
//!
//! ```rust,ignore
//! use html2pdf_service::prelude::*;
//! ```
//!
//! This imports:
//!
//! - [`Renderer`] / [`RendererBuilder`] - Renders HTML to PDF
//! - [`RendererConfig`] / [`RendererConfigBuilder`] - Renderer configuration
//! - [`ServerConfig`] / [`ServerConfigBuilder`] - HTTP configuration
//! - [`RenderOptions`], [`PageFormat`], [`PageMargins`] - Page options
//! - [`RenderError`] / [`Result`] - Error type and alias
//! - [`RenderStats`] - Renderer statistics
//! - [`BrowserFactory`] / [`ChromeBrowserFactory`] - Engine factories

// Core types
pub use crate::config::{RendererConfig, RendererConfigBuilder, ServerConfig, ServerConfigBuilder};
pub use crate::engine::{BrowserFactory, ChromeBrowserFactory};
pub use crate::error::{RenderError, Result};
pub use crate::options::{PageFormat, PageMargins, RenderOptions};
pub use crate::renderer::{Renderer, RendererBuilder};
pub use crate::stats::RenderStats;

// Feature-gated exports
#[cfg(feature = "env-config")]
pub use crate::renderer::init_renderer;

#[cfg(feature = "axum-integration")]
pub use crate::integrations::axum::router;
