//! Web framework integrations.
//!
//! This module exposes the PDF API over HTTP.
//!
//! # Available Integrations
//!
//! | Framework | Feature Flag | Module |
//! |-----------|--------------|--------|
//! | Axum | `axum-integration` | `axum` |
//!
//! # Enabling Integrations
//!
//! Add the desired feature to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! html2pdf-service = { version = "0.1", features = ["axum-integration"] }
//! ```
//!
//! # Common Pattern
//!
//! 1. Build a [`Renderer`](crate::Renderer) during application startup
//! 2. Hand it to the integration together with a [`ServerConfig`](crate::ServerConfig)
//! 3. Serve the resulting router

#[cfg(feature = "axum-integration")]
pub mod axum;
