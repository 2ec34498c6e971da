//! Rendering engine abstraction.
//!
//! This module provides the [`BrowserFactory`] and [`BrowserSession`] traits
//! and their implementations.
//!
//! # Overview
//!
//! A factory launches one isolated browser per call. The session it returns
//! exposes exactly the steps a render needs:
//!
//! ```text
//! BrowserFactory::launch()
//!        │
//!        ▼
//! BrowserSession ── open_page() ── load_document() ── print_pdf() ── close()
//! ```
//!
//! # Available Factories
//!
//! | Factory | Description |
//! |---------|-------------|
//! | [`ChromeBrowserFactory`] | Launches headless Chrome/Chromium |
//! | [`mock::MockBrowserFactory`] | Fault-injecting fake (feature-gated) |
//!
//! # Custom Factory
//!
//! ```rust,ignore
//! use html2pdf_service::engine::{BrowserFactory, BrowserSession};
//! use html2pdf_service::Result;
//!
//! struct RemoteFactory { /* endpoint, credentials */ }
//!
//! impl BrowserFactory for RemoteFactory {
//!     fn launch(&self) -> Result<Box<dyn BrowserSession>> {
//!         // Connect to a remote engine...
//!         todo!()
//!     }
//! }
//! ```

mod chrome;
mod idle;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use chrome::{
    CHROME_CONTAINER_FLAGS, ChromeBrowserFactory, ChromeSession, create_chrome_options,
};
pub use idle::{NetworkIdle, PageActivity, RequestTracker};

use std::time::Duration;

use crate::error::Result;
use crate::options::PrintSettings;

/// How long and how patiently to wait for loaded content to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadWait {
    /// Upper bound for the load and the idle wait together.
    pub timeout: Duration,
    /// Quiet period that counts as network idle.
    pub idle_window: Duration,
}

/// Trait for launching engine sessions.
///
/// # Thread Safety
///
/// Factories are shared by every concurrent render, so they must be
/// `Send + Sync`.
pub trait BrowserFactory: Send + Sync {
    /// Launch a new, isolated browser instance.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Launch`](crate::RenderError::Launch) when the
    /// process cannot be started.
    fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// One running browser instance, used for exactly one render.
///
/// Steps are called in order: [`open_page`](Self::open_page),
/// [`load_document`](Self::load_document), [`print_pdf`](Self::print_pdf).
/// [`close`](Self::close) may be called after any of them, and more than
/// once; only the first call does anything.
pub trait BrowserSession: Send {
    /// Open a fresh page in the browser.
    fn open_page(&mut self) -> Result<()>;

    /// Load a complete HTML document and wait for network idle.
    fn load_document(&mut self, document: &str, wait: LoadWait) -> Result<()>;

    /// Print the loaded page to PDF bytes.
    fn print_pdf(&mut self, settings: &PrintSettings) -> Result<Vec<u8>>;

    /// Shut down the browser process and release its resources.
    ///
    /// Best effort: failures are logged, never returned.
    fn close(&mut self);
}
