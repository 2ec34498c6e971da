//! HTML to PDF renderer.
//!
//! This module provides [`Renderer`], the main entry point for turning an
//! HTML fragment plus options into PDF bytes.
//!
//! # Overview
//!
//! Each render is fully isolated:
//! - **Fresh Engine**: a new browser is launched for every call and shut
//!   down afterwards, on success, failure or panic alike
//! - **Bounded Concurrency**: at most `max_concurrent_renders` engines
//!   are alive at once; further calls wait for a slot
//! - **Bounded Duration**: the whole call, slot wait included, is cut off
//!   after `render_timeout`
//!
//! # Architecture
//!
//! ```text
//! Renderer (Clone, cheap)
//!   └─ RendererInner (shared state)
//!       ├─ factory: Box<dyn BrowserFactory>
//!       ├─ slots: Semaphore(max_concurrent_renders)
//!       └─ counters: completed / failed / timed_out
//!
//! render() ── acquire slot ── spawn_blocking ─┬─ resolve options
//!                                             ├─ assemble document
//!                                             ├─ launch ─ SessionGuard
//!                                             ├─ open_page
//!                                             ├─ load_document (network idle)
//!                                             └─ print_pdf
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use html2pdf_service::{RenderOptions, Renderer, RendererConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let renderer = Renderer::from_config(RendererConfig::default());
//!
//!     let pdf = renderer
//!         .render("<h1>Invoice</h1>".to_string(), RenderOptions::default())
//!         .await?;
//!
//!     std::fs::write("invoice.pdf", pdf)?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

use crate::config::RendererConfig;
use crate::document::assemble_with_base;
use crate::engine::{BrowserFactory, ChromeBrowserFactory, LoadWait};
use crate::error::{RenderError, Result};
use crate::options::RenderOptions;
use crate::session::SessionGuard;
use crate::stats::RenderStats;

/// How often a blocking caller retries for a free slot.
const SLOT_POLL_INTERVAL: Duration = Duration::from_millis(25);

// ============================================================================
// RendererInner
// ============================================================================

/// Internal shared state for the renderer.
///
/// Wrapped in `Arc` so that clones of [`Renderer`] and in-flight blocking
/// tasks all see the same slots and counters.
struct RendererInner {
    /// Configuration (immutable after creation).
    config: RendererConfig,

    /// Launches one engine per render.
    factory: Box<dyn BrowserFactory>,

    /// One permit per engine allowed to be alive.
    ///
    /// A permit is held until the blocking render finishes, even when the
    /// caller has already given up on it.
    slots: Arc<Semaphore>,

    completed: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
}

impl RendererInner {
    fn new(config: RendererConfig, factory: Box<dyn BrowserFactory>) -> Arc<Self> {
        log::info!(
            "Initializing renderer with {} concurrent slots",
            config.max_concurrent_renders
        );
        log::debug!(
            "Renderer config: navigation_timeout={}s, idle_window={}ms, render_timeout={}s",
            config.navigation_timeout.as_secs(),
            config.network_idle_window.as_millis(),
            config.render_timeout.as_secs()
        );

        Arc::new(Self {
            slots: Arc::new(Semaphore::new(config.max_concurrent_renders)),
            config,
            factory,
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            timed_out: AtomicU64::new(0),
        })
    }

    /// Run one render on the current thread.
    ///
    /// The launched session is owned by a [`SessionGuard`], so every exit
    /// from this function closes it.
    fn render_once(&self, html: &str, options: &RenderOptions) -> Result<Vec<u8>> {
        let settings = options.resolve()?;
        let document = assemble_with_base(
            html,
            options.css.as_deref(),
            self.config.base_stylesheet.as_deref(),
        );
        let wait = LoadWait {
            timeout: self.config.navigation_timeout,
            idle_window: self.config.network_idle_window,
        };

        log::debug!(
            "Rendering {} byte document ({}, landscape={})",
            document.len(),
            settings.format.name(),
            settings.landscape
        );

        let mut session = SessionGuard::new(self.factory.launch()?);
        session.open_page()?;
        session.load_document(&document, wait)?;
        let pdf = session.print_pdf(&settings)?;
        session.close();

        log::info!("Rendered PDF ({} bytes)", pdf.len());
        Ok(pdf)
    }

    /// Take a slot from a synchronous caller, polling until one frees up.
    fn wait_for_slot(&self) -> Result<OwnedSemaphorePermit> {
        let deadline = Instant::now() + self.config.render_timeout;
        loop {
            match Arc::clone(&self.slots).try_acquire_owned() {
                Ok(permit) => return Ok(permit),
                Err(TryAcquireError::Closed) => {
                    return Err(RenderError::Internal("render slots closed".to_string()));
                }
                Err(TryAcquireError::NoPermits) => {}
            }

            if Instant::now() >= deadline {
                return Err(RenderError::Timeout(format!(
                    "no render slot freed up within {}s",
                    self.config.render_timeout.as_secs_f64()
                )));
            }
            thread::sleep(SLOT_POLL_INTERVAL);
        }
    }

    fn record(&self, result: &Result<Vec<u8>>) {
        match result {
            Ok(_) => {
                self.completed.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                if matches!(e, RenderError::Timeout(_)) {
                    self.timed_out.fetch_add(1, Ordering::Relaxed);
                }
                log::warn!("Render failed [{}]: {}", e.error_code(), e);
            }
        }
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Renders HTML fragments to PDF.
///
/// Cloning is cheap: clones share the factory, slots and counters, which
/// is how the HTTP layer hands the renderer to every request.
///
/// # Thread Safety
///
/// `Renderer` is `Send + Sync + Clone`.
#[derive(Clone)]
pub struct Renderer {
    inner: Arc<RendererInner>,
}

impl Renderer {
    /// Create a builder for a renderer with a custom factory.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let renderer = Renderer::builder()
    ///     .config(RendererConfigBuilder::new().max_concurrent_renders(2).build()?)
    ///     .factory(Box::new(ChromeBrowserFactory::with_defaults()))
    ///     .build()?;
    /// ```
    pub fn builder() -> RendererBuilder {
        RendererBuilder::new()
    }

    /// Create a Chrome-backed renderer from configuration.
    pub fn from_config(config: RendererConfig) -> Self {
        let factory = ChromeBrowserFactory::from_config(&config);
        Self {
            inner: RendererInner::new(config, Box::new(factory)),
        }
    }

    /// Render `html` with `options` to PDF bytes.
    ///
    /// Waits for a free slot, then runs the render on the blocking thread
    /// pool. The whole call, slot wait included, is bounded by
    /// `render_timeout`.
    ///
    /// # Errors
    ///
    /// - [`RenderError::InvalidOptions`] for malformed margins.
    /// - [`RenderError::Launch`], [`RenderError::Page`],
    ///   [`RenderError::Navigation`], [`RenderError::NavigationTimeout`],
    ///   [`RenderError::Print`] for the failing engine step.
    /// - [`RenderError::Timeout`] when `render_timeout` elapses. The
    ///   abandoned render keeps its slot until its engine is shut down.
    pub async fn render(&self, html: String, options: RenderOptions) -> Result<Vec<u8>> {
        let inner = Arc::clone(&self.inner);
        let render_timeout = inner.config.render_timeout;

        let work = run_in_slot(Arc::clone(&inner), html, options);

        let result = match tokio::time::timeout(render_timeout, work).await {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout(format!(
                "render exceeded {}s",
                render_timeout.as_secs_f64()
            ))),
        };

        inner.record(&result);
        result
    }

    /// Render on the calling thread.
    ///
    /// For synchronous callers such as batch tools. The call takes a slot
    /// like [`render`](Self::render), polling for one until
    /// `render_timeout` runs out. Once the engine is running, each step is
    /// bounded by the navigation timeout and the engine is shut down on
    /// every path.
    ///
    /// Must not be called from inside an async task; use
    /// [`render`](Self::render) there.
    ///
    /// # Errors
    ///
    /// Same as [`render`](Self::render); [`RenderError::Timeout`] means no
    /// slot freed up in time.
    pub fn render_blocking(&self, html: &str, options: &RenderOptions) -> Result<Vec<u8>> {
        let result = self
            .inner
            .wait_for_slot()
            .and_then(|_permit| self.inner.render_once(html, options));
        self.inner.record(&result);
        result
    }

    /// Get current renderer statistics.
    pub fn stats(&self) -> RenderStats {
        let capacity = self.inner.config.max_concurrent_renders;
        let available_slots = self.inner.slots.available_permits();

        RenderStats {
            in_flight: capacity.saturating_sub(available_slots),
            completed: self.inner.completed.load(Ordering::Relaxed),
            failed: self.inner.failed.load(Ordering::Relaxed),
            timed_out: self.inner.timed_out.load(Ordering::Relaxed),
            capacity,
            available_slots,
        }
    }

    /// Get the renderer configuration.
    pub fn config(&self) -> &RendererConfig {
        &self.inner.config
    }
}

/// Wait for a slot, then render on the blocking pool.
///
/// The permit moves into the blocking task, so it is released only when
/// the engine has been shut down.
async fn run_in_slot(
    inner: Arc<RendererInner>,
    html: String,
    options: RenderOptions,
) -> Result<Vec<u8>> {
    let permit = Arc::clone(&inner.slots)
        .acquire_owned()
        .await
        .map_err(|_| RenderError::Internal("render slots closed".to_string()))?;

    let joined = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        inner.render_once(&html, &options)
    })
    .await;

    joined.map_err(|e| RenderError::Internal(format!("render task failed: {}", e)))?
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.inner.config)
            .field("stats", &self.stats())
            .finish()
    }
}

// ============================================================================
// RendererBuilder
// ============================================================================

/// Builder for [`Renderer`].
///
/// # Example
///
/// ```rust,ignore
/// let renderer = Renderer::builder()
///     .factory(Box::new(ChromeBrowserFactory::with_path("/usr/bin/chromium")))
///     .build()?;
/// ```
pub struct RendererBuilder {
    /// Optional configuration (uses default if not provided).
    config: Option<RendererConfig>,

    /// Engine factory (required).
    factory: Option<Box<dyn BrowserFactory>>,
}

impl RendererBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            config: None,
            factory: None,
        }
    }

    /// Set custom configuration.
    ///
    /// If not called, uses [`RendererConfig::default()`].
    pub fn config(mut self, config: RendererConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the engine factory (required).
    pub fn factory(mut self, factory: Box<dyn BrowserFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Build the renderer.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Configuration`] if no factory was provided.
    pub fn build(self) -> Result<Renderer> {
        let config = self.config.unwrap_or_default();
        let factory = self.factory.ok_or_else(|| {
            RenderError::Configuration("No browser factory provided".to_string())
        })?;

        Ok(Renderer {
            inner: RendererInner::new(config, factory),
        })
    }
}

impl Default for RendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Environment Initialization (feature-gated)
// ============================================================================

/// Initialize a Chrome-backed renderer from environment variables.
///
/// Reads `app.env` if present, then the variables listed in
/// [`config::env`](crate::config::env).
///
/// # Errors
///
/// Returns [`RenderError::Configuration`] if the configuration is invalid.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     env_logger::init();
///
///     let renderer = init_renderer()?;
///
///     // Use renderer in handlers...
///
///     Ok(())
/// }
/// ```
#[cfg(feature = "env-config")]
pub fn init_renderer() -> Result<Renderer> {
    use crate::config::env::renderer_from_env;

    log::info!("Initializing renderer from environment...");

    let config = renderer_from_env().map_err(|e| {
        log::error!("Failed to load renderer configuration: {}", e);
        e
    })?;

    let renderer = Renderer::from_config(config);
    log::info!("Renderer ready: {}", renderer.stats());

    Ok(renderer)
}

// ============================================================================
// Unit Tests
// ============================================================================
