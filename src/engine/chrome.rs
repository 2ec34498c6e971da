//! Chrome/Chromium engine implementation.
//!
//! This module provides [`ChromeBrowserFactory`], which launches one headless
//! Chrome process per render, and [`ChromeSession`], which drives it through
//! the DevTools protocol via `headless_chrome`.
//!
//! # Example
//!
//! ```rust,ignore
//! use html2pdf_service::engine::{BrowserFactory, ChromeBrowserFactory};
//!
//! let factory = ChromeBrowserFactory::with_path("/usr/bin/chromium-browser");
//! let mut session = factory.launch()?;
//! session.open_page()?;
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use headless_chrome::protocol::cdp::types::Event;
use headless_chrome::protocol::cdp::{Network, Page};
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde::Deserialize;

use super::{BrowserFactory, BrowserSession, LoadWait, NetworkIdle, RequestTracker};
use crate::config::{DEFAULT_WINDOW_SIZE, RendererConfig};
use crate::error::{RenderError, Result};
use crate::options::PrintSettings;

/// Flags that let Chrome run inside containers without a display server
/// or the privileges its sandboxes need.
pub const CHROME_CONTAINER_FLAGS: [&str; 5] = [
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--disable-gpu",
];

/// Interval between network activity probes.
const IDLE_POLL_INTERVAL_MS: u64 = 100;

/// Reports whether the document and its fonts finished loading.
const LOAD_STATE_PROBE: &str = "JSON.stringify({\
    loaded: document.readyState === 'complete' \
        && (!document.fonts || document.fonts.status === 'loaded')\
})";

#[derive(Debug, Deserialize)]
struct LoadState {
    loaded: bool,
}

// ============================================================================
// Factory
// ============================================================================

/// Factory that launches a fresh headless Chrome for every session.
///
/// # Thread Safety
///
/// This factory is `Send + Sync`; concurrent launches produce independent
/// processes.
#[derive(Debug, Clone)]
pub struct ChromeBrowserFactory {
    chrome_path: Option<PathBuf>,
    window_size: (u32, u32),
}

impl ChromeBrowserFactory {
    /// Factory that lets `headless_chrome` locate the executable.
    pub fn with_defaults() -> Self {
        log::debug!("Creating ChromeBrowserFactory with auto-detect");
        Self {
            chrome_path: None,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }

    /// Factory using a specific executable.
    pub fn with_path(chrome_path: impl Into<PathBuf>) -> Self {
        let chrome_path = chrome_path.into();
        log::debug!(
            "Creating ChromeBrowserFactory with custom path: {}",
            chrome_path.display()
        );
        Self {
            chrome_path: Some(chrome_path),
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }

    /// Factory matching a renderer configuration.
    pub fn from_config(config: &RendererConfig) -> Self {
        Self {
            chrome_path: config.chrome_path.clone(),
            window_size: config.window_size,
        }
    }

    /// The configured executable, if any.
    pub fn chrome_path(&self) -> Option<&Path> {
        self.chrome_path.as_deref()
    }
}

impl BrowserFactory for ChromeBrowserFactory {
    fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let options = create_chrome_options(self.chrome_path.as_deref(), self.window_size)?;

        log::debug!("Launching Chrome browser...");
        let start = Instant::now();
        let browser = Browser::new(options).map_err(|e| {
            log::error!("❌ Chrome launch failed: {}", e);
            RenderError::Launch(e.to_string())
        })?;
        log::debug!("Chrome launched in {:?}", start.elapsed());

        Ok(Box::new(ChromeSession::new(browser)))
    }
}

/// Build launch options for a sandbox-less, GPU-less headless Chrome.
///
/// # Chrome Flags Applied
///
/// - headless mode
/// - `--no-sandbox` and `--disable-setuid-sandbox`
/// - `--disable-dev-shm-usage` (use /tmp instead of /dev/shm)
/// - `--disable-accelerated-2d-canvas` and `--disable-gpu`
/// - `--window-size` from `window_size`
///
/// # Errors
///
/// Returns [`RenderError::Configuration`] if the options builder rejects the
/// combination (rare, usually a bug).
pub fn create_chrome_options(
    chrome_path: Option<&Path>,
    window_size: (u32, u32),
) -> Result<LaunchOptions<'static>> {
    let mut builder = LaunchOptions::default_builder();

    // Set path if provided, otherwise let headless_chrome auto-detect
    match chrome_path {
        Some(path) => {
            builder.path(Some(path.to_path_buf()));
            log::trace!("Chrome path set to: {}", path.display());
        }
        None => log::trace!("Chrome path: auto-detect"),
    }

    builder
        .headless(true)
        .sandbox(false)
        .window_size(Some(window_size))
        .args(CHROME_CONTAINER_FLAGS.iter().map(|&flag| OsStr::new(flag)).collect())
        .build()
        .map_err(|e| {
            let path_msg = chrome_path
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "auto-detect".to_string());
            log::error!("❌ Failed to build Chrome launch options (path: {}): {}", path_msg, e);
            RenderError::Configuration(e.to_string())
        })
}

// ============================================================================
// Session
// ============================================================================

/// One headless Chrome process and the page it renders into.
///
/// Dropping the [`Browser`] kills the process, so [`close`](BrowserSession::close)
/// closes the tab and then drops the browser.
pub struct ChromeSession {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
}

impl ChromeSession {
    fn new(browser: Browser) -> Self {
        Self {
            browser: Some(browser),
            tab: None,
        }
    }

    fn tab(&self) -> Result<&Arc<Tab>> {
        self.tab
            .as_ref()
            .ok_or_else(|| RenderError::Page("no page is open".to_string()))
    }
}

impl BrowserSession for ChromeSession {
    fn open_page(&mut self) -> Result<()> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| RenderError::Page("browser already closed".to_string()))?;

        log::trace!("Creating new browser tab");
        let tab = browser.new_tab().map_err(|e| {
            log::error!("❌ Failed to create tab: {}", e);
            RenderError::Page(e.to_string())
        })?;

        self.tab = Some(tab);
        Ok(())
    }

    fn load_document(&mut self, document: &str, wait: LoadWait) -> Result<()> {
        let tab = self.tab()?;
        tab.set_default_timeout(wait.timeout);

        let start = Instant::now();
        let requests = Arc::new(RequestTracker::default());
        watch_requests(tab, Arc::clone(&requests))?;

        // Set as content; navigation URLs are capped at 2 MiB.
        let frame_id = main_frame_id(tab)?;
        log::trace!("Setting {} byte document on frame {}", document.len(), frame_id);
        tab.call_method(Page::SetDocumentContent {
            frame_id,
            html: document.to_string(),
        })
        .map_err(|e| {
            log::error!("❌ Failed to load document: {}", e);
            RenderError::Navigation(e.to_string())
        })?;
        log::debug!("Document set in {:?}", start.elapsed());

        let remaining = wait.timeout.saturating_sub(start.elapsed());
        wait_for_network_idle(tab, &requests, wait.idle_window, remaining)
    }

    fn print_pdf(&mut self, settings: &PrintSettings) -> Result<Vec<u8>> {
        let tab = self.tab()?;

        log::trace!(
            "Printing PDF (format={}, landscape={}, background={})",
            settings.format,
            settings.landscape,
            settings.print_background
        );
        let start = Instant::now();
        let pdf = tab
            .print_to_pdf(Some(settings.to_print_options()))
            .map_err(|e| {
                log::error!("❌ Failed to generate PDF: {}", e);
                RenderError::Print(e.to_string())
            })?;
        log::debug!("PDF printed in {:?} ({} bytes)", start.elapsed(), pdf.len());

        Ok(pdf)
    }

    fn close(&mut self) {
        if let Some(tab) = self.tab.take() {
            if let Err(e) = tab.close(true) {
                log::warn!("Failed to close tab (the browser is shut down anyway): {}", e);
            }
        }

        if let Some(browser) = self.browser.take() {
            log::trace!("Shutting down Chrome process");
            drop(browser);
        }
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Enable network events on `tab` and route them into `requests`.
fn watch_requests(tab: &Tab, requests: Arc<RequestTracker>) -> Result<()> {
    tab.call_method(Network::Enable {
        max_total_buffer_size: None,
        max_resource_buffer_size: None,
        max_post_data_size: None,
        report_direct_socket_traffic: None,
        enable_durable_messages: None,
    })
    .map_err(|e| {
        log::error!("❌ Failed to enable network events: {}", e);
        RenderError::Page(e.to_string())
    })?;

    tab.add_event_listener(Arc::new(move |event: &Event| match event {
        Event::NetworkRequestWillBeSent(ev) => requests.request_started(&ev.params.request_id),
        Event::NetworkLoadingFinished(ev) => requests.request_settled(&ev.params.request_id),
        Event::NetworkLoadingFailed(ev) => requests.request_settled(&ev.params.request_id),
        _ => {}
    }))
    .map_err(|e| RenderError::Page(e.to_string()))?;

    Ok(())
}

/// Id of the tab's top-level frame.
fn main_frame_id(tab: &Tab) -> Result<String> {
    tab.call_method(Page::GetFrameTree(None))
        .map(|tree| tree.frame_tree.frame.id)
        .map_err(|e| {
            log::error!("❌ Failed to read frame tree: {}", e);
            RenderError::Page(e.to_string())
        })
}

/// Poll the page until it has been quiet for `idle_window`.
///
/// Probe failures count as "not loaded yet" rather than errors; only running
/// out of `budget` fails.
fn wait_for_network_idle(
    tab: &Tab,
    requests: &RequestTracker,
    idle_window: Duration,
    budget: Duration,
) -> Result<()> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(IDLE_POLL_INTERVAL_MS);
    let mut idle = NetworkIdle::new(idle_window);

    log::trace!(
        "Waiting up to {:?} for {:?} of network idle",
        budget,
        idle_window
    );

    loop {
        let loaded = probe_loaded(tab);
        let activity = requests.activity(loaded);

        if idle.observe(activity, Instant::now()) {
            log::debug!(
                "Network idle after {:?} ({} requests)",
                start.elapsed(),
                activity.started
            );
            return Ok(());
        }

        if start.elapsed() >= budget {
            log::error!(
                "❌ Network never went idle within {:?} ({} requests still in flight)",
                budget,
                activity.in_flight
            );
            return Err(RenderError::NavigationTimeout(format!(
                "network did not become idle within {}ms",
                budget.as_millis()
            )));
        }

        thread::sleep(poll_interval);
    }
}

fn probe_loaded(tab: &Tab) -> bool {
    match tab.evaluate(LOAD_STATE_PROBE, false) {
        Ok(remote) => remote
            .value
            .as_ref()
            .and_then(|v| v.as_str())
            .and_then(|raw| serde_json::from_str::<LoadState>(raw).ok())
            .is_some_and(|state| state.loaded),
        Err(e) => {
            log::trace!("Load state probe failed: {}", e);
            false
        }
    }
}
