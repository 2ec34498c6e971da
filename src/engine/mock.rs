//! Mock engine for testing.
//!
//! [`MockBrowserFactory`] hands out fake sessions that never start a
//! process. Each factory can be told to fail at one render stage, and it
//! counts how many sessions were launched and closed, so tests can check
//! that no session outlives its render.
//!
//! # Feature Flag
//!
//! This module is only available when:
//! - The `test-utils` feature is enabled, OR
//! - During testing (`#[cfg(test)]`)
//!
//! # Example
//!
//! ```rust,ignore
//! use html2pdf_service::engine::mock::{FailAt, MockBrowserFactory};
//!
//! let factory = MockBrowserFactory::failing_at(FailAt::Print, "printer on fire");
//! // ... render ...
//! assert_eq!(factory.launched(), factory.closed());
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::{BrowserFactory, BrowserSession, LoadWait};
use crate::error::{RenderError, Result};
use crate::options::PrintSettings;

/// Bytes every successful mock print returns.
pub const MOCK_PDF: &[u8] = b"%PDF-1.7\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF\n";

/// Render stage a [`MockBrowserFactory`] fails at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    /// Launching the browser.
    Launch,
    /// Opening the page.
    OpenPage,
    /// Loading the document.
    Load,
    /// Printing the PDF.
    Print,
}

#[derive(Debug, Default)]
struct Shared {
    launched: AtomicUsize,
    closed: AtomicUsize,
    alive: AtomicUsize,
    peak_alive: AtomicUsize,
    last_document: Mutex<Option<String>>,
    last_wait: Mutex<Option<LoadWait>>,
    last_settings: Mutex<Option<PrintSettings>>,
}

/// Fake engine with configurable failures and lifecycle counters.
///
/// Clones share their counters and recordings.
#[derive(Debug, Clone)]
pub struct MockBrowserFactory {
    fail_at: Option<FailAt>,
    error_message: String,
    print_delay: Duration,
    shared: Arc<Shared>,
}

impl MockBrowserFactory {
    /// Factory whose sessions always succeed.
    pub fn new() -> Self {
        Self {
            fail_at: None,
            error_message: String::new(),
            print_delay: Duration::ZERO,
            shared: Arc::new(Shared::default()),
        }
    }

    /// Factory whose sessions fail at `stage` with `message`.
    pub fn failing_at<S: Into<String>>(stage: FailAt, message: S) -> Self {
        Self {
            fail_at: Some(stage),
            error_message: message.into(),
            ..Self::new()
        }
    }

    /// Make every print step block for `delay` first.
    pub fn with_print_delay(mut self, delay: Duration) -> Self {
        self.print_delay = delay;
        self
    }

    /// Sessions launched so far.
    pub fn launched(&self) -> usize {
        self.shared.launched.load(Ordering::SeqCst)
    }

    /// Sessions closed so far.
    pub fn closed(&self) -> usize {
        self.shared.closed.load(Ordering::SeqCst)
    }

    /// Most sessions that were alive at the same time.
    pub fn peak_alive(&self) -> usize {
        self.shared.peak_alive.load(Ordering::SeqCst)
    }

    /// The last document a session was asked to load.
    pub fn last_document(&self) -> Option<String> {
        self.shared.last_document.lock().ok()?.clone()
    }

    /// The last wait parameters a session received.
    pub fn last_wait(&self) -> Option<LoadWait> {
        *self.shared.last_wait.lock().ok()?
    }

    /// The last settings a session was asked to print with.
    pub fn last_settings(&self) -> Option<PrintSettings> {
        self.shared.last_settings.lock().ok()?.clone()
    }

    fn failure(&self, stage: FailAt) -> Option<String> {
        (self.fail_at == Some(stage)).then(|| self.error_message.clone())
    }
}

impl Default for MockBrowserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserFactory for MockBrowserFactory {
    fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        if let Some(msg) = self.failure(FailAt::Launch) {
            log::debug!("MockBrowserFactory: Returning configured launch failure");
            return Err(RenderError::Launch(msg));
        }

        let shared = &self.shared;
        let number = shared.launched.fetch_add(1, Ordering::SeqCst) + 1;
        let alive = shared.alive.fetch_add(1, Ordering::SeqCst) + 1;
        shared.peak_alive.fetch_max(alive, Ordering::SeqCst);
        log::debug!("MockBrowserFactory: Launched session #{}", number);

        Ok(Box::new(MockSession {
            factory: self.clone(),
            page_open: false,
            closed: false,
        }))
    }
}

/// Session handed out by [`MockBrowserFactory`].
#[derive(Debug)]
pub struct MockSession {
    factory: MockBrowserFactory,
    page_open: bool,
    closed: bool,
}

impl BrowserSession for MockSession {
    fn open_page(&mut self) -> Result<()> {
        if let Some(msg) = self.factory.failure(FailAt::OpenPage) {
            return Err(RenderError::Page(msg));
        }
        self.page_open = true;
        Ok(())
    }

    fn load_document(&mut self, document: &str, wait: LoadWait) -> Result<()> {
        if !self.page_open {
            return Err(RenderError::Page("no page is open".to_string()));
        }
        if let Ok(mut slot) = self.factory.shared.last_document.lock() {
            *slot = Some(document.to_string());
        }
        if let Ok(mut slot) = self.factory.shared.last_wait.lock() {
            *slot = Some(wait);
        }
        if let Some(msg) = self.factory.failure(FailAt::Load) {
            return Err(RenderError::Navigation(msg));
        }
        Ok(())
    }

    fn print_pdf(&mut self, settings: &PrintSettings) -> Result<Vec<u8>> {
        if let Ok(mut slot) = self.factory.shared.last_settings.lock() {
            *slot = Some(settings.clone());
        }
        if !self.factory.print_delay.is_zero() {
            thread::sleep(self.factory.print_delay);
        }
        if let Some(msg) = self.factory.failure(FailAt::Print) {
            return Err(RenderError::Print(msg));
        }
        Ok(MOCK_PDF.to_vec())
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.factory.shared.alive.fetch_sub(1, Ordering::SeqCst);
        self.factory.shared.closed.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn wait() -> LoadWait {
        LoadWait {
            timeout: Duration::from_secs(1),
            idle_window: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_mock_full_cycle() {
        let factory = MockBrowserFactory::new();
        let mut session = factory.launch().unwrap();

        session.open_page().unwrap();
        session.load_document("<html></html>", wait()).unwrap();
        let pdf = session.print_pdf(&PrintSettings::default()).unwrap();
        session.close();

        assert!(pdf.starts_with(b"%PDF-"));
        assert_eq!(factory.launched(), 1);
        assert_eq!(factory.closed(), 1);
        assert_eq!(factory.last_document().as_deref(), Some("<html></html>"));
        assert_eq!(factory.last_wait(), Some(wait()));
        assert_eq!(factory.last_settings(), Some(PrintSettings::default()));
    }

    #[test]
    fn test_mock_launch_failure() {
        let factory = MockBrowserFactory::failing_at(FailAt::Launch, "no binary");

        match factory.launch() {
            Err(RenderError::Launch(msg)) => assert_eq!(msg, "no binary"),
            _ => panic!("Expected Launch error"),
        }
        assert_eq!(factory.launched(), 0);
    }

    #[test]
    fn test_mock_stage_failures() {
        let factory = MockBrowserFactory::failing_at(FailAt::Load, "dns");
        let mut session = factory.launch().unwrap();
        session.open_page().unwrap();
        assert!(matches!(
            session.load_document("x", wait()),
            Err(RenderError::Navigation(_))
        ));

        let factory = MockBrowserFactory::failing_at(FailAt::Print, "boom");
        let mut session = factory.launch().unwrap();
        assert!(matches!(
            session.print_pdf(&PrintSettings::default()),
            Err(RenderError::Print(_))
        ));
    }

    #[test]
    fn test_mock_close_is_idempotent() {
        let factory = MockBrowserFactory::new();
        let mut session = factory.launch().unwrap();
        session.close();
        session.close();
        assert_eq!(factory.closed(), 1);
    }

    #[test]
    fn test_mock_load_requires_page() {
        let factory = MockBrowserFactory::new();
        let mut session = factory.launch().unwrap();
        assert!(matches!(
            session.load_document("x", wait()),
            Err(RenderError::Page(_))
        ));
    }

    #[test]
    fn test_mock_peak_alive() {
        let factory = MockBrowserFactory::new();
        let mut a = factory.launch().unwrap();
        let mut b = factory.launch().unwrap();
        a.close();
        b.close();
        let _c = factory.launch().unwrap();
        assert_eq!(factory.peak_alive(), 2);
    }
}
