//! RAII guard for browser sessions.
//!
//! This module provides [`SessionGuard`], which owns a launched
//! [`BrowserSession`] and closes it when dropped.
//!
//! # Overview
//!
//! Every render launches its own browser. The guard makes sure that
//! browser is shut down no matter how the render ends:
//! - The render succeeds
//! - A step returns an error and `?` exits early
//! - A panic unwinds through the render
//!
//! # Usage Pattern
//!
//! ```rust,ignore
//! let mut session = SessionGuard::new(factory.launch()?);
//!
//! // Use it like the session itself (via DerefMut)
//! session.open_page()?;
//! session.load_document(&document, wait)?;
//! let pdf = session.print_pdf(&settings)?;
//!
//! // Browser closed when `session` goes out of scope
//! ```

use std::ops::{Deref, DerefMut};

use crate::engine::BrowserSession;

/// Owns one browser session and closes it on drop.
///
/// # Thread Safety
///
/// `SessionGuard` is `Send` but not `Sync`: a render moves it onto a
/// blocking thread and uses it exclusively there.
pub struct SessionGuard {
    session: Box<dyn BrowserSession>,
    closed: bool,
}

impl SessionGuard {
    /// Take ownership of a freshly launched session.
    pub fn new(session: Box<dyn BrowserSession>) -> Self {
        Self {
            session,
            closed: false,
        }
    }

    /// Close the session now instead of at end of scope.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if !self.closed {
            self.closed = true;
            self.session.close();
            log::debug!("SessionGuard: browser session closed");
        }
    }
}

impl Deref for SessionGuard {
    type Target = dyn BrowserSession;

    fn deref(&self) -> &Self::Target {
        self.session.as_ref()
    }
}

impl DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session.as_mut()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("closed", &self.closed)
            .finish()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
