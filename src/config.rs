//! Configuration for the renderer and the HTTP server.
//!
//! This module provides [`RendererConfig`] and [`ServerConfig`] with their
//! validating builders.
//!
//! # Example
//!
//! ```rust
//! use html2pdf_service::RendererConfigBuilder;
//! use std::time::Duration;
//!
//! let config = RendererConfigBuilder::new()
//!     .chrome_path("/usr/bin/chromium")
//!     .navigation_timeout(Duration::from_secs(15))
//!     .max_concurrent_renders(2)
//!     .build()
//!     .expect("Invalid configuration");
//!
//! assert_eq!(config.max_concurrent_renders, 2);
//! ```
//!
//! # Environment Configuration
//!
//! When the `env-config` feature is enabled, configuration can be loaded
//! from environment variables (and an optional `app.env` file) via
//! [`env::renderer_from_env`] and [`env::server_from_env`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Engine executable used when nothing else is configured.
pub const DEFAULT_CHROME_PATH: &str = "/usr/bin/chromium-browser";

/// Browser window size, which also serves as the layout viewport.
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (1920, 1080);

/// Renderer configuration.
///
/// # Fields
///
/// | Field | Default | Meaning |
/// |-------|---------|---------|
/// | `chrome_path` | `None` (auto-detect) | Engine executable |
/// | `window_size` | 1920×1080 | Browser window size |
/// | `navigation_timeout` | 30s | Bound on content load and network-idle wait |
/// | `network_idle_window` | 500ms | Quiet period that counts as idle |
/// | `render_timeout` | 60s | Bound on one whole render call |
/// | `max_concurrent_renders` | 5 | Simultaneous engine instances |
/// | `base_stylesheet` | `None` | CSS injected ahead of the caller's |
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Engine executable. `None` lets `headless_chrome` locate one.
    pub chrome_path: Option<PathBuf>,

    /// Browser window size in pixels.
    pub window_size: (u32, u32),

    /// Maximum time for loading a document and waiting for it to go idle.
    ///
    /// Content that keeps the network busy (long polling, streaming
    /// connections) fails the render once this elapses.
    pub navigation_timeout: Duration,

    /// How long the page must stay quiet before it counts as idle.
    pub network_idle_window: Duration,

    /// Maximum time for a whole render, including waiting for a free slot.
    pub render_timeout: Duration,

    /// Maximum number of engine processes alive at once.
    ///
    /// Every render launches a full browser, so this caps CPU, memory and
    /// process-table usage under load.
    pub max_concurrent_renders: usize,

    /// Named stylesheet prepended to every document.
    ///
    /// Emitted as its own `<style>` element before the caller's stylesheet.
    pub base_stylesheet: Option<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            window_size: DEFAULT_WINDOW_SIZE,
            navigation_timeout: Duration::from_secs(30),
            network_idle_window: Duration::from_millis(500),
            render_timeout: Duration::from_secs(60),
            max_concurrent_renders: 5,
            base_stylesheet: None,
        }
    }
}

/// Builder for [`RendererConfig`] with validation.
///
/// # Validation Rules
///
/// - `max_concurrent_renders` must be greater than 0
/// - `navigation_timeout` must be greater than 0
/// - `network_idle_window` must be shorter than `navigation_timeout`
/// - `render_timeout` must be at least `navigation_timeout`
pub struct RendererConfigBuilder {
    config: RendererConfig,
}

impl RendererConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: RendererConfig::default(),
        }
    }

    /// Set the engine executable path.
    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Let `headless_chrome` locate the engine executable.
    pub fn auto_detect_chrome(mut self) -> Self {
        self.config.chrome_path = None;
        self
    }

    /// Set the browser window size.
    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.config.window_size = (width, height);
        self
    }

    /// Set the load and network-idle timeout.
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.config.navigation_timeout = timeout;
        self
    }

    /// Set the quiet period that counts as network idle.
    pub fn network_idle_window(mut self, window: Duration) -> Self {
        self.config.network_idle_window = window;
        self
    }

    /// Set the timeout for a whole render call.
    pub fn render_timeout(mut self, timeout: Duration) -> Self {
        self.config.render_timeout = timeout;
        self
    }

    /// Set the maximum number of simultaneous engine instances.
    pub fn max_concurrent_renders(mut self, max: usize) -> Self {
        self.config.max_concurrent_renders = max;
        self
    }

    /// Set the stylesheet injected ahead of every caller stylesheet.
    pub fn base_stylesheet(mut self, css: impl Into<String>) -> Self {
        self.config.base_stylesheet = Some(css.into());
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated rule.
    pub fn build(self) -> std::result::Result<RendererConfig, String> {
        let config = self.config;

        if config.max_concurrent_renders == 0 {
            return Err("max_concurrent_renders must be greater than 0".to_string());
        }

        if config.navigation_timeout.is_zero() {
            return Err("navigation_timeout must be greater than 0".to_string());
        }

        if config.network_idle_window >= config.navigation_timeout {
            return Err("network_idle_window must be shorter than navigation_timeout".to_string());
        }

        if config.render_timeout < config.navigation_timeout {
            return Err("render_timeout cannot be shorter than navigation_timeout".to_string());
        }

        if config.window_size.0 == 0 || config.window_size.1 == 0 {
            return Err("window_size dimensions must be greater than 0".to_string());
        }

        Ok(config)
    }
}

impl Default for RendererConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub bind_addr: SocketAddr,

    /// Value of `Access-Control-Allow-Origin`; `None` omits CORS headers.
    pub cors_allow_origin: Option<String>,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors_allow_origin: Some("*".to_string()),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Builder for [`ServerConfig`] with validation.
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Set the listen address.
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// Set the allowed CORS origin.
    pub fn cors_allow_origin(mut self, origin: impl Into<String>) -> Self {
        self.config.cors_allow_origin = Some(origin.into());
        self
    }

    /// Omit CORS headers from responses.
    pub fn disable_cors(mut self) -> Self {
        self.config.cors_allow_origin = None;
        self
    }

    /// Set the request body limit.
    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.config.max_body_bytes = bytes;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> std::result::Result<ServerConfig, String> {
        if self.config.max_body_bytes == 0 {
            return Err("max_body_bytes must be greater than 0".to_string());
        }

        if let Some(origin) = &self.config.cors_allow_origin {
            // Same character set a header value accepts.
            let valid = !origin.is_empty()
                && origin.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b));
            if !valid {
                return Err(format!("cors_allow_origin is not a valid header value: {:?}", origin));
            }
        }

        Ok(self.config)
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Environment Configuration (feature-gated)
// ============================================================================

/// Environment-based configuration loading.
///
/// Reads an optional `app.env` file, then the process environment.
///
/// # Environment Variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `CHROME_PATH` | `/usr/bin/chromium-browser` | Engine executable (`PUPPETEER_EXECUTABLE_PATH` accepted as fallback) |
/// | `RENDER_NAVIGATION_TIMEOUT_SECONDS` | 30 | Load and network-idle timeout |
/// | `RENDER_NETWORK_IDLE_MS` | 500 | Idle quiet window |
/// | `RENDER_TIMEOUT_SECONDS` | 60 | Whole render timeout |
/// | `RENDER_MAX_CONCURRENT` | 5 | Simultaneous engine instances |
/// | `BASE_STYLESHEET_PATH` | unset | File with CSS injected before the caller's |
/// | `SERVER_ADDR` | `0.0.0.0:3000` | Listen address |
/// | `CORS_ALLOW_ORIGIN` | `*` | CORS origin, `none` to disable |
/// | `MAX_BODY_BYTES` | 10485760 | Request body limit |
#[cfg(feature = "env-config")]
pub mod env {
    use super::*;
    use crate::error::RenderError;

    /// Default environment file name.
    pub const ENV_FILE_NAME: &str = "app.env";

    /// Load `app.env` into the process environment if present.
    pub fn load_env_file() -> Result<PathBuf, dotenvy::Error> {
        dotenvy::from_filename(ENV_FILE_NAME)
    }

    /// Load renderer configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Configuration`] if the base stylesheet cannot
    /// be read or the resulting values fail validation.
    pub fn renderer_from_env() -> Result<RendererConfig, RenderError> {
        match load_env_file() {
            Ok(path) => log::info!("Loaded configuration from: {:?}", path),
            Err(e) => log::debug!(
                "No {} file found or failed to load: {} (using environment variables and defaults)",
                ENV_FILE_NAME,
                e
            ),
        }

        renderer_from_lookup(|key| std::env::var(key).ok())
    }

    /// Load renderer configuration through an arbitrary variable lookup.
    pub fn renderer_from_lookup<F>(lookup: F) -> Result<RendererConfig, RenderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RendererConfig::default();

        let chrome_path = chrome_path_from_lookup(&lookup);

        let navigation_timeout = parse_or(&lookup, "RENDER_NAVIGATION_TIMEOUT_SECONDS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.navigation_timeout);

        let idle_window = parse_or(&lookup, "RENDER_NETWORK_IDLE_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.network_idle_window);

        let render_timeout = parse_or(&lookup, "RENDER_TIMEOUT_SECONDS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.render_timeout);

        let max_concurrent = parse_or(&lookup, "RENDER_MAX_CONCURRENT")
            .unwrap_or(defaults.max_concurrent_renders);

        log::info!("Loading renderer configuration from environment:");
        log::info!("   - Chrome path: {}", chrome_path.display());
        log::info!("   - Navigation timeout: {}s", navigation_timeout.as_secs());
        log::info!("   - Network idle window: {}ms", idle_window.as_millis());
        log::info!("   - Render timeout: {}s", render_timeout.as_secs());
        log::info!("   - Max concurrent renders: {}", max_concurrent);

        let mut builder = RendererConfigBuilder::new()
            .chrome_path(chrome_path)
            .navigation_timeout(navigation_timeout)
            .network_idle_window(idle_window)
            .render_timeout(render_timeout)
            .max_concurrent_renders(max_concurrent);

        if let Some(path) = lookup("BASE_STYLESHEET_PATH") {
            let css = std::fs::read_to_string(&path).map_err(|e| {
                RenderError::Configuration(format!("cannot read base stylesheet {}: {}", path, e))
            })?;
            log::info!("   - Base stylesheet: {} ({} bytes)", path, css.len());
            builder = builder.base_stylesheet(css);
        }

        builder.build().map_err(RenderError::Configuration)
    }

    /// Load server configuration from the process environment.
    pub fn server_from_env() -> Result<ServerConfig, RenderError> {
        server_from_lookup(|key| std::env::var(key).ok())
    }

    /// Load server configuration through an arbitrary variable lookup.
    pub fn server_from_lookup<F>(lookup: F) -> Result<ServerConfig, RenderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = ServerConfigBuilder::new();

        if let Some(addr) = lookup("SERVER_ADDR") {
            let addr = addr.parse::<SocketAddr>().map_err(|e| {
                RenderError::Configuration(format!("invalid SERVER_ADDR {:?}: {}", addr, e))
            })?;
            builder = builder.bind_addr(addr);
        }

        match lookup("CORS_ALLOW_ORIGIN") {
            Some(origin) if origin.eq_ignore_ascii_case("none") => builder = builder.disable_cors(),
            Some(origin) => builder = builder.cors_allow_origin(origin),
            None => {}
        }

        if let Some(bytes) = parse_or(&lookup, "MAX_BODY_BYTES") {
            builder = builder.max_body_bytes(bytes);
        }

        builder.build().map_err(RenderError::Configuration)
    }

    /// Engine executable from `CHROME_PATH`, falling back to
    /// `PUPPETEER_EXECUTABLE_PATH`, then [`DEFAULT_CHROME_PATH`].
    pub fn chrome_path_from_env() -> PathBuf {
        chrome_path_from_lookup(|key| std::env::var(key).ok())
    }

    fn chrome_path_from_lookup<F>(lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup("CHROME_PATH")
            .or_else(|| lookup("PUPPETEER_EXECUTABLE_PATH"))
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CHROME_PATH))
    }

    fn parse_or<F, T>(lookup: &F, key: &str) -> Option<T>
    where
        F: Fn(&str) -> Option<String>,
        T: std::str::FromStr,
    {
        let raw = lookup(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring unparsable {}={:?}, using default", key, raw);
                None
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RendererConfig::default();

        assert!(config.chrome_path.is_none());
        assert_eq!(config.window_size, (1920, 1080));
        assert_eq!(config.navigation_timeout, Duration::from_secs(30));
        assert_eq!(config.network_idle_window, Duration::from_millis(500));
        assert_eq!(config.render_timeout, Duration::from_secs(60));
        assert_eq!(config.max_concurrent_renders, 5);
        assert!(config.base_stylesheet.is_none());
    }

    #[test]
    fn test_config_builder_chaining() {
        let config = RendererConfigBuilder::new()
            .chrome_path("/opt/chrome/chrome")
            .window_size(1280, 720)
            .navigation_timeout(Duration::from_secs(10))
            .network_idle_window(Duration::from_millis(250))
            .render_timeout(Duration::from_secs(20))
            .max_concurrent_renders(8)
            .base_stylesheet("body { margin: 0 }")
            .build()
            .unwrap();

        assert_eq!(config.chrome_path, Some(PathBuf::from("/opt/chrome/chrome")));
        assert_eq!(config.window_size, (1280, 720));
        assert_eq!(config.navigation_timeout.as_secs(), 10);
        assert_eq!(config.network_idle_window.as_millis(), 250);
        assert_eq!(config.render_timeout.as_secs(), 20);
        assert_eq!(config.max_concurrent_renders, 8);
        assert_eq!(config.base_stylesheet.as_deref(), Some("body { margin: 0 }"));
    }

    #[test]
    fn test_config_validation() {
        let err = RendererConfigBuilder::new()
            .max_concurrent_renders(0)
            .build()
            .unwrap_err();
        assert!(err.contains("max_concurrent_renders must be greater than 0"));

        let err = RendererConfigBuilder::new()
            .navigation_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(err.contains("navigation_timeout must be greater than 0"));

        let err = RendererConfigBuilder::new()
            .navigation_timeout(Duration::from_secs(1))
            .network_idle_window(Duration::from_secs(2))
            .build()
            .unwrap_err();
        assert!(err.contains("network_idle_window"));

        let err = RendererConfigBuilder::new()
            .navigation_timeout(Duration::from_secs(30))
            .render_timeout(Duration::from_secs(10))
            .build()
            .unwrap_err();
        assert!(err.contains("render_timeout"));

        let err = RendererConfigBuilder::new()
            .window_size(0, 1080)
            .build()
            .unwrap_err();
        assert!(err.contains("window_size"));
    }

    #[test]
    fn test_builder_default() {
        let builder: RendererConfigBuilder = Default::default();
        let config = builder.build().unwrap();
        assert_eq!(config.max_concurrent_renders, 5);
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfigBuilder::new().build().unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.cors_allow_origin.as_deref(), Some("*"));
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_server_config_validation() {
        assert!(ServerConfigBuilder::new().max_body_bytes(0).build().is_err());
        assert!(ServerConfigBuilder::new()
            .cors_allow_origin("https://a.example\n")
            .build()
            .is_err());
        assert!(ServerConfigBuilder::new().cors_allow_origin("").build().is_err());

        let config = ServerConfigBuilder::new()
            .cors_allow_origin("https://app.example")
            .build()
            .unwrap();
        assert_eq!(config.cors_allow_origin.as_deref(), Some("https://app.example"));

        let config = ServerConfigBuilder::new().disable_cors().build().unwrap();
        assert!(config.cors_allow_origin.is_none());
    }

    #[cfg(feature = "env-config")]
    mod env_tests {
        use super::super::env::*;
        use super::super::*;
        use std::collections::HashMap;

        fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
            let map: HashMap<String, String> = vars
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            move |key: &str| map.get(key).cloned()
        }

        #[test]
        fn test_renderer_from_empty_env_uses_fixed_chrome_path() {
            let config = renderer_from_lookup(lookup(&[])).unwrap();
            assert_eq!(config.chrome_path, Some(PathBuf::from(DEFAULT_CHROME_PATH)));
            assert_eq!(config.navigation_timeout, Duration::from_secs(30));
            assert_eq!(config.max_concurrent_renders, 5);
        }

        #[test]
        fn test_renderer_from_env_values() {
            let config = renderer_from_lookup(lookup(&[
                ("CHROME_PATH", "/opt/google/chrome/chrome"),
                ("RENDER_NAVIGATION_TIMEOUT_SECONDS", "12"),
                ("RENDER_NETWORK_IDLE_MS", "300"),
                ("RENDER_TIMEOUT_SECONDS", "40"),
                ("RENDER_MAX_CONCURRENT", "2"),
            ]))
            .unwrap();

            assert_eq!(
                config.chrome_path,
                Some(PathBuf::from("/opt/google/chrome/chrome"))
            );
            assert_eq!(config.navigation_timeout, Duration::from_secs(12));
            assert_eq!(config.network_idle_window, Duration::from_millis(300));
            assert_eq!(config.render_timeout, Duration::from_secs(40));
            assert_eq!(config.max_concurrent_renders, 2);
        }

        #[test]
        fn test_puppeteer_path_is_a_fallback() {
            let config = renderer_from_lookup(lookup(&[(
                "PUPPETEER_EXECUTABLE_PATH",
                "/usr/bin/chromium",
            )]))
            .unwrap();
            assert_eq!(config.chrome_path, Some(PathBuf::from("/usr/bin/chromium")));

            let config = renderer_from_lookup(lookup(&[
                ("PUPPETEER_EXECUTABLE_PATH", "/usr/bin/chromium"),
                ("CHROME_PATH", "/usr/bin/google-chrome"),
            ]))
            .unwrap();
            assert_eq!(
                config.chrome_path,
                Some(PathBuf::from("/usr/bin/google-chrome"))
            );
        }

        #[test]
        fn test_unparsable_values_fall_back_to_defaults() {
            let config = renderer_from_lookup(lookup(&[
                ("RENDER_MAX_CONCURRENT", "lots"),
                ("RENDER_TIMEOUT_SECONDS", "-1"),
            ]))
            .unwrap();
            assert_eq!(config.max_concurrent_renders, 5);
            assert_eq!(config.render_timeout, Duration::from_secs(60));
        }

        #[test]
        fn test_invalid_env_combination_is_rejected() {
            let result = renderer_from_lookup(lookup(&[("RENDER_MAX_CONCURRENT", "0")]));
            assert!(matches!(
                result,
                Err(crate::error::RenderError::Configuration(_))
            ));
        }

        #[test]
        fn test_missing_base_stylesheet_file_is_an_error() {
            let result = renderer_from_lookup(lookup(&[(
                "BASE_STYLESHEET_PATH",
                "/definitely/not/here/theme.css",
            )]));
            assert!(result.is_err());
        }

        #[test]
        fn test_server_from_env() {
            let config = server_from_lookup(lookup(&[
                ("SERVER_ADDR", "127.0.0.1:8080"),
                ("CORS_ALLOW_ORIGIN", "https://app.example"),
                ("MAX_BODY_BYTES", "1024"),
            ]))
            .unwrap();
            assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
            assert_eq!(config.cors_allow_origin.as_deref(), Some("https://app.example"));
            assert_eq!(config.max_body_bytes, 1024);

            let config = server_from_lookup(lookup(&[("CORS_ALLOW_ORIGIN", "none")])).unwrap();
            assert!(config.cors_allow_origin.is_none());

            assert!(server_from_lookup(lookup(&[("SERVER_ADDR", "not an addr")])).is_err());
        }
    }
}
