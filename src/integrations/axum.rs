//! Axum framework integration.
//!
//! This module provides the ready-made [`router`] serving the PDF API, plus
//! the [`AppState`] its handlers share.
//!
//! # Setup
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! html2pdf-service = { version = "0.1", features = ["axum-integration"] }
//! axum = "0.8"
//! ```
//!
//! # Routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/pdf/generate-from-html` | `{html, css?}` → PDF |
//! | `POST` | `/pdf/generate-from-html-with-options` | `{html, options?}` → PDF |
//! | `OPTIONS` | both of the above | CORS preflight, `204` |
//! | `GET` | `/health` | `{"status":"healthy",...}` |
//! | `GET` | `/stats` | [`RenderStats`](crate::RenderStats) as JSON |
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use html2pdf_service::integrations::axum::router;
//! use html2pdf_service::{Renderer, RendererConfig, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let renderer = Renderer::from_config(RendererConfig::default());
//!     let config = ServerConfig::default();
//!
//!     let app = router(renderer, &config);
//!
//!     let listener = tokio::net::TcpListener::bind(config.bind_addr).await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```
//!
//! # Responses
//!
//! Success is `200` with `Content-Type: application/pdf`,
//! `Content-Disposition: attachment; filename=generated.pdf` and the PDF
//! bytes. Any render failure is `500` with
//! [`ErrorResponse`](crate::service::ErrorResponse) as JSON. Both carry the
//! configured CORS headers.

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_DISPOSITION, CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};

use crate::config::ServerConfig;
use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::service::{
    self, ErrorResponse, GenerateFromHtmlRequest, GenerateWithOptionsRequest, HealthResponse,
    PdfResponse,
};

/// Path of the stylesheet-only route.
pub const GENERATE_FROM_HTML_PATH: &str = "/pdf/generate-from-html";

/// Path of the full-options route.
pub const GENERATE_WITH_OPTIONS_PATH: &str = "/pdf/generate-from-html-with-options";

/// State shared by every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The renderer all requests go through.
    pub renderer: Renderer,
    cors_origin: Option<HeaderValue>,
}

impl AppState {
    /// Build handler state from a renderer and server configuration.
    pub fn new(renderer: Renderer, config: &ServerConfig) -> Self {
        let cors_origin = config.cors_allow_origin.as_deref().and_then(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| log::warn!("Ignoring CORS origin {:?}: {}", origin, e))
                .ok()
        });

        Self {
            renderer,
            cors_origin,
        }
    }

    /// CORS headers for PDF route responses. Empty when CORS is off.
    fn cors_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(origin) = &self.cors_origin {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            headers.insert(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("POST, OPTIONS"),
            );
            headers.insert(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type"),
            );
        }
        headers
    }

    fn pdf(&self, pdf: PdfResponse) -> Response {
        let mut headers = self.cors_headers();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
        if let Ok(value) = HeaderValue::from_str(&pdf.content_disposition()) {
            headers.insert(CONTENT_DISPOSITION, value);
        }
        (StatusCode::OK, headers, pdf.data).into_response()
    }

    fn render_failed(&self, err: &RenderError) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            self.cors_headers(),
            Json(ErrorResponse::render_failed(err)),
        )
            .into_response()
    }

    fn rejected(&self, rejection: JsonRejection) -> Response {
        log::warn!("Rejected request body: {}", rejection.body_text());
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        (
            status,
            self.cors_headers(),
            Json(ErrorResponse::invalid_body(rejection.body_text())),
        )
            .into_response()
    }
}

/// Build the router for the PDF API.
///
/// The body limit from `config` applies to every route.
pub fn router(renderer: Renderer, config: &ServerConfig) -> Router {
    let state = AppState::new(renderer, config);

    Router::new()
        .route(
            GENERATE_FROM_HTML_PATH,
            post(generate_from_html).options(preflight),
        )
        .route(
            GENERATE_WITH_OPTIONS_PATH,
            post(generate_from_html_with_options).options(preflight),
        )
        .route("/health", get(health))
        .route("/stats", get(stats))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .with_state(state)
}

async fn generate_from_html(
    State(state): State<AppState>,
    body: Result<Json<GenerateFromHtmlRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return state.rejected(rejection),
    };

    match service::generate_pdf_from_html(&state.renderer, request).await {
        Ok(pdf) => state.pdf(pdf),
        Err(e) => state.render_failed(&e),
    }
}

async fn generate_from_html_with_options(
    State(state): State<AppState>,
    body: Result<Json<GenerateWithOptionsRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return state.rejected(rejection),
    };

    match service::generate_pdf_from_html_with_options(&state.renderer, request).await {
        Ok(pdf) => state.pdf(pdf),
        Err(e) => state.render_failed(&e),
    }
}

async fn preflight(State(state): State<AppState>) -> Response {
    (StatusCode::NO_CONTENT, state.cors_headers()).into_response()
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

async fn stats(State(state): State<AppState>) -> Response {
    Json(service::get_render_stats(&state.renderer)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfigBuilder;
    use crate::engine::mock::MockBrowserFactory;

    fn renderer() -> Renderer {
        Renderer::builder()
            .factory(Box::new(MockBrowserFactory::new()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_cors_headers_default_origin() {
        let state = AppState::new(renderer(), &ServerConfig::default());
        let headers = state.cors_headers();

        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[test]
    fn test_cors_disabled() {
        let config = ServerConfigBuilder::new().disable_cors().build().unwrap();
        let state = AppState::new(renderer(), &config);

        assert!(state.cors_headers().is_empty());
    }

    #[test]
    fn test_render_failed_status() {
        let state = AppState::new(renderer(), &ServerConfig::default());
        let response = state.render_failed(&RenderError::Print("x".into()));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
