//! HTML to PDF HTTP service.
//!
//! Run with:
//! ```bash
//! CHROME_PATH=/usr/bin/chromium cargo run --release
//! ```
//!
//! Then:
//! ```bash
//! curl -X POST http://localhost:3000/pdf/generate-from-html \
//!      -H 'Content-Type: application/json' \
//!      -d '{"html":"<h1>Hello</h1>","css":"h1{color:navy}"}' \
//!      -o generated.pdf
//! ```

use html2pdf_service::integrations::axum::router;
use html2pdf_service::{init_renderer, server_from_env};
use tokio::net::TcpListener;
use tokio::signal;

/// Resolves when the process is asked to stop.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::info!("Shutdown signal received, draining in-flight requests...");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting html2pdf-service...");

    let renderer = init_renderer()?;
    let server_config = server_from_env()?;

    log::info!("Server configuration:");
    log::info!("   - Listen address: {}", server_config.bind_addr);
    log::info!(
        "   - CORS origin: {}",
        server_config.cors_allow_origin.as_deref().unwrap_or("disabled")
    );
    log::info!("   - Max body size: {} bytes", server_config.max_body_bytes);

    let app = router(renderer.clone(), &server_config);

    let listener = TcpListener::bind(server_config.bind_addr).await?;
    log::info!("✅ Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped. Final stats: {}", renderer.stats());
    Ok(())
}
