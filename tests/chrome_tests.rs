//! End-to-end tests against a real Chrome/Chromium.
//!
//! Ignored by default. Run with:
//!
//! ```bash
//! CHROME_PATH=/usr/bin/chromium cargo test --test chrome_tests -- --ignored
//! ```

use html2pdf_service::prelude::*;

fn renderer() -> Renderer {
    let mut builder = RendererConfigBuilder::new().max_concurrent_renders(2);
    if let Ok(path) = std::env::var("CHROME_PATH") {
        builder = builder.chrome_path(path);
    }
    Renderer::from_config(builder.build().unwrap())
}

/// Count page objects (`/Type /Page`, not `/Type /Pages`).
fn page_count(pdf: &[u8]) -> usize {
    let needle = b"/Type /Page";
    pdf.windows(needle.len() + 1)
        .filter(|w| w.starts_with(needle) && w[needle.len()] != b's')
        .count()
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_renders_real_pdf() {
    let pdf = renderer()
        .render("<p>hi</p>".to_string(), RenderOptions::default())
        .await
        .unwrap();

    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(page_count(&pdf), 1);
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_repeated_renders_are_equivalent() {
    let renderer = renderer();
    let html = "<h1>Report</h1>".to_string() + &"<p>line</p>".repeat(200);
    let options = RenderOptions {
        format: Some(PageFormat::Letter),
        css: Some("p { margin: 0 0 8px; }".to_string()),
        ..Default::default()
    };

    let first = renderer.render(html.clone(), options.clone()).await.unwrap();
    let second = renderer.render(html, options).await.unwrap();

    assert!(page_count(&first) > 1);
    assert_eq!(page_count(&first), page_count(&second));
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_landscape_render() {
    let options = RenderOptions {
        format: Some(PageFormat::A3),
        landscape: Some(true),
        margin: Some(PageMargins::uniform("1cm")),
        print_background: Some(false),
        ..Default::default()
    };

    let pdf = renderer()
        .render("<div style='background:red'>x</div>".to_string(), options)
        .await
        .unwrap();

    assert!(pdf.starts_with(b"%PDF-"));
}

/// Documents larger than Chrome's URL limit still render.
#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_large_document_renders() {
    let html = "<p>0123456789abcdef</p>".repeat(150_000);
    assert!(html.len() > 2 * 1024 * 1024);

    let pdf = renderer()
        .render(html, RenderOptions::default())
        .await
        .unwrap();

    assert!(pdf.starts_with(b"%PDF-"));
    assert!(page_count(&pdf) > 1);
}

