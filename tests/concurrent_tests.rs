//! Concurrent rendering tests.

use html2pdf_service::engine::mock::MockBrowserFactory;
use html2pdf_service::prelude::*;
use std::time::Duration;
use tokio::task::JoinSet;

fn bounded_renderer(factory: &MockBrowserFactory, slots: usize) -> Renderer {
    Renderer::builder()
        .config(
            RendererConfigBuilder::new()
                .max_concurrent_renders(slots)
                .build()
                .unwrap(),
        )
        .factory(Box::new(factory.clone()))
        .build()
        .unwrap()
}

/// No more engines than slots are ever alive at once.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_is_bounded() {
    let factory = MockBrowserFactory::new().with_print_delay(Duration::from_millis(100));
    let renderer = bounded_renderer(&factory, 2);

    let mut tasks = JoinSet::new();
    for i in 0..8 {
        let renderer = renderer.clone();
        tasks.spawn(async move {
            renderer
                .render(format!("<p>{}</p>", i), RenderOptions::default())
                .await
        });
    }

    while let Some(result) = tasks.join_next().await {
        let pdf = result.expect("task panicked").expect("render failed");
        assert!(pdf.starts_with(b"%PDF-"));
    }

    assert_eq!(factory.launched(), 8);
    assert_eq!(factory.closed(), 8);
    assert!(factory.peak_alive() <= 2, "peak was {}", factory.peak_alive());

    let stats = renderer.stats();
    assert_eq!(stats.completed, 8);
    assert_eq!(stats.in_flight, 0);
    assert_eq!(stats.available_slots, 2);
}

/// Stats can be read from many tasks while renders run.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_stats_access() {
    let factory = MockBrowserFactory::new().with_print_delay(Duration::from_millis(20));
    let renderer = bounded_renderer(&factory, 3);

    let mut tasks = JoinSet::new();

    for _ in 0..5 {
        let renderer = renderer.clone();
        tasks.spawn(async move {
            renderer
                .render("<p>x</p>".to_string(), RenderOptions::default())
                .await
                .map(|_| ())
        });
    }

    for _ in 0..10 {
        let renderer = renderer.clone();
        tasks.spawn(async move {
            for _ in 0..100 {
                let stats = renderer.stats();
                assert!(stats.in_flight <= stats.capacity);
            }
            Ok(())
        });
    }

    while let Some(result) = tasks.join_next().await {
        assert!(result.is_ok(), "Task should complete without panic");
    }

    assert_eq!(renderer.stats().completed, 5);
}
