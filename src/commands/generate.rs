//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::generator::Generator;
use crate::Blog;

/// Generate the static site
pub fn run(blog: &Blog) -> Result<()> {
    let start = Instant::now();

    let store = blog.store()?;
    tracing::info!("Indexed {} articles", store.len());

    Generator::new(blog)?.generate(&store)?;

    tracing::info!("Generated in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Watch for file changes and regenerate
pub async fn watch(blog: &Blog) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(&blog.content_dir, notify::RecursiveMode::Recursive)?;

    let config_path = blog.base_dir.join("site.yml");
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    // Simple time-based debounce over the raw event stream
    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_) if last_rebuild.elapsed() > Duration::from_millis(500) => {
                tracing::info!("Content changed, regenerating...");
                if let Err(e) = run(blog) {
                    tracing::error!("Generation failed: {}", e);
                }
                last_rebuild = Instant::now();
            }
            Ok(_) => {}
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}
