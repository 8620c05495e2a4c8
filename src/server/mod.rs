//! Development server with streamed article pages and live reload
//!
//! Article pages are delivered in two phases: the shell (document head plus
//! skeleton placeholder) is sent as soon as the slug resolves, and the fill
//! fragment follows once the body has loaded. Each request works off an
//! immutable store snapshot; watch mode swaps the snapshot wholesale and
//! notifies connected clients over WebSocket.

use anyhow::Result;
use axum::{
    body::{Body, Bytes},
    extract::{
        ws::{Message, WebSocket},
        Path as UrlPath, State, WebSocketUpgrade,
    },
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tower_http::trace::TraceLayer;

use crate::compose::PageComposer;
use crate::content::ArticleStore;
use crate::meta::DocumentMeta;
use crate::Blog;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
})();
</script>
</body>
"#;

/// Server state
struct ServerState {
    blog: Blog,
    composer: PageComposer,
    store: RwLock<Arc<ArticleStore>>,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

impl ServerState {
    /// Current store snapshot; requests hold the snapshot they started with
    fn store(&self) -> Arc<ArticleStore> {
        self.store.read().expect("store lock poisoned").clone()
    }

    fn maybe_inject(&self, html: String) -> String {
        if self.live_reload {
            inject_live_reload(&html)
        } else {
            html
        }
    }
}

/// Start the development server
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let store = blog.store()?;
    tracing::info!("Indexed {} articles", store.len());

    let composer = PageComposer::new(&blog.config)?;
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        blog: blog.clone(),
        composer,
        store: RwLock::new(Arc::new(store)),
        reload_tx,
        live_reload: watch,
    });

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/articles/:slug", get(article_handler))
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let watch_state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(watch_state).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch the content directory and swap in a fresh store snapshot on change
async fn watch_and_reload(state: Arc<ServerState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if state.blog.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&state.blog.content_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", state.blog.content_dir);
    }

    let config_path = state.blog.base_dir.join("site.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|e| {
                    let path_str = e.path.to_string_lossy();
                    !path_str.contains(".git")
                        && !path_str.contains(".DS_Store")
                        && !path_str.ends_with('~')
                });
                if !relevant {
                    continue;
                }

                tracing::info!("Content changed, rebuilding article store...");
                match state.blog.store() {
                    Ok(new_store) => {
                        let count = new_store.len();
                        *state.store.write().expect("store lock poisoned") =
                            Arc::new(new_store);
                        tracing::info!("Store rebuilt, {} articles", count);
                        let _ = state.reload_tx.send(());
                    }
                    Err(e) => {
                        tracing::error!("Store rebuild failed: {}", e);
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Article index
async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let store = state.store();
    match state.composer.index_page(&store.sorted()) {
        Ok(html) => Html(state.maybe_inject(html)).into_response(),
        Err(e) => server_error(e),
    }
}

/// Two-phase article page: shell immediately, fill when the body resolves
async fn article_handler(
    State(state): State<Arc<ServerState>>,
    UrlPath(slug): UrlPath<String>,
) -> Response {
    let store = state.store();

    // Unknown slug: the whole page is the not-found response
    let Some(meta) = store.article(&slug).cloned() else {
        return not_found_response(&state);
    };

    let doc = DocumentMeta::for_article(&state.blog.config, &meta);
    let shell = match state.composer.article_shell(&doc) {
        Ok(shell) => shell,
        Err(e) => return server_error(e),
    };

    let (tx, rx) = mpsc::channel::<Result<Bytes, Infallible>>(2);
    tokio::spawn(async move {
        if tx.send(Ok(Bytes::from(shell))).await.is_err() {
            // Client went away; abandoning the request abandons the load
            return;
        }

        let body_store = store.clone();
        let body_slug = slug.clone();
        let loaded =
            tokio::task::spawn_blocking(move || body_store.load_body(&body_slug)).await;

        let fill = match loaded {
            Ok(Ok(Some(body))) => state.composer.article_fill(&meta, &body),
            Ok(Ok(None)) => {
                tracing::warn!("Body for {} resolved to absent", slug);
                state.composer.article_unavailable()
            }
            Ok(Err(e)) => {
                tracing::error!("Failed to load body for {}: {}", slug, e);
                state.composer.article_failed()
            }
            Err(e) => {
                tracing::error!("Body load task for {} panicked: {}", slug, e);
                state.composer.article_failed()
            }
        };

        match fill {
            Ok(fill) => {
                let _ = tx.send(Ok(Bytes::from(state.maybe_inject(fill)))).await;
            }
            Err(e) => {
                tracing::error!("Failed to compose fill for {}: {}", slug, e);
            }
        }
    });

    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(ReceiverStream::new(rx)),
    )
        .into_response()
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Fallback: serve article assets (hero images etc.), 404 everything else
async fn fallback_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let path = uri.path();

    if let Some(rest) = path.strip_prefix("/articles/") {
        // No path traversal out of the content directory
        if !rest.split('/').any(|c| c == "..") {
            let candidate = state.blog.content_dir.join(rest);
            if candidate.is_file() && !is_markdown(&candidate) {
                match tokio::fs::read(&candidate).await {
                    Ok(bytes) => {
                        return (
                            [(header::CONTENT_TYPE, content_type_for(&candidate))],
                            bytes,
                        )
                            .into_response();
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read asset {:?}: {}", candidate, e);
                    }
                }
            }
        }
    }

    not_found_response(&state)
}

fn not_found_response(state: &ServerState) -> Response {
    match state.composer.not_found_page() {
        Ok(html) => {
            (StatusCode::NOT_FOUND, Html(state.maybe_inject(html))).into_response()
        }
        Err(e) => server_error(e),
    }
}

fn server_error(e: anyhow::Error) -> Response {
    tracing::error!("Page composition failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// Content type from the file extension
fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
