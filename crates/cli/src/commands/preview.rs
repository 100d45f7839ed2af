use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Path as UrlPath, State},
    http::{StatusCode, Uri, header},
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use blog_kit_core::{Slug, load_site};
use blog_kit_generator::{GenerateOptions, GeneratedSite, generate_site};
use blog_kit_views::{CountResponse, MemoryViewStore, ViewCountStore};
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::{RwLock, broadcast};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
struct AppState {
    site: Arc<RwLock<GeneratedSite>>,
    views: Arc<MemoryViewStore>,
    reload_tx: broadcast::Sender<()>,
}

/// Start preview server with hot reload for local development.
///
/// This command:
/// - Loads site.toml and the content directory
/// - Renders the site in memory (nothing is written to disk)
/// - Answers `/views/{slug}` from an in-memory counter store
/// - Watches for file changes, rebuilds and triggers hot reload
pub async fn run(path: PathBuf, port: u16) -> Result<()> {
    println!("📝 Starting preview server...");
    println!("   Site: {}", path.display());

    if !path.exists() {
        anyhow::bail!(
            "Site directory does not exist: {}\nRun 'blog-kit init {}' first",
            path.display(),
            path.display()
        );
    }

    let generated = render(&path).context("Failed to build site")?;
    println!("   ✓ Rendered {} pages", generated.pages.len());

    let (reload_tx, _) = broadcast::channel::<()>(100);

    let state = AppState {
        site: Arc::new(RwLock::new(generated)),
        views: Arc::new(MemoryViewStore::new()),
        reload_tx: reload_tx.clone(),
    };

    let watcher_path = path.clone();
    let watcher_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = watch_files(watcher_path, watcher_state).await {
            eprintln!("File watcher error: {}", e);
        }
    });

    let app = router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\n🚀 Preview ready at: http://localhost:{}", port);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn render(path: &Path) -> Result<GeneratedSite> {
    let bundle = load_site(path)?;
    Ok(generate_site(
        &bundle.site,
        &bundle.index,
        GenerateOptions { is_preview: true },
    ))
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/_reload", get(sse_handler))
        .route("/views/{slug}", get(get_views).post(increment_views))
        .fallback(page_handler)
        .with_state(state)
}

/// Watch for file changes, rebuild and trigger reload
async fn watch_files(path: PathBuf, state: AppState) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    watcher.watch(&path, RecursiveMode::Recursive)?;

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                // Filter out temporary files and hidden files
                if !event.paths.iter().any(|p| {
                    let filename = p.file_name().unwrap_or_default().to_string_lossy();
                    !filename.starts_with('.') && !filename.ends_with('~')
                }) {
                    continue;
                }

                match render(&path) {
                    Ok(generated) => {
                        *state.site.write().await = generated;
                        println!("   📝 File changed, reloading...");
                        let _ = state.reload_tx.send(());
                    }
                    Err(e) => eprintln!("   ⚠ Rebuild failed, keeping last good site: {:#}", e),
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// SSE endpoint for hot reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            if rx.recv().await.is_ok() {
                yield Ok(Event::default().data("reload"));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn get_views(State(state): State<AppState>, UrlPath(slug): UrlPath<String>) -> Response {
    let slug = match Slug::parse(&slug) {
        Ok(slug) => slug,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    match state.views.get_count(slug.as_str()).await {
        Ok(count) => Json(CountResponse { count }).into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response(),
    }
}

async fn increment_views(
    State(state): State<AppState>,
    UrlPath(slug): UrlPath<String>,
) -> Response {
    let slug = match Slug::parse(&slug) {
        Ok(slug) => slug,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    match state.views.increment(slug.as_str()).await {
        Ok(count) => Json(CountResponse { count }).into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response(),
    }
}

/// Map a request path to the generated files that could answer it
fn candidate_paths(request_path: &str) -> Vec<String> {
    let trimmed = request_path.trim_start_matches('/');
    if trimmed.is_empty() {
        return vec!["index.html".to_string()];
    }
    if trimmed.ends_with('/') {
        return vec![format!("{}index.html", trimmed)];
    }
    vec![trimmed.to_string(), format!("{}/index.html", trimmed)]
}

/// Serve generated pages and assets; anything else gets the 404 page
async fn page_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let site = state.site.read().await;

    for candidate in candidate_paths(uri.path()) {
        if let Some(html) = site.page(&candidate) {
            return Html(html.to_string()).into_response();
        }
        if let Some(data) = site.asset(&candidate) {
            let content_type = if candidate.ends_with(".js") {
                "text/javascript; charset=utf-8"
            } else {
                "application/octet-stream"
            };
            return ([(header::CONTENT_TYPE, content_type)], data.to_vec()).into_response();
        }
    }

    let not_found = site.page("404.html").unwrap_or("Not found").to_string();
    (StatusCode::NOT_FOUND, Html(not_found)).into_response()
}
