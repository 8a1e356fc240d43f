//! Development server with live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{ws::Message, State, WebSocketUpgrade},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::commands::generate;
use crate::config::ApiConfig;
use crate::Site;

const RELOAD_PATH: &str = "/__livereload";

/// Reloads the page whenever the socket receives a message
const RELOAD_SCRIPT: &str = "<script>new WebSocket('ws://' + location.host + '/__livereload').onmessage = function () { location.reload(); };</script>";

struct ServerState {
    public_dir: PathBuf,
    rebuilt: broadcast::Sender<()>,
    live_reload: bool,
}

/// Build the router serving the public directory
fn router(public_dir: PathBuf, rebuilt: broadcast::Sender<()>, live_reload: bool) -> Router {
    let state = Arc::new(ServerState {
        public_dir,
        rebuilt,
        live_reload,
    });

    Router::new()
        .route(RELOAD_PATH, get(reload_socket))
        .fallback(serve_file)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the development server
///
/// With `watch`, the site is rebuilt on changes and open pages reload.
pub async fn start(site: &Site, api: &ApiConfig, ip: &str, port: u16, watch: bool) -> Result<()> {
    let (rebuilt, _) = broadcast::channel::<()>(16);
    let app = router(site.public_dir.clone(), rebuilt.clone(), watch);

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if watch {
        let base_dir = site.base_dir.clone();
        let api = api.clone();
        tokio::spawn(async move {
            let notify = move |_: &crate::generator::Report| {
                let _ = rebuilt.send(());
            };
            if let Err(e) = generate::watch(base_dir, api, notify).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Push a `reload` message to the page after every rebuild
async fn reload_socket(ws: WebSocketUpgrade, State(state): State<Arc<ServerState>>) -> Response {
    let mut rebuilds = state.rebuilt.subscribe();
    ws.on_upgrade(move |mut socket| async move {
        while let Ok(()) | Err(RecvError::Lagged(_)) = rebuilds.recv().await {
            if socket.send(Message::Text("reload".into())).await.is_err() {
                break;
            }
        }
    })
}

/// Serve a file from the public directory, adding the reload script to pages
async fn serve_file(State(state): State<Arc<ServerState>>, request: Request<Body>) -> Response {
    let file = resolve_path(&state.public_dir, request.uri().path());

    if state.live_reload && file.extension().is_some_and(|ext| ext == "html") {
        return match tokio::fs::read_to_string(&file).await {
            Ok(page) => Html(with_reload_script(&page)).into_response(),
            Err(_) => StatusCode::NOT_FOUND.into_response(),
        };
    }

    match ServeDir::new(&state.public_dir).try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Map a request path onto a file under the public directory
///
/// `/course/1` resolves to `course/1/index.html`, mirroring how the
/// generator lays out pages.
fn resolve_path(public_dir: &Path, path: &str) -> PathBuf {
    let clean_path = path.trim_start_matches('/');
    if clean_path.split('/').any(|segment| segment == "..") {
        return public_dir.join("__not_found__");
    }

    let candidate = public_dir.join(clean_path);
    if candidate.is_dir() {
        candidate.join("index.html")
    } else if candidate.exists() {
        candidate
    } else {
        let with_html = public_dir.join(format!("{}.html", clean_path));
        if with_html.exists() {
            with_html
        } else {
            candidate
        }
    }
}

fn with_reload_script(page: &str) -> String {
    match page.rfind("</body>") {
        Some(at) => format!("{}{}{}", &page[..at], RELOAD_SCRIPT, &page[at..]),
        None => format!("{}{}", page, RELOAD_SCRIPT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolve_path() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path();
        fs::create_dir_all(public.join("course/1")).unwrap();
        fs::write(public.join("index.html"), "home").unwrap();
        fs::write(public.join("course/1/index.html"), "intro").unwrap();

        assert_eq!(resolve_path(public, "/"), public.join("index.html"));
        assert_eq!(
            resolve_path(public, "/course/1"),
            public.join("course/1/index.html")
        );
        assert_eq!(
            resolve_path(public, "/course/2"),
            public.join("course/2")
        );
        assert_eq!(
            resolve_path(public, "/../etc/passwd"),
            public.join("__not_found__")
        );
    }

    #[test]
    fn test_with_reload_script() {
        let page = with_reload_script("<html><body><p>x</p></body></html>");
        assert!(page.contains("/__livereload"));
        assert!(page.ends_with("</script></body></html>"));

        let bare = with_reload_script("<p>x</p>");
        assert!(bare.starts_with("<p>x</p><script>"));
    }

    #[tokio::test]
    async fn test_serves_generated_page() {
        use tower::ServiceExt;

        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("course/1")).unwrap();
        fs::write(
            dir.path().join("course/1/index.html"),
            "<html><body>Intro</body></html>",
        )
        .unwrap();

        let (reload_tx, _) = broadcast::channel(1);
        let app = router(dir.path().to_path_buf(), reload_tx, true);

        let response = app
            .oneshot(Request::get("/course/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Intro"));
        assert!(body.contains("/__livereload"));
    }
}
