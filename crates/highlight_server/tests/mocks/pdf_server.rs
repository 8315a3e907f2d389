use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};

/// Local HTTP server standing in for remote PDF hosts.
///
/// `GET /<name>` answers `%PDF-1.7 <name>`, except `/missing.pdf` which is a 404.
pub struct PdfServer {
    pub base_url: String,
    pub hits: Arc<AtomicUsize>,
}

impl PdfServer {
    pub async fn start() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));

        let app = Router::new()
            .route("/{name}", get(serve))
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        Self {
            base_url: format!("http://{addr}"),
            hits,
        }
    }

    pub fn url(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn body_for(name: &str) -> Vec<u8> {
        format!("%PDF-1.7 {name}").into_bytes()
    }
}

async fn serve(
    State(hits): State<Arc<AtomicUsize>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    if name == "missing.pdf" {
        return (StatusCode::NOT_FOUND, Vec::new());
    }
    (StatusCode::OK, PdfServer::body_for(&name))
}
