use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use doc_datastore::DocumentCache;
use serde_json::{json, Value};
use tokio_util::io::ReaderStream;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::Error,
    highlights::render_highlights,
    llm::{chat::ChatModel, documents::DocumentProvider},
    types::Submission,
    yt::TranscriptFetcher,
    HighlightService,
};

type SharedService<F, M, P, C> = State<Arc<HighlightService<F, M, P, C>>>;

/// Builds the HTTP surface around `service`
pub fn router<F, M, P, C>(service: HighlightService<F, M, P, C>) -> Router
where
    F: TranscriptFetcher + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
    P: DocumentProvider + Send + Sync + 'static,
    C: DocumentCache + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(hello))
        .route("/serve/pdf/{file_name}", get(serve_pdf::<F, M, P, C>))
        .route("/submission/pdf", post(submit_pdf::<F, M, P, C>))
        .route("/submission/youtube", post(submit_youtube::<F, M, P, C>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(service))
}

async fn hello() -> Json<Value> {
    Json(json!({ "Hello": "World" }))
}

async fn serve_pdf<F, M, P, C>(
    State(service): SharedService<F, M, P, C>,
    Path(file_name): Path<String>,
) -> Result<Response, Error>
where
    F: TranscriptFetcher + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
    P: DocumentProvider + Send + Sync + 'static,
    C: DocumentCache + Send + Sync + 'static,
{
    let doc = service.cached_document(&file_name).await?;
    let file = tokio::fs::File::open(&doc.path).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", doc.display_name()),
        ),
    ];

    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

async fn submit_pdf<F, M, P, C>(
    State(service): SharedService<F, M, P, C>,
    Json(submission): Json<Submission>,
) -> Result<Highlights, Error>
where
    F: TranscriptFetcher + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
    P: DocumentProvider + Send + Sync + 'static,
    C: DocumentCache + Send + Sync + 'static,
{
    let highlights = service.document_highlights(&submission).await?;
    Ok(Highlights(render_highlights(&highlights)?))
}

async fn submit_youtube<F, M, P, C>(
    State(service): SharedService<F, M, P, C>,
    Json(submission): Json<Submission>,
) -> Result<Highlights, Error>
where
    F: TranscriptFetcher + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
    P: DocumentProvider + Send + Sync + 'static,
    C: DocumentCache + Send + Sync + 'static,
{
    let highlights = service.video_highlights(&submission).await?;
    Ok(Highlights(render_highlights(&highlights)?))
}

/// Rendered YAML highlight block
pub struct Highlights(pub String);

impl IntoResponse for Highlights {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, "application/yaml")], self.0).into_response()
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidVideoUrl(_) | Error::InvalidSubmission(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::TranscriptUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Upstream { .. } | Error::UnparseableOutput(_) | Error::InvalidModelOutput(_) => {
                StatusCode::BAD_GATEWAY
            }
            Error::ParseError(_)
            | Error::Cache(_)
            | Error::Request(_)
            | Error::Json(_)
            | Error::Yaml(_)
            | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
