//! HTTP preview server.
//!
//! A browser stand-in for the desktop preview pane: upload a source file,
//! get the converted records back. Saving happens client-side from the
//! `output` field.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Health check                         |
//! | POST   | `/api/convert`    | Upload a source file for conversion  |
//! | GET    | `/api/logs`       | SSE stream for real-time logs        |

use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{error_response, ConvertResponse};
use crate::config::MAX_UPLOAD_SIZE;
use crate::error::{ServerError, ServerResult};
use crate::transform::pipeline::convert_bytes;

type ApiError = (StatusCode, Json<Value>);

/// Build the application router
pub fn router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/convert", post(convert_upload))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(port: u16) -> ServerResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    eprintln!("🚀 Caris converter running on http://localhost:{}", port);
    eprintln!("   POST /api/convert - Upload source file");
    eprintln!("   GET  /api/logs    - SSE log stream");
    eprintln!("   GET  /health      - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router()).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "caris-converter",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "convert": "POST /api/convert",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload endpoint: one multipart `file` field, optional `encoding` field
async fn convert_upload(mut multipart: Multipart) -> Result<Json<ConvertResponse>, ApiError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut encoding: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(ServerError::BadRequest(format!("Multipart error: {}", e))))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| api_error(ServerError::BadRequest(format!("Read error: {}", e))))?;
                file_data = Some(bytes.to_vec());
            }
            "encoding" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| api_error(ServerError::BadRequest(format!("Read error: {}", e))))?;
                encoding = Some(text).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let bytes = file_data
        .ok_or_else(|| api_error(ServerError::BadRequest("No file provided".to_string())))?;
    let origin = file_name.unwrap_or_else(|| "upload".to_string());

    log_info(format!("📄 New upload: {} ({} bytes)", origin, bytes.len()));

    let conversion = convert_bytes(&bytes, &origin, encoding.as_deref())
        .map_err(|e| api_error(ServerError::from(e)))?;

    Ok(Json(ConvertResponse::from(conversion)))
}

fn api_error(err: ServerError) -> ApiError {
    log_error(err.to_string());
    let status = match &err {
        ServerError::BadRequest(_) | ServerError::Pipeline(_) => StatusCode::BAD_REQUEST,
        ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(error_response(&err.to_string())))
}
