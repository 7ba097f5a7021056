//! # Stub Backend
//!
//! Stand-in for the image-processing service, speaking both contracts:
//!
//! - `POST /api/image/process` answers with the image bytes
//! - `POST /process-image` answers with `{"processedImage": "<base64>"}`
//! - `GET /api/health`
//!
//! It does no real processing: the upload is decoded and re-encoded as PNG, the
//! format the production backend always answers with. Undecodable uploads get a
//! 500. There is no upload size limit. [`Behavior::Fail`] makes every upload
//! answer 500 so the client's failure path can be driven on demand, and can be
//! switched on and off while the backend runs.

use axum::{
    extract::{multipart::Multipart, DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use image::ImageFormat;
use log::{error, info};
use serde::Serialize;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::common::contract::{ProcessedImagePayload, BASE64_JSON_PATH, BINARY_PATH, IMAGE_FIELD};

/// How the backend answers uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Behavior {
    /// Decode the upload and answer with it re-encoded as PNG.
    #[default]
    Process,
    /// Return 500 for every upload.
    Fail,
}

/// Shared state for the stub backend.
#[derive(Debug, Default)]
pub struct BackendState {
    failing: AtomicBool,
    uploads: AtomicUsize,
}

impl BackendState {
    pub fn new(behavior: Behavior) -> Self {
        let state = Self::default();
        state.set_behavior(behavior);
        state
    }

    pub fn behavior(&self) -> Behavior {
        if self.failing.load(Ordering::SeqCst) {
            Behavior::Fail
        } else {
            Behavior::Process
        }
    }

    /// Takes effect from the next upload on.
    pub fn set_behavior(&self, behavior: Behavior) {
        self.failing
            .store(behavior == Behavior::Fail, Ordering::SeqCst);
    }

    /// Number of upload requests received so far, successful or not.
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Builds the router serving both contracts.
pub fn router(state: Arc<BackendState>) -> Router {
    Router::new()
        .route(BINARY_PATH, post(binary_handler))
        .route(BASE64_JSON_PATH, post(base64_json_handler))
        .route("/api/health", get(health_check))
        .layer(DefaultBodyLimit::disable())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the stub backend on an already-bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, state: Arc<BackendState>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("🌐 Stub backend listening on http://{}", addr);
        info!("📡 Binary contract: http://{}{}", addr, BINARY_PATH);
        info!("📡 Base64/JSON contract: http://{}{}", addr, BASE64_JSON_PATH);
    }
    axum::serve(listener, router(state)).await
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "photo-exchange-stub-backend",
    }))
}

async fn binary_handler(
    State(state): State<Arc<BackendState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let image = accept_upload(&state, multipart).await?;
    let png = reencode_png(&image)?;

    info!("✅ Returning {} bytes as image/png", png.len());
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

async fn base64_json_handler(
    State(state): State<Arc<BackendState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let image = accept_upload(&state, multipart).await?;
    let png = reencode_png(&image)?;

    info!("✅ Returning {} PNG bytes as base64 JSON", png.len());
    Ok(Json(ProcessedImagePayload {
        processed_image: general_purpose::STANDARD.encode(&png),
    }))
}

/// Decodes any format the `image` crate understands and writes it back out as PNG.
fn reencode_png(upload: &[u8]) -> Result<Vec<u8>, HandlerError> {
    let decoded = image::load_from_memory(upload).map_err(|e| {
        error!("❌ Failed to decode upload: {}", e);
        processing_failed()
    })?;

    let mut png = Cursor::new(Vec::new());
    decoded.write_to(&mut png, ImageFormat::Png).map_err(|e| {
        error!("❌ Failed to encode PNG: {}", e);
        processing_failed()
    })?;
    Ok(png.into_inner())
}

/// Counts the request, applies [`Behavior`] and pulls the `image` part out of the form.
async fn accept_upload(state: &BackendState, mut multipart: Multipart) -> Result<Bytes, HandlerError> {
    state.uploads.fetch_add(1, Ordering::SeqCst);

    if state.behavior() == Behavior::Fail {
        error!("❌ Failing upload on purpose");
        return Err(processing_failed());
    }

    let mut image: Option<Bytes> = None;
    let mut filename = String::from("image");

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Failed to read multipart data: {}", e)))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            filename = field.file_name().unwrap_or("image").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("Failed to read image data: {}", e)))?;
            image = Some(data);
        }
    }

    let image = image.ok_or_else(|| bad_request("No image provided".to_string()))?;
    info!("📥 Received image: {} ({} bytes)", filename, image.len());
    Ok(image)
}

fn processing_failed() -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Image processing failed".to_string(),
        }),
    )
}

fn bad_request(error: String) -> HandlerError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}
