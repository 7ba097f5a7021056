#![allow(dead_code)]

use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use photo_exchange::backend::{self, BackendState, Behavior};
use photo_exchange::common::config::EndpointConfig;
use photo_exchange::Contract;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Solid-colour image encoded in `format`.
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([180, 120, 60])))
        .write_to(&mut out, format)
        .expect("encode fixture");
    out.into_inner()
}

/// Small decodable JPEG.
pub fn jpeg_fixture() -> Vec<u8> {
    encoded_image(32, 24, ImageFormat::Jpeg)
}

/// Decodes `bytes` and returns (format, dimensions).
pub fn inspect(bytes: &[u8]) -> (ImageFormat, (u32, u32)) {
    let format = image::guess_format(bytes).expect("known format");
    let decoded = image::load_from_memory(bytes).expect("decodable image");
    (format, decoded.dimensions())
}

/// Stub backend running on an ephemeral port for the duration of a test.
pub struct TestBackend {
    pub addr: SocketAddr,
    pub state: Arc<BackendState>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestBackend {
    pub async fn start(behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub backend");
        let addr = listener.local_addr().expect("local addr");
        let state = Arc::new(BackendState::new(behavior));
        let handle = tokio::spawn(backend::serve(listener, state.clone()));
        Self { addr, state, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn endpoint(&self, contract: Contract) -> EndpointConfig {
        EndpointConfig {
            base_url: self.base_url(),
            contract,
        }
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serves an ad-hoc router, for backends that answer with fixed bodies.
pub async fn serve_router(app: axum::Router) -> (String, JoinHandle<std::io::Result<()>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move { axum::serve(listener, app).await });
    (format!("http://{}", addr), handle)
}

/// An address nothing is listening on.
pub async fn closed_endpoint(contract: Contract) -> EndpointConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind unused port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    EndpointConfig {
        base_url: format!("http://{}", addr),
        contract,
    }
}
