//! # Exchange Client
//!
//! Performs the request/response half of an exchange: one `multipart/form-data`
//! POST carrying the selected image, and decoding of whatever the configured
//! [`Contract`] says the backend answers with.
//!
//! The client holds no state between calls. It does not retry, apply timeouts or
//! de-duplicate concurrent submissions; a failed exchange is terminal and the
//! caller decides whether to submit again.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use photo_exchange::{ExchangeClient, SourceImage};
//! use photo_exchange::common::config::EndpointConfig;
//!
//! let client = ExchangeClient::new(EndpointConfig::default());
//! let image = SourceImage::from_path("photo.jpg")?;
//! let processed = client.exchange(&image).await?;
//! processed.save("processed.png")?;
//! ```

use log::{debug, error, info};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use uuid::Uuid;

use crate::client::image::{ProcessedImage, SourceImage};
use crate::common::config::EndpointConfig;
use crate::common::contract::{Contract, ProcessedImagePayload, IMAGE_FIELD};
use crate::error::{ExchangeError, Result};

/// Stateless client for a single backend endpoint.
#[derive(Debug, Clone)]
pub struct ExchangeClient {
    endpoint: EndpointConfig,
    http: reqwest::Client,
}

impl ExchangeClient {
    /// Creates a client for the given endpoint.
    ///
    /// The underlying `reqwest::Client` is built without a timeout.
    pub fn new(endpoint: EndpointConfig) -> Self {
        Self {
            endpoint,
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    pub fn contract(&self) -> Contract {
        self.endpoint.contract
    }

    /// Uploads `image` and returns the processed result.
    ///
    /// # Errors
    ///
    /// * [`ExchangeError::Transport`] - connection failed or the body could not be read
    /// * [`ExchangeError::Status`] - the backend answered with a non-2xx status
    /// * [`ExchangeError::Decode`] - the JSON contract body was not `{"processedImage": ...}`
    pub async fn exchange(&self, image: &SourceImage) -> Result<ProcessedImage> {
        let exchange_id = Uuid::new_v4();
        let url = self.endpoint.url();

        info!(
            "📤 [{}] Uploading {} ({} bytes, {}) to {}",
            exchange_id,
            image.file_name(),
            image.len(),
            image.mime_type(),
            url
        );

        let part = Part::stream_with_length(image.bytes().clone(), image.len() as u64)
            .file_name(image.file_name().to_string())
            .mime_str(image.mime_type())
            .map_err(|e| ExchangeError::Request {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| {
                error!("❌ [{}] Request failed: {}", exchange_id, source);
                ExchangeError::Transport {
                    url: url.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("❌ [{}] Backend returned {}", exchange_id, status);
            return Err(ExchangeError::Status { url, status });
        }

        let processed = match self.endpoint.contract {
            Contract::Binary => {
                let content_type = response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string);
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|source| ExchangeError::Transport {
                        url: url.clone(),
                        source,
                    })?;
                debug!(
                    "[{}] Binary response: {} bytes, content type {:?}",
                    exchange_id,
                    bytes.len(),
                    content_type
                );
                ProcessedImage::from_blob(bytes, content_type)
            }
            Contract::Base64Json => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|source| ExchangeError::Transport {
                        url: url.clone(),
                        source,
                    })?;
                let payload: ProcessedImagePayload =
                    serde_json::from_slice(&body).map_err(|e| ExchangeError::Decode {
                        url: url.clone(),
                        reason: e.to_string(),
                    })?;
                debug!(
                    "[{}] JSON response: {} base64 characters",
                    exchange_id,
                    payload.processed_image.len()
                );
                ProcessedImage::from_base64_png(&payload.processed_image)
            }
        };

        info!("✅ [{}] Received processed image", exchange_id);
        Ok(processed)
    }
}
