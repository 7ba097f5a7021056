//! # Client Components
//!
//! The client is split the same way the exchange is:
//!
//! ## Exchange Client ([`client`])
//! Sends one image to the backend and decodes the response for the configured contract.
//!
//! ## Upload Session ([`session`])
//! Holds the user's pending selection and current result, guards against submitting
//! with nothing selected, and turns failures into user notices.
//!
//! ## Images ([`image`])
//! The selected source image and the processed result.

pub mod client;
pub mod image;
pub mod session;

// Re-export for convenience
pub use client::ExchangeClient;
pub use image::{ProcessedImage, SourceImage};
pub use session::{Notifier, ResultView, SessionState, UploadSession};
