//! # Photo Exchange
//!
//! Client for a one-shot image exchange with a remote processing backend: pick an
//! image, upload it as `multipart/form-data`, get the processed image back.
//!
//! ## Modules
//!
//! - [`common`]: configuration and the wire contracts shared by client and backend
//! - [`client`]: the exchange client and the upload session state machine
//! - [`backend`]: a stub backend speaking both contracts, for local runs and tests
//! - [`error`]: the error type returned by the client

pub mod backend;
pub mod client;
pub mod common;
pub mod error;

pub use client::{ExchangeClient, ProcessedImage, SourceImage, UploadSession};
pub use common::config::ExchangeConfig;
pub use common::contract::Contract;
pub use error::ExchangeError;
